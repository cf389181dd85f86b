//! Category selection for one photo.
//!
//! A catalog runs in exactly one [`LabelMode`]; [`Labels`] carries that
//! choice so `toggle`/`select` dispatch on the variant instead of a flag.

use std::collections::BTreeSet;

use crate::error::{SessionError, SessionResult};
use crate::types::LabelMode;

/// Pending or stored category selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Labels {
    /// At most one category
    Single(Option<String>),
    /// Sorted, duplicate-free set of categories
    Multi(BTreeSet<String>),
}

impl Labels {
    /// Empty selection for a mode.
    pub fn empty(mode: LabelMode) -> Self {
        match mode {
            LabelMode::Single => Labels::Single(None),
            LabelMode::Multi => Labels::Multi(BTreeSet::new()),
        }
    }

    pub fn mode(&self) -> LabelMode {
        match self {
            Labels::Single(_) => LabelMode::Single,
            Labels::Multi(_) => LabelMode::Multi,
        }
    }

    /// Flip membership of a category (multi-select only).
    pub fn toggle(&mut self, category: &str) -> SessionResult<()> {
        match self {
            Labels::Multi(set) => {
                if !set.remove(category) {
                    set.insert(category.to_string());
                }
                Ok(())
            }
            Labels::Single(_) => Err(SessionError::ModeMismatch {
                operation: "toggle",
                mode: LabelMode::Single,
            }),
        }
    }

    /// Replace the selection with a category (single-select only).
    pub fn select(&mut self, category: &str) -> SessionResult<()> {
        match self {
            Labels::Single(current) => {
                *current = Some(category.to_string());
                Ok(())
            }
            Labels::Multi(_) => Err(SessionError::ModeMismatch {
                operation: "select",
                mode: LabelMode::Multi,
            }),
        }
    }

    /// Pick a category the way the configured mode does it.
    pub fn pick(&mut self, category: &str) {
        match self {
            Labels::Single(current) => *current = Some(category.to_string()),
            Labels::Multi(set) => {
                if !set.remove(category) {
                    set.insert(category.to_string());
                }
            }
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        match self {
            Labels::Single(current) => current.as_deref() == Some(category),
            Labels::Multi(set) => set.contains(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Labels::Single(current) => current.is_none(),
            Labels::Multi(set) => set.is_empty(),
        }
    }

    /// Selected categories, sorted in multi-select mode.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Labels::Single(current) => Box::new(current.as_deref().into_iter()),
            Labels::Multi(set) => Box::new(set.iter().map(String::as_str)),
        }
    }

    /// Column form: the single token, or tokens joined with `,` in sorted order.
    pub fn to_column(&self) -> String {
        match self {
            Labels::Single(current) => current.clone().unwrap_or_default(),
            Labels::Multi(set) => set.iter().map(String::as_str).collect::<Vec<_>>().join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_on_then_off_is_empty() {
        let mut labels = Labels::empty(LabelMode::Multi);
        labels.toggle("landscape").unwrap();
        assert!(labels.contains("landscape"));
        labels.toggle("landscape").unwrap();
        assert!(labels.is_empty());
        assert_eq!(labels.to_column(), "");
    }

    #[test]
    fn test_toggle_order_does_not_matter() {
        let mut a = Labels::empty(LabelMode::Multi);
        a.toggle("landscape").unwrap();
        a.toggle("family").unwrap();

        let mut b = Labels::empty(LabelMode::Multi);
        b.toggle("family").unwrap();
        b.toggle("landscape").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.to_column(), "family,landscape");
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["family", "landscape"]);
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut labels = Labels::empty(LabelMode::Single);
        labels.select("city").unwrap();
        labels.select("water").unwrap();
        assert!(!labels.contains("city"));
        assert_eq!(labels.to_column(), "water");
        labels.select("water").unwrap();
        assert_eq!(labels.to_column(), "water");
    }

    #[test]
    fn test_mode_mismatch_is_rejected() {
        let mut single = Labels::empty(LabelMode::Single);
        assert!(matches!(
            single.toggle("city"),
            Err(SessionError::ModeMismatch { operation: "toggle", .. })
        ));

        let mut multi = Labels::empty(LabelMode::Multi);
        assert!(matches!(
            multi.select("city"),
            Err(SessionError::ModeMismatch { operation: "select", .. })
        ));
        assert!(multi.is_empty());
    }

    #[test]
    fn test_pick_dispatches_on_mode() {
        let mut single = Labels::empty(LabelMode::Single);
        single.pick("city");
        single.pick("trees");
        assert_eq!(single.to_column(), "trees");

        let mut multi = Labels::empty(LabelMode::Multi);
        multi.pick("trees");
        multi.pick("city");
        assert_eq!(multi.to_column(), "city,trees");
    }
}
