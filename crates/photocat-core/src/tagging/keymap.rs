//! Trigger-key to category lookup.
//!
//! The vocabulary is an ordered list of `(trigger, category)` pairs supplied
//! by configuration. Lookups in both directions are pure.

use std::collections::HashSet;

use crate::config::CategoryBinding;
use crate::error::ConfigError;
use crate::types::UNREADABLE_LABEL;

/// Keys the front end binds to non-category actions: ratings `0`-`4`,
/// `d` mark-for-deletion, `k` do-not-delete, `q` quit.
pub const RESERVED_TRIGGERS: &[char] = &['0', '1', '2', '3', '4', 'd', 'k', 'q'];

/// Validated, ordered category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    bindings: Vec<CategoryBinding>,
}

impl CategoryMap {
    /// Build the map, normalizing triggers to lowercase.
    ///
    /// Fails when the vocabulary is empty, a trigger or category repeats, a
    /// trigger collides with a reserved key, or a category token could not be
    /// stored unambiguously in the `labels` column.
    pub fn new(bindings: Vec<CategoryBinding>) -> Result<Self, ConfigError> {
        if bindings.is_empty() {
            return Err(invalid("tagging.categories must not be empty".into()));
        }

        let mut triggers = HashSet::new();
        let mut categories = HashSet::new();
        let mut normalized = Vec::with_capacity(bindings.len());

        for binding in bindings {
            let trigger = binding.trigger.to_ascii_lowercase();
            let category = binding.category.trim().to_string();

            if trigger.is_whitespace() || trigger.is_control() {
                return Err(invalid(format!(
                    "category \"{category}\" needs a printable trigger key"
                )));
            }
            if RESERVED_TRIGGERS.contains(&trigger) {
                return Err(invalid(format!(
                    "trigger '{trigger}' for \"{category}\" is reserved"
                )));
            }
            if category.is_empty() || category.contains(',') || category == UNREADABLE_LABEL {
                return Err(invalid(format!(
                    "\"{category}\" is not a valid category token"
                )));
            }
            if !triggers.insert(trigger) {
                return Err(invalid(format!("trigger '{trigger}' is bound twice")));
            }
            if !categories.insert(category.clone()) {
                return Err(invalid(format!("category \"{category}\" is listed twice")));
            }

            normalized.push(CategoryBinding { trigger, category });
        }

        Ok(Self {
            bindings: normalized,
        })
    }

    /// Category bound to a key, if any. Case-insensitive.
    pub fn resolve_trigger(&self, key: char) -> Option<&str> {
        let key = key.to_ascii_lowercase();
        self.bindings
            .iter()
            .find(|b| b.trigger == key)
            .map(|b| b.category.as_str())
    }

    /// Key bound to a category, if any.
    pub fn trigger_for(&self, category: &str) -> Option<char> {
        self.bindings
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.trigger)
    }

    /// Whether the category is part of the vocabulary.
    pub fn contains(&self, category: &str) -> bool {
        self.trigger_for(category).is_some()
    }

    /// Categories in configured order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.category.as_str())
    }

    pub fn bindings(&self) -> &[CategoryBinding] {
        &self.bindings
    }

    /// Label shown next to a category, e.g. `"abstract (x)"`.
    pub fn display_label(&self, category: &str) -> String {
        match self.trigger_for(category) {
            Some(key) => format!("{category} ({key})"),
            None => category.to_string(),
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError(message)
}
