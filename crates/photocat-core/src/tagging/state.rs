//! Transient per-photo tag state and navigation bookkeeping.
//!
//! [`PendingTags`] and [`SessionState`] are plain values: each transition
//! takes the current value and returns the next one, so the state machine can
//! be exercised without a catalog, a decoder, or a front end.

use crate::error::{SessionError, SessionResult};
use crate::types::{LabelMode, MAX_RATING};

use super::keymap::CategoryMap;
use super::labels::Labels;

/// One operator action on the pending tag state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMutation {
    /// Pick a category the way the catalog's label mode does it
    Category(String),
    /// Flip a category in multi-select mode
    ToggleCategory(String),
    /// Replace the category in single-select mode
    SelectCategory(String),
    /// Set the star rating (0 clears)
    SetRating(u8),
    /// Flip the mark-for-deletion flag
    ToggleDeletion,
    /// Flip the do-not-delete flag
    ToggleDoNotDelete,
}

impl TagMutation {
    /// Translate an operator keystroke.
    ///
    /// `0`-`4` set the rating, `d` and `k` flip the deletion flags, and
    /// category triggers pick their category. Anything else (navigation,
    /// save, quit, unbound keys) is not a tag mutation.
    pub fn from_key(key: char, vocabulary: &CategoryMap) -> Option<Self> {
        match key.to_ascii_lowercase() {
            digit @ '0'..='4' => digit.to_digit(10).map(|d| Self::SetRating(d as u8)),
            'd' => Some(Self::ToggleDeletion),
            'k' => Some(Self::ToggleDoNotDelete),
            _ => vocabulary
                .resolve_trigger(key)
                .map(|category| Self::Category(category.to_string())),
        }
    }
}

/// Operator selections for the current photo, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTags {
    pub labels: Labels,
    pub rating: u8,
    pub marked_for_deletion: bool,
    pub do_not_delete: bool,
}

impl PendingTags {
    /// Fresh state for a newly viewed photo.
    pub fn empty(mode: LabelMode) -> Self {
        Self {
            labels: Labels::empty(mode),
            rating: 0,
            marked_for_deletion: false,
            do_not_delete: false,
        }
    }

    /// Whether nothing has been selected yet.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.rating == 0
            && !self.marked_for_deletion
            && !self.do_not_delete
    }

    /// Apply one mutation, returning the next state.
    ///
    /// Categories must belong to `vocabulary`. Both deletion flags may be set
    /// at the same time.
    pub fn apply(mut self, mutation: &TagMutation, vocabulary: &CategoryMap) -> SessionResult<Self> {
        match mutation {
            TagMutation::Category(category) => {
                ensure_known(vocabulary, category)?;
                self.labels.pick(category);
            }
            TagMutation::ToggleCategory(category) => {
                ensure_known(vocabulary, category)?;
                self.labels.toggle(category)?;
            }
            TagMutation::SelectCategory(category) => {
                ensure_known(vocabulary, category)?;
                self.labels.select(category)?;
            }
            TagMutation::SetRating(rating) => {
                if *rating > MAX_RATING {
                    return Err(SessionError::InvalidRating(*rating));
                }
                self.rating = *rating;
            }
            TagMutation::ToggleDeletion => self.marked_for_deletion = !self.marked_for_deletion,
            TagMutation::ToggleDoNotDelete => self.do_not_delete = !self.do_not_delete,
        }
        Ok(self)
    }
}

fn ensure_known(vocabulary: &CategoryMap, category: &str) -> SessionResult<()> {
    if vocabulary.contains(category) {
        Ok(())
    } else {
        Err(SessionError::UnknownCategory(category.to_string()))
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No photo materialized
    Idle,
    /// Current photo decoded, pending tags editable
    Viewing,
    /// Commit in flight
    Saving,
    /// Every photo from the current index on has been handled
    Exhausted,
}

/// Result of a navigation or save step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Landed on a decodable photo, after auto-advancing past `skipped`
    /// unreadable ones
    Viewing { index: usize, skipped: usize },
    /// Backward navigation at index 0; nothing changed
    AtStart,
    /// No photo ahead; `skipped` unreadable photos were recorded on the way
    Exhausted { skipped: usize },
    /// The save was committed, but recording an unreadable photo ahead of
    /// it failed. The session is `Idle` at `index`; retry with `load_current`.
    Stalled { index: usize },
}

/// Navigation position plus pending tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub index: usize,
    pub phase: SessionPhase,
    pub pending: PendingTags,
}

impl SessionState {
    pub fn new(mode: LabelMode) -> Self {
        Self {
            index: 0,
            phase: SessionPhase::Idle,
            pending: PendingTags::empty(mode),
        }
    }

    /// Move to `index` with pending tags discarded.
    pub fn moved_to(self, index: usize) -> Self {
        let mode = self.pending.labels.mode();
        Self {
            index,
            phase: SessionPhase::Idle,
            pending: PendingTags::empty(mode),
        }
    }

    /// Same position, new phase.
    pub fn in_phase(self, phase: SessionPhase) -> Self {
        Self { phase, ..self }
    }

    /// Same position and phase, new pending tags.
    pub fn with_pending(self, pending: PendingTags) -> Self {
        Self { pending, ..self }
    }

    /// Index after this one, if the list has one.
    pub fn next_index(&self, len: usize) -> Option<usize> {
        let next = self.index + 1;
        (next < len).then_some(next)
    }

    /// Index before this one, if any.
    pub fn previous_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }
}
