//! Bulk admin actions and their user-facing messages
//!
//! Actions mass-update a boolean flag on the selected rows and report a
//! pluralized success count. A failed update reports one fixed warning
//! message regardless of cause; the cause itself only goes to the log.

use serde::{Deserialize, Serialize};

/// Bulk actions on blog posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogAction {
    /// Clear the draft flag
    Publish,
    /// Set the draft flag
    RevertToDraft,
}

impl BlogAction {
    /// The is_draft value this action writes
    pub fn is_draft(self) -> bool {
        matches!(self, Self::RevertToDraft)
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Publish => "published",
            Self::RevertToDraft => "reverted to draft",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::RevertToDraft => "revert_to_draft",
        }
    }
}

/// Bulk actions on comments and categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Activate,
    Deactivate,
}

impl ToggleAction {
    /// The is_active value this action writes
    pub fn is_active(self) -> bool {
        matches!(self, Self::Activate)
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Activate => "activated",
            Self::Deactivate => "deactivated",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

/// Result of a bulk action, rendered for the admin UI
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub updated: usize,
    pub message: String,
}

impl ActionOutcome {
    pub fn succeeded(updated: usize, noun: &str, verb: &str) -> Self {
        Self {
            success: true,
            updated,
            message: success_message(updated, noun, verb),
        }
    }

    pub fn failed(noun: &str) -> Self {
        Self {
            success: false,
            updated: 0,
            message: failure_message(noun),
        }
    }
}

/// "1 blog was published." / "3 blogs were published."
pub fn success_message(count: usize, noun: &str, verb: &str) -> String {
    if count == 1 {
        format!("1 {noun} was {verb}.")
    } else {
        format!("{count} {noun}s were {verb}.")
    }
}

/// Fixed warning used for any bulk-update failure
pub fn failure_message(noun: &str) -> String {
    format!("Unable to update the selected {noun}s.")
}
