//! User-visible failure notifications.

use std::fmt;

/// Which stage of the screen's pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Upload,
    Update,
    Refresh,
}

impl FailureKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Upload => "Image upload failed",
            Self::Update => "Could not save your profile",
            Self::Refresh => "Could not reload your profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: FailureKind,
    pub detail: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.detail)
    }
}

/// Sink for notices shown to the user (toast, snackbar, stderr).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
