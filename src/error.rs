//! Error handling for panel navigation
//!
//! Route-match failures are not errors: a segment tail that no rule accepts is
//! simply "not a panel". Everything else that can go wrong while reconciling the
//! panel stack is described by [`PanelError`].

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// A resolver attached to a route rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resolver '{key}' failed: {message}")]
pub struct ResolveError {
    /// Resolver key as declared on the rule
    pub key: String,
    /// Failure description
    pub message: String,
}

impl ResolveError {
    /// Create a resolver error for `key`
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while driving the panel stack
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// The navigator was used before `start()` (or after `stop()`)
    #[error("panel navigator is not started")]
    NotStarted,

    /// A resolver failed; the batch containing it was not opened
    #[error(transparent)]
    Resolver(#[from] ResolveError),

    /// The host router rejected a navigation
    #[error("navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    /// A rule path could not be parsed
    #[error("invalid rule path '{path}': {reason}")]
    InvalidRulePath { path: String, reason: String },

    /// A collaborator was wired up incorrectly
    #[error("misconfigured panel navigator: {message}")]
    Misconfigured { message: String },

    /// `select` was called with an index outside the open stack
    #[error("panel index {index} out of range for stack of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl PanelError {
    /// Create a navigation error
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a misconfiguration error
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured {
            message: message.into(),
        }
    }

    /// Check if this error came from a resolver
    pub fn is_resolver(&self) -> bool {
        matches!(self, PanelError::Resolver(_))
    }
}

// ============================================================================
// Reconciliation outcome
// ============================================================================

/// What a single reconciliation did to the open stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The host stack already matched the URL
    Unchanged,
    /// Panels were closed and/or opened
    Changed {
        /// Number of panels closed
        closed: usize,
        /// Number of panels opened
        opened: usize,
    },
    /// A newer reconciliation started while this batch was resolving; the
    /// batch was dropped without opening anything
    Discarded {
        /// Number of panels closed before the batch was dropped
        closed: usize,
    },
}

impl ReconcileOutcome {
    /// Check if the stack changed at all
    pub fn is_changed(&self) -> bool {
        match self {
            ReconcileOutcome::Unchanged => false,
            ReconcileOutcome::Changed { closed, opened } => closed + opened > 0,
            ReconcileOutcome::Discarded { closed } => *closed > 0,
        }
    }

    /// Number of panels opened
    pub fn opened(&self) -> usize {
        match self {
            ReconcileOutcome::Changed { opened, .. } => *opened,
            _ => 0,
        }
    }

    /// Number of panels closed
    pub fn closed(&self) -> usize {
        match self {
            ReconcileOutcome::Unchanged => 0,
            ReconcileOutcome::Changed { closed, .. } | ReconcileOutcome::Discarded { closed } => {
                *closed
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
