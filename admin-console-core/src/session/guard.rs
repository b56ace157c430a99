//! Discard-changes confirmation guard

use std::fmt;

use serde_json::Value;

use crate::types::{DialogKind, DialogTarget};

/// A dialog-switch request held back until the user decides about unsaved
/// changes. It is replayed as a forced request on confirm.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredRequest<F> {
    Open(DialogKind),
    OpenCustom {
        key: String,
        payload: Option<Value>,
    },
    /// Open a standard dialog after installing `record` as its pending data.
    OpenWithRecord {
        kind: DialogKind,
        record: F,
    },
    Cancel,
}

impl<F> fmt::Display for DeferredRequest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(kind) | Self::OpenWithRecord { kind, .. } => write!(f, "open {kind}"),
            Self::OpenCustom { key, .. } => write!(f, "open {}", DialogTarget::custom(key.as_str())),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// What the guard remembers while the confirmation prompt is shown.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingConfirmation<F> {
    /// The dialog that was visible when the guard fired.
    pub hidden: Option<DialogTarget>,
    pub request: DeferredRequest<F>,
}

#[derive(Debug, Clone, PartialEq)]
enum GuardState<F> {
    Idle,
    PendingConfirmation(PendingConfirmation<F>),
}

/// Two-state machine: `Idle` and `PendingConfirmation`.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmationGuard<F> {
    state: GuardState<F>,
}

impl<F> Default for ConfirmationGuard<F> {
    fn default() -> Self {
        Self {
            state: GuardState::Idle,
        }
    }
}

impl<F> ConfirmationGuard<F> {
    pub fn is_pending(&self) -> bool {
        matches!(self.state, GuardState::PendingConfirmation(_))
    }

    pub fn pending_request(&self) -> Option<&DeferredRequest<F>> {
        match &self.state {
            GuardState::PendingConfirmation(pending) => Some(&pending.request),
            GuardState::Idle => None,
        }
    }

    /// Idle -> `PendingConfirmation`. The caller guarantees the guard is idle.
    pub fn intercept(&mut self, hidden: Option<DialogTarget>, request: DeferredRequest<F>) {
        debug_assert!(!self.is_pending());
        self.state = GuardState::PendingConfirmation(PendingConfirmation { hidden, request });
    }

    /// `PendingConfirmation` -> Idle, handing back what was held.
    pub fn take(&mut self) -> Option<PendingConfirmation<F>> {
        match std::mem::replace(&mut self.state, GuardState::Idle) {
            GuardState::PendingConfirmation(pending) => Some(pending),
            GuardState::Idle => None,
        }
    }
}
