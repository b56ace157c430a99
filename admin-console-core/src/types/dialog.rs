use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::RowId;

/// The three standard CRUD dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Add,
    Edit,
    Delete,
}

impl DialogKind {
    pub const ALL: [Self; 3] = [Self::Add, Self::Edit, Self::Delete];
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Anything that can be the current dialog of a session.
///
/// Custom dialogs are named by a string key; their payload lives in the
/// session, not in the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum DialogTarget {
    Standard(DialogKind),
    Custom(String),
}

impl DialogTarget {
    pub fn custom(key: impl Into<String>) -> Self {
        Self::Custom(key.into())
    }

    /// The standard kind, if this is not a custom dialog.
    pub fn kind(&self) -> Option<DialogKind> {
        match self {
            Self::Standard(kind) => Some(*kind),
            Self::Custom(_) => None,
        }
    }
}

impl From<DialogKind> for DialogTarget {
    fn from(kind: DialogKind) -> Self {
        Self::Standard(kind)
    }
}

impl fmt::Display for DialogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(kind) => kind.fmt(f),
            Self::Custom(key) => write!(f, "custom:{key}"),
        }
    }
}

/// Visibility of every dialog of a session at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenFlags {
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    /// Key of the visible custom dialog.
    pub custom: Option<String>,
    /// The "discard unsaved changes?" prompt.
    pub confirmation: bool,
}

impl OpenFlags {
    /// Number of visible dialogs, not counting the confirmation prompt.
    pub fn open_count(&self) -> usize {
        usize::from(self.add)
            + usize::from(self.edit)
            + usize::from(self.delete)
            + usize::from(self.custom.is_some())
    }

    pub fn all_closed(&self) -> bool {
        self.open_count() == 0
    }
}

/// Outcome of a dialog-switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request took effect.
    Applied,
    /// Unsaved changes exist; the request waits for confirm/decline.
    AwaitingConfirmation,
    /// The request was refused (a confirmation is already pending, the
    /// session was disposed, or the conversion it depended on failed).
    Rejected,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Field-level validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// How one field of an entity is presented in the add and edit dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Shown as an input in the add dialog.
    pub addable: bool,
    /// Shown as an input in the edit dialog.
    pub editable: bool,
}

impl FieldSpec {
    /// Whether the field accepts input in a dialog of `kind`.
    pub fn is_input_in(&self, kind: DialogKind) -> bool {
        match kind {
            DialogKind::Add => self.addable,
            DialogKind::Edit => self.editable,
            DialogKind::Delete => false,
        }
    }
}

/// Dialog-editable shape of an entity.
pub trait DialogFields: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Field layout of the add and edit dialogs.
    const FIELDS: &'static [FieldSpec] = &[];

    /// Identifier of the entity these fields describe.
    fn record_id(&self) -> RowId;
}
