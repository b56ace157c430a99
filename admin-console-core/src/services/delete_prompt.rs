//! What the delete dialog shows

use serde::Serialize;

use crate::session::DialogSession;
use crate::types::{DialogFields, DialogKind};

/// Entity-specific delete dialog titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTitles {
    /// One explicit entity is targeted.
    pub singular: &'static str,
    /// The grid selection is targeted.
    pub plural: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePrompt {
    pub title: String,
    /// "Delete N selected row(s)?" when the selection is targeted.
    pub summary: Option<String>,
    pub error: Option<String>,
    pub can_submit: bool,
}

impl DeletePrompt {
    pub fn from_session<F: DialogFields>(session: &DialogSession<F>, titles: &DeleteTitles) -> Self {
        let explicit = session.pending_data(DialogKind::Delete).is_some();
        let count = session.selected_row_ids().len();
        let uses_selection = !explicit && count > 0;

        let title = if uses_selection {
            titles.plural
        } else {
            titles.singular
        };
        let summary = uses_selection.then(|| {
            let noun = if count == 1 { "row" } else { "rows" };
            format!("Delete {count} selected {noun}?")
        });

        Self {
            title: title.to_string(),
            summary,
            error: session.error().map(ToString::to_string),
            can_submit: session.can_submit_delete(),
        }
    }
}
