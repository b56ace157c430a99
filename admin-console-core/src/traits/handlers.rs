//! Submission handler abstractions

use async_trait::async_trait;

use crate::services::{DeleteContext, SubmitContext};

/// Create/update handler of one entity type.
///
/// Performs exactly one backend call. On failure it reports through the
/// context and returns `false`; on success it either closes the dialog or
/// escalates to a custom dialog, and returns `true`.
#[async_trait]
pub trait SubmitHandler<F>: Send + Sync {
    async fn submit(&self, data: F, ctx: &SubmitContext<F>) -> bool;
}

/// Delete handler of one entity type.
///
/// Receives resolved identifiers, never the selection itself.
#[async_trait]
pub trait DeleteHandler<F>: Send + Sync {
    async fn delete(&self, ctx: &DeleteContext<F>) -> bool;
}
