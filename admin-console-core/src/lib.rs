//! Admin Console Core Library
//!
//! Dialog and grid orchestration for the admin console's CRUD pages:
//! - Dialog state store with history and a discard-changes guard
//! - Grid/dialog binding (selection, row conversion, row activation)
//! - Submission pipeline and commit-driven revalidation
//! - Row data source with a shared page cache
//! - Administrator and API key page bindings
//!
//! The network and conversion seams are traits, so every piece can be
//! driven without a backend.

pub mod error;
pub mod services;
pub mod session;
pub mod traits;
pub mod types;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{CrudHandlers, CrudPage, DeletePrompt, GridBinding, RowDataSource};
pub use session::{DialogSession, SessionHandle};
pub use traits::{DeleteHandler, RowConverter, RowFetcher, SubmitHandler};
