//! Seams between the orchestration core and its collaborators

mod handlers;
mod row_converter;
mod row_fetcher;

pub use handlers::{DeleteHandler, SubmitHandler};
pub use row_converter::RowConverter;
pub use row_fetcher::RowFetcher;
