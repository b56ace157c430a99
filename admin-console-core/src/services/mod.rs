//! Page services
//!
//! The generic orchestration pieces ([`CrudPage`], [`GridBinding`],
//! [`RowDataSource`]) and the two entity bindings built on them.

mod administrator_service;
mod api_key_service;
mod crud_page;
mod delete_prompt;
mod grid_binding;
mod row_data_source;
mod submission;

pub use administrator_service::{
    administrator_page, AdministratorDeleteHandler, AdministratorFields, AdministratorInviteHandler,
    AdministratorPage, AdministratorRowConverter, AdministratorRowFetcher, AdministratorStatus,
    AdministratorUpdateHandler, ADMINISTRATOR_DELETE_TITLES,
};
pub use api_key_service::{
    api_key_page, ApiKeyCreateHandler, ApiKeyDeleteHandler, ApiKeyFields, ApiKeyPage,
    ApiKeyRerollHandler, ApiKeyRowConverter, ApiKeyRowFetcher, ApiKeyUpdateHandler,
    ClientSecretPayload, API_KEY_DELETE_TITLES, CLIENT_SECRET_DIALOG, REROLL_ACTION,
};
pub use crud_page::{CrudHandlers, CrudPage};
pub use delete_prompt::{DeletePrompt, DeleteTitles};
pub use grid_binding::GridBinding;
pub use row_data_source::{PageUpdates, RowCache, RowDataSource, DEFAULT_DEDUPE_INTERVAL};
pub use submission::{DeleteContext, LoadingGuard, SubmitContext};
