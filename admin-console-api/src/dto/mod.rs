//! Wire DTOs of the admin backend.

mod administrator;
mod api_key;

pub use administrator::{
    AdministratorListDto, DeleteAdministratorsRequest, InviteAdministratorRequest,
    UpdateAdministratorRequest, ADMINISTRATOR_ROLE,
};
pub use api_key::{
    ApiKeyListDto, CreateApiKeyRequest, CreateApiKeyResponse, DeleteApiKeysRequest,
    RerollApiKeyRequest, RerollApiKeyResponse, UpdateApiKeyRequest,
};
