use serde::{Deserialize, Serialize};

/// Role assigned to every administrator invited through the console.
pub const ADMINISTRATOR_ROLE: &str = "owner";

/// One row of `POST /administrator/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorListDto {
    pub id: i64,
    pub enabled: bool,
    /// Whether the invitation has been accepted.
    pub accepted: bool,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteAdministratorRequest {
    pub company_id: i64,
    pub enabled: bool,
    pub role: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdministratorRequest {
    pub company_id: i64,
    pub enabled: bool,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAdministratorsRequest {
    pub administrator_ids: Vec<i64>,
    pub company_id: i64,
}
