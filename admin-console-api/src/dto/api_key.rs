use serde::{Deserialize, Serialize};

/// One row of `POST /api-key/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyListDto {
    pub id: i64,
    pub enabled: bool,
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub company_id: i64,
    pub enabled: bool,
    pub name: String,
    pub description: String,
    pub scopes: Vec<String>,
}

/// The only response that ever carries the client secret in clear text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyResponse {
    pub id: i64,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKeyRequest {
    pub company_id: i64,
    pub enabled: bool,
    pub name: String,
    pub description: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollApiKeyRequest {
    pub id: i64,
    pub company_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollApiKeyResponse {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteApiKeysRequest {
    pub api_key_ids: Vec<i64>,
    pub company_id: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_response_parses() {
        let resp: CreateApiKeyResponse =
            serde_json::from_str(r#"{"id":1,"clientId":"cid","clientSecret":"sec"}"#).unwrap();
        assert_eq!(resp.client_id, "cid");
        assert_eq!(resp.client_secret, "sec");
    }

    #[test]
    fn list_dto_defaults_scopes() {
        let dto: ApiKeyListDto =
            serde_json::from_str(r#"{"id":1,"enabled":true,"clientId":"c","name":"ci"}"#)
                .unwrap();
        assert!(dto.scopes.is_empty());
        assert!(dto.description.is_empty());
    }
}
