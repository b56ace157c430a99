//! Backend route table.

/// Absolute URLs of every endpoint the console calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    base: String,
}

impl ApiRoutes {
    /// `base_url` is the backend root; a trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn administrator_index(&self) -> String {
        format!("{}/administrator", self.base)
    }

    pub fn administrator_list(&self) -> String {
        format!("{}/administrator/list", self.base)
    }

    pub fn administrator_invite(&self) -> String {
        format!("{}/administrator/invite", self.base)
    }

    pub fn administrator(&self, id: i64) -> String {
        format!("{}/administrator/{id}", self.base)
    }

    pub fn api_key_index(&self) -> String {
        format!("{}/api-key", self.base)
    }

    pub fn api_key_list(&self) -> String {
        format!("{}/api-key/list", self.base)
    }

    pub fn api_key(&self, id: i64) -> String {
        format!("{}/api-key/{id}", self.base)
    }

    pub fn api_key_reroll(&self, id: i64) -> String {
        format!("{}/api-key/{id}/reroll", self.base)
    }
}
