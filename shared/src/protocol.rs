use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A trait that defines the request-response relationship and metadata for a REST endpoint.
///
/// All endpoints used by the router are plain GETs, so only the path varies.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (relative to the server base).
    fn path(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

/// Details of the calling account; 401/403 means no session.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountDetailRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetail {
    #[serde(rename = "_account_id")]
    pub account_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ApiRequest for AccountDetailRequest {
    type Response = AccountDetail;
    fn path(&self) -> String {
        "/accounts/self/detail".to_string()
    }
}

/// Look up a change by its number to find the owning project.
#[derive(Debug, Clone, Copy)]
pub struct ChangeLookupRequest {
    pub change: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub project: String,
    #[serde(rename = "_number")]
    pub number: u32,
}

impl ApiRequest for ChangeLookupRequest {
    type Response = Vec<ChangeInfo>;
    fn path(&self) -> String {
        format!("/changes/?q=change:{}&n=1", self.change)
    }
}
