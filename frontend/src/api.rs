//! Gerrit REST 会话服务
//!
//! 路由只读取两类信息：当前是否有会话，以及变更所属的项目。两者都会在
//! 内存中缓存，同一页面生命周期内不会重复请求。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use patchview_shared::JSON_PREFIX;
use patchview_shared::protocol::{
    AccountDetail, AccountDetailRequest, ApiRequest, ChangeInfo, ChangeLookupRequest,
};
use serde::de::DeserializeOwned;

use crate::error::{Result, RouteError};
use crate::routing::SessionService;
use crate::web::{HttpClient, HttpError};

// =========================================================
// 传输层
// =========================================================

pub struct RestResponse {
    pub status: u16,
    pub body: String,
}

impl RestResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait RestTransport {
    async fn get(&self, url: &str) -> Result<RestResponse, HttpError>;
}

/// 浏览器 fetch 实现
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl RestTransport for FetchTransport {
    async fn get(&self, url: &str) -> Result<RestResponse, HttpError> {
        let response = HttpClient::get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(RestResponse { status, body })
    }
}

/// 去掉 XSSI 前缀后解析 JSON
pub fn parse_json_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let json = body.strip_prefix(JSON_PREFIX).unwrap_or(body).trim_start();
    serde_json_wasm::from_str(json)
        .map_err(|e| RouteError::Rest(format!("invalid JSON response: {}", e)))
}

// =========================================================
// 会话服务
// =========================================================

pub struct GerritRestApi<T = FetchTransport> {
    base_url: String,
    transport: T,
    logged_in: Cell<Option<bool>>,
    projects: RefCell<HashMap<u32, String>>,
}

impl<T: RestTransport> GerritRestApi<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            logged_in: Cell::new(None),
            projects: RefCell::new(HashMap::new()),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send<R: ApiRequest>(&self, request: &R) -> Result<RestResponse> {
        let url = self.url(&request.path());
        let response = self.transport.get(&url).await?;
        tracing::debug!(%url, status = response.status, "REST GET");
        Ok(response)
    }
}

#[async_trait(?Send)]
impl<T: RestTransport> SessionService for GerritRestApi<T> {
    async fn is_logged_in(&self) -> Result<bool> {
        if let Some(cached) = self.logged_in.get() {
            return Ok(cached);
        }

        let request = AccountDetailRequest;
        let response = self.send(&request).await?;
        let logged_in = match response.status {
            401 | 403 => false,
            _ if response.is_success() => {
                let account: AccountDetail = parse_json_response(&response.body)?;
                tracing::debug!(account_id = account.account_id, "session active");
                true
            }
            status => {
                return Err(RouteError::Rest(format!(
                    "account lookup failed with status {}",
                    status
                )));
            }
        };

        self.logged_in.set(Some(logged_in));
        Ok(logged_in)
    }

    async fn lookup_project_for_change(&self, change: u32) -> Result<Option<String>> {
        let cached = self.projects.borrow().get(&change).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let request = ChangeLookupRequest { change };
        let response = self.send(&request).await?;
        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(RouteError::Rest(format!(
                "change lookup failed with status {}",
                response.status
            )));
        }

        let infos: Vec<ChangeInfo> = parse_json_response(&response.body)?;
        let project = infos.into_iter().next().map(|info| info.project);
        if let Some(project) = &project {
            self.record_project_for_change(change, project);
        }
        Ok(project)
    }

    fn record_project_for_change(&self, change: u32, project: &str) {
        self.projects
            .borrow_mut()
            .insert(change, project.to_string());
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================
