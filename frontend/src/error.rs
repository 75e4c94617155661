use thiserror::Error;

use crate::web::HttpError;

// =========================================================
// 核心错误类型
// =========================================================

/// 路由错误
///
/// 分为两类：
/// - 注册期错误 (`InvalidPattern`, `UndeclaredCapture`)：路由表无法构建，属于程序缺陷
/// - 导航期错误：单次导航失败，统一以 404 页面错误呈现，不影响后续导航
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route matches path {0:?}")]
    NoMatch(String),

    #[error("route {route} is missing capture `{name}`")]
    MissingCapture {
        route: &'static str,
        name: &'static str,
    },

    #[error("route {route} capture `{name}` has invalid value {value:?}")]
    InvalidCapture {
        route: &'static str,
        name: &'static str,
        value: String,
    },

    #[error("no project found for change {0}")]
    UnknownChange(u32),

    #[error("REST request failed: {0}")]
    Rest(String),

    #[error("route {route} has an invalid pattern")]
    InvalidPattern {
        route: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("route {route} reads capture `{name}` but its pattern does not define it")]
    UndeclaredCapture {
        route: &'static str,
        name: &'static str,
    },
}

impl RouteError {
    pub fn status_code(&self) -> u16 {
        match self {
            RouteError::InvalidPattern { .. } | RouteError::UndeclaredCapture { .. } => 500,
            RouteError::NoMatch(_)
            | RouteError::MissingCapture { .. }
            | RouteError::InvalidCapture { .. }
            | RouteError::UnknownChange(_)
            | RouteError::Rest(_) => 404,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RouteError::NoMatch(_) => "NO_ROUTE",
            RouteError::MissingCapture { .. } => "MISSING_CAPTURE",
            RouteError::InvalidCapture { .. } => "INVALID_CAPTURE",
            RouteError::UnknownChange(_) => "UNKNOWN_CHANGE",
            RouteError::Rest(_) => "REST_ERROR",
            RouteError::InvalidPattern { .. } => "INVALID_PATTERN",
            RouteError::UndeclaredCapture { .. } => "UNDECLARED_CAPTURE",
        }
    }
}

impl From<HttpError> for RouteError {
    fn from(err: HttpError) -> Self {
        RouteError::Rest(err.to_string())
    }
}

pub type Result<T, E = RouteError> = std::result::Result<T, E>;
