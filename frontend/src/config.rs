//! 路由运行时配置
//!
//! 配置来自宿主页面注入的全局变量，缺失时回退到默认值。

// =========================================================
// 常量定义
// =========================================================

/// 已登录用户访问根路径时的默认目标
pub const DEFAULT_LOGGED_IN_ROUTE: &str = "/dashboard/self";
/// 未登录用户访问根路径时的默认目标
pub const DEFAULT_LOGGED_OUT_ROUTE: &str = "/q/status:open+-is:wip";
/// 登录入口，后面拼接登录完成后的返回路径
pub const LOGIN_PATH: &str = "/login/";
/// 页面注入的部署前缀变量名
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const BASE_URL_GLOBAL: &str = "CANONICAL_PATH";
/// 页面注入的服务端回退开关变量名
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const SERVER_FALLBACK_GLOBAL: &str = "PATCHVIEW_SERVER_FALLBACK";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterConfig {
    /// 部署前缀 (如 `/gerrit`)，不以 `/` 结尾；根部署时为空
    pub base_url: String,
    /// 启用后，首次加载之后的未知路径交给服务端处理而不是渲染 404
    pub server_fallback: bool,
}

impl RouterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            server_fallback: false,
        }
    }

    pub fn with_server_fallback(mut self, enabled: bool) -> Self {
        self.server_fallback = enabled;
        self
    }

    /// 从 `window` 全局变量读取配置
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        use wasm_bindgen::JsValue;

        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let read = |name: &str| -> Option<JsValue> {
            js_sys::Reflect::get(&window, &JsValue::from_str(name))
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        };

        let base_url = read(BASE_URL_GLOBAL)
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let server_fallback = read(SERVER_FALLBACK_GLOBAL)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Self::new(base_url).with_server_fallback(server_fallback)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_window() -> Self {
        Self::default()
    }

    /// 为应用内路径加上部署前缀
    pub fn prefixed(&self, url: &str) -> String {
        format!("{}{}", self.base_url, url)
    }

    /// 去掉部署前缀，得到应用内路径
    pub fn strip_base<'a>(&self, url: &'a str) -> &'a str {
        if self.base_url.is_empty() {
            return url;
        }
        match url.strip_prefix(self.base_url.as_str()) {
            Some(rest) if rest.is_empty() => "/",
            Some(rest) if rest.starts_with(['/', '?', '#']) => rest,
            _ => url,
        }
    }
}
