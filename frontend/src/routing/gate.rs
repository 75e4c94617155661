//! 认证守卫

use std::future::Future;

use super::action::Action;
use super::context::NavigationContext;
use super::encoding::encode_uri_component;
use super::session::SessionService;
use crate::config::LOGIN_PATH;
use crate::error::Result;

/// 在需要登录的路由处理函数之前检查会话
pub struct AuthGate<'a, S: ?Sized> {
    session: &'a S,
}

impl<'a, S: SessionService + ?Sized> AuthGate<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// 未登录时返回登录重定向，`handler` 不会被调用
    pub async fn guard<F, Fut>(
        &self,
        requires_auth: bool,
        ctx: &NavigationContext,
        handler: F,
    ) -> Result<Action>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Action>>,
    {
        if requires_auth && !self.session.is_logged_in().await? {
            tracing::debug!(path = %ctx.canonical_path, "not logged in, redirecting to login");
            return Ok(redirect_to_login(ctx));
        }
        handler().await
    }
}

/// 登录地址，附带登录完成后的返回路径
pub fn login_url(ctx: &NavigationContext) -> String {
    format!("{}{}", LOGIN_PATH, encode_uri_component(&ctx.canonical_path))
}

pub fn redirect_to_login(ctx: &NavigationContext) -> Action {
    Action::Redirect(login_url(ctx))
}
