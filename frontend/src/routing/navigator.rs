//! 导航调度
//!
//! 每次导航在开始时同步分配递增序号；异步处理结束后只有序号仍是最新的
//! 结果才会被执行，较早开始但较晚完成的导航结果被丢弃。

use std::cell::Cell;
use std::rc::Rc;

use super::action::Action;
use super::context::NavigationContext;
use super::gate::AuthGate;
use super::handlers::RouteHandlers;
use super::session::SessionService;
use super::table::RouteTable;
use crate::config::RouterConfig;
use crate::error::Result;

/// 已完成处理的导航
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub seq: u64,
    pub action: Action,
}

/// 已分配序号、尚未处理的导航
#[derive(Debug, Clone)]
pub struct PendingNavigation {
    pub seq: u64,
    pub ctx: NavigationContext,
}

pub struct Navigator<S: ?Sized> {
    table: RouteTable,
    session: Rc<S>,
    config: RouterConfig,
    issued: Cell<u64>,
}

impl<S: SessionService + ?Sized> Navigator<S> {
    pub fn new(session: Rc<S>, config: RouterConfig) -> Result<Self> {
        Ok(Self::with_table(RouteTable::standard()?, session, config))
    }

    pub fn with_table(table: RouteTable, session: Rc<S>, config: RouterConfig) -> Self {
        Self {
            table,
            session,
            config,
            issued: Cell::new(0),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// 最近一次分配的序号
    pub fn latest(&self) -> u64 {
        self.issued.get()
    }

    /// 解析 URL 并分配序号
    pub fn begin(&self, url: &str) -> PendingNavigation {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        PendingNavigation {
            seq,
            ctx: NavigationContext::parse(url, &self.config),
        }
    }

    /// 匹配路由并运行处理函数；处理失败转为页面错误
    pub async fn resolve(&self, pending: PendingNavigation) -> Navigation {
        let PendingNavigation { seq, ctx } = pending;
        let initial_load = seq == 1;

        let Some((entry, captures)) = self.table.match_path(&ctx.match_path()) else {
            tracing::warn!(path = %ctx.path, "no route matched");
            return Navigation {
                seq,
                action: Action::not_found(),
            };
        };
        let id = entry.id();
        let ctx = ctx.with_captures(captures);
        tracing::debug!(seq, route = id.name(), path = %ctx.path, "route matched");

        let handlers = RouteHandlers::new(&*self.session, &self.config);
        let result = AuthGate::new(&*self.session)
            .guard(entry.requires_auth(), &ctx, || {
                handlers.dispatch(id, &ctx, initial_load)
            })
            .await;

        let action = match result {
            // 重定向到自身会无限循环
            Ok(Action::Redirect(target)) if target == ctx.canonical_path => {
                tracing::warn!(seq, route = id.name(), %target, "route redirects to itself");
                Action::not_found()
            }
            Ok(action) => action,
            Err(err) => {
                tracing::warn!(
                    seq,
                    route = id.name(),
                    code = err.error_code(),
                    "navigation failed: {}",
                    err
                );
                Action::PageError {
                    status: err.status_code(),
                }
            }
        };
        Navigation { seq, action }
    }

    pub async fn navigate(&self, url: &str) -> Navigation {
        let pending = self.begin(url);
        self.resolve(pending).await
    }

    pub fn is_current(&self, navigation: &Navigation) -> bool {
        navigation.seq == self.issued.get()
    }

    /// 取出仍然有效的动作，过期的导航结果返回 `None`
    pub fn settle(&self, navigation: Navigation) -> Option<Action> {
        if self.is_current(&navigation) {
            Some(navigation.action)
        } else {
            tracing::warn!(
                seq = navigation.seq,
                latest = self.issued.get(),
                "discarding stale navigation"
            );
            None
        }
    }
}
