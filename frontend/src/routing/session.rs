//! 会话协作者
//!
//! 路由只需要三件事：是否已登录、变更所属项目的查询与缓存提示。

use async_trait::async_trait;

use crate::error::Result;

#[async_trait(?Send)]
pub trait SessionService {
    async fn is_logged_in(&self) -> Result<bool>;

    /// 查询变更所属项目，找不到时返回 `None`
    async fn lookup_project_for_change(&self, change: u32) -> Result<Option<String>>;

    /// 缓存提示，不等待完成
    fn record_project_for_change(&self, change: u32, project: &str);
}

// =========================================================
// 测试工具: MockSession
// =========================================================
