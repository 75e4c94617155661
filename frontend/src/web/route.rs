//! 路由状态 - 界面可见的导航结果
//!
//! 纯数据，不依赖 DOM。

use std::fmt::Display;

use patchview_shared::ViewParams;

use crate::routing::{Action, generate_url};

/// 当前应渲染的内容
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteState {
    /// 首次导航尚未完成
    #[default]
    Loading,
    View(ViewParams),
    PageError(u16),
}

impl RouteState {
    /// 只有发布参数与页面错误会改变界面状态，其余动作由路由服务直接执行
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::SetParams(params) => Some(Self::View(params.clone())),
            Action::PageError { status } => Some(Self::PageError(*status)),
            _ => None,
        }
    }

    pub fn view_name(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::View(params) => params.view_name(),
            Self::PageError(_) => "ERROR",
        }
    }

    /// 视图对应的规范 URL（应用内路径）
    pub fn canonical_url(&self) -> Option<String> {
        match self {
            Self::View(params) => Some(generate_url(params)),
            _ => None,
        }
    }
}

impl Display for RouteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageError(status) => write!(f, "{} {}", self.view_name(), status),
            _ => write!(f, "{}", self.view_name()),
        }
    }
}
