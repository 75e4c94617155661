use serde::{Deserialize, Serialize};

pub mod patch;
pub mod protocol;

pub use patch::{InvalidPatchSetNum, PatchRange, PatchSetNum};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const PARENT: &str = "PARENT";
pub const EDIT: &str = "edit";
/// REST 响应体前的 XSSI 防护前缀
pub const JSON_PREFIX: &str = ")]}'";
pub const DEFAULT_DASHBOARD_TITLE: &str = "Custom Dashboard";

// =========================================================
// 视图参数 (View Parameters)
// =========================================================

/// 路由处理的最终产物：当前应渲染哪个视图及其参数
///
/// 以 `view` 字段作为判别标签，同一时刻只有一个变体有效。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewParams {
    Admin(AdminParams),
    Agreements,
    Change(ChangeParams),
    Dashboard(DashboardParams),
    Diff(DiffParams),
    DocumentationSearch {
        filter: Option<String>,
    },
    Edit(EditParams),
    Group {
        group_id: String,
        detail: Option<GroupDetail>,
    },
    PluginScreen {
        plugin: String,
        screen: String,
    },
    Repo(RepoParams),
    Root,
    Search(SearchParams),
    Settings {
        email_token: Option<String>,
    },
    Topic {
        topic: String,
    },
}

impl ViewParams {
    /// 视图标签，用于日志与渲染分派
    pub fn view_name(&self) -> &'static str {
        match self {
            ViewParams::Admin(_) => "ADMIN",
            ViewParams::Agreements => "AGREEMENTS",
            ViewParams::Change(_) => "CHANGE",
            ViewParams::Dashboard(_) => "DASHBOARD",
            ViewParams::Diff(_) => "DIFF",
            ViewParams::DocumentationSearch { .. } => "DOCUMENTATION_SEARCH",
            ViewParams::Edit(_) => "EDIT",
            ViewParams::Group { .. } => "GROUP",
            ViewParams::PluginScreen { .. } => "PLUGIN_SCREEN",
            ViewParams::Repo(_) => "REPO",
            ViewParams::Root => "ROOT",
            ViewParams::Search(_) => "SEARCH",
            ViewParams::Settings { .. } => "SETTINGS",
            ViewParams::Topic { .. } => "TOPIC",
        }
    }

    /// 携带补丁范围的视图返回其可变引用
    pub fn patch_range_mut(&mut self) -> Option<&mut PatchRange> {
        match self {
            ViewParams::Change(p) => Some(&mut p.range),
            ViewParams::Diff(p) => Some(&mut p.range),
            ViewParams::Edit(p) => Some(&mut p.range),
            _ => None,
        }
    }
}

// =========================================================
// 变更相关视图
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeParams {
    pub project: Option<String>,
    pub change_num: u32,
    #[serde(flatten)]
    pub range: PatchRange,
    #[serde(default)]
    pub edit: bool,
    pub comment_id: Option<String>,
    /// 消息锚点，生成 URL 时原样追加在 `#` 之后
    pub message_hash: Option<String>,
    pub tab: Option<String>,
    pub filter: Option<String>,
    pub select: Option<String>,
    pub attempt: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffParams {
    pub project: Option<String>,
    pub change_num: u32,
    #[serde(flatten)]
    pub range: PatchRange,
    pub path: Option<String>,
    pub line_num: Option<u32>,
    #[serde(default)]
    pub left_side: bool,
    pub comment_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditParams {
    pub project: Option<String>,
    pub change_num: u32,
    #[serde(flatten)]
    pub range: PatchRange,
    pub path: String,
    pub line_num: Option<u32>,
}

// =========================================================
// 搜索与面板
// =========================================================

/// 搜索视图
///
/// `query` 存在时优先使用；否则由结构化字段拼出查询。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(default)]
    pub offset: u32,
    pub owner: Option<String>,
    pub project: Option<String>,
    pub branch: Option<String>,
    pub topic: Option<String>,
    pub hashtag: Option<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
}

impl SearchParams {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    pub name: String,
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardParams {
    pub user: Option<String>,
    pub repo: Option<String>,
    pub dashboard: Option<String>,
    #[serde(default)]
    pub sections: Vec<DashboardSection>,
    pub title: Option<String>,
}

// =========================================================
// 管理页面
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDetail {
    Members,
    Log,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepoDetail {
    #[default]
    General,
    Access,
    Branches,
    Tags,
    Commands,
    Dashboards,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoParams {
    pub repo: String,
    #[serde(default)]
    pub detail: RepoDetail,
    pub filter: Option<String>,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminView {
    GroupList,
    RepoList,
    PluginList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminParams {
    pub admin_view: AdminView,
    #[serde(default)]
    pub offset: u32,
    pub filter: Option<String>,
    #[serde(default)]
    pub open_create_modal: bool,
}

impl AdminParams {
    pub fn new(admin_view: AdminView) -> Self {
        Self {
            admin_view,
            offset: 0,
            filter: None,
            open_create_modal: false,
        }
    }
}
