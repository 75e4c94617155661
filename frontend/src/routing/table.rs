//! 路由表
//!
//! 按注册顺序逐条匹配，第一个匹配的路由胜出。越具体的模式越靠前，
//! 兜底的 `DEFAULT` 永远最后注册。

use super::pattern::{Captures, RoutePattern};
use crate::error::Result;

/// 路由标识，同时也是处理函数的名字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Root,
    Dashboard,
    CustomDashboard,
    ProjectDashboard,
    LegacyProjectDashboard,
    GroupInfo,
    GroupAuditLog,
    GroupMembers,
    GroupListOffset,
    GroupListFilterOffset,
    GroupListFilter,
    GroupSelf,
    Group,
    ProjectOld,
    RepoCommands,
    RepoGeneral,
    RepoAccess,
    RepoDashboards,
    BranchListOffset,
    BranchListFilterOffset,
    BranchListFilter,
    TagListOffset,
    TagListFilterOffset,
    TagListFilter,
    LegacyCreateGroup,
    LegacyCreateProject,
    RepoListOffset,
    RepoListFilterOffset,
    RepoListFilter,
    Repo,
    Plugins,
    PluginListOffset,
    PluginListFilterOffset,
    PluginListFilter,
    QueryLegacySuffix,
    Query,
    Topic,
    ChangeIdQuery,
    DiffLegacyLinenum,
    ChangeNumberLegacy,
    DiffEdit,
    ChangeEdit,
    Comment,
    CommentsTab,
    Diff,
    Change,
    ChangeLegacy,
    Agreements,
    NewAgreements,
    SettingsLegacy,
    Settings,
    Register,
    LogInOrOut,
    ImproperlyEncodedPlus,
    PluginScreen,
    DocumentationSearchFilter,
    DocumentationSearch,
    Documentation,
    Default,
}

/// 单条路由的静态定义
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    /// 处理函数会读取的捕获名，注册时校验
    pub captures: &'static [&'static str],
    pub requires_auth: bool,
}

const fn def(
    name: &'static str,
    pattern: &'static str,
    captures: &'static [&'static str],
    requires_auth: bool,
) -> RouteDef {
    RouteDef {
        name,
        pattern,
        captures,
        requires_auth,
    }
}

const CHANGE_CAPTURES: &[&str] = &["repo", "change", "base", "patch"];

impl RouteId {
    /// 注册顺序
    pub const ALL: [RouteId; 59] = [
        RouteId::Root,
        RouteId::Dashboard,
        RouteId::CustomDashboard,
        RouteId::ProjectDashboard,
        RouteId::LegacyProjectDashboard,
        RouteId::GroupInfo,
        RouteId::GroupAuditLog,
        RouteId::GroupMembers,
        RouteId::GroupListOffset,
        RouteId::GroupListFilterOffset,
        RouteId::GroupListFilter,
        RouteId::GroupSelf,
        RouteId::Group,
        RouteId::ProjectOld,
        RouteId::RepoCommands,
        RouteId::RepoGeneral,
        RouteId::RepoAccess,
        RouteId::RepoDashboards,
        RouteId::BranchListOffset,
        RouteId::BranchListFilterOffset,
        RouteId::BranchListFilter,
        RouteId::TagListOffset,
        RouteId::TagListFilterOffset,
        RouteId::TagListFilter,
        RouteId::LegacyCreateGroup,
        RouteId::LegacyCreateProject,
        RouteId::RepoListOffset,
        RouteId::RepoListFilterOffset,
        RouteId::RepoListFilter,
        RouteId::Repo,
        RouteId::Plugins,
        RouteId::PluginListOffset,
        RouteId::PluginListFilterOffset,
        RouteId::PluginListFilter,
        RouteId::QueryLegacySuffix,
        RouteId::Query,
        RouteId::Topic,
        RouteId::ChangeIdQuery,
        RouteId::DiffLegacyLinenum,
        RouteId::ChangeNumberLegacy,
        RouteId::DiffEdit,
        RouteId::ChangeEdit,
        RouteId::Comment,
        RouteId::CommentsTab,
        RouteId::Diff,
        RouteId::Change,
        RouteId::ChangeLegacy,
        RouteId::Agreements,
        RouteId::NewAgreements,
        RouteId::SettingsLegacy,
        RouteId::Settings,
        RouteId::Register,
        RouteId::LogInOrOut,
        RouteId::ImproperlyEncodedPlus,
        RouteId::PluginScreen,
        RouteId::DocumentationSearchFilter,
        RouteId::DocumentationSearch,
        RouteId::Documentation,
        RouteId::Default,
    ];

    pub fn definition(self) -> RouteDef {
        match self {
            RouteId::Root => def("ROOT", r"^/$", &[], false),
            RouteId::Dashboard => def("DASHBOARD", r"^/dashboard/(?P<user>.+)$", &["user"], false),
            RouteId::CustomDashboard => def("CUSTOM_DASHBOARD", r"^/dashboard/?$", &[], false),
            RouteId::ProjectDashboard => def(
                "PROJECT_DASHBOARD",
                r"^/p/(?P<repo>.+)/\+/dashboard/(?P<dashboard>.+)",
                &["repo", "dashboard"],
                false,
            ),
            RouteId::LegacyProjectDashboard => def(
                "LEGACY_PROJECT_DASHBOARD",
                r"^/projects/(?P<repo>.+),dashboards/(?P<dashboard>.+)",
                &["repo", "dashboard"],
                false,
            ),

            // 群组
            RouteId::GroupInfo => def(
                "GROUP_INFO",
                r"^/admin/groups/(?:uuid-)?(?P<group>[^,]+),info$",
                &["group"],
                true,
            ),
            RouteId::GroupAuditLog => def(
                "GROUP_AUDIT_LOG",
                r"^/admin/groups/(?:uuid-)?(?P<group>[^,]+),audit-log$",
                &["group"],
                true,
            ),
            RouteId::GroupMembers => def(
                "GROUP_MEMBERS",
                r"^/admin/groups/(?:uuid-)?(?P<group>[^,]+),members$",
                &["group"],
                true,
            ),
            RouteId::GroupListOffset => def(
                "GROUP_LIST_OFFSET",
                r"^/admin/groups(?:,(?P<offset>\d+))?/?$",
                &["offset"],
                true,
            ),
            RouteId::GroupListFilterOffset => def(
                "GROUP_LIST_FILTER_OFFSET",
                r"^/admin/groups/q/filter:(?P<filter>[^,]+),(?P<offset>\d+)/?$",
                &["filter", "offset"],
                true,
            ),
            RouteId::GroupListFilter => def(
                "GROUP_LIST_FILTER",
                r"^/admin/groups/q/filter:(?P<filter>[^,]*)/?$",
                &["filter"],
                true,
            ),
            RouteId::GroupSelf => def("GROUP_SELF", r"^/groups/self", &[], true),
            RouteId::Group => def(
                "GROUP",
                r"^/admin/groups/(?:uuid-)?(?P<group>[^,]+)$",
                &["group"],
                true,
            ),

            // 仓库
            RouteId::ProjectOld => def(
                "PROJECT_OLD",
                r"^/admin/projects/?(?P<repo>.+)?$",
                &["repo"],
                false,
            ),
            RouteId::RepoCommands => def(
                "REPO_COMMANDS",
                r"^/admin/repos/(?P<repo>.+),commands$",
                &["repo"],
                true,
            ),
            RouteId::RepoGeneral => def(
                "REPO_GENERAL",
                r"^/admin/repos/(?P<repo>.+),general$",
                &["repo"],
                false,
            ),
            RouteId::RepoAccess => def(
                "REPO_ACCESS",
                r"^/admin/repos/(?P<repo>.+),access$",
                &["repo"],
                false,
            ),
            RouteId::RepoDashboards => def(
                "REPO_DASHBOARDS",
                r"^/admin/repos/(?P<repo>.+),dashboards$",
                &["repo"],
                false,
            ),
            RouteId::BranchListOffset => def(
                "BRANCH_LIST_OFFSET",
                r"^/admin/repos/(?P<repo>.+),branches(?:,(?P<offset>\d+))?$",
                &["repo", "offset"],
                false,
            ),
            RouteId::BranchListFilterOffset => def(
                "BRANCH_LIST_FILTER_OFFSET",
                r"^/admin/repos/(?P<repo>.+),branches/q/filter:(?P<filter>[^,]+),(?P<offset>\d+)$",
                &["repo", "filter", "offset"],
                false,
            ),
            RouteId::BranchListFilter => def(
                "BRANCH_LIST_FILTER",
                r"^/admin/repos/(?P<repo>.+),branches/q/filter:(?P<filter>[^,]*)$",
                &["repo", "filter"],
                false,
            ),
            RouteId::TagListOffset => def(
                "TAG_LIST_OFFSET",
                r"^/admin/repos/(?P<repo>.+),tags(?:,(?P<offset>\d+))?$",
                &["repo", "offset"],
                false,
            ),
            RouteId::TagListFilterOffset => def(
                "TAG_LIST_FILTER_OFFSET",
                r"^/admin/repos/(?P<repo>.+),tags/q/filter:(?P<filter>[^,]+),(?P<offset>\d+)$",
                &["repo", "filter", "offset"],
                false,
            ),
            RouteId::TagListFilter => def(
                "TAG_LIST_FILTER",
                r"^/admin/repos/(?P<repo>.+),tags/q/filter:(?P<filter>[^,]*)$",
                &["repo", "filter"],
                false,
            ),
            RouteId::LegacyCreateGroup => {
                def("LEGACY_CREATE_GROUP", r"^/admin/create-group/?$", &[], true)
            }
            RouteId::LegacyCreateProject => {
                def("LEGACY_CREATE_PROJECT", r"^/admin/create-project/?$", &[], true)
            }
            RouteId::RepoListOffset => def(
                "REPO_LIST_OFFSET",
                r"^/admin/repos(?:,(?P<offset>\d+))?/?$",
                &["offset"],
                false,
            ),
            RouteId::RepoListFilterOffset => def(
                "REPO_LIST_FILTER_OFFSET",
                r"^/admin/repos/q/filter:(?P<filter>[^,]+),(?P<offset>\d+)/?$",
                &["filter", "offset"],
                false,
            ),
            RouteId::RepoListFilter => def(
                "REPO_LIST_FILTER",
                r"^/admin/repos/q/filter:(?P<filter>[^,]*)/?$",
                &["filter"],
                false,
            ),
            RouteId::Repo => def("REPO", r"^/admin/repos/(?P<repo>[^,]+)$", &["repo"], false),

            // 插件
            RouteId::Plugins => def("PLUGINS", r"^/plugins/.+$", &[], false),
            RouteId::PluginListOffset => def(
                "PLUGIN_LIST_OFFSET",
                r"^/admin/plugins(?:,(?P<offset>\d+))?/?$",
                &["offset"],
                true,
            ),
            RouteId::PluginListFilterOffset => def(
                "PLUGIN_LIST_FILTER_OFFSET",
                r"^/admin/plugins/q/filter:(?P<filter>[^,]+),(?P<offset>\d+)/?$",
                &["filter", "offset"],
                true,
            ),
            RouteId::PluginListFilter => def(
                "PLUGIN_LIST_FILTER",
                r"^/admin/plugins/q/filter:(?P<filter>[^,]*)/?$",
                &["filter"],
                true,
            ),

            // 搜索
            RouteId::QueryLegacySuffix => def("QUERY_LEGACY_SUFFIX", r"^/q/.+,n,z$", &[], false),
            RouteId::Query => def(
                "QUERY",
                r"^/q/(?P<query>[^,]+)(?:,(?P<offset>\d+))?$",
                &["query", "offset"],
                false,
            ),
            RouteId::Topic => def("TOPIC", r"^/c/topic/(?P<topic>[^/]*)/?$", &["topic"], false),
            RouteId::ChangeIdQuery => def(
                "CHANGE_ID_QUERY",
                r"^/id/(?P<change_id>I[0-9a-f]{40})$",
                &["change_id"],
                false,
            ),

            // 变更与差异
            RouteId::DiffLegacyLinenum => {
                def("DIFF_LEGACY_LINENUM", r"^/c/.+@[ab]?\d+$", &[], false)
            }
            RouteId::ChangeNumberLegacy => def(
                "CHANGE_NUMBER_LEGACY",
                r"^/(?P<change>\d+)/?",
                &["change"],
                false,
            ),
            RouteId::DiffEdit => def(
                "DIFF_EDIT",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)/(?P<patch>\d+|edit)/(?P<path>.+),edit$",
                &["repo", "change", "patch", "path"],
                true,
            ),
            RouteId::ChangeEdit => def(
                "CHANGE_EDIT",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)(?:/(?P<patch>\d+))?,edit/?$",
                &["repo", "change", "patch"],
                true,
            ),
            RouteId::Comment => def(
                "COMMENT",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)/comment/(?P<comment>\w+)/?$",
                &["repo", "change", "comment"],
                false,
            ),
            RouteId::CommentsTab => def(
                "COMMENTS_TAB",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)/comments/?(?P<comment>\w+)?/?$",
                &["repo", "change", "comment"],
                false,
            ),
            RouteId::Diff => def(
                "DIFF",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)/(?P<base>-?\d+|edit)(?:\.\.(?P<patch>\d+|edit))?/(?P<path>.+)$",
                &["repo", "change", "base", "patch", "path"],
                false,
            ),
            RouteId::Change => def(
                "CHANGE",
                r"^/c/(?P<repo>.+)/\+/(?P<change>\d+)(?:/?(?:(?P<base>-?\d+|edit)(?:\.\.(?P<patch>\d+|edit))?))?/?$",
                CHANGE_CAPTURES,
                false,
            ),
            RouteId::ChangeLegacy => def(
                "CHANGE_LEGACY",
                r"^/c/(?P<change>\d+)/?(?P<rest>.*)$",
                &["change"],
                false,
            ),

            // 设置
            RouteId::Agreements => def("AGREEMENTS", r"^/settings/agreements/?", &[], true),
            RouteId::NewAgreements => {
                def("NEW_AGREEMENTS", r"^/settings/new-agreement/?", &[], true)
            }
            RouteId::SettingsLegacy => def(
                "SETTINGS_LEGACY",
                r"^/settings/VE/(?P<token>\S+)",
                &["token"],
                true,
            ),
            RouteId::Settings => def("SETTINGS", r"^/settings/?", &[], true),
            RouteId::Register => def("REGISTER", r"^/register(?P<next>/.*)?$", &["next"], false),
            RouteId::LogInOrOut => def("LOG_IN_OR_OUT", r"^/log(?:in|out)(?:/.+)?$", &[], false),

            // 其他
            RouteId::ImproperlyEncodedPlus => def(
                "IMPROPERLY_ENCODED_PLUS",
                r"^/c/(?P<repo>.+)/ /(?P<rest>.+)$",
                &["repo", "rest"],
                false,
            ),
            RouteId::PluginScreen => def(
                "PLUGIN_SCREEN",
                r"^/x/(?P<plugin>[\w-]+)/(?P<screen>[\w-]+)/?",
                &["plugin", "screen"],
                false,
            ),
            RouteId::DocumentationSearchFilter => def(
                "DOCUMENTATION_SEARCH_FILTER",
                r"^/Documentation/q/filter:(?P<filter>[^/]+)/?$",
                &["filter"],
                false,
            ),
            RouteId::DocumentationSearch => def(
                "DOCUMENTATION_SEARCH",
                r"^/Documentation/q/(?P<filter>.*)$",
                &["filter"],
                false,
            ),
            RouteId::Documentation => def(
                "DOCUMENTATION",
                r"^/Documentation/?(?P<page>.+)?",
                &["page"],
                false,
            ),
            RouteId::Default => def("DEFAULT", r"^.*$", &[], false),
        }
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn requires_auth(self) -> bool {
        self.definition().requires_auth
    }
}

// =========================================================
// 路由表
// =========================================================

#[derive(Debug)]
pub struct RouteEntry {
    id: RouteId,
    requires_auth: bool,
    pattern: RoutePattern,
}

impl RouteEntry {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 完整的标准路由表
    pub fn standard() -> Result<Self> {
        let mut table = Self::new();
        for id in RouteId::ALL {
            table.register(id)?;
        }
        Ok(table)
    }

    pub fn register(&mut self, id: RouteId) -> Result<()> {
        self.register_pattern(id, id.definition().pattern)
    }

    /// 以自定义模式注册路由，捕获名仍按路由定义校验
    pub fn register_pattern(&mut self, id: RouteId, pattern: &str) -> Result<()> {
        let def = id.definition();
        let pattern = RoutePattern::new(def.name, pattern, def.captures)?;
        self.entries.push(RouteEntry {
            id,
            requires_auth: def.requires_auth,
            pattern,
        });
        Ok(())
    }

    /// 按注册顺序匹配（路径应已解码一次）
    pub fn match_path(&self, path: &str) -> Option<(&RouteEntry, Captures)> {
        self.entries
            .iter()
            .find_map(|entry| entry.pattern.captures(path).map(|caps| (entry, caps)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
