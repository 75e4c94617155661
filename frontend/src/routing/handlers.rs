//! 路由处理函数
//!
//! 每个处理函数把导航上下文映射为唯一的 `Action`。需要查询会话的处理函数
//! 在异步查询结束前不产生任何副作用。

use patchview_shared::{
    AdminParams, AdminView, ChangeParams, DEFAULT_DASHBOARD_TITLE, DashboardParams,
    DashboardSection, DiffParams, EditParams, GroupDetail, PatchRange, PatchSetNum, RepoDetail,
    RepoParams, SearchParams, ViewParams,
};

use super::action::Action;
use super::context::{NavigationContext, parse_query_string};
use super::encoding::{encode_uri_component, encode_url};
use super::gate::redirect_to_login;
use super::normalize::{normalize_patch_range, parse_line_address};
use super::session::SessionService;
use super::table::RouteId;
use super::url::generate_url;
use crate::config::{DEFAULT_LOGGED_IN_ROUTE, DEFAULT_LOGGED_OUT_ROUTE, RouterConfig};
use crate::error::{Result, RouteError};

pub struct RouteHandlers<'a, S: ?Sized> {
    session: &'a S,
    config: &'a RouterConfig,
}

/// 规范化补丁范围后决定发布参数还是重定向到规范 URL
pub fn redirect_or_navigate(mut params: ViewParams) -> Action {
    let needs_redirect = params
        .patch_range_mut()
        .map(normalize_patch_range)
        .unwrap_or(false);
    if needs_redirect {
        Action::Redirect(generate_url(&params))
    } else {
        Action::SetParams(params)
    }
}

impl<'a, S: SessionService + ?Sized> RouteHandlers<'a, S> {
    pub fn new(session: &'a S, config: &'a RouterConfig) -> Self {
        Self { session, config }
    }

    pub async fn dispatch(
        &self,
        id: RouteId,
        ctx: &NavigationContext,
        initial_load: bool,
    ) -> Result<Action> {
        let caps = &ctx.captures;
        let action = match id {
            RouteId::Root => self.handle_root(ctx).await?,
            RouteId::Dashboard => self.handle_dashboard(ctx).await?,
            RouteId::CustomDashboard => match custom_dashboard_params(&ctx.querystring, None) {
                Some(params) => Action::SetParams(ViewParams::Dashboard(params)),
                None => Action::redirect(DEFAULT_LOGGED_IN_ROUTE),
            },
            RouteId::ProjectDashboard => Action::SetParams(ViewParams::Dashboard(DashboardParams {
                repo: Some(caps.require("repo")?.to_string()),
                dashboard: Some(caps.require("dashboard")?.to_string()),
                ..Default::default()
            })),
            RouteId::LegacyProjectDashboard => {
                Action::Redirect(generate_url(&ViewParams::Dashboard(DashboardParams {
                    repo: Some(caps.require("repo")?.to_string()),
                    dashboard: Some(caps.require("dashboard")?.to_string()),
                    ..Default::default()
                })))
            }

            // 群组
            RouteId::GroupInfo => Action::Redirect(generate_url(&ViewParams::Group {
                group_id: caps.require("group")?.to_string(),
                detail: None,
            })),
            RouteId::GroupAuditLog => group(caps.require("group")?, Some(GroupDetail::Log)),
            RouteId::GroupMembers => group(caps.require("group")?, Some(GroupDetail::Members)),
            RouteId::Group => group(caps.require("group")?, None),
            RouteId::GroupListOffset => admin_list(AdminView::GroupList, ctx, true)?,
            RouteId::GroupListFilterOffset | RouteId::GroupListFilter => {
                admin_list(AdminView::GroupList, ctx, false)?
            }
            RouteId::GroupSelf => Action::redirect("/settings/#Groups"),
            RouteId::LegacyCreateGroup => Action::redirect("/admin/groups#create"),

            // 仓库
            RouteId::ProjectOld => {
                Action::Redirect(format!("/admin/repos/{}", caps.get("repo").unwrap_or("")))
            }
            RouteId::RepoCommands => repo(ctx, RepoDetail::Commands)?,
            RouteId::RepoGeneral => repo(ctx, RepoDetail::General)?,
            RouteId::RepoAccess => repo(ctx, RepoDetail::Access)?,
            RouteId::RepoDashboards => repo(ctx, RepoDetail::Dashboards)?,
            RouteId::BranchListOffset
            | RouteId::BranchListFilterOffset
            | RouteId::BranchListFilter => repo(ctx, RepoDetail::Branches)?,
            RouteId::TagListOffset | RouteId::TagListFilterOffset | RouteId::TagListFilter => {
                repo(ctx, RepoDetail::Tags)?
            }
            RouteId::LegacyCreateProject => Action::redirect("/admin/repos#create"),
            RouteId::RepoListOffset => admin_list(AdminView::RepoList, ctx, true)?,
            RouteId::RepoListFilterOffset | RouteId::RepoListFilter => {
                admin_list(AdminView::RepoList, ctx, false)?
            }
            RouteId::Repo => Action::Redirect(format!("{},general", ctx.path)),

            // 插件
            RouteId::Plugins => Action::PassThrough,
            RouteId::PluginListOffset
            | RouteId::PluginListFilterOffset
            | RouteId::PluginListFilter => admin_list(AdminView::PluginList, ctx, false)?,

            // 搜索
            RouteId::QueryLegacySuffix => Action::Redirect(strip_legacy_query_suffix(ctx)),
            RouteId::Query => Action::SetParams(ViewParams::Search(SearchParams {
                offset: caps.offset("offset")?,
                ..SearchParams::query(caps.require("query")?)
            })),
            RouteId::Topic => Action::SetParams(ViewParams::Topic {
                topic: caps.require("topic")?.to_string(),
            }),
            RouteId::ChangeIdQuery => Action::SetParams(ViewParams::Search(SearchParams::query(
                caps.require("change_id")?,
            ))),

            // 变更与差异
            RouteId::DiffLegacyLinenum => Action::Redirect(legacy_line_to_hash(ctx)),
            RouteId::ChangeNumberLegacy => {
                Action::Redirect(format!("/c/{}", caps.parse::<u32>("change")?))
            }
            RouteId::DiffEdit => self.handle_diff_edit(ctx)?,
            RouteId::ChangeEdit => self.handle_change_edit(ctx)?,
            RouteId::Comment => self.handle_comment(ctx)?,
            RouteId::CommentsTab => self.handle_comments_tab(ctx)?,
            RouteId::Diff => self.handle_diff(ctx)?,
            RouteId::Change => self.handle_change(ctx)?,
            RouteId::ChangeLegacy => self.handle_change_legacy(ctx).await?,

            // 设置
            RouteId::Agreements => Action::redirect("/settings/#Agreements"),
            RouteId::NewAgreements => Action::SetParams(ViewParams::Agreements),
            RouteId::SettingsLegacy => Action::SetParams(ViewParams::Settings {
                // 查询串解码会把 token 中的 `+` 变成空格
                email_token: Some(caps.require("token")?.replace(' ', "+")),
            }),
            RouteId::Settings => Action::SetParams(ViewParams::Settings { email_token: None }),
            RouteId::Register => {
                let next = caps.get("next").unwrap_or("");
                let redirect = if next.is_empty() || next.starts_with("/register") {
                    "/".to_string()
                } else {
                    next.to_string()
                };
                Action::Registered { redirect }
            }
            RouteId::LogInOrOut => Action::PassThrough,

            // 其他
            RouteId::ImproperlyEncodedPlus => {
                let mut url = ctx.path.replacen("/%20/", "/+/", 1).replacen("/ /", "/+/", 1);
                let hash = ctx.raw_hash();
                if !hash.is_empty() {
                    url.push('#');
                    url.push_str(hash);
                }
                Action::Redirect(url)
            }
            RouteId::PluginScreen => Action::SetParams(ViewParams::PluginScreen {
                plugin: caps.require("plugin")?.to_string(),
                screen: caps.require("screen")?.to_string(),
            }),
            RouteId::DocumentationSearchFilter => {
                Action::SetParams(ViewParams::DocumentationSearch {
                    filter: Some(caps.require("filter")?.to_string()),
                })
            }
            RouteId::DocumentationSearch => Action::Redirect(format!(
                "/Documentation/q/filter:{}",
                encode_url(caps.require("filter")?, false)
            )),
            RouteId::Documentation => match caps.get("page") {
                Some(page) if !page.is_empty() => Action::PassThrough,
                _ => Action::redirect("/Documentation/index.html"),
            },
            RouteId::Default => {
                if self.config.server_fallback && !initial_load {
                    Action::PassThrough
                } else {
                    return Err(RouteError::NoMatch(ctx.path.clone()));
                }
            }
        };
        Ok(action)
    }

    // =========================================================
    // 自带认证判断的处理函数
    // =========================================================

    async fn handle_root(&self, ctx: &NavigationContext) -> Result<Action> {
        if ctx.querystring.contains("closeAfterLogin") {
            return Ok(Action::CloseWindow);
        }

        // 旧版 GWT 界面的锚点路径，如 `/#/c/42/`
        if !ctx.hash.is_empty() {
            let mut url = ctx.raw_hash().to_string();
            if !url.starts_with('/') {
                url.insert(0, '/');
            }
            if url.starts_with("/VE/") {
                url.insert_str(0, "/settings");
            }
            if ctx.canonical_path.contains("/+/") {
                url = url.replace("/ /", "/+/");
            }
            return Ok(Action::Redirect(url));
        }

        if self.session.is_logged_in().await? {
            Ok(Action::redirect(DEFAULT_LOGGED_IN_ROUTE))
        } else {
            Ok(Action::redirect(DEFAULT_LOGGED_OUT_ROUTE))
        }
    }

    async fn handle_dashboard(&self, ctx: &NavigationContext) -> Result<Action> {
        let user = ctx.captures.require("user")?;

        // 带 section 查询串的用户面板按自定义面板处理，无需登录
        if let Some(params) = custom_dashboard_params(&ctx.querystring, Some(user)) {
            return Ok(Action::SetParams(ViewParams::Dashboard(params)));
        }

        if !self.session.is_logged_in().await? {
            if user.eq_ignore_ascii_case("self") {
                return Ok(redirect_to_login(ctx));
            }
            return Ok(Action::Redirect(format!(
                "/q/owner:{}",
                encode_uri_component(user)
            )));
        }

        Ok(Action::SetParams(ViewParams::Dashboard(DashboardParams {
            user: Some(user.to_string()),
            ..Default::default()
        })))
    }

    // =========================================================
    // 变更与差异
    // =========================================================

    /// 读取 `repo` 与 `change` 捕获，并把二者的对应关系告知会话
    fn change_target(&self, ctx: &NavigationContext) -> Result<(String, u32)> {
        let project = ctx.captures.require("repo")?.to_string();
        let change_num = ctx.captures.parse::<u32>("change")?;
        self.session.record_project_for_change(change_num, &project);
        Ok((project, change_num))
    }

    fn handle_change(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        let caps = &ctx.captures;
        Ok(redirect_or_navigate(ViewParams::Change(ChangeParams {
            project: Some(project),
            change_num,
            range: PatchRange::new(caps.parse_opt("base")?, caps.parse_opt("patch")?),
            tab: ctx.query_param("tab"),
            filter: ctx.query_param("filter"),
            select: ctx.query_param("select"),
            attempt: ctx.query_param("attempt").and_then(|a| a.parse().ok()),
            ..Default::default()
        })))
    }

    fn handle_change_edit(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        Ok(redirect_or_navigate(ViewParams::Change(ChangeParams {
            project: Some(project),
            change_num,
            range: PatchRange::new(None, ctx.captures.parse_opt("patch")?),
            edit: true,
            tab: ctx.query_param("tab"),
            ..Default::default()
        })))
    }

    fn handle_comments_tab(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        Ok(redirect_or_navigate(ViewParams::Change(ChangeParams {
            project: Some(project),
            change_num,
            comment_id: ctx.captures.get("comment").map(str::to_string),
            ..Default::default()
        })))
    }

    fn handle_comment(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        Ok(redirect_or_navigate(ViewParams::Diff(DiffParams {
            project: Some(project),
            change_num,
            comment_id: Some(ctx.captures.require("comment")?.to_string()),
            ..Default::default()
        })))
    }

    fn handle_diff(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        let caps = &ctx.captures;
        let address = parse_line_address(&ctx.hash);
        Ok(redirect_or_navigate(ViewParams::Diff(DiffParams {
            project: Some(project),
            change_num,
            range: PatchRange::new(caps.parse_opt("base")?, caps.parse_opt("patch")?),
            path: Some(caps.require("path")?.to_string()),
            line_num: address.map(|a| a.line_num),
            left_side: address.is_some_and(|a| a.left_side),
            comment_id: None,
        })))
    }

    fn handle_diff_edit(&self, ctx: &NavigationContext) -> Result<Action> {
        let (project, change_num) = self.change_target(ctx)?;
        let caps = &ctx.captures;
        Ok(redirect_or_navigate(ViewParams::Edit(EditParams {
            project: Some(project),
            change_num,
            range: PatchRange::new(None, Some(caps.parse::<PatchSetNum>("patch")?)),
            path: caps.require("path")?.to_string(),
            line_num: ctx.hash.parse().ok(),
        })))
    }

    /// 没有项目名的旧链接：查询变更所属项目后重定向
    async fn handle_change_legacy(&self, ctx: &NavigationContext) -> Result<Action> {
        let change_num = ctx.captures.parse::<u32>("change")?;
        let project = self
            .session
            .lookup_project_for_change(change_num)
            .await?
            .ok_or(RouteError::UnknownChange(change_num))?;
        tracing::debug!(change = change_num, %project, "resolved project for legacy change link");

        // 保持剩余部分的原始编码；数字前缀按原文剥离 (如 `0042`)
        let prefix = format!("/c/{}", ctx.captures.require("change")?);
        let rest = ctx
            .path
            .strip_prefix(&prefix)
            .unwrap_or("")
            .trim_start_matches('/');

        let mut url = format!("/c/{}/+/{}", encode_url(&project, true), change_num);
        if !rest.is_empty() {
            url.push('/');
            url.push_str(rest);
        }
        if !ctx.querystring.is_empty() {
            url.push('?');
            url.push_str(&ctx.querystring);
        }
        let hash = ctx.raw_hash();
        if !hash.is_empty() {
            url.push('#');
            url.push_str(hash);
        }
        Ok(Action::Redirect(url))
    }
}

// =========================================================
// 辅助函数
// =========================================================

/// 从查询串构造自定义面板参数，没有任何 section 时返回 `None`
///
/// `title` 与 `foreach` 是保留名；`foreach` 的值作为前缀加到每个 section 的查询上。
pub fn custom_dashboard_params(querystring: &str, user: Option<&str>) -> Option<DashboardParams> {
    let mut title = None;
    let mut foreach = None;
    let mut sections = Vec::new();

    for (name, value) in parse_query_string(querystring) {
        if value.is_empty() {
            continue;
        }
        match name.as_str() {
            "title" => title = Some(value),
            "foreach" => foreach = Some(value),
            _ => sections.push(DashboardSection { name, query: value }),
        }
    }

    if sections.is_empty() {
        return None;
    }
    if let Some(prefix) = &foreach {
        for section in &mut sections {
            section.query = format!("{} {}", prefix, section.query);
        }
    }

    Some(DashboardParams {
        user: Some(user.unwrap_or("self").to_string()),
        sections,
        title: Some(title.unwrap_or_else(|| DEFAULT_DASHBOARD_TITLE.to_string())),
        ..Default::default()
    })
}

fn group(group_id: &str, detail: Option<GroupDetail>) -> Action {
    Action::SetParams(ViewParams::Group {
        group_id: group_id.to_string(),
        detail,
    })
}

fn repo(ctx: &NavigationContext, detail: RepoDetail) -> Result<Action> {
    let caps = &ctx.captures;
    Ok(Action::SetParams(ViewParams::Repo(RepoParams {
        repo: caps.require("repo")?.to_string(),
        detail,
        filter: caps.get("filter").filter(|f| !f.is_empty()).map(str::to_string),
        offset: caps.offset("offset")?,
    })))
}

/// 管理列表页；`create_modal` 为真时 `#create` 锚点会打开创建对话框
fn admin_list(view: AdminView, ctx: &NavigationContext, create_modal: bool) -> Result<Action> {
    let caps = &ctx.captures;
    Ok(Action::SetParams(ViewParams::Admin(AdminParams {
        admin_view: view,
        offset: caps.offset("offset")?,
        filter: caps.get("filter").filter(|f| !f.is_empty()).map(str::to_string),
        open_create_modal: create_modal && ctx.hash == "create",
    })))
}

// 旧链接中的 `,n,z` 与 `@` 可能被编码过，原始路径找不到时退回解码后的路径

fn strip_legacy_query_suffix(ctx: &NavigationContext) -> String {
    if let Some(stripped) = ctx.path.strip_suffix(",n,z") {
        return stripped.to_string();
    }
    let decoded = ctx.match_path();
    decoded.strip_suffix(",n,z").unwrap_or(&decoded).to_string()
}

/// `…/file@b12` 改写为 `…/file#b12`
fn legacy_line_to_hash(ctx: &NavigationContext) -> String {
    let path = if ctx.path.contains('@') {
        ctx.path.clone()
    } else {
        ctx.match_path()
    };
    match path.rfind('@') {
        Some(at) => format!("{}#{}", &path[..at], &path[at + 1..]),
        None => path,
    }
}

#[cfg(test)]
mod tests;
