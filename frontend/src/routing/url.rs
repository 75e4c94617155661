//! URL 生成器
//!
//! 路由处理的逆函数：由视图参数得到规范 URL（应用内路径，不含部署前缀）。
//! 纯函数，覆盖全部视图。

use std::fmt::Write;

use patchview_shared::{
    AdminParams, AdminView, ChangeParams, DashboardParams, DiffParams, EditParams, GroupDetail,
    PatchRange, RepoDetail, RepoParams, SearchParams, ViewParams,
};

use super::encoding::{encode_uri_component, encode_url};

pub fn generate_url(params: &ViewParams) -> String {
    match params {
        ViewParams::Admin(p) => admin_url(p),
        ViewParams::Agreements => "/settings/new-agreement".to_string(),
        ViewParams::Change(p) => change_url(p),
        ViewParams::Dashboard(p) => dashboard_url(p),
        ViewParams::Diff(p) => diff_url(p),
        ViewParams::DocumentationSearch { filter } => format!(
            "/Documentation/q/filter:{}",
            encode_url(filter.as_deref().unwrap_or(""), false)
        ),
        ViewParams::Edit(p) => edit_url(p),
        ViewParams::Group { group_id, detail } => {
            let mut url = format!("/admin/groups/{}", encode_url(group_id, true));
            match detail {
                Some(GroupDetail::Members) => url.push_str(",members"),
                Some(GroupDetail::Log) => url.push_str(",audit-log"),
                None => {}
            }
            url
        }
        ViewParams::PluginScreen { plugin, screen } => format!("/x/{}/{}", plugin, screen),
        ViewParams::Repo(p) => repo_url(p),
        ViewParams::Root => "/".to_string(),
        ViewParams::Search(p) => search_url(p),
        ViewParams::Settings { email_token } => match email_token {
            Some(token) => format!("/settings/VE/{}", token),
            None => "/settings".to_string(),
        },
        ViewParams::Topic { topic } => format!("/c/topic/{}", encode_url(topic, false)),
    }
}

/// 补丁范围表达式：`patch`，base 存在且不是 `PARENT` 时前缀 `base..`
pub fn patch_range_expression(range: &PatchRange) -> String {
    let mut expr = String::new();
    if let Some(base) = range.base_patch_num.filter(|b| !b.is_parent()) {
        let _ = write!(expr, "{}..", base);
    }
    if let Some(patch) = range.patch_num {
        let _ = write!(expr, "{}", patch);
    }
    expr
}

// =========================================================
// 变更相关
// =========================================================

fn change_base(project: Option<&str>, change_num: u32) -> String {
    match project {
        Some(project) => format!("/c/{}/+/{}", encode_url(project, true), change_num),
        None => format!("/c/{}", change_num),
    }
}

fn push_range(url: &mut String, range: &PatchRange) {
    let expr = patch_range_expression(range);
    if !expr.is_empty() {
        url.push('/');
        url.push_str(&expr);
    }
}

fn change_url(p: &ChangeParams) -> String {
    let mut url = change_base(p.project.as_deref(), p.change_num);

    if let Some(comment_id) = &p.comment_id {
        let _ = write!(url, "/comments/{}", comment_id);
    } else {
        push_range(&mut url, &p.range);
        if p.edit {
            url.push_str(",edit");
        }
    }

    let mut query = Vec::new();
    for (name, value) in [
        ("tab", p.tab.as_deref()),
        ("filter", p.filter.as_deref()),
        ("select", p.select.as_deref()),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            query.push(format!("{}={}", name, encode_uri_component(value)));
        }
    }
    if let Some(attempt) = p.attempt {
        query.push(format!("attempt={}", attempt));
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }

    if let Some(hash) = &p.message_hash {
        url.push('#');
        url.push_str(hash.trim_start_matches('#'));
    }
    url
}

fn diff_url(p: &DiffParams) -> String {
    let mut url = change_base(p.project.as_deref(), p.change_num);

    if let Some(comment_id) = &p.comment_id {
        let _ = write!(url, "/comment/{}/", comment_id);
        return url;
    }

    push_range(&mut url, &p.range);
    if let Some(path) = &p.path {
        url.push('/');
        url.push_str(&encode_url(path, true));
    }
    if let Some(line_num) = p.line_num {
        url.push('#');
        if p.left_side {
            url.push('b');
        }
        let _ = write!(url, "{}", line_num);
    }
    url
}

fn edit_url(p: &EditParams) -> String {
    let mut url = change_base(p.project.as_deref(), p.change_num);
    push_range(&mut url, &p.range);
    let _ = write!(url, "/{},edit", encode_url(&p.path, true));
    if let Some(line_num) = p.line_num {
        let _ = write!(url, "#{}", line_num);
    }
    url
}

// =========================================================
// 搜索与面板
// =========================================================

fn search_url(p: &SearchParams) -> String {
    let mut url = match &p.query {
        Some(query) => format!("/q/{}", encode_url(query, true)),
        None => {
            let mut operators = Vec::new();
            for (name, value) in [
                ("owner", &p.owner),
                ("project", &p.project),
                ("branch", &p.branch),
            ] {
                if let Some(value) = value {
                    operators.push(format!("{}:{}", name, encode_url(value, false)));
                }
            }
            if let Some(topic) = &p.topic {
                if topic.contains(char::is_whitespace) {
                    operators.push(format!("topic:\"{}\"", encode_url(topic, false)));
                } else {
                    operators.push(format!("topic:{}", encode_url(topic, false)));
                }
            }
            if let Some(hashtag) = &p.hashtag {
                operators.push(format!(
                    "hashtag:\"{}\"",
                    encode_url(&hashtag.to_lowercase(), false)
                ));
            }
            match p.statuses.as_slice() {
                [] => {}
                [status] => operators.push(format!("status:{}", encode_url(status, false))),
                statuses => {
                    let ored: Vec<String> = statuses
                        .iter()
                        .map(|s| format!("status:{}", encode_url(s, false)))
                        .collect();
                    operators.push(format!("({})", ored.join(" OR ")));
                }
            }
            format!("/q/{}", operators.join("+"))
        }
    };

    if p.offset > 0 {
        let _ = write!(url, ",{}", p.offset);
    }
    url
}

fn dashboard_url(p: &DashboardParams) -> String {
    if !p.sections.is_empty() {
        let mut pairs: Vec<String> = p
            .sections
            .iter()
            .map(|section| {
                let query = match &p.repo {
                    Some(repo) => section
                        .query
                        .replace("${project}", repo)
                        .replace("${repo}", repo),
                    None => section.query.clone(),
                };
                format!(
                    "{}={}",
                    encode_uri_component(&section.name),
                    encode_uri_component(&query)
                )
            })
            .collect();
        if let Some(title) = &p.title {
            pairs.push(format!("title={}", encode_uri_component(title)));
        }
        return format!(
            "/dashboard/{}?{}",
            p.user.as_deref().unwrap_or(""),
            pairs.join("&")
        );
    }

    if let Some(repo) = &p.repo {
        return format!(
            "/p/{}/+/dashboard/{}",
            encode_url(repo, true),
            encode_url(p.dashboard.as_deref().unwrap_or(""), true)
        );
    }

    format!("/dashboard/{}", p.user.as_deref().unwrap_or("self"))
}

// =========================================================
// 管理页面
// =========================================================

fn push_filter_and_offset(url: &mut String, filter: Option<&str>, offset: u32) {
    if let Some(filter) = filter {
        let _ = write!(url, "/q/filter:{}", encode_url(filter, false));
    }
    if offset > 0 {
        let _ = write!(url, ",{}", offset);
    }
}

fn repo_url(p: &RepoParams) -> String {
    let mut url = format!("/admin/repos/{}", encode_url(&p.repo, true));
    match p.detail {
        RepoDetail::General => url.push_str(",general"),
        RepoDetail::Access => url.push_str(",access"),
        RepoDetail::Commands => url.push_str(",commands"),
        RepoDetail::Dashboards => url.push_str(",dashboards"),
        RepoDetail::Branches => {
            url.push_str(",branches");
            push_filter_and_offset(&mut url, p.filter.as_deref(), p.offset);
        }
        RepoDetail::Tags => {
            url.push_str(",tags");
            push_filter_and_offset(&mut url, p.filter.as_deref(), p.offset);
        }
    }
    url
}

fn admin_url(p: &AdminParams) -> String {
    let mut url = match p.admin_view {
        AdminView::GroupList => "/admin/groups",
        AdminView::RepoList => "/admin/repos",
        AdminView::PluginList => "/admin/plugins",
    }
    .to_string();
    push_filter_and_offset(&mut url, p.filter.as_deref(), p.offset);
    if p.open_create_modal {
        url.push_str("#create");
    }
    url
}
