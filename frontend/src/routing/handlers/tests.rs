use super::*;
use crate::routing::session::tests::MockSession;
use crate::routing::table::RouteTable;
use rstest::rstest;

async fn dispatch_with(
    session: &MockSession,
    config: &RouterConfig,
    url: &str,
    initial_load: bool,
) -> Result<Action> {
    let table = RouteTable::standard().unwrap();
    let ctx = NavigationContext::parse(url, config);
    let (entry, captures) = table.match_path(&ctx.match_path()).unwrap();
    let id = entry.id();
    let ctx = ctx.with_captures(captures);
    RouteHandlers::new(session, config)
        .dispatch(id, &ctx, initial_load)
        .await
}

async fn dispatch(session: &MockSession, url: &str) -> Action {
    dispatch_with(session, &RouterConfig::default(), url, false)
        .await
        .unwrap()
}

fn num(n: i32) -> Option<PatchSetNum> {
    Some(PatchSetNum::Num(n))
}

fn range(base: Option<PatchSetNum>, patch: Option<PatchSetNum>) -> PatchRange {
    PatchRange::new(base, patch)
}

// =========================================================
// 根路径与面板
// =========================================================

#[tokio::test]
async fn test_root_logged_in() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/").await,
        Action::redirect(DEFAULT_LOGGED_IN_ROUTE)
    );
}

#[tokio::test]
async fn test_root_logged_out() {
    let session = MockSession::logged_out();
    assert_eq!(
        dispatch(&session, "/").await,
        Action::redirect(DEFAULT_LOGGED_OUT_ROUTE)
    );
}

#[tokio::test]
async fn test_root_close_after_login() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/?closeAfterLogin").await,
        Action::CloseWindow
    );
    assert!(session.log_entries().is_empty());
}

#[rstest]
#[case("/#/c/42/", "/c/42/")]
#[case("/#c/42", "/c/42")]
#[case("/#/q/is:open", "/q/is:open")]
#[case("/#/VE/abc", "/settings/VE/abc")]
#[case("/#/c/test/+/42", "/c/test/+/42")]
#[case("/#/c/1/#message-abc", "/c/1/#message-abc")]
#[tokio::test]
async fn test_root_legacy_hash_urls(#[case] url: &str, #[case] expected: &str) {
    let session = MockSession::logged_in();
    assert_eq!(dispatch(&session, url).await, Action::redirect(expected));
    assert!(session.log_entries().is_empty());
}

#[tokio::test]
async fn test_dashboard_logged_out_self_goes_to_login() {
    let session = MockSession::logged_out();
    assert_eq!(
        dispatch(&session, "/dashboard/self").await,
        Action::redirect("/login/%2Fdashboard%2Fself")
    );
    assert_eq!(
        dispatch(&session, "/dashboard/SELF").await,
        Action::redirect("/login/%2Fdashboard%2FSELF")
    );
}

#[tokio::test]
async fn test_dashboard_logged_out_other_user_shows_owner_query() {
    let session = MockSession::logged_out();
    assert_eq!(
        dispatch(&session, "/dashboard/foo").await,
        Action::redirect("/q/owner:foo")
    );
    assert_eq!(
        dispatch(&session, "/dashboard/foo@bar.com").await,
        Action::redirect("/q/owner:foo%40bar.com")
    );
}

#[tokio::test]
async fn test_dashboard_logged_in() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/dashboard/foo").await,
        Action::SetParams(ViewParams::Dashboard(DashboardParams {
            user: Some("foo".to_string()),
            ..Default::default()
        }))
    );
}

#[tokio::test]
async fn test_user_dashboard_with_sections_skips_login_check() {
    let session = MockSession::logged_out();
    let action = dispatch(&session, "/dashboard/foo?title=Mine&a=is:open").await;
    assert_eq!(
        action,
        Action::SetParams(ViewParams::Dashboard(DashboardParams {
            user: Some("foo".to_string()),
            sections: vec![DashboardSection {
                name: "a".to_string(),
                query: "is:open".to_string(),
            }],
            title: Some("Mine".to_string()),
            ..Default::default()
        }))
    );
    assert!(session.log_entries().is_empty());
}

#[tokio::test]
async fn test_custom_dashboard_without_sections_redirects() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/dashboard/?").await,
        Action::redirect("/dashboard/self")
    );
    assert_eq!(
        dispatch(&session, "/dashboard?title=Only").await,
        Action::redirect("/dashboard/self")
    );
}

#[tokio::test]
async fn test_custom_dashboard_sections_and_title() {
    let session = MockSession::logged_in();
    let action = dispatch(&session, "/dashboard?title=Custom%20Dashboard&a=b&d=e").await;
    assert_eq!(
        action,
        Action::SetParams(ViewParams::Dashboard(DashboardParams {
            user: Some("self".to_string()),
            sections: vec![
                DashboardSection {
                    name: "a".to_string(),
                    query: "b".to_string(),
                },
                DashboardSection {
                    name: "d".to_string(),
                    query: "e".to_string(),
                },
            ],
            title: Some("Custom Dashboard".to_string()),
            ..Default::default()
        }))
    );
}

#[test]
fn test_custom_dashboard_foreach_and_empty_pairs() {
    let params = custom_dashboard_params("a=b&c&d=&=e&foreach=is:open", None).unwrap();
    assert_eq!(
        params.sections,
        vec![DashboardSection {
            name: "a".to_string(),
            query: "is:open b".to_string(),
        }]
    );
    assert_eq!(params.title.as_deref(), Some(DEFAULT_DASHBOARD_TITLE));
    assert_eq!(params.user.as_deref(), Some("self"));

    assert_eq!(custom_dashboard_params("", None), None);
    assert_eq!(custom_dashboard_params("foreach=is:open", None), None);
}

#[tokio::test]
async fn test_project_dashboards() {
    let session = MockSession::logged_in();
    let expected = DashboardParams {
        repo: Some("gerrit/project".to_string()),
        dashboard: Some("default:main".to_string()),
        ..Default::default()
    };
    assert_eq!(
        dispatch(&session, "/p/gerrit/project/+/dashboard/default:main").await,
        Action::SetParams(ViewParams::Dashboard(expected))
    );
    assert_eq!(
        dispatch(&session, "/projects/gerrit/project,dashboards/default:main").await,
        Action::redirect("/p/gerrit/project/+/dashboard/default:main")
    );
}

// =========================================================
// 旧链接重定向
// =========================================================

#[rstest]
#[case("/admin/groups/uuid-abc123,info", "/admin/groups/abc123")]
#[case("/groups/self", "/settings/#Groups")]
#[case("/admin/create-group", "/admin/groups#create")]
#[case("/admin/create-project/", "/admin/repos#create")]
#[case("/admin/projects/test", "/admin/repos/test")]
#[case("/admin/projects", "/admin/repos/")]
#[case("/admin/repos/test", "/admin/repos/test,general")]
#[case("/q/foo+bar,n,z", "/q/foo+bar")]
#[case("/c/1234/3..8/foo/bar@b123", "/c/1234/3..8/foo/bar#b123")]
#[case("/c/1234/foo.c@42", "/c/1234/foo.c#42")]
#[case("/12345", "/c/12345")]
#[case("/12345/", "/c/12345")]
#[case("/settings/agreements", "/settings/#Agreements")]
#[case("/c/test/%20/42", "/c/test/+/42")]
#[case("/c/test/%20/42#b5", "/c/test/+/42#b5")]
#[case("/Documentation/q/foo", "/Documentation/q/filter:foo")]
#[case("/Documentation", "/Documentation/index.html")]
#[tokio::test]
async fn test_legacy_redirects(#[case] url: &str, #[case] expected: &str) {
    let session = MockSession::logged_in();
    assert_eq!(dispatch(&session, url).await, Action::redirect(expected));
}

#[rstest]
#[case("/q/foo%2Cn%2Cz", "/q/foo")]
#[case("/q/is:open%2Cn%2Cz", "/q/is:open")]
#[case("/c/1/foo%40b12", "/c/1/foo#b12")]
#[tokio::test]
async fn test_legacy_redirects_with_encoded_markers(#[case] url: &str, #[case] expected: &str) {
    let session = MockSession::logged_in();
    let target = dispatch(&session, url).await;
    assert_eq!(target, Action::redirect(expected));
    assert_ne!(target, Action::redirect(url));
}

#[rstest]
#[case("/plugins/foo/static/x.js")]
#[case("/login")]
#[case("/logout")]
#[case("/login/%2Fc%2F42")]
#[case("/Documentation/index.html")]
#[tokio::test]
async fn test_pass_through_routes(#[case] url: &str) {
    let session = MockSession::logged_in();
    assert_eq!(dispatch(&session, url).await, Action::PassThrough);
}

// =========================================================
// 群组、仓库与管理页面
// =========================================================

#[tokio::test]
async fn test_group_views() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/admin/groups/1234").await,
        Action::SetParams(ViewParams::Group {
            group_id: "1234".to_string(),
            detail: None,
        })
    );
    assert_eq!(
        dispatch(&session, "/admin/groups/uuid-1234,members").await,
        Action::SetParams(ViewParams::Group {
            group_id: "1234".to_string(),
            detail: Some(GroupDetail::Members),
        })
    );
    assert_eq!(
        dispatch(&session, "/admin/groups/1234,audit-log").await,
        Action::SetParams(ViewParams::Group {
            group_id: "1234".to_string(),
            detail: Some(GroupDetail::Log),
        })
    );
}

#[tokio::test]
async fn test_admin_lists() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/admin/groups#create").await,
        Action::SetParams(ViewParams::Admin(AdminParams {
            open_create_modal: true,
            ..AdminParams::new(AdminView::GroupList)
        }))
    );
    assert_eq!(
        dispatch(&session, "/admin/repos,50").await,
        Action::SetParams(ViewParams::Admin(AdminParams {
            offset: 50,
            ..AdminParams::new(AdminView::RepoList)
        }))
    );
    assert_eq!(
        dispatch(&session, "/admin/repos/q/filter:foo,25").await,
        Action::SetParams(ViewParams::Admin(AdminParams {
            offset: 25,
            filter: Some("foo".to_string()),
            ..AdminParams::new(AdminView::RepoList)
        }))
    );
    assert_eq!(
        dispatch(&session, "/admin/groups/q/filter:").await,
        Action::SetParams(ViewParams::Admin(AdminParams::new(AdminView::GroupList)))
    );
    // 过滤后的列表不响应 `#create`
    assert_eq!(
        dispatch(&session, "/admin/plugins/q/filter:foo#create").await,
        Action::SetParams(ViewParams::Admin(AdminParams {
            filter: Some("foo".to_string()),
            ..AdminParams::new(AdminView::PluginList)
        }))
    );
}

#[rstest]
#[case("/admin/repos/test,general", RepoDetail::General, None, 0)]
#[case("/admin/repos/test,access", RepoDetail::Access, None, 0)]
#[case("/admin/repos/test,commands", RepoDetail::Commands, None, 0)]
#[case("/admin/repos/test,dashboards", RepoDetail::Dashboards, None, 0)]
#[case("/admin/repos/test,branches", RepoDetail::Branches, None, 0)]
#[case("/admin/repos/test,branches,25", RepoDetail::Branches, None, 25)]
#[case("/admin/repos/test,branches/q/filter:foo,25", RepoDetail::Branches, Some("foo"), 25)]
#[case("/admin/repos/test,tags/q/filter:v1", RepoDetail::Tags, Some("v1"), 0)]
#[case("/admin/repos/test,tags/q/filter:", RepoDetail::Tags, None, 0)]
#[tokio::test]
async fn test_repo_views(
    #[case] url: &str,
    #[case] detail: RepoDetail,
    #[case] filter: Option<&str>,
    #[case] offset: u32,
) {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, url).await,
        Action::SetParams(ViewParams::Repo(RepoParams {
            repo: "test".to_string(),
            detail,
            filter: filter.map(str::to_string),
            offset,
        }))
    );
}

// =========================================================
// 搜索
// =========================================================

#[tokio::test]
async fn test_query_and_topic() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/q/status:open+owner:foo,25").await,
        Action::SetParams(ViewParams::Search(SearchParams {
            offset: 25,
            ..SearchParams::query("status:open owner:foo")
        }))
    );
    assert_eq!(
        dispatch(&session, "/q/project:foo%252Bbar").await,
        Action::SetParams(ViewParams::Search(SearchParams::query("project:foo+bar")))
    );
    assert_eq!(
        dispatch(&session, "/c/topic/my-topic/").await,
        Action::SetParams(ViewParams::Topic {
            topic: "my-topic".to_string(),
        })
    );
    assert_eq!(
        dispatch(&session, "/id/I0123456789abcdef0123456789abcdef01234567").await,
        Action::SetParams(ViewParams::Search(SearchParams::query(
            "I0123456789abcdef0123456789abcdef01234567"
        )))
    );
}

// =========================================================
// 变更与差异
// =========================================================

#[tokio::test]
async fn test_change_with_query_params() {
    let session = MockSession::logged_in();
    let action = dispatch(
        &session,
        "/c/test/+/42/1..3?tab=checks&filter=fetch&select=build&attempt=2",
    )
    .await;
    assert_eq!(
        action,
        Action::SetParams(ViewParams::Change(ChangeParams {
            project: Some("test".to_string()),
            change_num: 42,
            range: range(num(1), num(3)),
            tab: Some("checks".to_string()),
            filter: Some("fetch".to_string()),
            select: Some("build".to_string()),
            attempt: Some(2),
            ..Default::default()
        }))
    );
    assert_eq!(session.log_entries(), vec!["record:42:test"]);
}

#[tokio::test]
async fn test_change_invalid_attempt_is_dropped() {
    let session = MockSession::logged_in();
    let Action::SetParams(ViewParams::Change(params)) =
        dispatch(&session, "/c/test/+/42?attempt=latest").await
    else {
        panic!("expected change params");
    };
    assert_eq!(params.attempt, None);
    assert!(params.range.is_empty());
}

#[tokio::test]
async fn test_change_single_patchset_becomes_patch() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/test/+/42/3").await,
        Action::SetParams(ViewParams::Change(ChangeParams {
            project: Some("test".to_string()),
            change_num: 42,
            range: range(Some(PatchSetNum::Parent), num(3)),
            ..Default::default()
        }))
    );
}

#[tokio::test]
async fn test_change_equal_range_redirects() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/test/+/42/3..3").await,
        Action::redirect("/c/test/+/42/3")
    );
}

#[tokio::test]
async fn test_change_edit() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/foo/bar/+/1234/3,edit?tab=files").await,
        Action::SetParams(ViewParams::Change(ChangeParams {
            project: Some("foo/bar".to_string()),
            change_num: 1234,
            range: range(None, num(3)),
            edit: true,
            tab: Some("files".to_string()),
            ..Default::default()
        }))
    );
}

#[tokio::test]
async fn test_comment_routes() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/gerrit/+/264833/comment/00049681_f34fd6a9/").await,
        Action::SetParams(ViewParams::Diff(DiffParams {
            project: Some("gerrit".to_string()),
            change_num: 264833,
            comment_id: Some("00049681_f34fd6a9".to_string()),
            ..Default::default()
        }))
    );
    assert_eq!(
        dispatch(&session, "/c/gerrit/+/264833/comments/00049681_f34fd6a9/").await,
        Action::SetParams(ViewParams::Change(ChangeParams {
            project: Some("gerrit".to_string()),
            change_num: 264833,
            comment_id: Some("00049681_f34fd6a9".to_string()),
            ..Default::default()
        }))
    );
}

#[tokio::test]
async fn test_diff_with_line_address() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/test/+/42/1..3/path/to/file.cc#b42").await,
        Action::SetParams(ViewParams::Diff(DiffParams {
            project: Some("test".to_string()),
            change_num: 42,
            range: range(num(1), num(3)),
            path: Some("path/to/file.cc".to_string()),
            line_num: Some(42),
            left_side: true,
            comment_id: None,
        }))
    );
}

#[tokio::test]
async fn test_diff_decodes_double_escaped_names() {
    let session = MockSession::logged_in();
    let action = dispatch(&session, "/c/test%252Bproject/+/42/1/x%252By/a%2520b.txt#c").await;
    assert_eq!(
        action,
        Action::SetParams(ViewParams::Diff(DiffParams {
            project: Some("test+project".to_string()),
            change_num: 42,
            range: range(Some(PatchSetNum::Parent), num(1)),
            path: Some("x+y/a b.txt".to_string()),
            ..Default::default()
        }))
    );
    assert_eq!(session.log_entries(), vec!["record:42:test+project"]);
}

#[tokio::test]
async fn test_diff_edit() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/c/foo/bar/+/1234/3/foo/bar/baz,edit#4").await,
        Action::SetParams(ViewParams::Edit(EditParams {
            project: Some("foo/bar".to_string()),
            change_num: 1234,
            range: range(None, num(3)),
            path: "foo/bar/baz".to_string(),
            line_num: Some(4),
        }))
    );
}

#[tokio::test]
async fn test_change_legacy_looks_up_project() {
    let session = MockSession::logged_in().with_project(1234, "foo/bar");
    assert_eq!(
        dispatch(&session, "/c/1234/3..8/foo/bar?x=1#b12").await,
        Action::redirect("/c/foo/bar/+/1234/3..8/foo/bar?x=1#b12")
    );
    assert_eq!(session.log_entries(), vec!["lookup:1234"]);

    assert_eq!(
        dispatch(&session, "/c/1234/").await,
        Action::redirect("/c/foo/bar/+/1234")
    );
}

#[tokio::test]
async fn test_change_legacy_encodes_project() {
    let session = MockSession::logged_in().with_project(7, "a+b c");
    assert_eq!(
        dispatch(&session, "/c/7/comment/abc").await,
        Action::redirect("/c/a%252Bb+c/+/7/comment/abc")
    );
}

#[tokio::test]
async fn test_change_legacy_keeps_rest_after_zero_padded_number() {
    let session = MockSession::logged_in().with_project(42, "foo");
    assert_eq!(
        dispatch(&session, "/c/0042/comment/7").await,
        Action::redirect("/c/foo/+/42/comment/7")
    );
}

#[tokio::test]
async fn test_change_legacy_unknown_change() {
    let session = MockSession::logged_in();
    let err = dispatch_with(&session, &RouterConfig::default(), "/c/999", false)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::UnknownChange(999)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_change_legacy_lookup_failure() {
    let session = MockSession::logged_in();
    session.fail_lookups();
    let err = dispatch_with(&session, &RouterConfig::default(), "/c/999", false)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::Rest(_)));
}

// =========================================================
// 设置、注册与其他
// =========================================================

#[tokio::test]
async fn test_settings() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/settings").await,
        Action::SetParams(ViewParams::Settings { email_token: None })
    );
    assert_eq!(
        dispatch(&session, "/settings/VE/abc+def").await,
        Action::SetParams(ViewParams::Settings {
            email_token: Some("abc+def".to_string()),
        })
    );
    assert_eq!(
        dispatch(&session, "/settings/new-agreement").await,
        Action::SetParams(ViewParams::Agreements)
    );
}

#[rstest]
#[case("/register/foo/bar", "/foo/bar")]
#[case("/register", "/")]
#[case("/register/", "/")]
#[case("/register/register/x", "/")]
#[tokio::test]
async fn test_register(#[case] url: &str, #[case] redirect: &str) {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, url).await,
        Action::Registered {
            redirect: redirect.to_string(),
        }
    );
}

#[tokio::test]
async fn test_plugin_screen_and_documentation_search() {
    let session = MockSession::logged_in();
    assert_eq!(
        dispatch(&session, "/x/foo/bar").await,
        Action::SetParams(ViewParams::PluginScreen {
            plugin: "foo".to_string(),
            screen: "bar".to_string(),
        })
    );
    assert_eq!(
        dispatch(&session, "/Documentation/q/filter:git+push").await,
        Action::SetParams(ViewParams::DocumentationSearch {
            filter: Some("git push".to_string()),
        })
    );
}

#[tokio::test]
async fn test_default_route_is_not_found() {
    let session = MockSession::logged_in();
    let err = dispatch_with(&session, &RouterConfig::default(), "/no/such/page", false)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::NoMatch(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_default_route_with_server_fallback() {
    let session = MockSession::logged_in();
    let config = RouterConfig::default().with_server_fallback(true);

    let action = dispatch_with(&session, &config, "/no/such/page", false)
        .await
        .unwrap();
    assert_eq!(action, Action::PassThrough);

    // 首次加载已经来自服务端，不再回退
    let err = dispatch_with(&session, &config, "/no/such/page", true)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_redirect_or_navigate_without_range() {
    let params = ViewParams::Topic {
        topic: "t".to_string(),
    };
    assert_eq!(
        redirect_or_navigate(params.clone()),
        Action::SetParams(params)
    );
}
