//! PatchView 前端应用
//!
//! 代码评审界面的客户端路由：
//! - `routing`: 路由核心（领域模型，不依赖 DOM）
//! - `api`: Gerrit REST 会话服务
//! - `web::router`: 路由服务与组件（History API 集成）
//! - `config` / `error`: 运行时配置与错误类型

pub mod api;
pub mod config;
pub mod error;
pub mod routing;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;

    pub use http::{HttpClient, HttpError};
}

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::{FetchTransport, GerritRestApi};
use crate::config::RouterConfig;
use crate::routing::Navigator;
use web::route::RouteState;
use web::router::{Link, Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据路由状态返回对应的视图组件。
fn route_matcher(state: RouteState) -> AnyView {
    match state {
        RouteState::Loading => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg"></span>
            </div>
        }
        .into_any(),
        RouteState::View(_) => {
            let name = state.view_name();
            let url = state.canonical_url().unwrap_or_default();
            view! {
                <main class="container mx-auto p-4">
                    <h1 class="text-2xl font-bold">{name}</h1>
                    <p class="font-mono text-sm opacity-70">{url}</p>
                </main>
            }
            .into_any()
        }
        RouteState::PageError(status) => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">{status}</h1>
                    <p class="text-xl mt-4">
                        {if status == 404 { "页面未找到" } else { "页面加载失败" }}
                    </p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn Header() -> impl IntoView {
    let router = use_router();
    let just_registered = router.just_registered();

    view! {
        <nav class="navbar bg-base-100 shadow">
            <Link to="/dashboard/self">"我的面板"</Link>
            <Link to="/q/status:open">"打开的变更"</Link>
            <Link to="/admin/repos">"仓库"</Link>
        </nav>
        <Show when=move || just_registered.get()>
            <div class="alert alert-success">"注册完成，欢迎使用"</div>
        </Show>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取宿主页面注入的配置
    let config = RouterConfig::from_window();

    // 2. 会话服务与部署前缀共用同一个根路径
    let session = Rc::new(GerritRestApi::new(config.base_url.clone(), FetchTransport));

    // 3. 构建路由表；失败说明路由定义本身有误
    match Navigator::new(session, config) {
        Ok(navigator) => view! {
            <Router navigator=Rc::new(navigator)>
                <Header />
                <RouterOutlet matcher=route_matcher />
            </Router>
        }
        .into_any(),
        Err(err) => {
            tracing::error!(code = err.error_code(), "router initialisation failed: {}", err);
            view! {
                <div class="alert alert-error">{format!("router initialisation failed: {}", err)}</div>
            }
            .into_any()
        }
    }
}
