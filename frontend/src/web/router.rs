//! 路由服务模块 - 浏览器集成
//!
//! 所有对 window.history 与 window.location 的操作都集中在此模块。
//! 导航流程："记录 URL -> 分配序号 -> 异步处理 -> 丢弃过期结果 -> 执行动作"。

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::RouteState;
use crate::api::GerritRestApi;
use crate::routing::{Action, Navigator};

pub type AppNavigator = Navigator<GerritRestApi>;

/// 获取当前浏览器 URL（路径、查询串与锚点）
fn current_url() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let location = window.location();
    format!(
        "{}{}{}",
        location.pathname().unwrap_or_else(|_| "/".to_string()),
        location.search().unwrap_or_default(),
        location.hash().unwrap_or_default()
    )
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// 整页加载当前 URL，交给服务端处理
fn reload_page() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

fn close_window() {
    if let Some(window) = web_sys::window() {
        let _ = window.close();
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    state: RwSignal<RouteState>,
    /// 刚完成注册，界面据此展示欢迎提示
    just_registered: RwSignal<bool>,
    navigator: StoredValue<Rc<AppNavigator>, LocalStorage>,
}

impl RouterService {
    fn new(navigator: Rc<AppNavigator>) -> Self {
        Self {
            state: RwSignal::new(RouteState::Loading),
            just_registered: RwSignal::new(false),
            navigator: StoredValue::new_local(navigator),
        }
    }

    /// 当前路由状态信号
    pub fn state(&self) -> ReadSignal<RouteState> {
        self.state.read_only()
    }

    pub fn just_registered(&self) -> ReadSignal<bool> {
        self.just_registered.read_only()
    }

    /// 应用内路径加上部署前缀，用于 `href`
    pub fn href(&self, path: &str) -> String {
        self.navigator.with_value(|nav| nav.config().prefixed(path))
    }

    /// **核心方法：导航**
    ///
    /// `path` 是应用内路径，先写入 History 再异步处理。
    pub fn navigate(&self, path: &str) {
        let url = self.href(path);
        push_history_state(&url);
        self.dispatch(url);
    }

    /// 处理浏览器当前所在的 URL
    fn dispatch(self, url: String) {
        let navigator = self.navigator.get_value();
        let pending = navigator.begin(&url);
        tracing::debug!(seq = pending.seq, %url, "navigation started");

        leptos::task::spawn_local(async move {
            let navigation = navigator.resolve(pending).await;
            if let Some(action) = navigator.settle(navigation) {
                self.apply(action);
            }
        });
    }

    fn apply(self, action: Action) {
        if let Some(state) = RouteState::from_action(&action) {
            tracing::info!(view = %state, "route settled");
            self.state.set(state);
            return;
        }

        match action {
            Action::Redirect(path) => {
                tracing::debug!(%path, "redirect");
                let url = self.href(&path);
                replace_history_state(&url);
                self.dispatch(url);
            }
            Action::PassThrough => reload_page(),
            Action::CloseWindow => close_window(),
            Action::Registered { redirect } => {
                self.just_registered.set(true);
                self.apply(Action::Redirect(redirect));
            }
            Action::SetParams(_) | Action::PageError { .. } => {}
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            router.dispatch(current_url());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并处理首次加载的 URL
fn provide_router(navigator: Rc<AppNavigator>) -> RouterService {
    let router = RouterService::new(navigator);

    router.init_popstate_listener();
    provide_context(router);
    router.dispatch(current_url());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 已构建好路由表的导航调度器
    navigator: Rc<AppNavigator>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(navigator);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由状态，返回对应视图
    matcher: fn(RouteState) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.state().get();
        matcher(current)
    }
}

/// 应用内链接
///
/// 普通左键点击走客户端路由，带修饰键或中键点击交给浏览器。
#[component]
pub fn Link(
    /// 目标路径（应用内）
    #[prop(into)]
    to: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = router.href(&to);

    let on_click = move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 || ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.alt_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}
