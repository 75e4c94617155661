//! 路由核心
//!
//! 与浏览器无关的部分都在这里：URL 编码、路由表、处理函数、URL 生成与
//! 导航调度。浏览器集成见 `web::router`。

pub mod action;
pub mod context;
pub mod encoding;
pub mod gate;
pub mod handlers;
pub mod navigator;
pub mod normalize;
pub mod pattern;
pub mod session;
pub mod table;
pub mod url;

pub use action::Action;
pub use context::NavigationContext;
pub use navigator::{Navigation, Navigator, PendingNavigation};
pub use session::SessionService;
pub use table::{RouteId, RouteTable};
pub use url::generate_url;
