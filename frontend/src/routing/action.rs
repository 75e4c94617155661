use patchview_shared::ViewParams;

/// 一次导航的唯一结果，由应用外壳负责执行
///
/// 所有 URL 都是应用内路径，外壳在写入 History 前加上部署前缀。
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// 发布视图参数
    SetParams(ViewParams),
    /// 替换当前 URL 并重新路由
    Redirect(String),
    /// 交给服务端处理（整页加载）
    PassThrough,
    /// 登录弹窗完成后关闭窗口
    CloseWindow,
    /// 注册完成：标记新用户并跳转
    Registered { redirect: String },
    /// 页面级错误
    PageError { status: u16 },
}

impl Action {
    pub fn redirect(url: impl Into<String>) -> Self {
        Action::Redirect(url.into())
    }

    pub fn not_found() -> Self {
        Action::PageError { status: 404 }
    }
}
