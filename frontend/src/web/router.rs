//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证由 `route::guard` 完成。

use leptos::logging::log;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, AuthStatus, GuardDecision, guard};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 用户请求的路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号，实现解耦）
    auth_status: Signal<AuthStatus>,
}

impl RouterService {
    /// 创建新的路由服务，初始路由从 URL 解析
    fn new(auth_status: Signal<AuthStatus>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            auth_status,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫判定（响应式）
    pub fn decision(&self) -> GuardDecision {
        guard(self.current_route.get(), self.auth_status.get())
    }

    /// **核心方法：导航**
    ///
    /// 推入 History 后更新路由，守卫由 `setup_guard` 统一处理。
    pub fn navigate_to_route(&self, target_route: AppRoute) {
        push_history_state(&target_route.to_path());
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 路由或会话状态变化时执行守卫，必要时重定向（replaceState）
    fn setup_guard(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let auth_status = self.auth_status;

        Effect::new(move |_| {
            let route = current_route.get();
            let status = auth_status.get();

            if let GuardDecision::Redirect(redirect) = guard(route.clone(), status) {
                log!("[Router] {} ({:?}) -> {}", route, status, redirect);
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth_status: Signal<AuthStatus>) -> RouterService {
    let router = RouterService::new(auth_status);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_guard();

    provide_context(router);
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
    /// 会话状态信号
    auth_status: Signal<AuthStatus>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(auth_status);

    children()
}

/// 路由出口组件
///
/// 每次渲染前重新执行守卫，受保护内容不会在没有会话时渲染，
/// 即使重定向 Effect 尚未运行。判定结果经过 `Memo` 去重，
/// 会话状态变化但判定不变时页面不会重新挂载。
#[component]
pub fn RouterOutlet<F>(
    /// 路由匹配函数：接收已放行的路由，返回对应视图
    matcher: F,
) -> impl IntoView
where
    F: Fn(AppRoute) -> AnyView + Send + Sync + 'static,
{
    let router = use_router();
    let decision = Memo::new(move |_| router.decision());

    move || match decision.get() {
        GuardDecision::Render(route) => matcher(route),
        GuardDecision::Wait | GuardDecision::Redirect(_) => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接：拦截点击并交给路由服务处理
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to_route(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
