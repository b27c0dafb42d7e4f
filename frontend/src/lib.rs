//! Producer Point 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `requests`: 生产者 / 产品 / 活动列表缓存
//! - `recovery`: 密码找回状态机
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod notice;
mod recovery;
mod requests;
mod validation;

mod components {
    pub mod entity_form;
    pub mod entity_list;
    mod field_error;
    pub mod home;
    mod notice_bar;
    pub mod producer_details;
    mod shell;
    pub mod sign_in;
}

use crate::auth::AuthContext;
use crate::components::entity_form::EntityFormPage;
use crate::components::entity_list::EntityListPage;
use crate::components::home::HomePage;
use crate::components::producer_details::ProducerDetailsPage;
use crate::components::sign_in::SignInPage;
use crate::config::AppConfig;
use crate::requests::RequestContext;

use leptos::prelude::*;
use producer_point_shared::EntityKind;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch / History / LocalStorage），
// 替代 gloo-* 系列 crate，以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;

    pub use http::{FetchTransport, HttpError, HttpRequest, HttpTransport};
    pub use storage::{KeyValueStore, LocalStorage};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 页面共享的应用状态
///
/// 全部是 `Copy` 句柄，由 `App` 创建后显式传给各页面。
#[derive(Clone, Copy)]
pub struct AppState {
    pub auth: AuthContext,
    pub requests: RequestContext,
    pub config: StoredValue<AppConfig>,
}

impl AppState {
    /// 通知条自动关闭时间（毫秒）
    pub fn notice_millis(&self) -> u32 {
        self.config.with_value(|c| c.notice_millis)
    }
}

/// 路由匹配函数
///
/// 根据已通过守卫的 AppRoute 返回对应的页面。
fn route_matcher(state: AppState, route: AppRoute) -> AnyView {
    match route {
        AppRoute::SignIn => view! { <SignInPage state=state link=None /> }.into_any(),
        AppRoute::Recovery(link) => view! { <SignInPage state=state link=Some(link) /> }.into_any(),
        AppRoute::Home => view! { <HomePage state=state /> }.into_any(),
        AppRoute::ProducerForm => entity_form(state, EntityKind::Producer),
        AppRoute::ProducerList => entity_list(state, EntityKind::Producer),
        AppRoute::ProducerDetails => view! { <ProducerDetailsPage state=state /> }.into_any(),
        AppRoute::ProductForm => entity_form(state, EntityKind::Product),
        AppRoute::ProductList => entity_list(state, EntityKind::Product),
        AppRoute::ActivityForm => entity_form(state, EntityKind::Activity),
        AppRoute::ActivityList => entity_list(state, EntityKind::Activity),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <a href="/" class="btn btn-link mt-2">"Back to the start page"</a>
                </div>
            </div>
        }
        .into_any(),
    }
}

fn entity_form(state: AppState, kind: EntityKind) -> AnyView {
    view! { <EntityFormPage state=state kind=kind /> }.into_any()
}

fn entity_list(state: AppState, kind: EntityKind) -> AnyView {
    view! { <EntityListPage state=state kind=kind /> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置
    let config = AppConfig::from_build_env();

    // 2. 创建认证上下文，并从 LocalStorage 恢复会话
    let auth = AuthContext::new(&config);
    auth.restore_session();

    // 3. 请求缓存随认证状态自动加载 / 清空
    let requests = RequestContext::new(auth);

    let state = AppState {
        auth,
        requests,
        config: StoredValue::new(config),
    };

    // 4. 获取会话状态信号，用于注入路由服务（解耦！）
    let auth_status = auth.status_signal();

    view! {
        // 5. 路由器组件：注入会话状态实现守卫
        <Router auth_status=auth_status>
            <RouterOutlet matcher=move |route: AppRoute| route_matcher(state, route) />
        </Router>
    }
}
