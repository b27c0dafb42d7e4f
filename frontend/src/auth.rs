//! 认证模块
//!
//! 管理会话状态，与路由系统解耦：
//! 路由服务只通过注入的 `AuthStatus` 信号感知认证状态。
//!
//! 结构分两层：
//! - 与传输、存储无关的核心逻辑（`authenticate` / `resume` / `AuthState` 的迁移方法），可直接测试；
//! - `AuthContext`：持有 Leptos 信号的句柄，写入端只在本模块内可见。

use crate::api::{ApiError, ProducerPointApi};
use crate::config::AppConfig;
use crate::validation::{FieldErrors, validate_sign_in};
use crate::web::route::{AppRoute, AuthStatus};
use crate::web::router::RouterService;
use crate::web::{FetchTransport, HttpTransport, KeyValueStore, LocalStorage};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use producer_point_shared::User;

/// 登录失败时展示的统一提示（不区分凭据错误与网络错误）
pub const SIGN_IN_FAILED: &str = "Sign-in failed. Check your e-mail and password and try again.";

/// 已认证的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// 登录失败原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("表单校验失败")]
    Invalid(FieldErrors),
    #[error("登录被拒绝: {0}")]
    Rejected(#[from] ApiError),
}

impl AuthError {
    /// 面向用户的提示
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Invalid(_) => "Please fill in all fields correctly.",
            AuthError::Rejected(_) => SIGN_IN_FAILED,
        }
    }
}

// =========================================================
// 核心逻辑
// =========================================================

/// 校验凭据、调用登录接口并持久化令牌
pub async fn authenticate<T: HttpTransport, S: KeyValueStore>(
    api: &ProducerPointApi<T>,
    store: &S,
    token_key: &str,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let credentials = validate_sign_in(email, password).map_err(AuthError::Invalid)?;

    let res = api.sign_in(credentials).await?;
    if !store.set(token_key, &res.token) {
        warn!("[Auth] 令牌持久化失败，刷新页面后需要重新登录");
    }

    Ok(Session {
        token: res.token,
        user: res.user,
    })
}

/// 读取持久化的令牌并向后端确认，失败则丢弃令牌
pub async fn resume<T: HttpTransport + Clone, S: KeyValueStore>(
    api: &ProducerPointApi<T>,
    store: &S,
    token_key: &str,
) -> Option<Session> {
    let token = store.get(token_key).filter(|t| !t.trim().is_empty())?;

    match api.with_token(&token).current_user().await {
        Ok(user) => Some(Session { token, user }),
        Err(e) => {
            match e.status() {
                Some(code) => log!("[Auth] 已保存的会话无效或已过期 (HTTP {}), 丢弃", code),
                None => warn!("[Auth] 无法确认已保存的会话: {}, 丢弃", e),
            }
            store.delete(token_key);
            None
        }
    }
}

/// 清除持久化的令牌
pub fn forget<S: KeyValueStore>(store: &S, token_key: &str) {
    store.delete(token_key);
}

/// 认证状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// 登录请求进行中
    pub is_loading: bool,
    /// 启动时正在恢复会话
    pub is_restoring: bool,
    /// 最近一次登录失败的提示
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            is_loading: false,
            is_restoring: true,
            error: None,
        }
    }
}

impl AuthState {
    pub fn status(&self) -> AuthStatus {
        if self.session.is_some() {
            AuthStatus::Authenticated
        } else if self.is_restoring {
            AuthStatus::Restoring
        } else {
            AuthStatus::Anonymous
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// 开始登录；已有请求在途时返回 `false`（防止重复提交）
    pub fn begin_sign_in(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        self.error = None;
        true
    }

    /// 结束登录，成功时返回应导航到的路由
    pub fn finish_sign_in(&mut self, result: Result<Session, AuthError>) -> Option<AppRoute> {
        self.is_loading = false;
        match result {
            Ok(session) => {
                self.session = Some(session);
                self.error = None;
                Some(AppRoute::auth_success_redirect())
            }
            Err(e) => {
                self.session = None;
                self.error = Some(e.user_message().to_string());
                None
            }
        }
    }

    /// 结束会话恢复
    ///
    /// 只有恢复仍在进行且尚无会话时才采用结果：
    /// 期间已登录或已注销（`clear`）都会使迟到的结果作废。
    pub fn finish_restore(&mut self, session: Option<Session>) {
        if self.is_restoring && self.session.is_none() {
            self.session = session;
        }
        self.is_restoring = false;
    }

    pub fn clear(&mut self) {
        self.session = None;
        self.is_loading = false;
        self.is_restoring = false;
        self.error = None;
    }
}

// =========================================================
// Leptos 上下文句柄
// =========================================================

/// 认证上下文
///
/// `Copy` 句柄，由 `App` 创建后显式传给需要它的页面。
/// 状态只能通过这里的方法修改。
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
    api: StoredValue<ProducerPointApi<FetchTransport>>,
    token_key: StoredValue<String>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new(config: &AppConfig) -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self {
            state,
            set_state,
            api: StoredValue::new(ProducerPointApi::new(&config.api_base_url, FetchTransport)),
            token_key: StoredValue::new(config.token_storage_key.clone()),
        }
    }

    /// 认证状态（只读）
    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state
    }

    /// 获取会话状态信号（用于路由服务注入）
    pub fn status_signal(&self) -> Signal<AuthStatus> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::status))
    }

    /// 未认证的 API 客户端（登录、找回密码）
    pub fn public_api(&self) -> ProducerPointApi<FetchTransport> {
        self.api.get_value()
    }

    /// 当前会话令牌（非响应式读取）
    pub fn session_token(&self) -> Option<String> {
        self.state
            .with_untracked(|s| s.session.as_ref().map(|s| s.token.clone()))
    }

    /// 携带当前会话令牌的 API 客户端，同时返回所用令牌
    pub fn session_api(&self) -> Option<(String, ProducerPointApi<FetchTransport>)> {
        let token = self.session_token()?;
        let api = self.api.with_value(|api| api.with_token(&token));
        Some((token, api))
    }

    /// 启动时恢复会话
    pub fn restore_session(&self) {
        let ctx = *self;
        spawn_local(async move {
            let api = ctx.public_api();
            let session = resume(&api, &LocalStorage, &ctx.token_key.get_value()).await;
            if let Some(s) = &session {
                log!("[Auth] 会话已恢复: {}", s.user.email);
            }
            ctx.set_state.update(|state| state.finish_restore(session));
        });
    }

    /// 登录；成功后保存令牌并导航到主页
    pub fn sign_in(&self, email: String, password: String, router: RouterService) {
        let mut started = false;
        self.set_state.update(|state| started = state.begin_sign_in());
        if !started {
            log!("[Auth] 登录请求进行中，忽略重复提交");
            return;
        }

        let ctx = *self;
        spawn_local(async move {
            let api = ctx.public_api();
            let result = authenticate(
                &api,
                &LocalStorage,
                &ctx.token_key.get_value(),
                &email,
                &password,
            )
            .await;

            if let Err(e) = &result {
                warn!("[Auth] 登录失败: {}", e);
            }

            let mut target = None;
            ctx.set_state
                .update(|state| target = state.finish_sign_in(result));
            if let Some(route) = target {
                router.navigate_to_route(route);
            }
        });
    }

    /// 注销：清除内存状态与持久化令牌，回到登录页
    pub fn sign_out(&self, router: RouterService) {
        forget(&LocalStorage, &self.token_key.get_value());
        self.set_state.update(AuthState::clear);
        router.navigate_to_route(AppRoute::auth_failure_redirect());
    }

    /// 清除上一次的登录错误提示
    pub fn dismiss_error(&self) {
        self.set_state.update(|state| state.error = None);
    }
}

#[cfg(test)]
mod tests;
