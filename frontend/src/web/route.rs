//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、它们的访问属性，以及守卫判定。

use crate::recovery::link_from_segments;
use producer_point_shared::{EntityKind, RecoveryLink};
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    SignIn,
    /// 带找回链接的登录页面：`/recovery/{mail}/{time}/{token}`
    Recovery(RecoveryLink),
    Home,
    ProducerForm,
    ProducerList,
    ProducerDetails,
    ProductForm,
    ProductList,
    ActivityForm,
    ActivityList,
    /// 页面未找到
    NotFound,
}

/// 会话状态，守卫的唯一输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// 启动时正在从本地存储恢复会话
    Restoring,
    Anonymous,
    Authenticated,
}

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标路由
    Render(AppRoute),
    /// 重定向到另一路由
    Redirect(AppRoute),
    /// 会话尚在恢复，暂不决定
    Wait,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::SignIn,
            "/home" => Self::Home,
            "/producer-form" => Self::ProducerForm,
            "/producer-list" => Self::ProducerList,
            "/producer-details" => Self::ProducerDetails,
            "/product-form" => Self::ProductForm,
            "/product-list" => Self::ProductList,
            "/activity-form" => Self::ActivityForm,
            "/activity-list" => Self::ActivityList,
            _ => Self::parse_recovery(trimmed).unwrap_or(Self::NotFound),
        }
    }

    fn parse_recovery(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/recovery/")?;
        let mut parts = rest.split('/');
        let (mail, time, token) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        link_from_segments(mail, time, token).map(Self::Recovery)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::SignIn => "/".to_string(),
            Self::Recovery(link) => format!(
                "/recovery/{}/{}/{}",
                urlencoding::encode(&link.mail),
                urlencoding::encode(&link.time),
                urlencoding::encode(&link.token)
            ),
            Self::Home => "/home".to_string(),
            Self::ProducerForm => "/producer-form".to_string(),
            Self::ProducerList => "/producer-list".to_string(),
            Self::ProducerDetails => "/producer-details".to_string(),
            Self::ProductForm => "/product-form".to_string(),
            Self::ProductList => "/product-list".to_string(),
            Self::ActivityForm => "/activity-form".to_string(),
            Self::ActivityList => "/activity-list".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::SignIn | Self::Recovery(_) | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（仅普通登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::SignIn)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::SignIn
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }

    /// 该路由展示的实体种类（列表 / 表单页）
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::ProducerForm | Self::ProducerList | Self::ProducerDetails => {
                Some(EntityKind::Producer)
            }
            Self::ProductForm | Self::ProductList => Some(EntityKind::Product),
            Self::ActivityForm | Self::ActivityList => Some(EntityKind::Activity),
            _ => None,
        }
    }

    /// 某类实体的列表页
    pub fn list_of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Producer => Self::ProducerList,
            EntityKind::Product => Self::ProductList,
            EntityKind::Activity => Self::ActivityList,
        }
    }

    /// 某类实体的新建表单页
    pub fn form_of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Producer => Self::ProducerForm,
            EntityKind::Product => Self::ProductForm,
            EntityKind::Activity => Self::ActivityForm,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫：根据会话状态决定目标路由能否渲染
///
/// 未匹配路由 (`NotFound`) 与公开路由总是直接渲染。
pub fn guard(target: AppRoute, status: AuthStatus) -> GuardDecision {
    match status {
        AuthStatus::Authenticated if target.should_redirect_when_authenticated() => {
            GuardDecision::Redirect(AppRoute::auth_success_redirect())
        }
        AuthStatus::Authenticated => GuardDecision::Render(target),
        _ if !target.requires_auth() => GuardDecision::Render(target),
        AuthStatus::Restoring => GuardDecision::Wait,
        AuthStatus::Anonymous => GuardDecision::Redirect(AppRoute::auth_failure_redirect()),
    }
}
