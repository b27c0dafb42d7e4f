//! 密码找回流程
//!
//! 显式状态机：
//!
//! ```text
//! Idle --EmailAccepted--> EmailSent --LinkAccepted--> LinkValidated --PasswordAccepted--> PasswordChanged
//!                              |                           |
//!                              +--LinkRejected--> Invalid <+--PasswordRejected
//! ```
//!
//! 任何状态都只能通过用户主动 `Restart` 回到 `Idle`（`Invalid` 没有其他出口），
//! 失败后不做任何自动重试。

use crate::api::ProducerPointApi;
use crate::notice::Notice;
use crate::web::HttpTransport;
use producer_point_shared::RecoveryLink;

/// 流程状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Idle,
    /// 邮件已发出（或用户带着邮件中的链接回到页面）
    EmailSent { link: Option<RecoveryLink> },
    /// 链接已通过后端校验，可以设置新密码
    LinkValidated { link: RecoveryLink },
    PasswordChanged,
    /// 链接无效或已过期
    Invalid,
}

/// 驱动状态迁移的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryEvent {
    EmailAccepted,
    EmailRejected,
    LinkAccepted,
    LinkRejected,
    PasswordAccepted,
    PasswordRejected,
    Restart,
}

/// 非法迁移，状态保持不变
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("非法的找回流程迁移: {from:?} --{event:?}-->")]
pub struct InvalidTransition {
    pub from: RecoveryState,
    pub event: RecoveryEvent,
}

impl RecoveryState {
    /// 进入页面时的初始状态：URL 中带有链接则视为邮件已发送
    pub fn on_page_load(link: Option<RecoveryLink>) -> Self {
        match link {
            Some(link) => Self::EmailSent { link: Some(link) },
            None => Self::Idle,
        }
    }

    /// 待校验的链接（仅 `EmailSent` 且带链接时存在）
    pub fn pending_link(&self) -> Option<&RecoveryLink> {
        match self {
            Self::EmailSent { link } => link.as_ref(),
            _ => None,
        }
    }

    /// 已校验、可用于修改密码的链接
    pub fn validated_link(&self) -> Option<&RecoveryLink> {
        match self {
            Self::LinkValidated { link } => Some(link),
            _ => None,
        }
    }

    /// 重置密码表单是否应该打开
    pub fn shows_reset_form(&self) -> bool {
        matches!(self, Self::LinkValidated { .. })
    }

    /// 守卫迁移
    pub fn apply(&self, event: RecoveryEvent) -> Result<RecoveryState, InvalidTransition> {
        use RecoveryEvent as E;

        let next = match (self, &event) {
            (_, E::Restart) => Some(Self::Idle),
            (Self::Idle, E::EmailAccepted) => Some(Self::EmailSent { link: None }),
            (Self::Idle, E::EmailRejected) => Some(Self::Idle),
            (Self::EmailSent { link: Some(link) }, E::LinkAccepted) => {
                Some(Self::LinkValidated { link: link.clone() })
            }
            (Self::EmailSent { link: Some(_) }, E::LinkRejected) => Some(Self::Invalid),
            (Self::LinkValidated { .. }, E::PasswordAccepted) => Some(Self::PasswordChanged),
            (Self::LinkValidated { .. }, E::PasswordRejected) => Some(Self::Invalid),
            _ => None,
        };

        next.ok_or(InvalidTransition {
            from: self.clone(),
            event,
        })
    }
}

/// 从 URL 路径片段还原找回链接
///
/// 片段经过百分号编码（邮箱中的 `@` 通常为 `%40`），任一片段为空或解码失败时返回 `None`。
pub fn link_from_segments(mail: &str, time: &str, token: &str) -> Option<RecoveryLink> {
    let decode = |raw: &str| {
        urlencoding::decode(raw)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Some(RecoveryLink {
        mail: decode(mail)?,
        time: decode(time)?,
        token: decode(token)?,
    })
}

impl RecoveryEvent {
    /// 事件对应的用户提示
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::EmailAccepted => Some(Notice::success(
                "Check your e-mail and follow the instructions to recover your password.",
            )),
            Self::EmailRejected => Some(Notice::error("E-mail not found!")),
            Self::LinkAccepted | Self::Restart => None,
            Self::LinkRejected => Some(Notice::error("Invalid or expired link!")),
            Self::PasswordAccepted => Some(Notice::success("Password changed successfully!")),
            Self::PasswordRejected => {
                Some(Notice::error("Invalid or expired password reset link!"))
            }
        }
    }
}

// =========================================================
// 异步驱动
// =========================================================
//
// 每个驱动函数先检查当前状态能否接受对应的结果，再发起请求，
// 避免在错误状态下产生网络调用。传输失败与非 200 响应一视同仁。

/// 发送找回邮件（`Idle` 状态下）
pub async fn send_email<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    state: &RecoveryState,
    email: &str,
) -> Result<RecoveryEvent, InvalidTransition> {
    state.apply(RecoveryEvent::EmailAccepted)?;
    Ok(match api.send_email_recovery(email).await {
        Ok(()) => RecoveryEvent::EmailAccepted,
        Err(_) => RecoveryEvent::EmailRejected,
    })
}

/// 校验 URL 中的链接（`EmailSent` 且带链接时）
pub async fn validate_link<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    state: &RecoveryState,
) -> Result<RecoveryEvent, InvalidTransition> {
    let link = state.pending_link().ok_or_else(|| InvalidTransition {
        from: state.clone(),
        event: RecoveryEvent::LinkAccepted,
    })?;
    Ok(match api.validate_link(link).await {
        Ok(()) => RecoveryEvent::LinkAccepted,
        Err(_) => RecoveryEvent::LinkRejected,
    })
}

/// 使用已校验的链接设置新密码
pub async fn change_password<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    state: &RecoveryState,
    new_password: &str,
) -> Result<RecoveryEvent, InvalidTransition> {
    let link = state.validated_link().ok_or_else(|| InvalidTransition {
        from: state.clone(),
        event: RecoveryEvent::PasswordAccepted,
    })?;
    Ok(match api.set_new_password(link, new_password).await {
        Ok(()) => RecoveryEvent::PasswordAccepted,
        Err(_) => RecoveryEvent::PasswordRejected,
    })
}
