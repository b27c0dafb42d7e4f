//! 后端 API 客户端
//!
//! 每个端点由 `ApiRequest` 描述，客户端只负责编码、鉴权头和状态码判定。
//! 任何非 200 的响应都视为失败。

use crate::web::{HttpError, HttpRequest, HttpTransport};
use producer_point_shared::protocol::{
    ApiRequest, CreateEntity, CurrentUserRequest, DeleteEntity, ListEntities, SendRecoveryEmail,
    SetNewPassword, SignInRequest, ValidateRecoveryLink,
};
use producer_point_shared::{
    CONTENT_TYPE_JSON, Credentials, EntityId, EntityKind, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, ListEntity, NewEntity, RecoveryLink, SignInResponse, User,
};

/// API 调用错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error("请求失败: HTTP {0}")]
    Status(u16),
    #[error("请求体编码失败: {0}")]
    Encode(String),
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl ApiError {
    /// 后端返回的状态码（传输层错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerPointApi<T> {
    base_url: String,
    token: Option<String>,
    transport: T,
}

impl<T: HttpTransport> ProducerPointApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            transport,
        }
    }

    /// 返回携带会话令牌的客户端
    pub fn with_token(&self, token: &str) -> Self
    where
        T: Clone,
    {
        Self {
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
            transport: self.transport.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送强类型请求并获取解析后的响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(self.url(path), R::METHOD);

        if let Some(token) = &self.token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        let res = self.transport.send(http).await.inspect_err(|e| {
            leptos::logging::warn!("[Api] {} {} 传输失败: {}", R::METHOD.as_str(), path, e);
        })?;

        if res.status != 200 {
            leptos::logging::warn!("[Api] {} {} -> {}", R::METHOD.as_str(), path, res.status);
            return Err(ApiError::Status(res.status));
        }

        // 空响应体按 null 解析，供仅关心状态码的端点使用
        let body = if res.body.trim().is_empty() {
            "null"
        } else {
            res.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn sign_in(&self, credentials: Credentials) -> ApiResult<SignInResponse> {
        self.send(&SignInRequest(credentials)).await
    }

    /// 用当前令牌换取用户信息，用于恢复会话
    pub async fn current_user(&self) -> ApiResult<User> {
        self.send(&CurrentUserRequest).await
    }

    // =========================================================
    // 密码找回
    // =========================================================

    pub async fn send_email_recovery(&self, email: &str) -> ApiResult<()> {
        let req = SendRecoveryEmail {
            email: email.to_string(),
        };
        self.send(&req).await.map(|_| ())
    }

    pub async fn validate_link(&self, link: &RecoveryLink) -> ApiResult<()> {
        self.send(&ValidateRecoveryLink(link.clone()))
            .await
            .map(|_| ())
    }

    pub async fn set_new_password(&self, link: &RecoveryLink, password: &str) -> ApiResult<()> {
        let req = SetNewPassword {
            link: link.clone(),
            password: password.to_string(),
        };
        self.send(&req).await.map(|_| ())
    }

    // =========================================================
    // 实体 CRUD
    // =========================================================

    pub async fn list(&self, kind: EntityKind) -> ApiResult<Vec<ListEntity>> {
        self.send(&ListEntities { kind }).await
    }

    pub async fn create(&self, kind: EntityKind, entity: NewEntity) -> ApiResult<ListEntity> {
        self.send(&CreateEntity { kind, entity }).await
    }

    pub async fn delete(&self, kind: EntityKind, value: EntityId) -> ApiResult<()> {
        self.send(&DeleteEntity { kind, value }).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests;
