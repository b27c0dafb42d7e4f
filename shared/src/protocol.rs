use crate::{
    Credentials, EntityId, EntityKind, ListEntity, NewEntity, RecoveryLink, SignInResponse, User,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 该方法是否携带请求体
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Endpoints that only report success through the status code use
/// [`IgnoredAny`] as their response type.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base URL.
    fn path(&self) -> &'static str;
}

// =========================================================
// Auth
// =========================================================

/// Sign in with email and password
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignInRequest(pub Credentials);

impl ApiRequest for SignInRequest {
    type Response = SignInResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> &'static str {
        "/auth/signin"
    }
}

/// Resolve the user owning the bearer token (used to restore a session)
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> &'static str {
        "/auth/me"
    }
}

// =========================================================
// Password recovery
// =========================================================

/// Ask the backend to mail a recovery link
#[derive(Debug, Serialize, Deserialize)]
pub struct SendRecoveryEmail {
    pub email: String,
}

impl ApiRequest for SendRecoveryEmail {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> &'static str {
        "/auth/recovery"
    }
}

/// Check that a (mail, time, token) link is still valid
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidateRecoveryLink(pub RecoveryLink);

impl ApiRequest for ValidateRecoveryLink {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> &'static str {
        "/auth/recovery/validate"
    }
}

/// Replace the password using a validated link
#[derive(Debug, Serialize, Deserialize)]
pub struct SetNewPassword {
    #[serde(flatten)]
    pub link: RecoveryLink,
    pub password: String,
}

impl ApiRequest for SetNewPassword {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> &'static str {
        "/auth/recovery/password"
    }
}

// =========================================================
// Entities
// =========================================================

/// List every entity of one kind
#[derive(Debug, Serialize)]
pub struct ListEntities {
    #[serde(skip)]
    pub kind: EntityKind,
}

impl ApiRequest for ListEntities {
    type Response = Vec<ListEntity>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> &'static str {
        self.kind.collection_path()
    }
}

/// Create an entity of one kind
#[derive(Debug, Serialize)]
pub struct CreateEntity {
    #[serde(skip)]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub entity: NewEntity,
}

impl ApiRequest for CreateEntity {
    type Response = ListEntity;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> &'static str {
        self.kind.collection_path()
    }
}

/// Delete an entity; the target travels in the body
#[derive(Debug, Serialize)]
pub struct DeleteEntity {
    #[serde(skip)]
    pub kind: EntityKind,
    pub value: EntityId,
}

impl ApiRequest for DeleteEntity {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> &'static str {
        self.kind.collection_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(SignInRequest::METHOD, HttpMethod::Post);
        assert_eq!(ListEntities::METHOD, HttpMethod::Get);
        assert_eq!(DeleteEntity::METHOD.as_str(), "DELETE");
        assert!(DeleteEntity::METHOD.has_body());
    }

    #[test]
    fn test_set_new_password_body_is_flat() {
        let req = SetNewPassword {
            link: RecoveryLink {
                mail: "ana@example.com".into(),
                time: "1700000000000".into(),
                token: "abc".into(),
            },
            password: "n3w-pass".into(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "mail": "ana@example.com",
                "time": "1700000000000",
                "token": "abc",
                "password": "n3w-pass"
            })
        );
    }

    #[test]
    fn test_entity_requests_route_by_kind() {
        let list = ListEntities {
            kind: EntityKind::Activity,
        };
        assert_eq!(list.path(), "/activities");

        let delete = DeleteEntity {
            kind: EntityKind::Product,
            value: EntityId::new("9"),
        };
        assert_eq!(delete.path(), "/products");
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            serde_json::json!({ "value": "9" })
        );
        assert!(!ListEntities::METHOD.has_body());
    }
}
