use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 认证模型 (Auth Models)
// =========================================================

/// 登录凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// 去除首尾空白后的凭据（提交前调用）
    pub fn trimmed(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

/// 登录成功后的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: User,
}

/// 密码找回链接中携带的三元组
///
/// 由后端签发，前端只负责原样回传。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryLink {
    pub mail: String,
    pub time: String,
    pub token: String,
}

// =========================================================
// 列表实体 (List Entities)
// =========================================================

/// 实体种类，同时决定 REST 资源路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Producer,
    Product,
    Activity,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Producer, Self::Product, Self::Activity];

    /// REST 集合路径
    pub fn collection_path(&self) -> &'static str {
        match self {
            Self::Producer => "/producers",
            Self::Product => "/products",
            Self::Activity => "/activities",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Product => "product",
            Self::Activity => "activity",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::Producer => "producers",
            Self::Product => "products",
            Self::Activity => "activities",
        }
    }
}

/// 实体标识
///
/// 后端可能返回数字或字符串 ID，统一按字符串处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawEntityId", into = "String")]
pub struct EntityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityId {
    Text(String),
    Number(i64),
}

impl From<RawEntityId> for EntityId {
    fn from(raw: RawEntityId) -> Self {
        match raw {
            RawEntityId::Text(s) => Self(s),
            RawEntityId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 列表视图使用的实体快照（生产者 / 产品 / 活动）
///
/// `value`/`label` 之外的领域字段原样保留在 `fields` 中，前端只读。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntity {
    pub value: EntityId,
    pub label: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// 新建实体的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntity {
    pub label: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_accepts_numbers_and_strings() {
        let list: Vec<ListEntity> = serde_json::from_str(
            r#"[{"value": 7, "label": "Apiário"}, {"value": "p-2", "label": "Horta", "city": "Lavras"}]"#,
        )
        .unwrap();

        assert_eq!(list[0].value.as_str(), "7");
        assert_eq!(list[1].value, EntityId::new("p-2"));
        assert_eq!(
            list[1].fields.get("city"),
            Some(&serde_json::json!("Lavras"))
        );
        assert!(list[0].fields.is_empty());
    }

    #[test]
    fn test_credentials_trimmed() {
        let creds = Credentials {
            email: "  ana@example.com ".into(),
            password: " secret\t".into(),
        };
        let trimmed = creds.trimmed();
        assert_eq!(trimmed.email, "ana@example.com");
        assert_eq!(trimmed.password, "secret");
    }

    #[test]
    fn test_entity_kind_paths() {
        assert_eq!(EntityKind::Producer.collection_path(), "/producers");
        assert_eq!(EntityKind::Activity.plural(), "activities");
    }
}
