//! 请求缓存
//!
//! 认证成功后批量拉取生产者、产品、活动列表，供列表页读取。
//! 缓存中的实体是后端快照：本地从不修改，增删操作完成后整表重新拉取。

use crate::api::{ApiResult, ProducerPointApi};
use crate::auth::AuthContext;
use crate::web::HttpTransport;
use crate::web::route::AuthStatus;
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use producer_point_shared::{EntityId, EntityKind, ListEntity, NewEntity};
use std::collections::BTreeMap;

/// 三类实体的快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestCache {
    collections: BTreeMap<EntityKind, Vec<ListEntity>>,
}

impl RequestCache {
    pub fn get(&self, kind: EntityKind) -> &[ListEntity] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 是否已经拉取过该集合（空列表也算）
    pub fn is_loaded(&self, kind: EntityKind) -> bool {
        self.collections.contains_key(&kind)
    }

    /// 用后端返回的整表替换缓存
    pub fn replace(&mut self, kind: EntityKind, items: Vec<ListEntity>) {
        self.collections.insert(kind, items);
    }

    pub fn clear(&mut self) {
        self.collections.clear();
    }
}

/// 响应是否仍属于当前会话
///
/// 请求发出后若已注销或换了账号，结果必须丢弃，不能写回缓存。
pub fn belongs_to_session(current_token: Option<&str>, issued_with: &str) -> bool {
    current_token == Some(issued_with)
}

/// 拉取一个集合
pub async fn fetch<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    kind: EntityKind,
) -> ApiResult<Vec<ListEntity>> {
    api.list(kind).await
}

/// 新建实体后重新拉取整表
pub async fn create_and_refetch<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    kind: EntityKind,
    entity: NewEntity,
) -> ApiResult<Vec<ListEntity>> {
    api.create(kind, entity).await?;
    api.list(kind).await
}

/// 删除实体后重新拉取整表
pub async fn delete_and_refetch<T: HttpTransport>(
    api: &ProducerPointApi<T>,
    kind: EntityKind,
    value: EntityId,
) -> ApiResult<Vec<ListEntity>> {
    api.delete(kind, value).await?;
    api.list(kind).await
}

// =========================================================
// Leptos 上下文句柄
// =========================================================

/// 请求上下文
///
/// 与 `AuthContext` 一样是 `Copy` 句柄，写入端只在本模块内可见。
#[derive(Clone, Copy)]
pub struct RequestContext {
    cache: ReadSignal<RequestCache>,
    set_cache: WriteSignal<RequestCache>,
    /// 在途的拉取请求数
    pending: RwSignal<u32>,
    auth: AuthContext,
}

impl RequestContext {
    /// 创建上下文并随认证状态自动加载 / 清空缓存
    pub fn new(auth: AuthContext) -> Self {
        let (cache, set_cache) = signal(RequestCache::default());
        let ctx = Self {
            cache,
            set_cache,
            pending: RwSignal::new(0),
            auth,
        };

        let status = auth.status_signal();
        Effect::new(move |_| match status.get() {
            AuthStatus::Authenticated => ctx.refresh_all(),
            AuthStatus::Anonymous => ctx.set_cache.update(RequestCache::clear),
            AuthStatus::Restoring => {}
        });

        ctx
    }

    pub fn cache(&self) -> ReadSignal<RequestCache> {
        self.cache
    }

    pub fn is_loading(&self) -> bool {
        self.pending.get() > 0
    }

    /// 某个集合的当前快照（响应式）
    pub fn items(&self, kind: EntityKind) -> Vec<ListEntity> {
        self.cache.with(|c| c.get(kind).to_vec())
    }

    /// 重新拉取所有集合
    pub fn refresh_all(&self) {
        for kind in EntityKind::ALL {
            self.refresh(kind);
        }
    }

    /// 重新拉取一个集合
    pub fn refresh(&self, kind: EntityKind) {
        let Some((token, api)) = self.auth.session_api() else {
            return;
        };
        let ctx = *self;
        ctx.pending.update(|n| *n += 1);
        spawn_local(async move {
            if let Err(e) = ctx.store(kind, &token, fetch(&api, kind).await) {
                warn!("[Requests] 拉取 {} 失败: {}", kind.plural(), e);
            }
            ctx.pending.update(|n| *n = n.saturating_sub(1));
        });
    }

    /// 新建实体，完成后回调结果（成功时缓存已刷新）
    ///
    /// 没有会话时不发请求也不回调，返回 `false`。
    pub fn create(
        &self,
        kind: EntityKind,
        entity: NewEntity,
        on_done: impl FnOnce(ApiResult<()>) + 'static,
    ) -> bool {
        let Some((token, api)) = self.auth.session_api() else {
            return false;
        };
        let ctx = *self;
        spawn_local(async move {
            let result = create_and_refetch(&api, kind, entity).await;
            on_done(ctx.store(kind, &token, result));
        });
        true
    }

    /// 删除实体，完成后回调结果（成功时缓存已刷新）
    pub fn delete(
        &self,
        kind: EntityKind,
        value: EntityId,
        on_done: impl FnOnce(ApiResult<()>) + 'static,
    ) -> bool {
        let Some((token, api)) = self.auth.session_api() else {
            return false;
        };
        let ctx = *self;
        spawn_local(async move {
            let result = delete_and_refetch(&api, kind, value).await;
            on_done(ctx.store(kind, &token, result));
        });
        true
    }

    /// 把整表写回缓存；会话已变化时丢弃
    fn store(
        &self,
        kind: EntityKind,
        issued_with: &str,
        result: ApiResult<Vec<ListEntity>>,
    ) -> ApiResult<()> {
        let items = result?;
        let current = self.auth.session_token();
        if belongs_to_session(current.as_deref(), issued_with) {
            self.set_cache.update(|c| c.replace(kind, items));
        } else {
            log!("[Requests] 会话已变化，丢弃 {} 的响应", kind.plural());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::tests::ScriptedTransport;

    fn api(transport: &ScriptedTransport) -> ProducerPointApi<ScriptedTransport> {
        ProducerPointApi::new("http://api.test", transport.clone())
            .with_token("jwt")
    }

    fn entity(value: &str, label: &str) -> ListEntity {
        ListEntity {
            value: EntityId::new(value),
            label: label.into(),
            fields: Default::default(),
        }
    }

    #[test]
    fn test_cache_replace_and_clear() {
        let mut cache = RequestCache::default();
        assert!(!cache.is_loaded(EntityKind::Product));
        assert!(cache.get(EntityKind::Product).is_empty());

        cache.replace(
            EntityKind::Product,
            vec![entity("1", "Mel"), entity("2", "Queijo")],
        );
        cache.replace(EntityKind::Activity, vec![]);

        assert!(cache.is_loaded(EntityKind::Activity));
        assert_eq!(cache.get(EntityKind::Product).len(), 2);
        assert_eq!(cache.get(EntityKind::Product)[1].label, "Queijo");

        // Replacing is wholesale, never merged
        cache.replace(EntityKind::Product, vec![entity("3", "Doce")]);
        assert_eq!(cache.get(EntityKind::Product), &[entity("3", "Doce")]);

        cache.clear();
        assert!(!cache.is_loaded(EntityKind::Product));
    }

    #[test]
    fn test_responses_only_land_in_the_issuing_session() {
        assert!(belongs_to_session(Some("jwt-1"), "jwt-1"));
        // Signed out while the request was in flight
        assert!(!belongs_to_session(None, "jwt-1"));
        // Signed out and back in as someone else
        assert!(!belongs_to_session(Some("jwt-2"), "jwt-1"));
    }

    #[tokio::test]
    async fn test_create_refetches_whole_collection() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"{"value":3,"label":"Doce"}"#)
            .respond(
                200,
                r#"[{"value":1,"label":"Mel"},{"value":3,"label":"Doce"}]"#,
            );

        let items = create_and_refetch(
            &api(&transport),
            EntityKind::Product,
            NewEntity {
                label: "Doce".into(),
                fields: Default::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(transport.sent_count(), 2);
        assert_eq!(
            transport.last_sent().unwrap().url,
            "http://api.test/products"
        );
    }

    #[tokio::test]
    async fn test_failed_delete_skips_refetch() {
        let transport = ScriptedTransport::new().respond(500, "");

        let err = delete_and_refetch(&api(&transport), EntityKind::Producer, EntityId::new("1"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_lists_by_kind() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"[{"value":"a","label":"Feira"}]"#);

        let items = fetch(&api(&transport), EntityKind::Activity).await.unwrap();
        assert_eq!(items, vec![entity("a", "Feira")]);
        assert_eq!(
            transport.last_sent().unwrap().url,
            "http://api.test/activities"
        );
    }
}
