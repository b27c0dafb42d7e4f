use crate::AppState;
use crate::components::notice_bar::NoticeBar;
use crate::components::shell::{Shell, entity_noun, section_title};
use crate::notice::Notice;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::logging::warn;
use leptos::prelude::*;
use producer_point_shared::{EntityId, EntityKind, ListEntity};

/// 按名称过滤（不区分大小写，空白查询返回全部）
fn matches_query(entity: &ListEntity, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || entity.label.to_lowercase().contains(&query)
}

/// 某类实体的列表页：过滤、刷新、删除
#[component]
pub fn EntityListPage(state: AppState, kind: EntityKind) -> impl IntoView {
    let requests = state.requests;
    let notice = RwSignal::new(None::<Notice>);
    let query = RwSignal::new(String::new());

    let rows = move || {
        let items = requests.items(kind);
        query.with(|q| {
            items
                .into_iter()
                .filter(|e| matches_query(e, q))
                .collect::<Vec<_>>()
        })
    };
    let loaded = move || requests.cache().with(|c| c.is_loaded(kind));
    let is_empty = move || rows().is_empty();

    let handle_delete = move |value: EntityId| {
        requests.delete(kind, value, move |result| {
            let message = match result {
                Ok(()) => Notice::success(format!("{} deleted", entity_noun(kind))),
                Err(e) => {
                    warn!("[Requests] 删除 {} 失败: {}", kind.singular(), e);
                    Notice::error(format!("Could not delete the {}", kind.singular()))
                }
            };
            notice.set(Some(message));
        });
    };

    view! {
        <Shell state=state>
            <NoticeBar notice=notice millis=state.notice_millis() />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-wrap items-center justify-between gap-2 p-6 pb-2">
                        <div>
                            <h3 class="card-title">{section_title(kind)}</h3>
                            <p class="text-base-content/70 text-sm">
                                {move || format!("{} registered", requests.items(kind).len())}
                            </p>
                        </div>
                        <div class="flex items-center gap-2">
                            <input
                                type="search"
                                placeholder="Search by name"
                                class="input input-bordered input-sm"
                                on:input=move |ev| query.set(event_target_value(&ev))
                                prop:value=query
                            />
                            <button
                                on:click=move |_| requests.refresh(kind)
                                disabled=move || requests.is_loading()
                                class="btn btn-ghost btn-sm"
                            >
                                {move || if requests.is_loading() {
                                    view! { <span class="loading loading-spinner loading-xs"></span> }.into_any()
                                } else {
                                    "Refresh".into_any()
                                }}
                            </button>
                            <Link to=AppRoute::form_of(kind) class="btn btn-primary btn-sm">
                                {format!("New {}", kind.singular())}
                            </Link>
                        </div>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"Name"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || !loaded()>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loaded() && is_empty()>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "Nothing here yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=rows
                                    key=|e| e.value.clone()
                                    children=move |entity| {
                                        let value = entity.value.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm opacity-70">{entity.value.to_string()}</td>
                                                <td class="font-bold">{entity.label}</td>
                                                <td class="text-right">
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click=move |_| { handle_delete(value.clone()); }
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </Shell>
    }
}
