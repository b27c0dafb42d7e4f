use crate::AppState;
use crate::components::shell::Shell;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use producer_point_shared::EntityKind;
use serde_json::Value;

/// 领域字段的展示文本：字符串原样输出，其余按 JSON 输出
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// 生产者详情：展示缓存中每个生产者的全部字段
#[component]
pub fn ProducerDetailsPage(state: AppState) -> impl IntoView {
    let requests = state.requests;
    let producers = move || requests.items(EntityKind::Producer);

    view! {
        <Shell state=state>
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Producer details"</h2>
                <Link to=AppRoute::ProducerList class="btn btn-ghost btn-sm">"Back to list"</Link>
            </div>

            <Show when=move || producers().is_empty()>
                <p class="text-base-content/50">"No producers registered."</p>
            </Show>

            <div class="grid gap-4 md:grid-cols-2">
                <For
                    each=producers
                    key=|p| p.value.clone()
                    children=|producer| {
                        view! {
                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h3 class="card-title">{producer.label}</h3>
                                    <p class="font-mono text-xs opacity-50">"#" {producer.value.to_string()}</p>
                                    <dl class="grid grid-cols-3 gap-1 text-sm">
                                        {producer
                                            .fields
                                            .into_iter()
                                            .map(|(name, value)| view! {
                                                <dt class="font-semibold">{name}</dt>
                                                <dd class="col-span-2">{field_text(&value)}</dd>
                                            })
                                            .collect_view()}
                                    </dl>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </Shell>
    }
}
