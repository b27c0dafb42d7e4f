use crate::AppState;
use crate::components::shell::{Shell, section_title};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use producer_point_shared::EntityKind;

#[component]
pub fn HomePage(state: AppState) -> impl IntoView {
    let requests = state.requests;
    let auth = state.auth;

    let greeting = move || {
        auth.state().with(|s| {
            s.user()
                .map(|u| format!("Welcome, {}", u.name))
                .unwrap_or_else(|| "Welcome".to_string())
        })
    };

    // 统计数据的派生值
    let count = move |kind: EntityKind| requests.cache().with(|c| c.get(kind).len());

    view! {
        <Shell state=state>
            <div>
                <h2 class="text-2xl font-bold">{greeting}</h2>
                <p class="text-base-content/70">"Manage producers, their products and activities."</p>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                {EntityKind::ALL
                    .into_iter()
                    .map(|kind| {
                        view! {
                            <div class="stat">
                                <div class="stat-title">{section_title(kind)}</div>
                                <div class="stat-value text-primary">{move || count(kind)}</div>
                                <div class="stat-actions flex gap-2">
                                    <Link to=AppRoute::list_of(kind) class="btn btn-sm">"View"</Link>
                                    <Link to=AppRoute::form_of(kind) class="btn btn-sm btn-primary">"Add"</Link>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </Shell>
    }
}
