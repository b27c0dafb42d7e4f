//! 已登录页面的公共外壳：导航栏 + 注销

use crate::AppState;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use producer_point_shared::EntityKind;

/// 导航与标题中使用的集合名称
pub fn section_title(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Producer => "Producers",
        EntityKind::Product => "Products",
        EntityKind::Activity => "Activities",
    }
}

/// 单个实体的名称
pub fn entity_noun(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Producer => "Producer",
        EntityKind::Product => "Product",
        EntityKind::Activity => "Activity",
    }
}

#[component]
fn SectionMenu(kind: EntityKind) -> impl IntoView {
    let router = use_router();
    let summary_class = move || {
        if router.current_route().with(AppRoute::entity_kind) == Some(kind) {
            "font-bold text-primary"
        } else {
            ""
        }
    };

    view! {
        <li>
            <details>
                <summary class=summary_class>{section_title(kind)}</summary>
                <ul class="p-2 bg-base-100 rounded-t-none z-10 w-40">
                    <li><Link to=AppRoute::list_of(kind)>"List"</Link></li>
                    <li><Link to=AppRoute::form_of(kind)>"New"</Link></li>
                    {(kind == EntityKind::Producer).then(|| view! {
                        <li><Link to=AppRoute::ProducerDetails>"Details"</Link></li>
                    })}
                </ul>
            </details>
        </li>
    }
}

#[component]
pub fn Shell(state: AppState, children: Children) -> impl IntoView {
    let router = use_router();
    let auth = state.auth;

    let user_name = move || {
        auth.state()
            .with(|s| s.user().map(|u| u.name.clone()).unwrap_or_default())
    };
    let on_sign_out = move |_| auth.sign_out(router);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to=AppRoute::Home class="btn btn-ghost text-xl">"Producer Point"</Link>
                        <ul class="menu menu-horizontal px-1 hidden md:flex">
                            {EntityKind::ALL
                                .into_iter()
                                .map(|kind| view! { <SectionMenu kind=kind /> })
                                .collect_view()}
                        </ul>
                    </div>
                    <div class="flex-none gap-2">
                        <span class="badge badge-neutral hidden md:inline-flex">{user_name}</span>
                        <button on:click=on_sign_out class="btn btn-outline btn-error">
                            "Sign out"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}
