use crate::AppState;
use crate::components::field_error::FieldError;
use crate::components::notice_bar::NoticeBar;
use crate::components::shell::{Shell, entity_noun};
use crate::notice::Notice;
use crate::validation::{FieldErrors, validate_label};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::logging::warn;
use leptos::prelude::*;
use producer_point_shared::{EntityKind, NewEntity};
use std::collections::BTreeMap;

/// 由表单输入构造新建请求，空白的描述不提交
fn build_entity(label: String, description: &str) -> NewEntity {
    let mut fields = BTreeMap::new();
    let description = description.trim();
    if !description.is_empty() {
        fields.insert(
            "description".to_string(),
            serde_json::Value::String(description.to_string()),
        );
    }
    NewEntity { label, fields }
}

/// 新建实体表单，保存成功后回到列表页
#[component]
pub fn EntityFormPage(state: AppState, kind: EntityKind) -> impl IntoView {
    let router = use_router();
    let requests = state.requests;

    let label = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let saving = RwSignal::new(false);
    let notice = RwSignal::new(None::<Notice>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let name = match validate_label(&label.get_untracked()) {
            Ok(name) => name,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(FieldErrors::new());

        let entity = build_entity(name, &description.get_untracked());
        saving.set(true);
        let started = requests.create(kind, entity, move |result| {
            saving.set(false);
            match result {
                Ok(()) => router.navigate_to_route(AppRoute::list_of(kind)),
                Err(e) => {
                    warn!("[Requests] 新建 {} 失败: {}", kind.singular(), e);
                    notice.set(Some(Notice::error(format!(
                        "Could not save the {}",
                        kind.singular()
                    ))));
                }
            }
        });
        if !started {
            saving.set(false);
        }
    };

    view! {
        <Shell state=state>
            <NoticeBar notice=notice millis=state.notice_millis() />

            <div class="card bg-base-100 shadow-xl max-w-2xl">
                <form class="card-body" on:submit=on_submit>
                    <h3 class="card-title">{format!("New {}", kind.singular())}</h3>

                    <div class="form-control">
                        <label class="label" for="label">
                            <span class="label-text">"Name"</span>
                        </label>
                        <input
                            id="label"
                            type="text"
                            placeholder=entity_noun(kind)
                            on:input=move |ev| label.set(event_target_value(&ev))
                            prop:value=label
                            class="input input-bordered w-full"
                        />
                        <FieldError errors=errors field="label" />
                    </div>

                    <div class="form-control">
                        <label class="label" for="description">
                            <span class="label-text">"Description"</span>
                            <span class="label-text-alt">"optional"</span>
                        </label>
                        <textarea
                            id="description"
                            rows="3"
                            on:input=move |ev| description.set(event_target_value(&ev))
                            prop:value=description
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                    </div>

                    <div class="card-actions justify-end mt-6">
                        <Link to=AppRoute::list_of(kind) class="btn btn-ghost">"Cancel"</Link>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Shell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_is_not_sent() {
        let entity = build_entity("Feira".into(), "   ");
        assert_eq!(entity.label, "Feira");
        assert!(entity.fields.is_empty());

        let entity = build_entity("Feira".into(), " Sábados ");
        assert_eq!(
            entity.fields.get("description"),
            Some(&serde_json::json!("Sábados"))
        );
    }
}
