use crate::validation::FieldErrors;
use leptos::prelude::*;

/// 输入框下方的内联校验错误
#[component]
pub fn FieldError(errors: RwSignal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors
            .with(|e| e.get(field).map(str::to_string))
            .map(|message| {
                view! {
                    <label class="label">
                        <span class="label-text-alt text-error">{message}</span>
                    </label>
                }
            })
    }
}
