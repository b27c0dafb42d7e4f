use crate::components::field_error::FieldError;
use crate::validation::{FieldErrors, MIN_PASSWORD_LEN, validate_new_password};
use leptos::prelude::*;

/// 设置新密码（链接校验通过后打开）
#[component]
pub fn ResetPasswordDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] busy: Signal<bool>,
    /// 通过校验的新密码
    #[prop(into)]
    on_submit: Callback<String>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());

    let handle_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        match validate_new_password(&password.get_untracked(), &confirmation.get_untracked()) {
            Ok(new_password) => {
                errors.set(FieldErrors::new());
                password.set(String::new());
                confirmation.set(String::new());
                on_submit.run(new_password);
            }
            Err(e) => errors.set(e),
        }
    };

    view! {
        <Show when=move || open.get()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"Choose a new password"</h3>
                    <p class="py-4 text-base-content/70">
                        {format!("Use at least {} characters.", MIN_PASSWORD_LEN)}
                    </p>

                    <form on:submit=handle_submit class="space-y-4">
                        <div class="form-control">
                            <label for="new_password" class="label">
                                <span class="label-text">"New password"</span>
                            </label>
                            <input
                                id="new_password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered w-full"
                            />
                            <FieldError errors=errors field="password" />
                        </div>
                        <div class="form-control">
                            <label for="confirmation" class="label">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="confirmation"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| confirmation.set(event_target_value(&ev))
                                prop:value=confirmation
                                class="input input-bordered w-full"
                            />
                            <FieldError errors=errors field="confirmation" />
                        </div>

                        <div class="modal-action">
                            <button type="button" class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                                "Cancel"
                            </button>
                            <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                                {move || if busy.get() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                } else {
                                    "Change password".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
