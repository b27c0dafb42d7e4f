use crate::components::field_error::FieldError;
use crate::validation::{FieldErrors, validate_recovery_email};
use leptos::prelude::*;

/// 找回密码：输入邮箱并请求发送找回邮件
#[component]
pub fn ForgotPasswordDialog(
    open: RwSignal<bool>,
    #[prop(into)] busy: Signal<bool>,
    /// 通过校验的邮箱地址
    #[prop(into)]
    on_send: Callback<String>,
) -> impl IntoView {
    let email = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());

    let close = move || {
        open.set(false);
        errors.set(FieldErrors::new());
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        match validate_recovery_email(&email.get_untracked()) {
            Ok(address) => {
                errors.set(FieldErrors::new());
                on_send.run(address);
            }
            Err(e) => errors.set(e),
        }
    };

    view! {
        <Show when=move || open.get()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"Recover password"</h3>
                    <p class="py-4 text-base-content/70">
                        "Enter your e-mail and we will send you a link to choose a new password."
                    </p>

                    <form on:submit=on_submit class="space-y-4">
                        <div class="form-control">
                            <label for="recovery_email" class="label">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="recovery_email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered w-full"
                            />
                            <FieldError errors=errors field="email" />
                        </div>

                        <div class="modal-action">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                                "Cancel"
                            </button>
                            <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                                {move || if busy.get() {
                                    view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                                } else {
                                    "Send link".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
