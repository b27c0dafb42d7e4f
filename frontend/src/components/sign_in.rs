//! 登录页
//!
//! 同时承载密码找回流程：`/recovery/{mail}/{time}/{token}` 也渲染本页，
//! 挂载时校验一次链接，通过后打开设置新密码的对话框。

mod forgot_password_dialog;
mod reset_password_dialog;

use crate::AppState;
use crate::components::field_error::FieldError;
use crate::components::notice_bar::NoticeBar;
use crate::notice::Notice;
use crate::recovery::{self, RecoveryEvent, RecoveryState};
use crate::validation::{FieldErrors, validate_sign_in};
use crate::web::router::use_router;
use forgot_password_dialog::ForgotPasswordDialog;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use producer_point_shared::RecoveryLink;
use reset_password_dialog::ResetPasswordDialog;

/// 密码框的 `type` 与切换按钮文字
fn password_visibility(show: bool) -> (&'static str, &'static str) {
    if show {
        ("text", "Hide")
    } else {
        ("password", "Show")
    }
}

#[component]
pub fn SignInPage(
    state: AppState,
    /// 邮件中的找回链接（来自 URL）
    link: Option<RecoveryLink>,
) -> impl IntoView {
    let router = use_router();
    let auth = state.auth;

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let errors = RwSignal::new(FieldErrors::new());
    let notice = RwSignal::new(None::<Notice>);

    let recovery_state = RwSignal::new(RecoveryState::on_page_load(link));
    let recovery_busy = RwSignal::new(false);
    let forgot_open = RwSignal::new(false);

    // 找回事件统一在这里落地：迁移状态并弹出对应提示
    let dispatch = move |event: RecoveryEvent| {
        let next = recovery_state.with_untracked(|s| s.apply(event.clone()));
        match next {
            Ok(next) => recovery_state.set(next),
            Err(e) => {
                warn!("[Recovery] {}", e);
                return;
            }
        }
        if let Some(n) = event.notice() {
            notice.set(Some(n));
        }
    };

    // 登录失败的提示转为通知
    Effect::new(move |_| {
        if let Some(message) = auth.state().with(|s| s.error.clone()) {
            notice.set(Some(Notice::error(message)));
            auth.dismiss_error();
        }
    });

    // 带链接进入时校验一次
    if recovery_state.with_untracked(|s| s.pending_link().is_some()) {
        let api = auth.public_api();
        let snapshot = recovery_state.get_untracked();
        recovery_busy.set(true);
        spawn_local(async move {
            match recovery::validate_link(&api, &snapshot).await {
                Ok(event) => dispatch(event),
                Err(e) => warn!("[Recovery] {}", e),
            }
            recovery_busy.set(false);
        });
    }

    let on_send_email = Callback::new(move |address: String| {
        let api = auth.public_api();
        let snapshot = recovery_state.get_untracked();
        recovery_busy.set(true);
        spawn_local(async move {
            match recovery::send_email(&api, &snapshot, &address).await {
                Ok(event) => {
                    if event == RecoveryEvent::EmailAccepted {
                        forgot_open.set(false);
                    }
                    dispatch(event);
                }
                Err(e) => warn!("[Recovery] {}", e),
            }
            recovery_busy.set(false);
        });
    });

    let on_new_password = Callback::new(move |new_password: String| {
        let api = auth.public_api();
        let snapshot = recovery_state.get_untracked();
        recovery_busy.set(true);
        spawn_local(async move {
            match recovery::change_password(&api, &snapshot, &new_password).await {
                Ok(event) => dispatch(event),
                Err(e) => warn!("[Recovery] {}", e),
            }
            recovery_busy.set(false);
        });
    });

    let on_cancel_reset = Callback::new(move |_: ()| dispatch(RecoveryEvent::Restart));

    let open_forgot = move || {
        dispatch(RecoveryEvent::Restart);
        forgot_open.set(true);
    };

    let reset_open = Signal::derive(move || recovery_state.with(RecoveryState::shows_reset_form));
    let link_invalid = move || recovery_state.with(|s| *s == RecoveryState::Invalid);
    let validating = move || {
        recovery_busy.get() && recovery_state.with(|s| s.pending_link().is_some())
    };
    let is_loading = move || auth.state().with(|s| s.is_loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (address, secret) = (email.get_untracked(), password.get_untracked());
        if let Err(e) = validate_sign_in(&address, &secret) {
            errors.set(e);
            return;
        }
        errors.set(FieldErrors::new());
        auth.sign_in(address, secret, router);
    };

    view! {
        <NoticeBar notice=notice millis=state.notice_millis() />

        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Producer Point"</h1>
                    <p class="text-base-content/70">"Sign in to manage producers, products and activities"</p>
                </div>

                <Show when=validating>
                    <div role="status" class="alert text-sm py-2">
                        <span class="loading loading-spinner loading-sm"></span>
                        <span>"Checking your recovery link..."</span>
                    </div>
                </Show>

                <Show when=link_invalid>
                    <div role="alert" class="alert alert-warning text-sm py-2">
                        <span>"This recovery link is invalid or has expired."</span>
                        <button class="btn btn-sm" on:click=move |_| open_forgot()>
                            "Request a new link"
                        </button>
                    </div>
                </Show>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            <FieldError errors=errors field="email" />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="password"
                                    type=move || password_visibility(show_password.get()).0
                                    placeholder="••••••••"
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered join-item w-full"
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    aria-label="Toggle password visibility"
                                    on:click=move |_| show_password.update(|v| *v = !*v)
                                >
                                    {move || password_visibility(show_password.get()).1}
                                </button>
                            </div>
                            <FieldError errors=errors field="password" />
                            <label class="label">
                                <a
                                    href="#"
                                    class="label-text-alt link link-hover"
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        open_forgot();
                                    }
                                >
                                    "Forgot password?"
                                </a>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button type="submit" class="btn btn-primary" disabled=is_loading>
                                {move || if is_loading() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>

        <ForgotPasswordDialog open=forgot_open busy=recovery_busy on_send=on_send_email />
        <ResetPasswordDialog
            open=reset_open
            busy=recovery_busy
            on_submit=on_new_password
            on_cancel=on_cancel_reset
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_visibility_toggles_input_type() {
        assert_eq!(password_visibility(false), ("password", "Show"));
        assert_eq!(password_visibility(true), ("text", "Hide"));
    }
}
