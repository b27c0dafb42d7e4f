use crate::notice::Notice;
use leptos::prelude::*;
use std::time::Duration;

/// 右上角的短暂通知
///
/// 每次设置新通知都会重新计时，`millis` 毫秒后自动关闭。
#[component]
pub fn NoticeBar(notice: RwSignal<Option<Notice>>, millis: u32) -> impl IntoView {
    let pending = StoredValue::new(None::<TimeoutHandle>);

    Effect::new(move |_| {
        if notice.with(Option::is_none) {
            return;
        }
        // 上一条通知的计时器作废
        if let Some(handle) = pending.get_value() {
            handle.clear();
        }
        let handle = set_timeout_with_handle(
            move || notice.set(None),
            Duration::from_millis(u64::from(millis)),
        )
        .ok();
        pending.set_value(handle);
    });

    let alert_class = move || {
        if notice.with(|n| n.as_ref().is_some_and(Notice::is_error)) {
            "alert alert-error shadow-lg"
        } else {
            "alert alert-success shadow-lg"
        }
    };

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div role="alert" class=alert_class>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.message.clone()))}</span>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| notice.set(None)>
                        "✕"
                    </button>
                </div>
            </div>
        </Show>
    }
}
