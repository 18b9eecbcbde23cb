use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::TestId;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flash = use_hook(|| ctx.take_flash());
    let mut test_input = use_signal(|| {
        ctx.launch_test_id()
            .map(|id| id.to_string())
            .unwrap_or_default()
    });
    let mut input_error = use_signal(|| None::<String>);

    let launch = use_hook(|| ctx.take_launch_test());
    use_effect(move || {
        if let Some(test_id) = launch {
            navigator.push(Route::TakeTest {
                test_id: test_id.value(),
            });
        }
    });

    let on_start = move |_: MouseEvent| match test_input.read().parse::<TestId>() {
        Ok(test_id) => {
            input_error.set(None);
            navigator.push(Route::TakeTest {
                test_id: test_id.value(),
            });
        }
        Err(err) => input_error.set(Some(err.to_string())),
    };

    rsx! {
        div { class: "page dashboard",
            h2 { "Start a test" }
            if let Some(message) = flash.as_deref() {
                p { class: "banner info", "{message}" }
            }
            div { class: "start-form",
                label { r#for: "test-id", "Test number" }
                input {
                    id: "test-id",
                    r#type: "text",
                    value: "{test_input}",
                    oninput: move |evt: FormEvent| test_input.set(evt.value()),
                }
                button { class: "btn primary", id: "start-test", onclick: on_start, "Start" }
            }
            if let Some(error) = input_error() {
                p { class: "field-error", "{error}" }
            }
            p { class: "hint",
                "Answers are saved automatically every 30 seconds. "
                "When the timer reaches zero your answers are submitted for you."
            }
        }
    }
}
