use dioxus::prelude::*;
use dioxus::dioxus_core::spawn_forever;
use dioxus_router::{Link, use_navigator};

use exam_core::model::{QuestionId, TestId};
use services::SessionState;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewState;
use crate::vm::{
    CompletedTest, OptionVm, QuestionVm, TakeTestVm, leave_flash, load_failure_flash,
    take_test_state,
};

#[component]
pub fn TakeTestView(test_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let service = use_hook(|| ctx.test_sessions());
    let handle = use_hook(|| service.begin(TestId::new(test_id)));
    let mut snapshot = use_signal(|| handle.snapshot());

    {
        let service = service.clone();
        let handle = handle.clone();
        use_future(move || {
            let service = service.clone();
            let handle = handle.clone();
            async move {
                let mut updates = handle.subscribe();
                // A failed load is reported through the snapshot.
                let _ = service.load(&handle).await;
                snapshot.set(handle.snapshot());
                while updates.changed().await.is_ok() {
                    let latest = updates.borrow_and_update().clone();
                    snapshot.set(latest);
                }
            }
        });
    }

    {
        let handle = handle.clone();
        use_drop(move || {
            spawn_forever(async move {
                let _ = handle.close().await;
            });
        });
    }

    {
        let ctx = ctx.clone();
        use_effect(move || {
            let current = snapshot.read();
            if current.state != SessionState::Submitted {
                return;
            }
            if let (Some(test), Some(result)) = (current.test.as_deref(), current.result.clone()) {
                ctx.record_result(CompletedTest::new(test, &current.answers, result));
                navigator.replace(Route::Results {});
            }
        });
    }

    {
        let ctx = ctx.clone();
        use_effect(move || {
            if let Some(message) = load_failure_flash(&snapshot.read()) {
                ctx.set_flash(message);
                navigator.replace(Route::Dashboard {});
            }
        });
    }

    let on_answer = {
        let handle = handle.clone();
        use_callback(move |(question, option): (QuestionId, String)| {
            handle.set_answer(question, option);
        })
    };
    let on_go_to = {
        let handle = handle.clone();
        use_callback(move |index: usize| handle.go_to(index))
    };
    let on_toggle_flag = {
        let handle = handle.clone();
        use_callback(move |index: usize| {
            let _ = handle.toggle_flag(index);
        })
    };
    let on_previous = {
        let handle = handle.clone();
        use_callback(move |()| handle.previous())
    };
    let on_next = {
        let handle = handle.clone();
        use_callback(move |()| handle.next())
    };
    let on_save = {
        let handle = handle.clone();
        use_callback(move |()| {
            let handle = handle.clone();
            spawn(async move {
                // Outcome shows up as a notice.
                let _ = handle.save_now().await;
            });
        })
    };
    let on_request_submit = {
        let handle = handle.clone();
        use_callback(move |()| {
            let _ = handle.request_manual_submit();
        })
    };
    let on_cancel_submit = {
        let handle = handle.clone();
        use_callback(move |()| handle.cancel_submit())
    };
    let on_confirm_submit = {
        let handle = handle.clone();
        use_callback(move |()| {
            let handle = handle.clone();
            spawn(async move {
                let _ = handle.confirm_submit().await;
            });
        })
    };
    let on_dismiss = {
        let handle = handle.clone();
        use_callback(move |()| handle.clear_notice())
    };
    let on_leave = {
        let ctx = ctx.clone();
        let handle = handle.clone();
        use_callback(move |()| {
            let ctx = ctx.clone();
            let handle = handle.clone();
            spawn(async move {
                let outcome = handle.close().await;
                ctx.set_flash(leave_flash(&outcome));
                navigator.push(Route::Dashboard {});
            });
        })
    };

    let state = take_test_state(&snapshot.read());

    rsx! {
        div { class: "page take-test",
            match state {
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading test..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        p { "{err.message()}" }
                        Link { to: Route::Dashboard {}, "Back to dashboard" }
                    }
                },
                ViewState::Ready(vm) => rsx! {
                    TestPane {
                        vm,
                        on_answer,
                        on_go_to,
                        on_toggle_flag,
                        on_previous,
                        on_next,
                        on_save,
                        on_request_submit,
                        on_cancel_submit,
                        on_confirm_submit,
                        on_dismiss,
                        on_leave,
                    }
                },
            }
        }
    }
}

#[component]
fn TestPane(
    vm: TakeTestVm,
    on_answer: Callback<(QuestionId, String)>,
    on_go_to: Callback<usize>,
    on_toggle_flag: Callback<usize>,
    on_previous: Callback<()>,
    on_next: Callback<()>,
    on_save: Callback<()>,
    on_request_submit: Callback<()>,
    on_cancel_submit: Callback<()>,
    on_confirm_submit: Callback<()>,
    on_dismiss: Callback<()>,
    on_leave: Callback<()>,
) -> Element {
    let timer_class = if vm.low_time { "timer low" } else { "timer" };
    let fill_style = format!("width: {:.0}%", vm.progress_percent);
    let editable = vm.editable;

    rsx! {
        header { class: "test-header",
            div {
                h2 { "{vm.title}" }
                p { class: "subject", "{vm.subject}" }
            }
            span { class: "{timer_class}", id: "test-timer", "{vm.timer_label}" }
        }
        if vm.low_time && editable {
            p { class: "banner warning", "Less than 5 minutes remaining." }
        }
        if let Some(banner) = vm.banner.clone() {
            div { class: "{banner.tone.class()}",
                span { "{banner.text}" }
                button { class: "btn link", onclick: move |_| on_dismiss.call(()), "Dismiss" }
            }
        }
        div { class: "progress",
            div { class: "progress-fill", style: "{fill_style}" }
        }
        p { class: "progress-label", "{vm.progress_label}" }

        div { class: "test-body",
            if let Some(question) = vm.question.clone() {
                QuestionCard { question, editable, on_answer, on_toggle_flag }
            }
            aside { class: "navigator",
                for cell in vm.navigator.iter().copied() {
                    button {
                        key: "{cell.index}",
                        class: "{cell.class()}",
                        onclick: move |_| on_go_to.call(cell.index),
                        "{cell.number()}"
                    }
                }
            }
        }

        footer { class: "test-actions",
            button {
                class: "btn",
                id: "prev-question",
                disabled: !vm.can_previous,
                onclick: move |_| on_previous.call(()),
                "Previous"
            }
            button {
                class: "btn",
                id: "next-question",
                disabled: !vm.can_next,
                onclick: move |_| on_next.call(()),
                "Next"
            }
            span { class: "save-status", "{vm.save_status}" }
            button {
                class: "btn",
                id: "save-progress",
                disabled: !editable,
                onclick: move |_| on_save.call(()),
                "Save Progress"
            }
            button {
                class: "btn",
                id: "leave-test",
                disabled: !editable,
                onclick: move |_| on_leave.call(()),
                "Save & Exit"
            }
            button {
                class: "btn primary",
                id: "submit-test",
                disabled: !editable,
                onclick: move |_| on_request_submit.call(()),
                if vm.submitting { "Submitting..." } else { "Submit Test" }
            }
        }

        if let Some(confirm) = vm.confirm.clone() {
            div { class: "modal-backdrop",
                div { class: "modal", role: "dialog",
                    h3 { "Submit test?" }
                    p { "{confirm.message}" }
                    p { class: "hint", "{confirm.answered} answered, {confirm.unanswered} unanswered" }
                    div { class: "modal-actions",
                        button { class: "btn", onclick: move |_| on_cancel_submit.call(()), "Keep working" }
                        button {
                            class: "btn primary",
                            id: "confirm-submit",
                            onclick: move |_| on_confirm_submit.call(()),
                            "Submit"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuestionVm,
    editable: bool,
    on_answer: Callback<(QuestionId, String)>,
    on_toggle_flag: Callback<usize>,
) -> Element {
    let index = question.index;
    let group = format!("question-{}", question.id);

    rsx! {
        section { class: "question-card",
            div { class: "question-meta",
                span { "{question.number_label}" }
                button {
                    class: if question.flagged { "btn flag active" } else { "btn flag" },
                    onclick: move |_| on_toggle_flag.call(index),
                    if question.flagged { "Unflag" } else { "Flag for review" }
                }
            }
            p { class: "prompt", "{question.prompt}" }
            if let Some(src) = question.image.clone() {
                img { class: "question-image", src: "{src}", alt: "Question illustration" }
            }
            div { class: "options",
                for (position, option) in question.options.iter().cloned().enumerate() {
                    OptionRow {
                        key: "{position}",
                        question: question.id,
                        group: group.clone(),
                        option,
                        editable,
                        on_answer,
                    }
                }
            }
        }
    }
}

#[component]
fn OptionRow(
    question: QuestionId,
    group: String,
    option: OptionVm,
    editable: bool,
    on_answer: Callback<(QuestionId, String)>,
) -> Element {
    let value = option.label.clone();

    rsx! {
        label { class: if option.selected { "option selected" } else { "option" },
            input {
                r#type: "radio",
                name: "{group}",
                checked: option.selected,
                disabled: !editable,
                onchange: move |_| on_answer.call((question, value.clone())),
            }
            span { "{option.label}" }
        }
    }
}
