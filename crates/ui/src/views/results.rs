use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::map_results;

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let vm = use_hook(|| ctx.last_result().as_ref().map(map_results));

    let Some(vm) = vm else {
        return rsx! {
            div { class: "page results",
                h2 { "Results" }
                p { "No test has been submitted yet." }
                Link { to: Route::Dashboard {}, "Back to dashboard" }
            }
        };
    };

    rsx! {
        div { class: "page results",
            h2 { "{vm.title}" }
            p { class: "subject", "{vm.subject}" }
            p { class: "{vm.verdict_class}", "{vm.verdict}" }
            dl { class: "result-grid",
                if let Some(score) = vm.score_label.clone() {
                    dt { "Score" }
                    dd { "{score}" }
                }
                if let Some(percentage) = vm.percentage_label.clone() {
                    dt { "Percentage" }
                    dd { "{percentage}" }
                }
                if let Some(grade) = vm.grade_label.clone() {
                    dt { "Grade" }
                    dd { "{grade}" }
                }
                dt { "Answered" }
                dd { "{vm.answered_label}" }
            }
            if let Some(message) = vm.message.clone() {
                p { class: "result-message", "{message}" }
            }
            Link { to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}
