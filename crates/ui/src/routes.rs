use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DashboardView, ResultsView, TakeTestView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/tests/:test_id", TakeTestView)] TakeTest { test_id: u64 },
        #[route("/results", ResultsView)] Results {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Exams" }
                nav {
                    Link { to: Route::Dashboard {}, "Dashboard" }
                    Link { to: Route::Results {}, "Last result" }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
