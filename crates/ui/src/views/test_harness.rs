use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::{AnswerMap, Question, QuestionId, Test, TestId};
use exam_core::time::fixed_now;
use services::{Clock, InMemoryBackend, TestSessionService};

use crate::context::{UiApp, build_app_context};
use crate::routes::Route;
use crate::views::{DashboardView, ResultsView, TakeTestView};
use crate::vm::CompletedTest;

pub const SEEDED_TEST: TestId = TestId::new(1);

#[derive(Clone)]
struct TestApp {
    test_sessions: Arc<TestSessionService>,
    launch_test_id: Option<TestId>,
}

impl UiApp for TestApp {
    fn test_sessions(&self) -> Arc<TestSessionService> {
        Arc::clone(&self.test_sessions)
    }

    fn launch_test_id(&self) -> Option<TestId> {
        self.launch_test_id
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    TakeTest(u64),
    Results,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    seeded_result: Option<CompletedTest>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let seeded = props.seeded_result.clone();
    use_context_provider(|| {
        let ctx = build_app_context(&app);
        if let Some(completed) = seeded {
            ctx.record_result(completed);
        }
        ctx
    });
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Props, Clone)]
struct AppRouterProps {
    app: Arc<TestApp>,
}

impl PartialEq for AppRouterProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Mounts the application's own router, starting on the dashboard.
#[component]
fn AppRouterHarness(props: AppRouterProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { Router::<Route> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::TakeTest(test_id) => rsx! { TakeTestView { test_id } },
        ViewKind::Results => rsx! { ResultsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: Arc<InMemoryBackend>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn seeded_test() -> Test {
    let questions = vec![
        Question::new(
            QuestionId::new(11),
            "What is the capital of France?",
            None,
            vec!["Paris".into(), "Lyon".into(), "Nice".into()],
        )
        .expect("valid question"),
        Question::new(
            QuestionId::new(12),
            "Which river flows through Rome?",
            None,
            vec!["Tiber".into(), "Po".into()],
        )
        .expect("valid question"),
    ];
    Test::new(SEEDED_TEST, "European Capitals", "Geography", 20, questions).expect("valid test")
}

fn seeded_app(launch_test_id: Option<TestId>) -> (Arc<TestApp>, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert_test(seeded_test());
    backend.seed_saved_answers(
        SEEDED_TEST,
        [(QuestionId::new(11), "Paris".to_string())]
            .into_iter()
            .collect::<AnswerMap>(),
    );

    let service = TestSessionService::new(
        Clock::fixed(fixed_now()),
        backend.clone(),
        backend.clone(),
    );
    let app = Arc::new(TestApp {
        test_sessions: Arc::new(service),
        launch_test_id,
    });
    (app, backend)
}

pub fn setup_view_harness(view: ViewKind, seeded_result: Option<CompletedTest>) -> ViewHarness {
    let (app, backend) = seeded_app(None);
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            seeded_result,
        },
    );

    ViewHarness { dom, backend }
}

/// Full application routing; `launch_test_id` is opened from the dashboard.
pub fn setup_app_harness(launch_test_id: Option<TestId>) -> ViewHarness {
    let (app, backend) = seeded_app(launch_test_id);
    let dom = VirtualDom::new_with_props(AppRouterHarness, AppRouterProps { app });
    ViewHarness { dom, backend }
}
