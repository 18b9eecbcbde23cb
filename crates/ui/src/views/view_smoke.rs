use exam_core::model::{SubmissionResult, TestId};

use super::test_harness::{
    SEEDED_TEST, ViewKind, seeded_test, setup_app_harness, setup_view_harness,
};
use crate::vm::CompletedTest;

#[tokio::test]
async fn dashboard_renders_start_form() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, None);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Start a test"), "missing heading: {html}");
    assert!(html.contains("start-test"), "missing start button: {html}");
}

#[tokio::test]
async fn take_test_shows_loading_then_first_question() {
    let mut harness = setup_view_harness(ViewKind::TakeTest(1), None);
    harness.rebuild();
    assert!(harness.render().contains("Loading test..."));

    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("European Capitals"), "missing title: {html}");
    assert!(html.contains("What is the capital of France?"), "missing prompt: {html}");
    assert!(html.contains("Question 1 of 2"), "missing position: {html}");
    assert!(html.contains("1 of 2 answered"), "restored answer not counted: {html}");
    assert!(html.contains("20:00") || html.contains("19:59"), "missing timer: {html}");
    assert_eq!(harness.backend.submit_calls(), 0);
}

#[tokio::test]
async fn missing_test_returns_to_dashboard_with_reason() {
    let mut harness = setup_app_harness(Some(TestId::new(404)));
    harness.rebuild();
    for _ in 0..6 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("Start a test"), "not back on the dashboard: {html}");
    assert!(
        html.contains("This test could not be loaded: not found"),
        "missing flash: {html}"
    );
    assert!(!html.contains("error-panel"), "stayed on the test page: {html}");
    assert_eq!(harness.backend.submit_calls(), 0);
}

#[tokio::test]
async fn launch_test_opens_from_the_dashboard() {
    let mut harness = setup_app_harness(Some(SEEDED_TEST));
    harness.rebuild();
    for _ in 0..6 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("European Capitals"), "test not opened: {html}");
    assert!(html.contains("Question 1 of 2"), "missing position: {html}");
}

#[tokio::test]
async fn results_without_submission_prompts_to_start() {
    let mut harness = setup_view_harness(ViewKind::Results, None);
    harness.rebuild();
    assert!(harness.render().contains("No test has been submitted yet."));
}

#[tokio::test]
async fn results_show_the_recorded_grade() {
    let test = seeded_test();
    let completed = CompletedTest::new(
        &test,
        &[(test.questions()[0].id(), "Paris".to_string())]
            .into_iter()
            .collect(),
        SubmissionResult::from_score(1.0, 2.0),
    );
    let mut harness = setup_view_harness(ViewKind::Results, Some(completed));
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("European Capitals"), "missing title: {html}");
    assert!(html.contains("50.0%"), "missing percentage: {html}");
    assert!(html.contains("Not passed"), "missing verdict: {html}");
    assert!(html.contains("1 of 2 answered"));
}
