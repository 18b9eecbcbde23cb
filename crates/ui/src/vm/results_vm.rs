use exam_core::model::{AnswerMap, SubmissionResult, Test};

/// A finished attempt, kept for the results page.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedTest {
    pub title: String,
    pub subject: String,
    pub answered: usize,
    pub total: usize,
    pub result: SubmissionResult,
}

impl CompletedTest {
    #[must_use]
    pub fn new(test: &Test, answers: &AnswerMap, result: SubmissionResult) -> Self {
        Self {
            title: test.title().to_string(),
            subject: test.subject().to_string(),
            answered: answers.len(),
            total: test.question_count(),
            result,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub title: String,
    pub subject: String,
    pub answered_label: String,
    pub score_label: Option<String>,
    pub percentage_label: Option<String>,
    pub grade_label: Option<String>,
    pub verdict: &'static str,
    pub verdict_class: &'static str,
    pub message: Option<String>,
}

#[must_use]
pub fn map_results(completed: &CompletedTest) -> ResultsVm {
    let result = &completed.result;
    let scored = result.is_scored();
    let (verdict, verdict_class) = match (scored, result.passed) {
        (false, _) => ("Awaiting grading", "verdict pending"),
        (true, true) => ("Passed", "verdict passed"),
        (true, false) => ("Not passed", "verdict failed"),
    };
    ResultsVm {
        title: completed.title.clone(),
        subject: completed.subject.clone(),
        answered_label: format!("{} of {} answered", completed.answered, completed.total),
        score_label: result
            .score
            .zip(result.max_score)
            .map(|(score, max)| format!("{score} / {max}")),
        percentage_label: scored.then(|| format!("{:.1}%", result.percentage)),
        grade_label: scored.then(|| result.grade.label().to_string()),
        verdict,
        verdict_class,
        message: result.message.clone(),
    }
}
