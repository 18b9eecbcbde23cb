mod answers;
mod grade;
mod ids;
mod question;

pub use answers::{AnswerMap, FlaggedSet};
pub use grade::{Grade, PASSING_PERCENTAGE, SubmissionResult, percentage};
pub use ids::{ParseIdError, QuestionId, SessionId, TestId};
pub use question::{Question, QuestionError};
pub use test::{Test, TestError};
