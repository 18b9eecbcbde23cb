use thiserror::Error;

use crate::model::{QuestionError, TestError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Test(#[from] TestError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
