use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use exam_core::model::{AnswerMap, SubmissionResult, Test, TestId};

use super::config::ApiConfig;
use super::wire::{AnswersBody, SubmissionDto, TestDto, parse_saved_answers};
use crate::error::ApiError;
use crate::provider::{ProgressSink, TestContentProvider};

/// HTTP implementation of [`TestContentProvider`] and [`ProgressSink`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.config.endpoint(path)?;
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        Ok(match self.config.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(map_transport)?;
        check_status(response.status())?;
        Ok(response)
    }
}

fn test_path(test_id: TestId, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("student/tests/{test_id}")
    } else {
        format!("student/tests/{test_id}/{suffix}")
    }
}

fn map_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err)
    }
}

fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        other => ApiError::HttpStatus(other),
    })
}

#[async_trait]
impl TestContentProvider for ApiClient {
    async fn fetch_test(&self, test_id: TestId) -> Result<Test, ApiError> {
        let builder = self.request(Method::GET, &test_path(test_id, ""))?;
        let response = Self::send(builder).await?;
        let dto: TestDto = response.json().await.map_err(map_transport)?;
        dto.into_test()
    }

    async fn fetch_saved_answers(&self, test_id: TestId) -> Result<AnswerMap, ApiError> {
        let builder = self.request(Method::GET, &test_path(test_id, "answers"))?;
        let response = match Self::send(builder).await {
            Ok(response) => response,
            Err(ApiError::NotFound) => return Ok(AnswerMap::default()),
            Err(err) => return Err(err),
        };
        let body = response.text().await.map_err(map_transport)?;
        parse_saved_answers(&body)
            .map_err(|err| ApiError::Unavailable(format!("malformed saved answers: {err}")))
    }
}

#[async_trait]
impl ProgressSink for ApiClient {
    async fn save_progress(&self, test_id: TestId, answers: &AnswerMap) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &test_path(test_id, "save"))?
            .json(&AnswersBody { answers });
        Self::send(builder).await?;
        Ok(())
    }

    async fn submit_test(
        &self,
        test_id: TestId,
        answers: &AnswerMap,
    ) -> Result<SubmissionResult, ApiError> {
        let builder = self
            .request(Method::POST, &test_path(test_id, "submit"))?
            .json(&AnswersBody { answers });
        let response = Self::send(builder).await?;
        let body = response.text().await.map_err(map_transport)?;

        // The submission is accepted at this point; an unreadable body only loses the score.
        let dto = if body.trim().is_empty() {
            SubmissionDto::default()
        } else {
            serde_json::from_str::<SubmissionDto>(&body).unwrap_or_else(|err| {
                tracing::debug!(error = %err, %test_id, "Unreadable submission response body");
                SubmissionDto::default()
            })
        };
        Ok(dto.into_result())
    }
}
