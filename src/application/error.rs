use std::{borrow::Cow, error::Error as StdError};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{og::OgError, repos::RepoError},
    config::LoadError,
    infra::error::InfraError,
};

/// Diagnostic detail attached to error responses and consumed by the response logger.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Plain-text error response with a public body and a private report.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: Cow<'static, str>,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: impl Into<Cow<'static, str>>,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport::from_message(source, status, detail);
        Self {
            status,
            public_message: public_message.into(),
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: impl Into<Cow<'static, str>>,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message: public_message.into(),
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn into_report(self) -> ErrorReport {
        self.report
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message.into_owned()).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<RepoError> for HttpError {
    fn from(error: RepoError) -> Self {
        HttpError::from_error(
            "infra::http::repo_error_to_http_error",
            StatusCode::SERVICE_UNAVAILABLE,
            "Job listings are temporarily unavailable",
            &error,
        )
    }
}

impl From<OgError> for HttpError {
    fn from(error: OgError) -> Self {
        const SOURCE: &str = "infra::http::og_error_to_http_error";
        match &error {
            OgError::Disabled => HttpError::new(
                SOURCE,
                StatusCode::NOT_FOUND,
                "OG image generation is disabled in config",
                "OG image generation is disabled in config",
            ),
            OgError::Render(inner) => HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate OG image: {inner}"),
                &error,
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Og(#[from] OgError),
    #[error("resource not found")]
    NotFound,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Og(OgError::Disabled) => StatusCode::NOT_FOUND,
            AppError::Repo(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Infra(_)
            | AppError::Og(OgError::Render(_))
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn presentation_message(&self) -> &'static str {
        match self {
            AppError::NotFound => "Resource not found",
            AppError::Og(OgError::Disabled) => "OG image generation is disabled in config",
            AppError::Repo(_) => "Service temporarily unavailable",
            AppError::Config(_) => "Service misconfigured",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Infra(_) => "I/O failure during request",
            AppError::Og(OgError::Render(_)) | AppError::Unexpected(_) => {
                "Unexpected error occurred"
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.presentation_message();
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, message).into_response();
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::og::RenderError;

    #[test]
    fn report_collects_error_chain() {
        let error = AppError::from(OgError::Render(RenderError::Raster("bad svg".into())));
        let report = ErrorReport::from_error("tests", StatusCode::INTERNAL_SERVER_ERROR, &error);
        assert!(report.messages[0].contains("bad svg"));
    }

    #[test]
    fn disabled_og_maps_to_not_found() {
        let response = HttpError::from(OgError::Disabled).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }

    #[test]
    fn render_failure_maps_to_server_error() {
        let error = HttpError::from(OgError::Render(RenderError::Raster("boom".into())));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
