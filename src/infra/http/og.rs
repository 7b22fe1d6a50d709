//! `/api/og` image endpoints.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::application::{
    error::HttpError,
    og::{OgError, OgImage},
};

use super::HttpState;

const SOURCE: &str = "infra::http::og";

pub async fn home_image(State(state): State<HttpState>) -> Response {
    match state.og.home_image().await {
        Ok(image) => png_response(image),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub async fn job_image(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    if !state.og.job_enabled() {
        return HttpError::from(OgError::Disabled).into_response();
    }

    let job = match state.jobs.find_job(&id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return HttpError::new(
                SOURCE,
                StatusCode::NOT_FOUND,
                "Job not found",
                format!("no active job with id `{id}`"),
            )
            .into_response();
        }
        Err(err) => return err.into_response(),
    };

    match state.og.job_image(&job).await {
        Ok(image) => png_response(image),
        Err(err) => HttpError::from(err).into_response(),
    }
}

fn png_response(image: OgImage) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, OgImage::CONTENT_TYPE)
        .header(CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(image.png))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
