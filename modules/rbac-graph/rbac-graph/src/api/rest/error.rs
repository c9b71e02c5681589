use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Problem details body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            title: title.into(),
            detail: detail.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// RFC 9457 media type for [`Problem`] bodies.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            Json(self),
        )
            .into_response()
    }
}

/// Convert domain errors to HTTP Problem responses
#[must_use]
pub fn domain_error_to_problem(err: &DomainError) -> Problem {
    let detail = err.to_string();
    match err {
        DomainError::ClusterRead { .. } => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Cluster Read Failed",
            detail,
        ),
        DomainError::InvalidRequest { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Request", detail)
        }
        DomainError::EmptyInput => Problem::new(StatusCode::BAD_REQUEST, "Empty Input", detail),
        DomainError::InvalidYaml { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid YAML", detail)
        }
        DomainError::EmptyObject => Problem::new(StatusCode::BAD_REQUEST, "Empty Object", detail),
        DomainError::UnsupportedKind { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Unsupported Resource Type", detail)
        }
        DomainError::InvalidBinding { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Binding", detail)
        }
    }
}

/// Implement Into<Problem> for `DomainError` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use rbac_graph_sdk::{BindingKind, ClusterReadError};

    #[test]
    fn client_errors_map_to_bad_request() {
        let problem = Problem::from(DomainError::UnsupportedKind {
            kind: "ConfigMap".to_owned(),
        });
        assert_eq!(problem.status, 400);
        assert_eq!(problem.detail, "unsupported resource type: ConfigMap");
    }

    #[test]
    fn response_uses_problem_media_type() {
        let response = Problem::from(DomainError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }

    #[test]
    fn cluster_errors_map_to_internal_error() {
        let problem = Problem::from(DomainError::cluster_read(
            BindingKind::GlobalRoleBinding,
            ClusterReadError::Transport("connection refused".to_owned()),
        ));
        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "Cluster Read Failed");
        assert!(problem.detail.contains("GlobalRoleBinding"));
    }
}
