use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors of the registration routes. Responses are plain text meant for a browser.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Registration session expired or invalid.")]
    UnknownState,

    #[error(transparent)]
    Core(#[from] efb_core::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            WebError::UnknownState => StatusCode::FORBIDDEN,
            WebError::Core(e) => e
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(match e {
                    efb_core::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                }),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            WebError::Core(e) => match e.user_message() {
                Some(m) => m.to_string(),
                None => {
                    error!(error = %e, "registration request failed");
                    "Internal server error".to_string()
                }
            },
            other => other.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_core_errors_to_statuses() {
        assert_eq!(
            WebError::from(efb_core::Error::invalid_code()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            WebError::from(efb_core::Error::InvalidInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::from(efb_core::Error::External("sso down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(WebError::UnknownState.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            WebError::MissingParameter("code").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
