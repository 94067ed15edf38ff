use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::catalog::CatalogError;

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            CatalogError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
