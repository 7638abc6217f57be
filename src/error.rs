use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 피드 파이프라인 에러
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("네트워크 오류: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API 오류 ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("상품을 찾을 수 없습니다: {0}")]
    NotFound(String),

    #[error("알 수 없는 정렬 키: {0}")]
    InvalidSortKey(String),
}

impl FeedError {
    /// 사용자가 다시 시도할 수 있는 에러인지
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::Transport(_) | FeedError::Api { .. })
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = match self {
            FeedError::Transport(_) | FeedError::Api { .. } => StatusCode::BAD_GATEWAY,
            FeedError::NotFound(_) => StatusCode::NOT_FOUND,
            FeedError::InvalidSortKey(_) => StatusCode::BAD_REQUEST,
        };

        (
            status,
            axum::Json(serde_json::json!({
                "error": self.to_string(),
                "retryable": self.is_retryable()
            })),
        )
            .into_response()
    }
}
