use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("ログイン認証に失敗しました")]
    InvalidCredentials,
    #[error("認証情報が確認できませんでした")]
    UnauthenticatedError,
    #[error("{0}")]
    AuthorizationDenied(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    DuplicateIdentity(String),
    #[error("{0}")]
    SlotConflict(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("トランザクションを実行できませんでした")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理の実行中にエラーが発生しました")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::InvalidInput(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::UnauthenticatedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateIdentity(_) | AppError::SlotConflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }

        status_code.into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
