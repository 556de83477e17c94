use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("特征校验失败: {0}")]
    ValidationError(String),

    #[error("模型调用失败: {0}")]
    ScorerInvocation(String),

    #[error("模型输出格式错误: {0}")]
    MalformedScorerOutput(String),

    #[error("模型文件错误: {0}")]
    ArtifactError(String),

    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde JSON错误: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Serde YAML错误: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),

    #[error("内部错误: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::ScorerInvocation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scorer_invocation_error")
            }
            AppError::MalformedScorerOutput(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "malformed_scorer_output")
            }
            AppError::ArtifactError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "artifact_error"),
            AppError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            AppError::SerdeJsonError(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            AppError::SerdeYamlError(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_type) = self.kind();

        HttpResponse::build(status_code).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        })
    }
}
