use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

use crate::config::API_VERSION;
use crate::models::HealthResponse;
use crate::services::prediction::PredictionService;

/// 健康检查端点
///
/// 返回服务状态以及训练模型是否已加载。
/// 主要供外部监控系统（如 systemd, Kubernetes）使用。
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Status",
    responses(
        (status = 200, description = "服务健康", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health_check(prediction_service: web::Data<PredictionService>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: prediction_service.model_loaded(),
        timestamp: Utc::now().to_rfc3339(),
        version: API_VERSION.to_string(),
    })
}
