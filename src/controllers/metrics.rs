use actix_web::{get, web, HttpResponse, Responder};

use crate::config::{
    METRICS_ACCURACY, METRICS_F1_SCORE, METRICS_LAST_TRAINED, METRICS_MODEL_NAME,
    METRICS_TRAINING_SAMPLES,
};
use crate::models::{MetricsResponse, GENRE_COUNT};
use crate::services::prediction::PredictionService;

/// 模型指标
///
/// 训练时的离线评估结果，固定值；`demo_mode` 表示当前是否未加载训练模型。
#[utoipa::path(
    get,
    path = "/api/metrics",
    tag = "Model",
    responses(
        (status = 200, description = "模型指标", body = MetricsResponse)
    )
)]
#[get("/metrics")]
pub async fn get_model_metrics(prediction_service: web::Data<PredictionService>) -> impl Responder {
    HttpResponse::Ok().json(MetricsResponse {
        model_name: METRICS_MODEL_NAME.to_string(),
        accuracy: METRICS_ACCURACY,
        f1_score: METRICS_F1_SCORE,
        training_samples: METRICS_TRAINING_SAMPLES,
        last_trained: METRICS_LAST_TRAINED.to_string(),
        genres_supported: GENRE_COUNT,
        demo_mode: !prediction_service.model_loaded(),
    })
}
