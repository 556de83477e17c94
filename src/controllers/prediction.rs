use actix_web::{post, web, HttpResponse};

use crate::models::{BatchPredictionRequest, BatchPredictionResponse, PredictionResponse, TrackData};
use crate::services::prediction::PredictionService;
use crate::utils::error::{AppError, AppResult, ErrorResponse};

/// 预测单首歌曲的流派
///
/// 已加载训练模型时使用模型输出，否则（或模型调用失败时）使用启发式规则，
/// 通过 `model_version` 区分。
#[utoipa::path(
    post,
    path = "/api/predict",
    tag = "Prediction",
    request_body = TrackData,
    responses(
        (status = 200, description = "预测成功", body = PredictionResponse),
        (status = 400, description = "请求格式错误，或严格校验下特征越界", body = ErrorResponse)
    )
)]
#[post("/predict")]
pub async fn predict_genres(
    track: web::Json<TrackData>,
    prediction_service: web::Data<PredictionService>,
) -> AppResult<HttpResponse> {
    log::info!("收到预测请求: '{}' - {}", track.track_name, track.artists);

    let result = prediction_service.predict(&track)?;

    Ok(HttpResponse::Ok().json(result))
}

/// 批量预测
///
/// 每首歌独立预测，返回顺序与请求顺序一致，并附带平均置信度。
#[utoipa::path(
    post,
    path = "/api/predict/batch",
    tag = "Prediction",
    request_body = BatchPredictionRequest,
    responses(
        (status = 200, description = "预测成功", body = BatchPredictionResponse),
        (status = 400, description = "请求格式错误，或严格校验下特征越界", body = ErrorResponse)
    )
)]
#[post("/predict/batch")]
pub async fn predict_genres_batch(
    req: web::Json<BatchPredictionRequest>,
    prediction_service: web::Data<PredictionService>,
) -> AppResult<HttpResponse> {
    let tracks = req.into_inner().tracks;
    log::info!("收到批量预测请求: {} 首", tracks.len());

    // CPU 计算放到阻塞线程池，避免占用 worker
    let service = prediction_service.into_inner();
    let result = web::block(move || service.predict_batch(&tracks))
        .await
        .map_err(|e| AppError::InternalError(format!("批量预测任务失败: {e}")))??;

    Ok(HttpResponse::Ok().json(result))
}
