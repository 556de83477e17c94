use utoipa::OpenApi;

use crate::controllers;
use crate::models::{
    AudioFeatures, BatchPredictionRequest, BatchPredictionResponse, Genre, GenresResponse,
    HealthResponse, MetricsResponse, PredictionResponse, TrackData,
};
use crate::utils::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Music Genre Classification API",
        description = "基于音频特征的多标签音乐流派分类服务"
    ),
    paths(
        controllers::health::health_check,
        controllers::genre::get_available_genres,
        controllers::metrics::get_model_metrics,
        controllers::prediction::predict_genres,
        controllers::prediction::predict_genres_batch,
    ),
    components(schemas(
        AudioFeatures,
        TrackData,
        Genre,
        PredictionResponse,
        BatchPredictionRequest,
        BatchPredictionResponse,
        HealthResponse,
        GenresResponse,
        MetricsResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Status", description = "服务状态"),
        (name = "Model", description = "模型信息"),
        (name = "Prediction", description = "流派预测")
    )
)]
pub struct ApiDoc;
