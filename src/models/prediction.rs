use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Genre, GenreProbabilities, TrackData};

/// 单首歌曲的预测结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredictionResponse {
    /// 歌曲名
    pub track: String,
    /// 艺术家
    pub artists: String,
    /// 全部 10 个流派的概率
    #[schema(value_type = Object, example = json!({"pop": 0.85, "rock": 0.12, "electronic": 0.67}))]
    pub predictions: GenreProbabilities,
    /// 概率大于 0.5 的流派
    pub top_genres: Vec<Genre>,
    /// 综合置信度
    pub confidence: f64,
    /// 产生结果的模型版本，演示模式为 DEMO-MODE
    pub model_version: String,
    /// ISO-8601 时间戳
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchPredictionRequest {
    pub tracks: Vec<TrackData>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResponse>,
    pub total_tracks: usize,
    pub average_confidence: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

/// 模型离线评估指标
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub model_name: String,
    pub accuracy: f64,
    pub f1_score: f64,
    pub training_samples: u64,
    pub last_trained: String,
    pub genres_supported: usize,
    /// 未加载训练模型时为 true
    pub demo_mode: bool,
}
