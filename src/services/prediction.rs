use chrono::Utc;
use rayon::prelude::*;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{BatchPredictionResponse, GenreProbabilities, PredictionResponse, TrackData};
use crate::services::scorer::{self, FeatureScaler, GenreScorer};
use crate::utils::error::{AppError, AppResult};
use crate::utils::features::{describe_violations, validate_audio_features};
use crate::utils::genre_utils::{
    calculate_confidence, heuristic_predictions, normalize_predictions, select_top_genres,
    Normalization,
};

pub const DEMO_MODEL_VERSION: &str = "DEMO-MODE";

// 预测服务：训练模型可用时走训练路径，否则或失败时退回启发式
#[derive(Clone)]
pub struct PredictionService {
    scorer: Option<Arc<dyn GenreScorer>>,
    scaler: Option<FeatureScaler>,
    strict_validation: bool,
}

impl PredictionService {
    pub fn new(
        scorer: Option<Arc<dyn GenreScorer>>,
        scaler: Option<FeatureScaler>,
        strict_validation: bool,
    ) -> Self {
        Self {
            scorer,
            scaler,
            strict_validation,
        }
    }

    // 只用启发式的演示服务
    #[cfg(test)]
    pub fn demo() -> Self {
        Self::new(None, None, false)
    }

    // 按配置加载模型和标准化参数，缺失时退回演示模式
    pub fn from_config(config: &AppConfig) -> Self {
        let scorer = scorer::load_scorer_or_demo(&config.model_path);
        let scaler = scorer::load_scaler_or_default(&config.scaler_path);
        if config.strict_validation {
            log::info!("已开启严格特征校验");
        }
        Self::new(scorer, scaler, config.strict_validation)
    }

    pub fn model_loaded(&self) -> bool {
        self.scorer.is_some()
    }

    pub fn predict(&self, track: &TrackData) -> AppResult<PredictionResponse> {
        if let Err(violations) = validate_audio_features(&track.features) {
            let detail = describe_violations(&violations);
            if self.strict_validation {
                return Err(AppError::ValidationError(format!("{}: {}", track.track_name, detail)));
            }
            log::warn!("歌曲 '{}' 的特征越界，仍继续预测: {}", track.track_name, detail);
        }

        let (predictions, model_version) = match &self.scorer {
            Some(scorer) => match self.predict_trained(scorer.as_ref(), track) {
                Ok(predictions) => (predictions, scorer.model_version().to_string()),
                Err(e) => {
                    log::error!("模型预测失败，退回演示模式: {e}");
                    (self.predict_heuristic(track), DEMO_MODEL_VERSION.to_string())
                }
            },
            None => (self.predict_heuristic(track), DEMO_MODEL_VERSION.to_string()),
        };

        let top_genres = select_top_genres(&predictions);
        let confidence = calculate_confidence(&predictions);
        log::debug!(
            "预测完成: '{}' 版本={} 置信度={:.4} top={:?}",
            track.track_name,
            model_version,
            confidence,
            top_genres
        );

        Ok(PredictionResponse {
            track: track.track_name.clone(),
            artists: track.artists.clone(),
            predictions,
            top_genres,
            confidence,
            model_version,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    fn predict_trained(
        &self,
        scorer: &dyn GenreScorer,
        track: &TrackData,
    ) -> AppResult<GenreProbabilities> {
        let mut features = track.features.to_vector();
        if let Some(scaler) = &self.scaler {
            features = scaler.transform(&features);
        }
        let predictions = scorer::score_with(scorer, &features)?;
        Ok(normalize_predictions(&predictions, Normalization::AsEmitted))
    }

    fn predict_heuristic(&self, track: &TrackData) -> GenreProbabilities {
        heuristic_predictions(&track.features)
    }

    // 批量预测：逐首独立处理，输出顺序与输入一致
    pub fn predict_batch(&self, tracks: &[TrackData]) -> AppResult<BatchPredictionResponse> {
        // 严格模式下先按顺序找出第一首越界的歌曲，保证报错位置确定
        if self.strict_validation {
            let first_invalid = tracks.iter().enumerate().find_map(|(i, track)| {
                validate_audio_features(&track.features)
                    .err()
                    .map(|violations| (i, track, describe_violations(&violations)))
            });
            if let Some((i, track, detail)) = first_invalid {
                let name = &track.track_name;
                return Err(AppError::ValidationError(format!("第 {i} 首: {name}: {detail}")));
            }
        }

        let predictions = tracks
            .par_iter()
            .map(|track| self.predict(track))
            .collect::<AppResult<Vec<_>>>()?;

        let total_tracks = predictions.len();
        let average_confidence = if total_tracks == 0 {
            0.0
        } else {
            predictions.iter().map(|p| p.confidence).sum::<f64>() / total_tracks as f64
        };
        log::info!("批量预测完成: {total_tracks} 首, 平均置信度 {average_confidence:.4}");

        Ok(BatchPredictionResponse {
            predictions,
            total_tracks,
            average_confidence,
        })
    }
}
