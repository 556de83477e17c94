use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// 训练模型文件路径 (JSON / YAML)
    pub model_path: String,
    /// 特征标准化参数文件路径
    pub scaler_path: String,
    /// 开启后特征越界直接返回 400，否则只记录警告
    pub strict_validation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            cors_allowed_origins: vec!["*".to_string()],
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "backend/models/svm_model.json".to_string()),
            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| "models/scaler.json".to_string()),
            strict_validation: env::var("STRICT_VALIDATION")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

lazy_static! {
    pub static ref CONFIG: Arc<AppConfig> = Arc::new(AppConfig::default());
}

// 对外展示的 API 版本
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

// 模型指标（训练时的离线评估结果，固定展示）
pub const METRICS_MODEL_NAME: &str = "Support Vector Machine (SVM)";
pub const METRICS_ACCURACY: f64 = 0.948;
pub const METRICS_F1_SCORE: f64 = 0.451;
pub const METRICS_TRAINING_SAMPLES: u64 = 114_000;
pub const METRICS_LAST_TRAINED: &str = "2025-11-11";
