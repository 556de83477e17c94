use serde::{Deserialize, Serialize};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use crate::models::{FeatureVector, Genre, GenreProbabilities, FEATURE_COUNT};
use crate::utils::error::{AppError, AppResult};

pub const DEFAULT_TRAINED_MODEL_VERSION: &str = "SVM-v2.0";

/// 模型输出的多维数组，形状不固定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbaTensor {
    Value(f64),
    List(Vec<ProbaTensor>),
}

impl ProbaTensor {
    pub fn rows(rows: Vec<Vec<f64>>) -> Self {
        ProbaTensor::List(
            rows.into_iter()
                .map(|r| ProbaTensor::List(r.into_iter().map(ProbaTensor::Value).collect()))
                .collect(),
        )
    }

    fn as_list(&self) -> Option<&[ProbaTensor]> {
        match self {
            ProbaTensor::List(items) => Some(items),
            ProbaTensor::Value(_) => None,
        }
    }

    fn as_value(&self) -> Option<f64> {
        match self {
            ProbaTensor::Value(v) => Some(*v),
            ProbaTensor::List(_) => None,
        }
    }
}

/// 已训练的流派打分器
///
/// `predict_proba` 接收 N×10 的特征矩阵，返回每个样本各流派的概率。
/// 输出形状由具体实现决定，见 [`OutputLayout`]。
pub trait GenreScorer: Send + Sync {
    fn predict_proba(&self, samples: &[FeatureVector]) -> AppResult<ProbaTensor>;

    fn model_version(&self) -> &str {
        DEFAULT_TRAINED_MODEL_VERSION
    }
}

/// 模型输出的三种布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// N×C：每个样本一行类别概率
    PerSampleRows,
    /// C×2：单个样本时每个类别一个 one-vs-rest 概率对，正类在下标 1
    ClassPairs,
    /// C×N×2：每个类别一组 one-vs-rest 概率对，正类在下标 1
    PerClassPairs,
}

fn is_pair(item: &ProbaTensor) -> bool {
    matches!(item.as_list(), Some([ProbaTensor::Value(_), ProbaTensor::Value(_)]))
}

impl OutputLayout {
    /// 根据形状和输入样本数判断布局
    ///
    /// 二维输出的外层长度等于样本数时按行读取；
    /// 外层比样本数长且每个元素都是二元组时视为按类别的概率对。
    pub fn detect(output: &ProbaTensor, samples: usize) -> AppResult<Self> {
        let outer = output
            .as_list()
            .ok_or_else(|| AppError::MalformedScorerOutput("输出不是数组".to_string()))?;
        let first = outer
            .first()
            .ok_or_else(|| AppError::MalformedScorerOutput("输出为空".to_string()))?;
        let inner = first
            .as_list()
            .ok_or_else(|| AppError::MalformedScorerOutput("输出只有一维".to_string()))?;

        match inner.first() {
            Some(ProbaTensor::Value(_)) if outer.len() > samples && outer.iter().all(is_pair) => {
                Ok(OutputLayout::ClassPairs)
            }
            Some(ProbaTensor::Value(_)) => Ok(OutputLayout::PerSampleRows),
            Some(ProbaTensor::List(_)) => Ok(OutputLayout::PerClassPairs),
            None => Err(AppError::MalformedScorerOutput("第一个元素为空".to_string())),
        }
    }

    /// 取出第 `sample` 个样本的按位置排列的分数
    pub fn extract(self, output: &ProbaTensor, sample: usize) -> AppResult<Vec<f64>> {
        let outer = output
            .as_list()
            .ok_or_else(|| AppError::MalformedScorerOutput("输出不是数组".to_string()))?;

        let scores: Vec<f64> = match self {
            OutputLayout::PerSampleRows => {
                let row = outer
                    .get(sample)
                    .and_then(ProbaTensor::as_list)
                    .ok_or_else(|| AppError::MalformedScorerOutput(format!("缺少第 {sample} 行")))?;
                row.iter()
                    .map(|v| {
                        v.as_value().ok_or_else(|| {
                            AppError::MalformedScorerOutput("行内出现嵌套数组".to_string())
                        })
                    })
                    .collect::<AppResult<_>>()?
            }
            OutputLayout::ClassPairs => {
                if sample != 0 {
                    return Err(AppError::MalformedScorerOutput(format!(
                        "二维概率对只包含一个样本，无法取第 {sample} 个"
                    )));
                }
                outer
                    .iter()
                    .enumerate()
                    .map(|(class, pair)| {
                        pair.as_list()
                            .and_then(|pair| pair.get(1))
                            .and_then(ProbaTensor::as_value)
                            .ok_or_else(|| {
                                AppError::MalformedScorerOutput(format!("第 {class} 类缺少正类概率"))
                            })
                    })
                    .collect::<AppResult<_>>()?
            }
            OutputLayout::PerClassPairs => outer
                .iter()
                .enumerate()
                .map(|(class, per_class)| {
                    per_class
                        .as_list()
                        .and_then(|samples| samples.get(sample))
                        .and_then(ProbaTensor::as_list)
                        .and_then(|pair| pair.get(1))
                        .and_then(ProbaTensor::as_value)
                        .ok_or_else(|| {
                            AppError::MalformedScorerOutput(format!(
                                "第 {class} 类缺少样本 {sample} 的正类概率"
                            ))
                        })
                })
                .collect::<AppResult<_>>()?,
        };

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AppError::MalformedScorerOutput("输出包含非有限值".to_string()));
        }
        Ok(scores)
    }
}

/// 调用外部打分器并把单个样本的输出映射到流派。
/// 打分器内部 panic 也会被捕获并转为错误。
pub fn score_with(
    scorer: &dyn GenreScorer,
    features: &FeatureVector,
) -> AppResult<GenreProbabilities> {
    let samples = [*features];
    let output = panic::catch_unwind(AssertUnwindSafe(|| scorer.predict_proba(&samples)))
        .map_err(|_| AppError::ScorerInvocation("打分器发生 panic".to_string()))??;

    let layout = OutputLayout::detect(&output, samples.len())?;
    log::debug!("模型输出布局: {layout:?}");
    let scores = layout.extract(&output, 0)?;
    Ok(GenreProbabilities::from_positional(&scores))
}

/// 特征标准化参数 (x - mean) / scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    fn check(&self) -> AppResult<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AppError::ArtifactError(format!(
                "标准化参数长度应为 {FEATURE_COUNT}，实际 mean={} scale={}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }

    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = *features;
        for (i, x) in out.iter_mut().enumerate() {
            // 方差为 0 的列不缩放
            let scale = match self.scale[i] {
                s if s == 0.0 => 1.0,
                s => s,
            };
            *x = (*x - self.mean[i]) / scale;
        }
        out
    }
}

fn default_model_version() -> String {
    DEFAULT_TRAINED_MODEL_VERSION.to_string()
}

/// 序列化的 one-vs-rest 线性概率模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGenreModel {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    /// 为 true 时按类别输出概率对（多输出分类器的格式）
    #[serde(default)]
    pub multi_output: bool,
}

impl LinearGenreModel {
    fn check(&self) -> AppResult<()> {
        if self.coefficients.is_empty() {
            return Err(AppError::ArtifactError("模型没有任何类别".to_string()));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(AppError::ArtifactError(format!(
                "intercepts 数量 {} 与类别数 {} 不一致",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        if let Some((i, row)) = self
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != FEATURE_COUNT)
        {
            return Err(AppError::ArtifactError(format!(
                "第 {i} 类系数长度为 {}，应为 {FEATURE_COUNT}",
                row.len()
            )));
        }
        if let Some(classes) = &self.classes {
            let mismatch = classes
                .iter()
                .zip(Genre::ALL.iter())
                .position(|(c, g)| c != g.as_str());
            if let Some(i) = mismatch {
                return Err(AppError::ArtifactError(format!(
                    "第 {i} 个类别 '{}' 与标签 '{}' 不一致",
                    classes[i],
                    Genre::ALL[i]
                )));
            }
        }
        Ok(())
    }

    fn class_probability(&self, class: usize, x: &FeatureVector) -> f64 {
        let z: f64 = self.coefficients[class]
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercepts[class];
        1.0 / (1.0 + (-z).exp())
    }
}

impl GenreScorer for LinearGenreModel {
    fn predict_proba(&self, samples: &[FeatureVector]) -> AppResult<ProbaTensor> {
        let classes = self.coefficients.len();
        let probs: Vec<Vec<f64>> = samples
            .iter()
            .map(|x| (0..classes).map(|c| self.class_probability(c, x)).collect())
            .collect();

        if !self.multi_output {
            return Ok(ProbaTensor::rows(probs));
        }

        let per_class = (0..classes)
            .map(|c| {
                ProbaTensor::List(
                    probs
                        .iter()
                        .map(|row| {
                            ProbaTensor::List(vec![
                                ProbaTensor::Value(1.0 - row[c]),
                                ProbaTensor::Value(row[c]),
                            ])
                        })
                        .collect(),
                )
            })
            .collect();
        Ok(ProbaTensor::List(per_class))
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        Ok(serde_yaml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

/// 加载训练模型。文件不存在返回 `Ok(None)`，不是错误。
pub fn load_model<P: AsRef<Path>>(path: P) -> AppResult<Option<LinearGenreModel>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let model: LinearGenreModel = read_artifact(path)?;
    model.check()?;
    Ok(Some(model))
}

/// 加载特征标准化参数。文件不存在返回 `Ok(None)`。
pub fn load_scaler<P: AsRef<Path>>(path: P) -> AppResult<Option<FeatureScaler>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let scaler: FeatureScaler = read_artifact(path)?;
    scaler.check()?;
    Ok(Some(scaler))
}

/// 启动时加载模型，任何失败都只记录日志并退回演示模式
pub fn load_scorer_or_demo(path: &str) -> Option<Arc<dyn GenreScorer>> {
    match load_model(path) {
        Ok(Some(model)) => {
            log::info!(
                "训练模型加载成功: {} ({} 个类别, 版本 {})",
                path,
                model.coefficients.len(),
                model.model_version
            );
            Some(Arc::new(model))
        }
        Ok(None) => {
            log::warn!("未找到模型文件 {path}，以演示模式运行");
            None
        }
        Err(e) => {
            log::error!("加载模型 {path} 失败: {e}，以演示模式运行");
            None
        }
    }
}

pub fn load_scaler_or_default(path: &str) -> Option<FeatureScaler> {
    match load_scaler(path) {
        Ok(Some(scaler)) => {
            log::info!("特征标准化参数加载成功: {path}");
            Some(scaler)
        }
        Ok(None) => {
            log::warn!("未找到标准化参数 {path}，使用原始特征");
            None
        }
        Err(e) => {
            log::error!("加载标准化参数 {path} 失败: {e}，使用原始特征");
            None
        }
    }
}
