use crate::models::{AudioFeatures, Genre, GenreProbabilities};

/// 启发式结果的总概率质量，刻意不归一到 1.0
pub const DEMO_PROBABILITY_MASS: f64 = 0.8;

/// 启发式原始分数和不为正时，每个流派分到的份额
pub const DEMO_EQUAL_SHARE: f64 = 0.08;

/// 进入 top_genres 的阈值（严格大于）
pub const TOP_GENRE_THRESHOLD: f64 = 0.5;

/// 归一化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// 除以总和，结果和为 1
    #[cfg_attr(not(test), allow(dead_code))]
    Unit,
    /// 除以总和后再乘以系数
    Scaled(f64),
    /// 原样返回（训练模型的输出直接使用）
    AsEmitted,
}

/// 启发式打分：每个流派由 1~2 个原始特征线性组合，再用上限截断。
/// 返回的是未归一化的原始分数。
pub fn heuristic_raw_scores(f: &AudioFeatures) -> GenreProbabilities {
    let mut raw = GenreProbabilities::uniform(0.0);
    raw.set(Genre::Pop, f64::min(0.70, 0.8 * f.danceability + 0.002 * f.popularity));
    raw.set(Genre::Rock, f64::min(0.60, 0.7 * f.energy + 0.3 * (1.0 - f.danceability)));
    raw.set(Genre::HipHop, f64::min(0.50, 5.0 * f.speechiness + 0.3 * f.energy));
    raw.set(Genre::Jazz, f64::min(0.40, 0.6 * f.acousticness + 0.2 * (1.0 - f.energy)));
    raw.set(Genre::Electronic, f64::min(0.80, 0.7 * f.energy + 0.5 * f.danceability));
    raw.set(Genre::Classical, f64::min(0.30, 0.8 * f.instrumentalness + 0.4 * f.acousticness));
    raw.set(Genre::RnB, f64::min(0.50, 0.6 * f.danceability + 0.3 * f.valence));
    raw.set(Genre::Country, f64::min(0.40, 0.5 * f.acousticness + 0.3 * f.valence));
    raw.set(Genre::Metal, f64::min(0.30, 0.8 * f.energy + 0.2 * (1.0 - f.valence)));
    raw.set(Genre::Folk, f64::min(0.30, 0.7 * f.acousticness + 0.2 * (1.0 - f.energy)));
    raw
}

/// 启发式预测：原始分数按 0.8 的总质量缩放；总和不为正时平均分配 0.08
pub fn heuristic_predictions(features: &AudioFeatures) -> GenreProbabilities {
    let raw = heuristic_raw_scores(features);
    let total = raw.sum();
    if total > 0.0 {
        normalize_predictions(&raw, Normalization::Scaled(DEMO_PROBABILITY_MASS))
    } else {
        log::debug!("启发式原始分数总和为 {total}，改为平均分配");
        GenreProbabilities::uniform(DEMO_EQUAL_SHARE)
    }
}

/// 归一化。总和不为正（含全零）时原样返回，避免除零。
pub fn normalize_predictions(
    predictions: &GenreProbabilities,
    mode: Normalization,
) -> GenreProbabilities {
    let total = predictions.sum();
    if !(total > 0.0) {
        return *predictions;
    }
    match mode {
        Normalization::Unit => predictions.map(|p| p / total),
        Normalization::Scaled(factor) => predictions.map(|p| p / total * factor),
        Normalization::AsEmitted => *predictions,
    }
}

/// 分档置信度：高分放大，低分打折
pub fn calculate_confidence(predictions: &GenreProbabilities) -> f64 {
    // 全部为 NaN 时 max 为负无穷，按空集处理
    let max_prob = match predictions.max() {
        m if m == f64::NEG_INFINITY => 0.0,
        m => m,
    };

    if max_prob > 0.7 {
        f64::min(1.0, max_prob * 1.1)
    } else if max_prob > 0.3 {
        max_prob
    } else {
        max_prob * 0.8
    }
}

/// 概率严格大于 0.5 的流派，按标签顺序返回
pub fn select_top_genres(predictions: &GenreProbabilities) -> Vec<Genre> {
    predictions
        .iter()
        .filter(|(_, p)| *p > TOP_GENRE_THRESHOLD)
        .map(|(g, _)| g)
        .collect()
}
