use std::fmt;

use crate::models::{AudioFeature, AudioFeatures};

/// 单个越界特征
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureViolation {
    pub feature: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for FeatureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} 超出范围 [{}, {}]", self.feature, self.value, self.min, self.max)
    }
}

fn check(feature: AudioFeature, value: f64) -> Option<FeatureViolation> {
    let (min, max) = feature.valid_range();
    // NaN 也视为越界
    if min <= value && value <= max {
        return None;
    }
    Some(FeatureViolation {
        feature: feature.as_str().to_string(),
        value,
        min,
        max,
    })
}

/// 校验全部特征，返回所有越界项。只做检查，不修改也不截断。
pub fn validate_audio_features(features: &AudioFeatures) -> Result<(), Vec<FeatureViolation>> {
    let violations: Vec<FeatureViolation> = AudioFeature::ALL
        .iter()
        .filter_map(|f| check(*f, features.get(*f)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

pub fn describe_violations(violations: &[FeatureViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_audio_features(&AudioFeatures::default()).is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let features = AudioFeatures {
            danceability: 1.0,
            energy: 0.0,
            loudness: -60.0,
            tempo: 200.0,
            popularity: 0.0,
            ..AudioFeatures::default()
        };
        assert!(validate_audio_features(&features).is_ok());
    }

    #[test]
    fn reports_every_out_of_range_feature() {
        let features = AudioFeatures {
            loudness: 3.0,
            tempo: 45.0,
            popularity: 101.0,
            ..AudioFeatures::default()
        };
        let violations = validate_audio_features(&features).unwrap_err();
        let names: Vec<&str> = violations.iter().map(|v| v.feature.as_str()).collect();
        assert_eq!(names, vec!["loudness", "tempo", "popularity"]);
        assert_eq!(violations[1].min, 60.0);
        assert_eq!(violations[1].max, 200.0);
        assert!(describe_violations(&violations).contains("tempo=45"));
    }

    #[test]
    fn nan_is_rejected() {
        let features = AudioFeatures {
            valence: f64::NAN,
            ..AudioFeatures::default()
        };
        assert_eq!(validate_audio_features(&features).unwrap_err().len(), 1);
    }
}
