use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

pub const FEATURE_COUNT: usize = 10;

/// 模型输入向量，顺序与 [`AudioFeature::ALL`] 一致
pub type FeatureVector = [f64; FEATURE_COUNT];

/// 音频特征名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFeature {
    Danceability,
    Energy,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
    Popularity,
}

impl AudioFeature {
    /// 训练模型期望的输入列顺序
    pub const ALL: [AudioFeature; FEATURE_COUNT] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Loudness,
        AudioFeature::Speechiness,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Liveness,
        AudioFeature::Valence,
        AudioFeature::Tempo,
        AudioFeature::Popularity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Loudness => "loudness",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
            AudioFeature::Popularity => "popularity",
        }
    }

    /// 缺省时使用的值
    pub fn default_value(&self) -> f64 {
        match self {
            AudioFeature::Danceability => 0.5,
            AudioFeature::Energy => 0.5,
            AudioFeature::Loudness => -10.0,
            AudioFeature::Speechiness => 0.05,
            AudioFeature::Acousticness => 0.1,
            AudioFeature::Instrumentalness => 0.0,
            AudioFeature::Liveness => 0.1,
            AudioFeature::Valence => 0.5,
            AudioFeature::Tempo => 120.0,
            AudioFeature::Popularity => 50.0,
        }
    }

    /// 合法取值的闭区间 (min, max)
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            AudioFeature::Loudness => (-60.0, 0.0),
            AudioFeature::Tempo => (60.0, 200.0),
            AudioFeature::Popularity => (0.0, 100.0),
            _ => (0.0, 1.0),
        }
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_danceability() -> f64 {
    AudioFeature::Danceability.default_value()
}

fn default_energy() -> f64 {
    AudioFeature::Energy.default_value()
}

fn default_loudness() -> f64 {
    AudioFeature::Loudness.default_value()
}

fn default_speechiness() -> f64 {
    AudioFeature::Speechiness.default_value()
}

fn default_acousticness() -> f64 {
    AudioFeature::Acousticness.default_value()
}

fn default_instrumentalness() -> f64 {
    AudioFeature::Instrumentalness.default_value()
}

fn default_liveness() -> f64 {
    AudioFeature::Liveness.default_value()
}

fn default_valence() -> f64 {
    AudioFeature::Valence.default_value()
}

fn default_tempo() -> f64 {
    AudioFeature::Tempo.default_value()
}

fn default_popularity() -> f64 {
    AudioFeature::Popularity.default_value()
}

/// 单首歌曲的 10 维音频特征
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AudioFeatures {
    /// 可舞性 [0, 1]
    #[serde(default = "default_danceability")]
    pub danceability: f64,
    /// 能量 [0, 1]
    #[serde(default = "default_energy")]
    pub energy: f64,
    /// 响度 dB [-60, 0]
    #[serde(default = "default_loudness")]
    pub loudness: f64,
    #[serde(default = "default_speechiness")]
    pub speechiness: f64,
    #[serde(default = "default_acousticness")]
    pub acousticness: f64,
    #[serde(default = "default_instrumentalness")]
    pub instrumentalness: f64,
    #[serde(default = "default_liveness")]
    pub liveness: f64,
    /// 情绪积极度 [0, 1]
    #[serde(default = "default_valence")]
    pub valence: f64,
    /// 速度 BPM [60, 200]
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// 热度 [0, 100]
    #[serde(default = "default_popularity")]
    pub popularity: f64,
}

impl Default for AudioFeatures {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl AudioFeatures {
    /// 从特征名映射构造，未知键忽略，缺失键取默认值
    pub fn from_map(features: &HashMap<String, f64>) -> Self {
        let value = |f: AudioFeature| {
            features
                .get(f.as_str())
                .copied()
                .unwrap_or_else(|| f.default_value())
        };
        Self {
            danceability: value(AudioFeature::Danceability),
            energy: value(AudioFeature::Energy),
            loudness: value(AudioFeature::Loudness),
            speechiness: value(AudioFeature::Speechiness),
            acousticness: value(AudioFeature::Acousticness),
            instrumentalness: value(AudioFeature::Instrumentalness),
            liveness: value(AudioFeature::Liveness),
            valence: value(AudioFeature::Valence),
            tempo: value(AudioFeature::Tempo),
            popularity: value(AudioFeature::Popularity),
        }
    }

    pub fn get(&self, feature: AudioFeature) -> f64 {
        match feature {
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Energy => self.energy,
            AudioFeature::Loudness => self.loudness,
            AudioFeature::Speechiness => self.speechiness,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
            AudioFeature::Liveness => self.liveness,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
            AudioFeature::Popularity => self.popularity,
        }
    }

    /// 按模型输入列顺序投影成定长向量，不做范围处理
    pub fn to_vector(&self) -> FeatureVector {
        AudioFeature::ALL.map(|f| self.get(f))
    }
}

/// 预测请求中的单首歌曲
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "track_name": "Blinding Lights",
    "artists": "The Weeknd",
    "album_name": "After Hours",
    "danceability": 0.8,
    "energy": 0.7,
    "loudness": -5.2,
    "speechiness": 0.1,
    "acousticness": 0.2,
    "instrumentalness": 0.0,
    "liveness": 0.1,
    "valence": 0.6,
    "tempo": 120.0,
    "popularity": 95.0
}))]
pub struct TrackData {
    /// 歌曲名
    pub track_name: String,
    /// 艺术家
    pub artists: String,
    /// 专辑名
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(flatten)]
    pub features: AudioFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let v = AudioFeatures::default().to_vector();
        assert_eq!(v, [0.5, 0.5, -10.0, 0.05, 0.1, 0.0, 0.1, 0.5, 120.0, 50.0]);
    }

    #[test]
    fn from_map_ignores_unknown_keys_and_fills_missing() {
        let mut map = HashMap::new();
        map.insert("energy".to_string(), 0.9);
        map.insert("tempo".to_string(), 174.0);
        map.insert("key".to_string(), 7.0);

        let features = AudioFeatures::from_map(&map);
        let v = features.to_vector();
        assert_eq!(v[1], 0.9);
        assert_eq!(v[8], 174.0);
        assert_eq!(v[0], 0.5);
        assert_eq!(v[9], 50.0);
    }

    #[test]
    fn vector_follows_model_column_order() {
        let names: Vec<&str> = AudioFeature::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "danceability",
                "energy",
                "loudness",
                "speechiness",
                "acousticness",
                "instrumentalness",
                "liveness",
                "valence",
                "tempo",
                "popularity",
            ]
        );
    }

    #[test]
    fn track_data_deserializes_partial_payload() {
        let json = r#"{"track_name":"So What","artists":"Miles Davis",
            "acousticness":0.9,"tempo":136,"mood":"cool"}"#;
        let track: TrackData = serde_json::from_str(json).unwrap();
        assert_eq!(track.track_name, "So What");
        assert_eq!(track.album_name, None);
        assert_eq!(track.features.acousticness, 0.9);
        assert_eq!(track.features.tempo, 136.0);
        assert_eq!(track.features.danceability, 0.5);
        assert_eq!(track.features.popularity, 50.0);
    }

    #[test]
    fn track_data_requires_identity() {
        let json = r#"{"artists":"Nobody","energy":0.4}"#;
        assert!(serde_json::from_str::<TrackData>(json).is_err());
    }
}
