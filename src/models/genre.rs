use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

pub const GENRE_COUNT: usize = 10;

/// 支持的流派标签
///
/// 顺序即训练模型输出向量的列顺序，不可随意调整。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Genre {
    #[serde(rename = "pop")]
    Pop,
    #[serde(rename = "rock")]
    Rock,
    #[serde(rename = "hip_hop")]
    HipHop,
    #[serde(rename = "jazz")]
    Jazz,
    #[serde(rename = "electronic")]
    Electronic,
    #[serde(rename = "classical")]
    Classical,
    #[serde(rename = "r_b")]
    RnB,
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "folk")]
    Folk,
}

impl Genre {
    pub const ALL: [Genre; GENRE_COUNT] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Jazz,
        Genre::Electronic,
        Genre::Classical,
        Genre::RnB,
        Genre::Country,
        Genre::Metal,
        Genre::Folk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::HipHop => "hip_hop",
            Genre::Jazz => "jazz",
            Genre::Electronic => "electronic",
            Genre::Classical => "classical",
            Genre::RnB => "r_b",
            Genre::Country => "country",
            Genre::Metal => "metal",
            Genre::Folk => "folk",
        }
    }

    /// 在标签表中的位置
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每个流派对应的分数，按标签顺序存放。
///
/// 归一化前不保证落在 [0, 1] 内。序列化为 `{"pop": 0.1, "rock": ...}`，
/// 键顺序与 [`Genre::ALL`] 一致。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreProbabilities([f64; GENRE_COUNT]);

impl GenreProbabilities {
    /// 所有流派取同一个值
    pub fn uniform(value: f64) -> Self {
        Self([value; GENRE_COUNT])
    }

    /// 按位置映射模型输出，超出部分忽略，不足部分补 0.0
    pub fn from_positional(scores: &[f64]) -> Self {
        let mut values = [0.0; GENRE_COUNT];
        for (slot, score) in values.iter_mut().zip(scores.iter()) {
            *slot = *score;
        }
        Self(values)
    }

    pub fn get(&self, genre: Genre) -> f64 {
        self.0[genre.index()]
    }

    pub fn set(&mut self, genre: Genre, value: f64) {
        self.0[genre.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Genre, f64)> + '_ {
        Genre::ALL.iter().map(move |g| (*g, self.0[g.index()]))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }
}

impl Serialize for GenreProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(GENRE_COUNT))?;
        for (genre, value) in self.iter() {
            map.serialize_entry(genre.as_str(), &value)?;
        }
        map.end()
    }
}
