pub mod genre;
pub mod health;
pub mod metrics;
pub mod prediction;

pub use genre::get_available_genres;
pub use health::health_check;
pub use metrics::get_model_metrics;
pub use prediction::{predict_genres, predict_genres_batch};

#[cfg(test)]
mod tests;
