pub mod error;
pub mod features;
pub mod genre_utils;
