pub mod genre;
pub mod prediction;
pub mod track;

pub use genre::*;
pub use prediction::*;
pub use track::*;
