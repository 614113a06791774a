pub mod extract;
pub mod model;

pub use extract::normalize;
pub use model::{Layout, NormalizedText, Sentence};
