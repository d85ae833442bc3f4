pub mod color_scale;
pub mod feature_collection;

pub use color_scale::*;
pub use feature_collection::*;
