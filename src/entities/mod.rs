pub mod prelude;

pub mod conversions;
pub mod metadata;
pub mod searches;
