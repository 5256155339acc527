pub mod collection;
pub mod conversion;
pub mod metadata;
pub mod search;
