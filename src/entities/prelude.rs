pub use super::conversions::Entity as Conversions;
pub use super::metadata::Entity as Metadata;
pub use super::searches::Entity as Searches;
