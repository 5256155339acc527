pub mod media_api;

pub use media_api::{MediaApiClient, MediaApiError};
