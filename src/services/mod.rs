pub mod media_service;
pub use media_service::{MediaError, MediaService, preset};

pub mod media_service_impl;
pub use media_service_impl::HttpMediaService;
