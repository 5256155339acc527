pub mod history;
pub mod media;
