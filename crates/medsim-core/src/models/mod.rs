pub mod scoring;
pub mod session;
pub mod timestamp;
pub mod transcript;
