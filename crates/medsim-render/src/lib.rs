//! medsim-render
//!
//! Presentation of a case for the terminal: per-entry view models and the
//! tera templates that turn them, the case header, the scoring panel and
//! the test menu into text.

pub mod error;
pub mod text;
pub mod view;
