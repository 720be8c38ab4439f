//! medsim-core
//!
//! Pure domain types for the clinical case simulator: sessions, the
//! transcript event log, the action gate and the presentation contract.
//! No I/O here. The backend is the authority for every number in a session;
//! this crate only describes and classifies them.

pub mod catalog;
pub mod error;
pub mod gate;
pub mod models;
pub mod presentation;
