//! medsim-api
//!
//! Client side of the case-simulation backend: the `CaseApi` seam the
//! session controller talks through, and its HTTP/JSON implementation.

pub mod api;
pub mod error;
pub mod http;
pub mod wire;
