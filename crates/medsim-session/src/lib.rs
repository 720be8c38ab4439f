//! medsim-session
//!
//! The session controller: validates and gates user actions, drives the
//! backend through the mutate-then-re-fetch cycle, and owns the in-flight
//! flag and the user-facing notice. Session values are passed in and
//! handed back; the controller never stores one.

pub mod controller;
pub mod error;
pub mod events;
