//! Session Controller for the interview prep coach.
//!
//! Owns the interview session state machine (an explicit reducer over
//! enumerated actions), persists the session to a single JSON record under a
//! fixed storage key, and orchestrates the two coaching endpoints through the
//! `CoachingApi` seam. The binary in `main.rs` is a thin terminal front over
//! this library.

pub mod api;
pub mod controller;
pub mod session;
pub mod store;
