//! One-shot accuracy challenge
//!
//! ```text
//! Inactive ──trigger──▶ Active ──accuracy ≥ target──▶ Completed
//!                          └────time budget spent───▶ Failed
//! ```
//!
//! A session leaves `Inactive` at most once per run and never returns to
//! `Active` after reaching a terminal state.

pub mod session;

pub use session::{ChallengeSession, ChallengeStatus};
