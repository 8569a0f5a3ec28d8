//! Core domain types shared across the director

pub mod action;
pub mod difficulty;
pub mod state_key;
