//! Tabular value learning
//!
//! - [`ValueStore`]: StateKey → per-action value estimates, default-on-miss
//! - [`Policy`]: epsilon-greedy selection with early-game heuristic overrides
//! - [`Learner`]: Q-learning update plus experience replay over [`ReplayBuffer`]

pub mod learner;
pub mod policy;
pub mod replay;
pub mod value_store;

pub use learner::Learner;
pub use policy::{HeuristicOverride, Policy, PolicyDecision};
pub use replay::{ReplayBuffer, Transition};
pub use value_store::ValueStore;
