pub mod moves;
pub mod policy;

pub use policy::{Action, BotDifficulty, HeuristicPolicy, Policy, PolicyContext};
