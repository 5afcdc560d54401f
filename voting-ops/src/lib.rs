//! Operational tooling around the `AnonymousSportsVoting` contract: deploy
//! and seed it, inspect its state, publish its source to a block explorer
//! and run an end-to-end voting scenario against a chain.
//!
//! All on-chain access goes through the [`chain::ChainClient`] and
//! [`chain::VotingContract`] traits; [`chain::AlloyClient`] implements them
//! on top of an alloy provider.

pub mod chain;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod explorer;
pub mod inspect;
pub mod seed;
pub mod simulate;

pub use error::{ChainError, OpsError, VerificationError};
