pub mod error;
pub mod models;
pub mod validation;
pub mod vote_logic;

pub use error::{Error, ErrorCode, Result, StartError, VoteKickError};
pub use models::*;
pub use validation::*;
pub use vote_logic::{threshold_for, Ballot, BallotError, Choice, Outcome, Roster, Tally, VoteKick};

#[cfg(test)]
mod tests;
