use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;
use crate::models::Member;
use crate::validation::ValidationError;
use crate::vote_logic::BallotError;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Invalid input provided")]
    InvalidInput,
    #[error("No active vote")]
    NotFound,
    #[error("Not a participant")]
    NotEligible,
    #[error("Conflicting vote state")]
    Conflict,
    #[error("Validation failed")]
    ValidationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("A VoteKick is already active.")]
    SessionAlreadyActive,
    #[error("Not enough members to VoteKick.")]
    NoEligibleVoters,
    #[error("{0} is already on hold.")]
    TargetOnHold(String),
}

/// Every way a command can be turned away. None of these change vote state;
/// the display text is the notice sent back to the channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteKickError {
    #[error(transparent)]
    Start(#[from] StartError),
    #[error(transparent)]
    Ballot(#[from] BallotError<Member>),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("There is no active VoteKick. Type !votekick [user] to start one.")]
    NoActiveSession,
}

impl VoteKickError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VoteKickError::Start(StartError::NoEligibleVoters) => ErrorCode::InvalidInput,
            VoteKickError::Start(_) => ErrorCode::Conflict,
            VoteKickError::Ballot(BallotError::InvalidVoter(_)) => ErrorCode::InvalidInput,
            VoteKickError::Ballot(BallotError::NotEligible(_)) => ErrorCode::NotEligible,
            VoteKickError::Ballot(BallotError::AlreadyVoted(_)) => ErrorCode::Conflict,
            VoteKickError::Validation(_) => ErrorCode::ValidationFailed,
            VoteKickError::NoActiveSession => ErrorCode::NotFound,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl From<&VoteKickError> for Error {
    fn from(err: &VoteKickError) -> Self {
        match err {
            VoteKickError::Ballot(e) => {
                let voter = match e {
                    BallotError::InvalidVoter(m) | BallotError::NotEligible(m) | BallotError::AlreadyVoted(m) => m,
                };
                Error::with_details(err.code(), err.to_string(), format!("voter id {}", voter.id))
            }
            _ => Error::new(err.code(), err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoteKickError>;
