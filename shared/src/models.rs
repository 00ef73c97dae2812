use serde::{Serialize, Deserialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use time::OffsetDateTime;
use uuid::Uuid;
use crate::vote_logic::{Choice, Outcome};

/// A chat member as reported by the platform. Identity is the numeric id;
/// the name is only used for display and for finding the defendant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub bot: bool,
}

impl Member {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), bot: false }
    }

    pub fn bot(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), bot: true }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
    pub remaining: u32,
    pub threshold: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub defendant: Member,
    pub outcome: Outcome,
    pub status: VoteStatus,
    pub started_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl SessionSnapshot {
    pub fn is_open(&self) -> bool {
        !self.outcome.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVoteRequest {
    pub target: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotRequest {
    pub voter: Member,
    pub choice: Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub at: OffsetDateTime,
    pub text: String,
}
