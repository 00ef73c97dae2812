use crate::models::Member;
use crate::vote_logic::Roster;

pub const THRESHOLD_RATIO: f64 = 0.6;
pub const DEFAULT_VOTE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HOLD_SECS: u64 = 150;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No member to vote on was named")]
    EmptyTarget,
    #[error("{0} is not in the channel")]
    TargetNotPresent(String),
}

/// Builds the roster for a vote on `target` from the members currently in the
/// channel. The defendant is found by display name, and when several members
/// share it the last one listed is taken. Nobody with that name votes, and
/// bots never vote.
pub fn build_roster(members: &[Member], target: &str) -> Result<Roster<Member>, ValidationError> {
    let target = target.trim();
    if target.is_empty() { return Err(ValidationError::EmptyTarget); }

    let defendant = members.iter()
        .rev()
        .find(|m| m.name == target)
        .cloned()
        .ok_or_else(|| ValidationError::TargetNotPresent(target.to_string()))?;

    let voters = members.iter()
        .filter(|m| m.name != target && !m.bot)
        .cloned();

    Ok(Roster::new(voters, defendant))
}
