use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};
use rocket::async_trait;
use shared::models::{Announcement, Member, VoteStatus};
use shared::validation::{build_roster, ValidationError};
use shared::vote_logic::Roster;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, debug};

const MAX_ANNOUNCEMENTS: usize = 200;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("{0} is not in the hold channel")]
    NotHeld(String),
}

/// Where channel messages go. Sending is fire-and-forget.
pub trait Notifier: Send + Sync {
    fn announce(&self, text: String);

    fn render_status(&self, status: &VoteStatus) -> String {
        format!(
            "CURRENT VOTES: {} yes, {} no, {} abstain, {} remaining\nNEEDED VOTES: {} of {}",
            status.yes, status.no, status.abstain, status.remaining, status.threshold, status.total
        )
    }
}

/// Moves a member into and out of the hold channel/role.
#[async_trait]
pub trait Mover: Send + Sync {
    async fn remove(&self, member: &Member) -> Result<(), MoveError>;
    async fn restore(&self, member: &Member) -> Result<(), MoveError>;
}

pub trait EligibilityProvider: Send + Sync {
    fn roster(&self, members: &[Member], target: &str) -> Result<Roster<Member>, ValidationError>;
}

/// Keeps the most recent announcements in memory so the chat glue can relay them.
#[derive(Debug, Default)]
pub struct ChannelFeed {
    messages: Mutex<VecDeque<Announcement>>,
}

impl ChannelFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recent(&self) -> Vec<Announcement> {
        let messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        messages.iter().cloned().collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.recent().into_iter().map(|a| a.text).collect()
    }
}

impl Notifier for ChannelFeed {
    fn announce(&self, text: String) {
        info!("📣 {}", text);
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        if messages.len() >= MAX_ANNOUNCEMENTS {
            messages.pop_front();
        }
        messages.push_back(Announcement { at: OffsetDateTime::now_utc(), text });
    }
}

/// In-process stand-in for the platform's role/channel bookkeeping.
#[derive(Debug, Default)]
pub struct RoleBook {
    held: Mutex<HashSet<Member>>,
}

impl RoleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, member: &Member) -> bool {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).contains(member)
    }
}

#[async_trait]
impl Mover for RoleBook {
    async fn remove(&self, member: &Member) -> Result<(), MoveError> {
        debug!("Moving {} to the hold channel", member);
        self.held.lock().unwrap_or_else(PoisonError::into_inner).insert(member.clone());
        Ok(())
    }

    async fn restore(&self, member: &Member) -> Result<(), MoveError> {
        debug!("Restoring {} from the hold channel", member);
        if self.held.lock().unwrap_or_else(PoisonError::into_inner).remove(member) {
            Ok(())
        } else {
            Err(MoveError::NotHeld(member.name.clone()))
        }
    }
}

/// Everyone in the voice channel except bots may vote; the defendant is
/// picked out by display name.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoiceChannelPolicy;

impl EligibilityProvider for VoiceChannelPolicy {
    fn roster(&self, members: &[Member], target: &str) -> Result<Roster<Member>, ValidationError> {
        build_roster(members, target)
    }
}
