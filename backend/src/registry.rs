//! Process-wide owner of the single in-flight VoteKick.
//!
//! All vote state sits behind one mutex. Ballots, the timeout task and manual
//! clears each take the lock, decide, and release it before any announcement or
//! platform call, so a ballot racing the timer can end a session only once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use shared::error::{Result, StartError, VoteKickError};
use shared::models::{Member, SessionSnapshot};
use shared::vote_logic::{Choice, Outcome, Roster, VoteKick};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use crate::collaborators::{Mover, Notifier};
use crate::config::VoteKickConfig;

struct ActiveSession {
    id: Uuid,
    vote: VoteKick<Member>,
    started_at: OffsetDateTime,
    expires_at: OffsetDateTime,
    timer: Option<JoinHandle<()>>,
}

impl ActiveSession {
    fn open(roster: Roster<Member>, config: &VoteKickConfig) -> Self {
        let started_at = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            vote: VoteKick::from_roster(roster),
            started_at,
            expires_at: started_at + config.vote_timeout,
            timer: None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            defendant: self.vote.defendant().clone(),
            outcome: self.vote.outcome(),
            status: self.vote.status(),
            started_at: self.started_at,
            expires_at: self.expires_at,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[derive(Default)]
struct RegistryState {
    active: Option<ActiveSession>,
    /// Held members, each with the id of the hold that placed them there.
    on_hold: HashMap<Member, Uuid>,
}

#[derive(Clone)]
pub struct SessionRegistry {
    state: Arc<Mutex<RegistryState>>,
    notifier: Arc<dyn Notifier>,
    mover: Arc<dyn Mover>,
    config: VoteKickConfig,
}

impl SessionRegistry {
    pub fn new(notifier: Arc<dyn Notifier>, mover: Arc<dyn Mover>, config: VoteKickConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::default())),
            notifier,
            mover,
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a vote on `roster.defendant`. Must run inside a Tokio runtime,
    /// which drives the timeout.
    ///
    /// The returned snapshot may already be `Failed` when the roster is too
    /// small for the threshold to be reachable; such a vote is never stored.
    #[instrument(skip(self, roster), fields(defendant = %roster.defendant))]
    pub fn start_session(&self, roster: Roster<Member>) -> Result<SessionSnapshot> {
        let snapshot = self.try_start(roster).map_err(|e| self.reject(e))?;

        info!("🗳️ VoteKick {} opened, {} of {} needed", snapshot.id, snapshot.status.threshold, snapshot.status.total);
        self.notifier.announce(format!(
            "Starting the VoteKick process on {}.\nType !yes to vote yes, !no to vote no, or !abstain to abstain.\nA successful VoteKick requires 60% of all members to vote 'Yes'.",
            snapshot.defendant
        ));
        self.notifier.announce(self.notifier.render_status(&snapshot.status));

        if snapshot.outcome == Outcome::Failed {
            self.announce_outcome(&snapshot);
        }
        Ok(snapshot)
    }

    fn try_start(&self, roster: Roster<Member>) -> Result<SessionSnapshot> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(StartError::SessionAlreadyActive.into());
        }
        if roster.is_empty() {
            return Err(StartError::NoEligibleVoters.into());
        }
        if state.on_hold.contains_key(&roster.defendant) {
            return Err(StartError::TargetOnHold(roster.defendant.name.clone()).into());
        }

        let mut session = ActiveSession::open(roster, &self.config);
        let snapshot = session.snapshot();
        if snapshot.is_open() {
            session.timer = Some(self.spawn_timeout(session.id));
            state.active = Some(session);
        }
        Ok(snapshot)
    }

    fn spawn_timeout(&self, id: Uuid) -> JoinHandle<()> {
        let registry = self.clone();
        let timeout = self.config.vote_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            registry.expire(id);
        })
    }

    #[instrument(skip(self), fields(voter = %voter))]
    pub async fn cast_ballot(&self, voter: &Member, choice: Choice) -> Result<SessionSnapshot> {
        let (snapshot, hold) = self.try_cast(voter, choice).map_err(|e| self.reject(e))?;

        debug!("Ballot {:?} recorded for {}", choice, voter);
        self.notifier.announce(ballot_message(&snapshot.defendant, voter, choice));
        self.notifier.announce(self.notifier.render_status(&snapshot.status));

        match snapshot.outcome {
            Outcome::Kicked => {
                self.announce_outcome(&snapshot);
                if let Some(hold) = hold {
                    self.hold(&snapshot.defendant, hold);
                }
            }
            Outcome::Failed => self.announce_outcome(&snapshot),
            Outcome::Open | Outcome::TimedOut => {}
        }
        Ok(snapshot)
    }

    fn try_cast(&self, voter: &Member, choice: Choice) -> Result<(SessionSnapshot, Option<Uuid>)> {
        let mut state = self.lock();
        let session = state.active.as_mut().ok_or(VoteKickError::NoActiveSession)?;
        let outcome = session.vote.cast_ballot(voter, choice)?;
        let snapshot = session.snapshot();

        let mut hold = None;
        if outcome.is_terminal() {
            if let Some(mut ended) = state.active.take() {
                ended.cancel_timer();
            }
            if outcome == Outcome::Kicked {
                let id = Uuid::new_v4();
                state.on_hold.insert(snapshot.defendant.clone(), id);
                hold = Some(id);
            }
        }
        Ok((snapshot, hold))
    }

    /// Times out session `id` if it is still the active one. A stale timer
    /// finds a different (or no) session and does nothing.
    pub fn expire(&self, id: Uuid) -> Option<SessionSnapshot> {
        let snapshot = {
            let mut state = self.lock();
            if state.active.as_ref().map(|s| s.id) != Some(id) {
                debug!("Timer for VoteKick {} fired after it ended", id);
                return None;
            }
            let mut session = state.active.take()?;
            session.vote.time_out();
            session.snapshot()
        };

        self.announce_outcome(&snapshot);
        Some(snapshot)
    }

    /// Drops the active session, if any, without announcing an outcome.
    pub fn clear_session(&self) -> Option<SessionSnapshot> {
        let mut session = self.lock().active.take()?;
        session.cancel_timer();
        info!("VoteKick {} cleared", session.id);
        Some(session.snapshot())
    }

    pub fn active(&self) -> Option<SessionSnapshot> {
        self.lock().active.as_ref().map(ActiveSession::snapshot)
    }

    pub fn is_on_hold(&self, member: &Member) -> bool {
        self.lock().on_hold.contains_key(member)
    }

    /// Moves `defendant` to hold and schedules the end of hold `id`. The whole
    /// sequence runs on its own task, so it outlives the ballot that caused it.
    fn hold(&self, defendant: &Member, id: Uuid) {
        let registry = self.clone();
        let member = defendant.clone();
        let until = tokio::time::Instant::now() + self.config.hold_duration;
        tokio::spawn(async move {
            if let Err(e) = registry.mover.remove(&member).await {
                error!("Failed to move {} to hold: {}", member, e);
            }
            if !registry.is_on_hold(&member) {
                // released while the move was in flight
                registry.restore(&member).await;
                return;
            }
            tokio::time::sleep_until(until).await;
            registry.end_hold(&member, Some(id)).await;
        });
    }

    /// Ends the hold on `member`. Returns `false` if they were not held.
    pub async fn release(&self, member: &Member) -> bool {
        self.end_hold(member, None).await
    }

    /// Releases `member` if held, and only if `id` (when given) is still the
    /// hold on record. A timer left over from an earlier hold does nothing.
    async fn end_hold(&self, member: &Member, id: Option<Uuid>) -> bool {
        let was_held = {
            let mut state = self.lock();
            match (state.on_hold.get(member).copied(), id) {
                (Some(current), Some(id)) if current != id => {
                    debug!("Release timer for {} fired after a newer hold", member);
                    false
                }
                (Some(_), _) => state.on_hold.remove(member).is_some(),
                (None, _) => false,
            }
        };
        if !was_held {
            return false;
        }
        self.restore(member).await;
        info!("🔓 {} released from hold", member);
        self.notifier.announce(format!("{} has been released from hold.", member));
        true
    }

    async fn restore(&self, member: &Member) {
        if let Err(e) = self.mover.restore(member).await {
            error!("Failed to restore {}: {}", member, e);
        }
    }

    fn announce_outcome(&self, snapshot: &SessionSnapshot) {
        let defendant = &snapshot.defendant;
        let text = match snapshot.outcome {
            Outcome::Kicked => format!("The vote to kick {} succeeded. Kicking...", defendant),
            Outcome::Failed => format!("The vote to kick {} failed.", defendant),
            Outcome::TimedOut => format!("The vote to kick {} timed out.", defendant),
            Outcome::Open => return,
        };
        info!("VoteKick {} ended: {:?}", snapshot.id, snapshot.outcome);
        self.notifier.announce(text);
    }

    fn reject(&self, err: VoteKickError) -> VoteKickError {
        warn!("Command rejected: {}", err);
        self.notifier.announce(err.to_string());
        err
    }
}

fn ballot_message(defendant: &Member, voter: &Member, choice: Choice) -> String {
    let verdict = match choice {
        Choice::Yes => "votes in the affirmative",
        Choice::No => "votes in the negative",
        Choice::Abstain => "votes to abstain",
    };
    format!("On the vote to kick {}, {} {}.", defendant, voter, verdict)
}
