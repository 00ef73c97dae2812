use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use serde::{Serialize, Deserialize};
use crate::models::VoteStatus;
use crate::validation::THRESHOLD_RATIO;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError<T> {
    #[error("{0}, your vote defaults to 'No'.")] InvalidVoter(T),
    #[error("{0}, you are not an active participant of this VoteKick.")] NotEligible(T),
    #[error("{0}, you already voted.")] AlreadyVoted(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice { Yes, No, Abstain }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ballot { #[default] Unset, Yes, No, Abstain }

impl From<Choice> for Ballot {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Yes => Ballot::Yes,
            Choice::No => Ballot::No,
            Choice::Abstain => Ballot::Abstain,
        }
    }
}

/// `Open` is the only non-terminal state; a vote leaves it at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome { Open, Kicked, Failed, TimedOut }

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Open)
    }
}

/// Smallest `k` in `1..=n` with `k / n >= 0.6`, compared in `f64` so that
/// ratios landing exactly on the cutoff count as reaching it.
pub fn threshold_for(n: usize) -> u32 {
    (1..=n)
        .find(|&k| k as f64 / n as f64 >= THRESHOLD_RATIO)
        .map_or(0, |k| k as u32)
}

/// The voters allowed to take part, with the defendant kept apart from the
/// free-choice voters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster<T: Eq + Hash> {
    pub voters: HashSet<T>,
    pub defendant: T,
}

impl<T: Clone + Eq + Hash> Roster<T> {
    pub fn new(voters: impl IntoIterator<Item = T>, defendant: T) -> Self {
        let voters = voters.into_iter().filter(|v| *v != defendant).collect();
        Self { voters, defendant }
    }

    pub fn is_empty(&self) -> bool { self.voters.is_empty() }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
}

impl Tally {
    fn record(&mut self, ballot: Ballot) {
        match ballot {
            Ballot::Yes => self.yes += 1,
            Ballot::No => self.no += 1,
            Ballot::Abstain => self.abstain += 1,
            Ballot::Unset => {}
        }
    }

    pub fn cast(&self) -> u32 { self.yes + self.no + self.abstain }
}

#[derive(Debug, Clone)]
pub struct VoteKick<T: Clone + Eq + Hash> {
    ballots: HashMap<T, Ballot>,
    defendant: T,
    tally: Tally,
    threshold: u32,
    outcome: Outcome,
}

impl<T: Clone + Eq + Hash + Debug> VoteKick<T> {
    /// Opens a vote over `voters` plus the defendant, whose ballot is fixed to
    /// `No`. The outcome is evaluated once right away, so a roster too small to
    /// ever reach the threshold comes back already `Failed`.
    pub fn new(voters: impl IntoIterator<Item = T>, defendant: T) -> Self {
        let mut ballots: HashMap<T, Ballot> = voters.into_iter()
            .map(|v| (v, Ballot::Unset))
            .collect();
        ballots.insert(defendant.clone(), Ballot::No);

        let mut tally = Tally::default();
        tally.record(Ballot::No);

        let mut vote = Self {
            threshold: threshold_for(ballots.len()),
            ballots,
            defendant,
            tally,
            outcome: Outcome::Open,
        };
        vote.evaluate();
        vote
    }

    pub fn from_roster(roster: Roster<T>) -> Self {
        Self::new(roster.voters, roster.defendant)
    }

    pub fn cast_ballot(&mut self, voter: &T, choice: Choice) -> Result<Outcome, BallotError<T>> {
        if *voter == self.defendant {
            return Err(BallotError::InvalidVoter(voter.clone()));
        }
        if self.outcome.is_terminal() {
            return Err(BallotError::NotEligible(voter.clone()));
        }
        let slot = self.ballots.get_mut(voter)
            .ok_or_else(|| BallotError::NotEligible(voter.clone()))?;
        if *slot != Ballot::Unset {
            return Err(BallotError::AlreadyVoted(voter.clone()));
        }

        let ballot = Ballot::from(choice);
        *slot = ballot;
        self.tally.record(ballot);
        Ok(self.evaluate())
    }

    fn evaluate(&mut self) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        if self.threshold_met() {
            self.outcome = Outcome::Kicked;
        } else if self.cannot_pass() {
            self.outcome = Outcome::Failed;
        }
        self.outcome
    }

    fn threshold_met(&self) -> bool {
        self.tally.yes >= self.threshold
    }

    // A best case that lands exactly on the cutoff still fails.
    fn cannot_pass(&self) -> bool {
        let n = self.ballots.len() as f64;
        let current_yes = f64::from(self.tally.yes) / n;
        let highest_yes = f64::from(self.remaining()) / n;
        current_yes + highest_yes <= THRESHOLD_RATIO
    }

    /// Moves an open vote to `TimedOut`. Returns `false` if it had already ended.
    pub fn time_out(&mut self) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        self.outcome = Outcome::TimedOut;
        true
    }

    pub fn remaining(&self) -> u32 {
        (self.ballots.len() as u32).saturating_sub(self.tally.cast())
    }

    pub fn status(&self) -> VoteStatus {
        VoteStatus {
            yes: self.tally.yes,
            no: self.tally.no,
            abstain: self.tally.abstain,
            remaining: self.remaining(),
            threshold: self.threshold,
            total: self.ballots.len() as u32,
        }
    }

    pub fn ballot_of(&self, voter: &T) -> Option<Ballot> { self.ballots.get(voter).copied() }
    pub fn is_eligible(&self, voter: &T) -> bool { self.ballots.contains_key(voter) }
    pub fn defendant(&self) -> &T { &self.defendant }
    pub fn threshold(&self) -> u32 { self.threshold }
    pub fn outcome(&self) -> Outcome { self.outcome }
    pub fn tally(&self) -> Tally { self.tally }
    pub fn eligible_count(&self) -> usize { self.ballots.len() }
}
