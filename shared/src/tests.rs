#[cfg(test)]
mod tests {
    use crate::error::{ErrorCode, StartError, VoteKickError};
    use crate::models::Member;
    use crate::validation::{build_roster, ValidationError};
    use crate::vote_logic::{threshold_for, Ballot, BallotError, Choice, Outcome, Roster, VoteKick};

    fn vote(voters: &[&'static str], defendant: &'static str) -> VoteKick<&'static str> {
        VoteKick::new(voters.iter().copied(), defendant)
    }

    fn cast_all(v: &mut VoteKick<&'static str>, ballots: &[(&'static str, Choice)]) -> Outcome {
        ballots.iter().fold(v.outcome(), |_, (voter, choice)| v.cast_ballot(voter, *choice).unwrap())
    }

    #[test]
    fn test_threshold_scan() {
        assert_eq!(threshold_for(1), 1);
        assert_eq!(threshold_for(2), 2);
        assert_eq!(threshold_for(3), 2);
        assert_eq!(threshold_for(4), 3);
        assert_eq!(threshold_for(5), 3);
        assert_eq!(threshold_for(10), 6);
        assert_eq!(threshold_for(11), 7);
        assert_eq!(threshold_for(0), 0);

        for n in 1..200usize {
            let k = threshold_for(n) as usize;
            assert!(k as f64 / n as f64 >= 0.6, "n={n}");
            assert!((k - 1) as f64 / (n as f64) < 0.6, "n={n}");
        }
    }

    #[test]
    fn test_defendant_counts_as_no() {
        let v = vote(&["a", "b", "c", "d"], "x");
        assert_eq!(v.eligible_count(), 5);
        assert_eq!(v.threshold(), 3);
        assert_eq!(v.ballot_of(&"x"), Some(Ballot::No));
        assert_eq!(v.ballot_of(&"a"), Some(Ballot::Unset));
        let status = v.status();
        assert_eq!((status.yes, status.no, status.abstain, status.remaining, status.total), (0, 1, 0, 4, 5));
        assert_eq!(v.outcome(), Outcome::Open);
    }

    #[test]
    fn test_defendant_cannot_vote() {
        let mut v = vote(&["a", "b", "c"], "x");
        assert_eq!(v.cast_ballot(&"x", Choice::Yes), Err(BallotError::InvalidVoter("x")));
        assert_eq!(v.ballot_of(&"x"), Some(Ballot::No));
        assert_eq!(v.tally().yes, 0);
        assert_eq!(v.tally().no, 1);
    }

    #[test]
    fn test_outsider_rejected() {
        let mut v = vote(&["a", "b", "c"], "x");
        assert_eq!(v.cast_ballot(&"z", Choice::Yes), Err(BallotError::NotEligible("z")));
        assert!(!v.is_eligible(&"z"));
        assert_eq!(v.tally().cast(), 1);
    }

    #[test]
    fn test_second_ballot_rejected() {
        let mut v = vote(&["a", "b", "c", "d"], "x");
        assert_eq!(v.cast_ballot(&"a", Choice::Yes), Ok(Outcome::Open));
        let before = v.tally();
        assert_eq!(v.cast_ballot(&"a", Choice::No), Err(BallotError::AlreadyVoted("a")));
        assert_eq!(v.cast_ballot(&"a", Choice::Yes), Err(BallotError::AlreadyVoted("a")));
        assert_eq!(v.tally(), before);
        assert_eq!(v.ballot_of(&"a"), Some(Ballot::Yes));
    }

    #[test]
    fn test_two_member_vote_fails_at_creation() {
        let v = vote(&["a"], "x");
        assert_eq!(v.threshold(), 2);
        assert_eq!(v.outcome(), Outcome::Failed);
    }

    #[test]
    fn test_kicked_as_soon_as_threshold_reached() {
        let voters = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let mut v = vote(&voters, "x");
        assert_eq!(v.threshold(), 6);

        for voter in &voters[..5] {
            assert_eq!(v.cast_ballot(voter, Choice::Yes), Ok(Outcome::Open));
        }
        assert_eq!(v.cast_ballot(&"f", Choice::Yes), Ok(Outcome::Kicked));
        assert_eq!(v.status().remaining, 3);
        assert_eq!(v.cast_ballot(&"g", Choice::Yes), Err(BallotError::NotEligible("g")));
    }

    #[test]
    fn test_small_vote_kicked() {
        let mut v = vote(&["a", "b"], "x");
        assert_eq!(v.outcome(), Outcome::Open);
        let outcome = cast_all(&mut v, &[("a", Choice::Yes), ("b", Choice::Yes)]);
        assert_eq!(outcome, Outcome::Kicked);
    }

    #[test]
    fn test_fails_once_success_unreachable() {
        let mut v = vote(&["a", "b", "c", "d"], "x");
        assert_eq!(v.cast_ballot(&"a", Choice::No), Ok(Outcome::Failed));
        assert_eq!(v.status().no, 2);
        assert_eq!(v.cast_ballot(&"b", Choice::No), Err(BallotError::NotEligible("b")));
        assert_eq!(v.status().no, 2);
    }

    #[test]
    fn test_exact_cutoff_best_case_fails() {
        let voters = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let mut v = vote(&voters, "x");
        assert_eq!(v.cast_ballot(&"a", Choice::Abstain), Ok(Outcome::Open));
        assert_eq!(v.cast_ballot(&"b", Choice::Abstain), Ok(Outcome::Open));
        // six of ten still reachable, which is exactly 60%
        assert_eq!(v.cast_ballot(&"c", Choice::Abstain), Ok(Outcome::Failed));
    }

    #[test]
    fn test_counts_never_exceed_roster() {
        let voters = ["a", "b", "c", "d", "e", "f"];
        let mut v = vote(&voters, "x");
        let choices = [Choice::Yes, Choice::Abstain, Choice::No];
        for (i, voter) in voters.iter().cycle().take(18).enumerate() {
            let _ = v.cast_ballot(voter, choices[i % 3]);
            let t = v.tally();
            assert!(t.cast() as usize <= v.eligible_count());
            assert_eq!(t.cast() + v.remaining(), v.eligible_count() as u32);
        }
    }

    #[test]
    fn test_time_out_is_idempotent() {
        let mut v = vote(&["a", "b", "c"], "x");
        assert!(v.time_out());
        assert_eq!(v.outcome(), Outcome::TimedOut);
        assert!(!v.time_out());
        assert_eq!(v.cast_ballot(&"a", Choice::Yes), Err(BallotError::NotEligible("a")));

        let mut done = vote(&["a"], "x");
        assert!(!done.time_out());
        assert_eq!(done.outcome(), Outcome::Failed);
    }

    #[test]
    fn test_roster_excludes_defendant_from_voters() {
        let roster = Roster::new(["a", "b", "x"], "x");
        assert_eq!(roster.voters.len(), 2);
        let v = VoteKick::from_roster(roster);
        assert_eq!(v.eligible_count(), 3);
        assert_eq!(*v.defendant(), "x");
    }

    #[test]
    fn test_build_roster() {
        let members = vec![
            Member::new(1, "alice"),
            Member::new(2, "bob"),
            Member::bot(3, "helper"),
            Member::new(4, "carol"),
        ];
        let roster = build_roster(&members, "carol").unwrap();
        assert_eq!(roster.defendant.id, 4);
        assert_eq!(roster.voters.len(), 2);
        assert!(roster.voters.iter().all(|m| !m.bot && m.id != 4));

        assert_eq!(build_roster(&members, "dave"), Err(ValidationError::TargetNotPresent("dave".into())));
        assert_eq!(build_roster(&members, "  "), Err(ValidationError::EmptyTarget));

        let alone = build_roster(&members[2..], "carol").unwrap();
        assert!(alone.is_empty());
    }

    #[test]
    fn test_build_roster_shared_name_takes_last() {
        let members = vec![
            Member::new(4, "carol"),
            Member::new(1, "alice"),
            Member::new(7, "carol"),
            Member::new(2, "bob"),
        ];
        let roster = build_roster(&members, "carol").unwrap();
        assert_eq!(roster.defendant.id, 7);
        let mut voters: Vec<u64> = roster.voters.iter().map(|m| m.id).collect();
        voters.sort();
        assert_eq!(voters, vec![1, 2]);
    }

    #[test]
    fn test_member_identity_is_id() {
        assert_eq!(Member::new(7, "old name"), Member::new(7, "new name"));
        assert_ne!(Member::new(7, "same"), Member::new(8, "same"));
        assert_eq!(Member::new(7, "alice").to_string(), "alice");
    }

    #[test]
    fn test_error_notices_and_codes() {
        let err = VoteKickError::from(StartError::TargetOnHold("carol".into()));
        assert_eq!(err.to_string(), "carol is already on hold.");
        assert_eq!(err.code(), ErrorCode::Conflict);

        let err = VoteKickError::from(BallotError::InvalidVoter(Member::new(4, "carol")));
        assert_eq!(err.to_string(), "carol, your vote defaults to 'No'.");
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let body = crate::Error::from(&VoteKickError::Ballot(BallotError::AlreadyVoted(Member::new(1, "alice"))));
        assert_eq!(body.code, ErrorCode::Conflict);
        assert_eq!(body.details.as_deref(), Some("voter id 1"));

        assert_eq!(VoteKickError::NoActiveSession.code(), ErrorCode::NotFound);
        assert_eq!(VoteKickError::from(StartError::NoEligibleVoters).code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_wire_names() {
        let choice: Choice = serde_json::from_str("\"abstain\"").unwrap();
        assert_eq!(choice, Choice::Abstain);
        assert_eq!(serde_json::to_string(&Outcome::TimedOut).unwrap(), "\"timedOut\"");

        let member: Member = serde_json::from_str(r#"{"id": 9, "name": "zed"}"#).unwrap();
        assert!(!member.bot);
    }
}
