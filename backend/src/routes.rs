use std::sync::Arc;
use rocket::{State, Build, Rocket, get, post, delete, routes, catchers, serde::json::Json};
use tracing::{debug, instrument};
use shared::error::VoteKickError;
use shared::models::{Announcement, BallotRequest, Member, SessionSnapshot, StartVoteRequest};
use crate::{
    catchers::{bad_request, conflict, forbidden, internal_error, not_found, unprocessable},
    collaborators::{ChannelFeed, EligibilityProvider, Mover, Notifier, RoleBook, VoiceChannelPolicy},
    config::VoteKickConfig,
    error::ApiError,
    registry::SessionRegistry,
};

pub struct AppState {
    pub registry: SessionRegistry,
    pub feed: Arc<ChannelFeed>,
    pub eligibility: Arc<dyn EligibilityProvider>,
}

impl AppState {
    pub fn new(config: VoteKickConfig) -> Self {
        Self::with_mover(config, Arc::new(RoleBook::new()))
    }

    pub fn with_mover(config: VoteKickConfig, mover: Arc<dyn Mover>) -> Self {
        let feed = Arc::new(ChannelFeed::new());
        Self {
            registry: SessionRegistry::new(feed.clone(), mover, config),
            feed,
            eligibility: Arc::new(VoiceChannelPolicy),
        }
    }
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/api",
            routes![
                start_vote,
                cast_ballot,
                get_active,
                clear_vote,
                hold_status,
                announcements
            ],
        )
        .register(
            "/",
            catchers![
                forbidden,
                conflict,
                bad_request,
                unprocessable,
                internal_error,
                not_found
            ],
        )
}

#[instrument(skip(state, request), fields(target = %request.target))]
#[post("/votekick", format = "json", data = "<request>")]
pub async fn start_vote(
    state: &State<AppState>,
    request: Json<StartVoteRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let request = request.into_inner();
    debug!("Building roster from {} channel members", request.members.len());

    let roster = state.eligibility.roster(&request.members, &request.target)
        .map_err(|e| {
            let err = VoteKickError::from(e);
            state.feed.announce(err.to_string());
            err
        })?;

    Ok(Json(state.registry.start_session(roster)?))
}

#[instrument(skip(state, ballot), fields(voter = %ballot.voter))]
#[post("/votekick/ballot", format = "json", data = "<ballot>")]
pub async fn cast_ballot(
    state: &State<AppState>,
    ballot: Json<BallotRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let BallotRequest { voter, choice } = ballot.into_inner();
    Ok(Json(state.registry.cast_ballot(&voter, choice).await?))
}

#[get("/votekick")]
pub async fn get_active(state: &State<AppState>) -> Json<Option<SessionSnapshot>> {
    Json(state.registry.active())
}

#[delete("/votekick")]
pub async fn clear_vote(state: &State<AppState>) -> Json<Option<SessionSnapshot>> {
    Json(state.registry.clear_session())
}

#[get("/votekick/hold/<member_id>")]
pub async fn hold_status(state: &State<AppState>, member_id: u64) -> Json<bool> {
    Json(state.registry.is_on_hold(&Member::new(member_id, String::new())))
}

#[get("/announcements")]
pub async fn announcements(state: &State<AppState>) -> Json<Vec<Announcement>> {
    Json(state.feed.recent())
}
