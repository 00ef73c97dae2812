use backend::{config::{VoteKickConfig, HOLD_KEY, VOTE_TIMEOUT_KEY}, routes::{build_rocket, AppState}};
use tracing::info;

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting VoteKick server");

    let config = VoteKickConfig::from_lookup(|key| secret_store.get(key));
    info!(
        "⏱️ Votes time out after {}s ({}), holds last {}s ({})",
        config.vote_timeout.as_secs(),
        VOTE_TIMEOUT_KEY,
        config.hold_duration.as_secs(),
        HOLD_KEY
    );

    let rocket = build_rocket(AppState::new(config));

    Ok(rocket.into())
}
