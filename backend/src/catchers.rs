use rocket::{Request, catch, serde::json::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorMessage {
    error: String,
    status: u16,
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "You are not an active participant of this VoteKick.".into(),
        status: 403
    })
}

#[catch(409)]
pub fn conflict(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "A VoteKick is already active or the ballot was already cast.".into(),
        status: 409
    })
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "Invalid request parameters.".into(),
        status: 400
    })
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "Malformed VoteKick command.".into(),
        status: 422
    })
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "An internal server error occurred.".into(),
        status: 500
    })
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorMessage> {
    let error_msg = match req.uri().path().segments().last() {
        Some("votekick") | Some("ballot") => "There is no active VoteKick.",
        _ => "The requested resource was not found."
    };

    Json(ErrorMessage {
        error: error_msg.into(),
        status: 404
    })
}
