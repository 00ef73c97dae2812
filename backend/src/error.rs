use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::error::{Error as ErrorBody, ErrorCode, VoteKickError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    VoteKick(#[from] VoteKickError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::VoteKick(e) => match e.code() {
                ErrorCode::InvalidInput | ErrorCode::ValidationFailed => Status::BadRequest,
                ErrorCode::NotEligible => Status::Forbidden,
                ErrorCode::NotFound => Status::NotFound,
                ErrorCode::Conflict => Status::Conflict,
            },
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let body = match &self {
            ApiError::VoteKick(e) => ErrorBody::from(e),
        };

        rocket::Response::build_from(Json(body).respond_to(req)?)
            .status(status)
            .ok()
    }
}
