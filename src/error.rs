use crate::navigation::ScreenId;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown screen `{0}`")]
    InvalidScreenId(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("invalid choice `{0}`")]
    InvalidChoice(String),
    #[error("cannot parse unit price from `{0}`")]
    PriceParseError(String),
    #[error("no charger with id {0}")]
    UnknownCharger(u32),
    #[error("no reward with id {0}")]
    UnknownReward(u32),
    #[error("reward {0} is not available")]
    RewardUnavailable(u32),
    #[error("reward {reward} needs {required} points, balance is {balance}")]
    RewardLocked {
        reward: u32,
        required: u64,
        balance: u64,
    },
    #[error("action needs the {expected} screen, current screen is {actual}")]
    NotOnScreen {
        expected: ScreenId,
        actual: ScreenId,
    },
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timer `{0}` needs a running tokio runtime")]
    NoRuntime(&'static str),
    #[error("unable to format metrics")]
    FormatError,
}

impl Error {
    fn status(&self) -> Status {
        match self {
            Error::InvalidScreenId(_)
            | Error::UnknownAction(_)
            | Error::UnknownCharger(_)
            | Error::UnknownReward(_) => Status::NotFound,
            Error::InvalidChoice(_) => Status::UnprocessableEntity,
            Error::RewardUnavailable(_) | Error::RewardLocked { .. } | Error::NotOnScreen { .. } => {
                Status::Conflict
            }
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            log::error!("request failed: {:?}", self);
        } else {
            log::debug!("request rejected: {}", self);
        }

        let error = format!(
            "<html><body><h3>{} {}</h3><code>{}</code></body></html>",
            status.code,
            status.reason().unwrap_or("Error"),
            self
        );
        Response::build()
            .status(status)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
