//! Common types shared by the websocket session load-test tooling.

pub mod error;
pub mod register;

pub use error::{SessionError, SessionResult};
pub use register::{
    session_id_from_url, unregister_path, RegisterRequest, RegisterResponse,
    RegistrationOutcome, HEALTH_PATH, REGISTER_PATH, URL_FIELD,
};
