//! Load-test hooks for the websocket game server.
//!
//! This crate provides:
//! - Session registration over HTTP and websocket target construction
//! - A shared FIFO queue handing websocket urls between scenario steps
//! - Random game/user ids for request payloads
//! - A runner implementing the engine's done-signal hook contract

pub mod config;
pub mod context;
pub mod hooks;
pub mod ids;
pub mod registrar;
pub mod runner;
pub mod url_queue;

pub use config::HookConfig;
pub use context::{Completion, Context, Done, Events, HookEvent, HookName, Params};
pub use hooks::SessionHooks;
pub use ids::{random_id, IdGenerator};
pub use registrar::SessionRegistrar;
pub use runner::HookRunner;
pub use url_queue::UrlQueue;
