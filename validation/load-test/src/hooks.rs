//! Lifecycle hooks exported to the load-testing engine.
//!
//! Every hook takes a [`Done`] token and signals it exactly once after its
//! side effects are in place. A hook that fails returns the error and drops
//! the token unsignalled, leaving its outputs untouched.

use std::sync::Arc;

use serde_json::Value;
use session_common::SessionResult;
use tracing::{debug, instrument, warn};

use crate::config::HookConfig;
use crate::context::{Context, Done, Events, HookEvent, Params};
use crate::ids::IdGenerator;
use crate::registrar::SessionRegistrar;
use crate::url_queue::UrlQueue;

/// Body field overwritten with a random game id.
pub const GAME_ID_FIELD: &str = "game_id";
/// Body field overwritten with a random user id.
pub const USER_ID_FIELD: &str = "user_id";

/// Session registration and websocket url hooks.
pub struct SessionHooks {
    registrar: SessionRegistrar,
    queue: UrlQueue,
    ids: Arc<IdGenerator>,
}

impl SessionHooks {
    pub fn new(registrar: SessionRegistrar, queue: UrlQueue, ids: Arc<IdGenerator>) -> Self {
        Self {
            registrar,
            queue,
            ids,
        }
    }

    /// Build hooks from configuration around an existing url queue.
    pub fn from_config(config: HookConfig, queue: UrlQueue) -> SessionResult<Self> {
        let ids = Arc::new(IdGenerator::new(config.seed, config.id_range));
        let registrar = SessionRegistrar::new(config)?;
        Ok(Self::new(registrar, queue, ids))
    }

    pub fn queue(&self) -> &UrlQueue {
        &self.queue
    }

    pub fn registrar(&self) -> &SessionRegistrar {
        &self.registrar
    }

    /// Register a session and point `params.target` at its websocket.
    #[instrument(skip_all)]
    pub async fn connect(
        &self,
        params: &mut Params,
        _context: &mut Context,
        done: Done,
    ) -> SessionResult<()> {
        let request = self.ids.next_request();
        let target = self.registrar.register_target(request).await?;

        debug!(target = %target, "Connection target set");
        params.target = Some(target);

        done.signal();
        Ok(())
    }

    /// Push the context's websocket url onto the shared queue.
    #[instrument(skip_all)]
    pub async fn set_web_socket_url(
        &self,
        context: &mut Context,
        events: &Events,
        done: Done,
    ) -> SessionResult<()> {
        match context.web_socket_url() {
            Some(url) => {
                let pending = self.queue.push(url);
                debug!(url = %url, pending, "Websocket url queued");
                events.emit(HookEvent::Enqueued { pending });
            }
            None => warn!("No websocket url in context, nothing queued"),
        }

        done.signal();
        Ok(())
    }

    /// Pop the head of the shared queue into the context. An empty queue
    /// leaves the context as it was.
    #[instrument(skip_all)]
    pub async fn get_web_socket_url(
        &self,
        context: &mut Context,
        events: &Events,
        done: Done,
    ) -> SessionResult<()> {
        match self.queue.pop() {
            Some(url) => {
                debug!(url = %url, "Websocket url dequeued");
                context.set_web_socket_url(url);
                events.emit(HookEvent::Dequeued {
                    pending: self.queue.len(),
                });
            }
            None => {
                debug!("Websocket url queue empty");
                events.emit(HookEvent::QueueEmpty);
            }
        }

        done.signal();
        Ok(())
    }

    /// Overwrite `game_id` and `user_id` in the request body with fresh ids.
    #[instrument(skip_all)]
    pub async fn fill_parameters(
        &self,
        params: &mut Params,
        _context: &mut Context,
        _events: &Events,
        done: Done,
    ) -> SessionResult<()> {
        let (game_id, user_id) = self.ids.next_pair();

        params
            .json
            .insert(GAME_ID_FIELD.to_string(), Value::from(game_id));
        params
            .json
            .insert(USER_ID_FIELD.to_string(), Value::from(user_id));

        done.signal();
        Ok(())
    }

    /// Unregister the session whose url is stored in the context.
    #[instrument(skip_all)]
    pub async fn disconnect(
        &self,
        context: &mut Context,
        events: &Events,
        done: Done,
    ) -> SessionResult<()> {
        if let Some(url) = context.web_socket_url() {
            let session_id = self.registrar.unregister(url).await?;
            events.emit(HookEvent::Unregistered { session_id });
        } else {
            debug!("No websocket url in context, nothing to unregister");
        }

        done.signal();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{HookName, WEB_SOCKET_URL_VAR};

    fn offline_hooks(queue: UrlQueue) -> SessionHooks {
        // Port 9 (discard) is never contacted by the queue and id hooks
        let config = HookConfig::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        SessionHooks::from_config(config, queue).unwrap()
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips_through_queue() {
        let hooks = offline_hooks(UrlQueue::new());
        let events = Events::none();

        let mut producer = Context::new();
        producer.set_web_socket_url("ws://host/ws/a");
        let (done, completion) = Done::channel(HookName::SetWebSocketUrl);
        hooks
            .set_web_socket_url(&mut producer, &events, done)
            .await
            .unwrap();
        completion.wait().await.unwrap();

        let mut consumer = Context::new();
        let (done, completion) = Done::channel(HookName::GetWebSocketUrl);
        hooks
            .get_web_socket_url(&mut consumer, &events, done)
            .await
            .unwrap();
        completion.wait().await.unwrap();

        assert_eq!(consumer.web_socket_url(), Some("ws://host/ws/a"));
        assert!(hooks.queue().is_empty());
    }

    #[tokio::test]
    async fn test_set_without_url_still_signals() {
        let hooks = offline_hooks(UrlQueue::new());
        let mut context = Context::new();
        let (done, completion) = Done::channel(HookName::SetWebSocketUrl);

        hooks
            .set_web_socket_url(&mut context, &Events::none(), done)
            .await
            .unwrap();

        completion.wait().await.unwrap();
        assert!(hooks.queue().is_empty());
        assert!(!context.vars.contains_key(WEB_SOCKET_URL_VAR));
    }

    #[tokio::test]
    async fn test_fill_parameters_keeps_other_fields() {
        let hooks = offline_hooks(UrlQueue::new());
        let mut params = Params::new();
        params
            .json
            .insert("message".to_string(), Value::from("e2e4"));
        params.json.insert(GAME_ID_FIELD.to_string(), Value::from(500));

        let (done, completion) = Done::channel(HookName::FillParameters);
        hooks
            .fill_parameters(&mut params, &mut Context::new(), &Events::none(), done)
            .await
            .unwrap();
        completion.wait().await.unwrap();

        assert_eq!(params.json["message"], "e2e4");
        assert!(params.json_u64(GAME_ID_FIELD).unwrap() < 100);
        assert!(params.json_u64(USER_ID_FIELD).unwrap() < 100);
    }

    #[tokio::test]
    async fn test_disconnect_without_url_is_noop() {
        let hooks = offline_hooks(UrlQueue::new());
        let (events, mut rx) = Events::channel();
        let (done, completion) = Done::channel(HookName::Disconnect);

        hooks
            .disconnect(&mut Context::new(), &events, done)
            .await
            .unwrap();

        completion.wait().await.unwrap();
        drop(events);
        assert_eq!(rx.recv().await, None);
    }
}
