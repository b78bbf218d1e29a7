//! Host-side hook invocation.
//!
//! The runner plays the engine's part of the contract: it hands each hook a
//! fresh [`Done`] token and only reports success once the hook returned
//! `Ok` and signalled.

use std::sync::Arc;
use std::time::Instant;

use session_common::SessionResult;
use tracing::{debug, instrument, warn};

use crate::context::{Context, Done, Events, HookName, Params};
use crate::hooks::SessionHooks;

/// Invokes hooks by name on behalf of one or more virtual users.
#[derive(Clone)]
pub struct HookRunner {
    hooks: Arc<SessionHooks>,
}

impl HookRunner {
    pub fn new(hooks: Arc<SessionHooks>) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &SessionHooks {
        &self.hooks
    }

    /// Run a single hook and wait for its completion signal.
    #[instrument(skip(self, params, context, events), fields(hook = %name))]
    pub async fn run(
        &self,
        name: HookName,
        params: &mut Params,
        context: &mut Context,
        events: &Events,
    ) -> SessionResult<()> {
        let start = Instant::now();
        let (done, completion) = Done::channel(name);

        let result = match name {
            HookName::Connect => self.hooks.connect(params, context, done).await,
            HookName::FillParameters => {
                self.hooks
                    .fill_parameters(params, context, events, done)
                    .await
            }
            HookName::SetWebSocketUrl => {
                self.hooks.set_web_socket_url(context, events, done).await
            }
            HookName::GetWebSocketUrl => {
                self.hooks.get_web_socket_url(context, events, done).await
            }
            HookName::Disconnect => self.hooks.disconnect(context, events, done).await,
        };

        if let Err(e) = result {
            warn!(error = %e, "Hook failed");
            return Err(e);
        }

        completion.wait().await?;
        debug!(elapsed_us = start.elapsed().as_micros() as u64, "Hook completed");
        Ok(())
    }

    /// Run a hook given its exported name.
    pub async fn run_named(
        &self,
        name: &str,
        params: &mut Params,
        context: &mut Context,
        events: &Events,
    ) -> SessionResult<()> {
        let name: HookName = name.parse()?;
        self.run(name, params, context, events).await
    }

    /// Run hooks in order, stopping at the first failure.
    pub async fn run_sequence(
        &self,
        names: &[HookName],
        params: &mut Params,
        context: &mut Context,
        events: &Events,
    ) -> SessionResult<()> {
        for name in names {
            self.run(*name, params, context, events).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HookConfig;
    use crate::url_queue::UrlQueue;
    use session_common::SessionError;

    fn offline_runner() -> HookRunner {
        let config = HookConfig::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        let hooks = SessionHooks::from_config(config, UrlQueue::new()).unwrap();
        HookRunner::new(Arc::new(hooks))
    }

    #[tokio::test]
    async fn test_run_named_rejects_unknown_hook() {
        let runner = offline_runner();
        let err = runner
            .run_named(
                "afterResponse",
                &mut Params::new(),
                &mut Context::new(),
                &Events::none(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownHook(_)));
    }

    #[tokio::test]
    async fn test_run_sequence_queue_hooks() {
        let runner = offline_runner();
        let mut context = Context::new();
        context.set_web_socket_url("ws://127.0.0.1:9/ws/abc");

        runner
            .run_sequence(
                &[HookName::SetWebSocketUrl, HookName::FillParameters],
                &mut Params::new(),
                &mut context,
                &Events::none(),
            )
            .await
            .unwrap();

        assert_eq!(runner.hooks().queue().len(), 1);
    }
}
