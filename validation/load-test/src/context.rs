//! Values the host engine passes into hooks: per-user variables, outgoing
//! request parameters, the event channel and the completion token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use session_common::{SessionError, SessionResult};
use tokio::sync::{mpsc, oneshot};

/// Context variable holding a session's websocket url.
pub const WEB_SOCKET_URL_VAR: &str = "webSocketUrl";

/// Per-virtual-user variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub vars: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored websocket url, if it is set to a string.
    pub fn web_socket_url(&self) -> Option<&str> {
        self.vars.get(WEB_SOCKET_URL_VAR).and_then(Value::as_str)
    }

    pub fn set_web_socket_url(&mut self, url: impl Into<String>) {
        self.vars
            .insert(WEB_SOCKET_URL_VAR.to_string(), Value::String(url.into()));
    }
}

/// Outgoing request parameters of a scenario step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub json: Map<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an unsigned integer field of the JSON body.
    pub fn json_u64(&self, field: &str) -> Option<u64> {
        self.json.get(field).and_then(Value::as_u64)
    }
}

/// Notifications hooks send back to the host engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Registered { target: String },
    Enqueued { pending: usize },
    Dequeued { pending: usize },
    QueueEmpty,
    Unregistered { session_id: String },
}

/// Event sink handed to hooks. Emitting without a receiver is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Events {
    tx: Option<mpsc::UnboundedSender<HookEvent>>,
}

impl Events {
    /// An event sink that discards everything.
    pub fn none() -> Self {
        Self::default()
    }

    /// An event sink paired with its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HookEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn emit(&self, event: HookEvent) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is listening
            let _ = tx.send(event);
        }
    }
}

/// Names under which the hooks are exported to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    Connect,
    FillParameters,
    SetWebSocketUrl,
    GetWebSocketUrl,
    Disconnect,
}

impl HookName {
    pub const ALL: [HookName; 5] = [
        HookName::Connect,
        HookName::FillParameters,
        HookName::SetWebSocketUrl,
        HookName::GetWebSocketUrl,
        HookName::Disconnect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookName::Connect => "connect",
            HookName::FillParameters => "fillParameters",
            HookName::SetWebSocketUrl => "setWebSocketUrl",
            HookName::GetWebSocketUrl => "getWebSocketUrl",
            HookName::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SessionError::UnknownHook(s.to_string()))
    }
}

/// Single-use completion signal handed to a hook.
///
/// Signalling consumes the token. Dropping it unsignalled tells the host
/// the hook did not complete.
pub struct Done {
    hook: HookName,
    callback: Box<dyn FnOnce(HookName) + Send>,
}

impl Done {
    /// Wrap an arbitrary host callback.
    pub fn new(hook: HookName, callback: impl FnOnce(HookName) + Send + 'static) -> Self {
        Self {
            hook,
            callback: Box::new(callback),
        }
    }

    /// A token paired with a future that resolves once it is signalled.
    pub fn channel(hook: HookName) -> (Self, Completion) {
        let (tx, rx) = oneshot::channel();
        let done = Self::new(hook, move |name| {
            let _ = tx.send(name);
        });
        (done, Completion { hook, rx })
    }

    pub fn hook(&self) -> HookName {
        self.hook
    }

    pub fn signal(self) {
        (self.callback)(self.hook)
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done").field("hook", &self.hook).finish()
    }
}

/// Host side of [`Done::channel`].
#[derive(Debug)]
pub struct Completion {
    hook: HookName,
    rx: oneshot::Receiver<HookName>,
}

impl Completion {
    /// Wait for the token. Fails if it was dropped without signalling.
    pub async fn wait(self) -> SessionResult<()> {
        self.rx
            .await
            .map(|_| ())
            .map_err(|_| SessionError::NotSignalled(self.hook.to_string()))
    }
}
