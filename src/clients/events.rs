//! Request and response lifecycle events.
//!
//! Every client owns one [`EventEmitter`]. A `request` event is emitted right
//! before a request is sent and a `response` event once its body has been
//! received. Event payloads never carry absent fields: optional values are
//! skipped when serialized.
//!
//! # Example
//!
//! ```rust
//! use clarityboard::{Clarityboard, ClientEvent, EventKind};
//!
//! let client = Clarityboard::new("sk_test").unwrap();
//! let id = client.on(EventKind::Request, |event: &ClientEvent| {
//!     if let ClientEvent::Request(request) = event {
//!         println!("{} {}", request.method, request.path);
//!     }
//! });
//! assert!(client.off(id));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::clients::http_request::HttpMethod;

/// The two lifecycle events a client emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Emitted before a request is sent.
    Request,
    /// Emitted after a response has been fully received.
    Response,
}

impl EventKind {
    /// Returns the event name (`"request"` or `"response"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `request` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestEvent {
    /// The `Clarityboard-Account` request header, if sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// The HTTP method.
    pub method: HttpMethod,
    /// The full request path.
    pub path: String,
}

/// Payload of a `response` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseEvent {
    /// The `clarityboard-version` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// The `clarityboard-account` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// The `idempotency-key` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    /// The HTTP method of the request.
    pub method: HttpMethod,
    /// The full request path.
    pub path: String,
    /// The HTTP status code.
    pub status: u16,
    /// The `request-id` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Milliseconds between issuing the request and receiving the body.
    pub elapsed: u64,
}

/// An event delivered to listeners.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClientEvent {
    /// A request is about to be sent.
    Request(RequestEvent),
    /// A response has been received.
    Response(ResponseEvent),
}

impl ClientEvent {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Request(_) => EventKind::Request,
            Self::Response(_) => EventKind::Response,
        }
    }
}

/// Handle returned by [`EventEmitter::on`], used to remove the listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&ClientEvent) + Send + Sync>;

/// A per-client listener registry.
#[derive(Default)]
pub struct EventEmitter {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, EventKind, Listener)>>,
}

impl EventEmitter {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one event kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, kind, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    /// Delivers an event to every listener registered for its kind.
    ///
    /// Listeners are called outside the registry lock, so a listener may
    /// register or remove listeners (including itself).
    pub fn emit(&self, event: &ClientEvent) {
        let kind = event.kind();
        let matching: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();

        for listener in matching {
            listener(event);
        }
    }

    /// Returns the number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .count()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("request_listeners", &self.listener_count(EventKind::Request))
            .field("response_listeners", &self.listener_count(EventKind::Response))
            .finish()
    }
}
