//! Live order notifications
//!
//! Dashboards connect to `GET /api/events` and receive a Server-Sent Events stream. The first frame is always a
//! `dashboard:init` snapshot; after that every new order is pushed as `order:new` and every change as
//! `order:updated`, with the full order as the payload.
//!
//! The engine's order events are bridged onto a [`NotificationHub`] by the hooks created in
//! [`create_notification_handlers`]. The hub is a broadcast channel, so a slow viewer that falls too far behind skips
//! the events it missed instead of holding everyone else up.
use std::convert::Infallible;

use bytes::Bytes;
use futures::{
    future::BoxFuture,
    stream::{self, Stream, StreamExt},
};
use log::*;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use topup_engine::events::{EventHandlers, EventHooks};

pub const DASHBOARD_INIT_TOPIC: &str = "dashboard:init";
pub const ORDER_NEW_TOPIC: &str = "order:new";
pub const ORDER_UPDATED_TOPIC: &str = "order:updated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub topic: String,
    /// JSON text
    pub payload: String,
}

impl Notification {
    pub fn new<T: Serialize>(topic: &str, payload: &T) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_string(payload)?;
        Ok(Self { topic: topic.to_string(), payload })
    }

    pub fn to_sse_frame(&self) -> Bytes {
        Bytes::from(format!("event: {}\ndata: {}\n\n", self.topic, self.payload))
    }
}

#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `payload` to everyone currently connected. Having nobody to send to is not an error.
    pub fn publish<T: Serialize>(&self, topic: &str, payload: &T) {
        let notification = match Notification::new(topic, payload) {
            Ok(n) => n,
            Err(e) => {
                error!("📬️ Could not serialize the {topic} payload. {e}");
                return;
            },
        };
        match self.sender.send(notification) {
            Ok(n) => trace!("📬️ {topic} sent to {n} viewer(s)"),
            Err(_) => trace!("📬️ No viewers connected. {topic} was not sent."),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Creates engine event handlers that forward order events to the hub.
pub fn create_notification_handlers(hub: NotificationHub, buffer_size: usize) -> EventHandlers {
    let mut hooks = EventHooks::default();
    let created_hub = hub.clone();
    hooks.on_order_created(move |ev| {
        created_hub.publish(ORDER_NEW_TOPIC, &ev.order);
        no_op()
    });
    hooks.on_order_updated(move |ev| {
        hub.publish(ORDER_UPDATED_TOPIC, &ev.order);
        no_op()
    });
    EventHandlers::new(buffer_size, hooks)
}

fn no_op() -> BoxFuture<'static, ()> {
    Box::pin(async {})
}

/// An SSE body that starts with `first` and then relays everything from `rx` until the hub goes away.
pub fn event_stream(
    first: Notification,
    rx: broadcast::Receiver<Notification>,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    let rest = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => return Some((notification.to_sse_frame(), rx)),
                Err(RecvError::Lagged(n)) => {
                    warn!("📬️ A viewer fell behind and missed {n} notification(s)");
                },
                Err(RecvError::Closed) => return None,
            }
        }
    });
    stream::once(async move { first.to_sse_frame() }).chain(rest).map(Ok)
}
