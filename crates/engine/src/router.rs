// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event trigger router: a background consumer over a generic
//! `EventSource`, dispatching each message to missions whose `schedule` is
//! `{source, event}` and matches.
//!
//! No concrete message-bus crate is part of this ecosystem's stack, so
//! the router is built against a small trait; [`PollingEventSource`] is the
//! standalone-operation stub, fed through a channel instead of a real
//! broker connection. A real AMQP/Kafka/etc. binding plugs in by
//! implementing [`EventSource`] without touching [`Router`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One message off the bus: `attributes.omsplatformId` → `source`,
/// `messageText` → `event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub source: String,
    pub event: String,
}

#[async_trait]
pub trait EventSource: Send {
    /// `None` signals the source is exhausted and the consumer task exits.
    async fn recv(&mut self) -> Option<BusMessage>;
}

/// Standalone-operation stub: a message is "received" only when fed
/// through the paired sender, so a test or an admin hook can inject
/// synthetic bus traffic without a real broker connection.
pub struct PollingEventSource {
    rx: mpsc::UnboundedReceiver<BusMessage>,
}

impl PollingEventSource {
    pub fn channel() -> (mpsc::UnboundedSender<BusMessage>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl EventSource for PollingEventSource {
    async fn recv(&mut self) -> Option<BusMessage> {
        self.rx.recv().await
    }
}

/// A mission's subscription on the router. Held by the mission record;
/// consumed on detach. At most one handle per mission.
pub struct ListenerHandle(String);

#[derive(Default)]
pub struct Router {
    listeners: Mutex<HashMap<String, (String, String)>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `mission` to fire when a message with the given
    /// `(source, event)` arrives. Attached only at activation, not at
    /// mission construction.
    pub fn attach(&self, mission: &str, source: &str, event: &str) -> ListenerHandle {
        self.listeners.lock().insert(mission.to_string(), (source.to_string(), event.to_string()));
        ListenerHandle(mission.to_string())
    }

    /// Detach on deactivation or deletion. Consumes the handle so a
    /// mission can hold at most one live subscription at a time.
    pub fn detach(&self, handle: ListenerHandle) {
        self.listeners.lock().remove(&handle.0);
    }

    /// Mission names subscribed to `message`'s `(source, event)` pair.
    pub fn dispatch(&self, message: &BusMessage) -> Vec<String> {
        self.listeners
            .lock()
            .iter()
            .filter(|(_, (source, event))| *source == message.source && *event == message.event)
            .map(|(mission, _)| mission.clone())
            .collect()
    }

    /// Drive `source` to completion on its own task, calling `on_message`
    /// with the matched mission names for each message. The callback must
    /// not block.
    pub fn spawn_consumer<S>(
        router: Arc<Router>,
        mut source: S,
        on_message: impl Fn(Vec<String>) + Send + 'static,
    ) -> tokio::task::JoinHandle<()>
    where
        S: EventSource + 'static,
    {
        tokio::spawn(async move {
            while let Some(message) = source.recv().await {
                let matched = router.dispatch(&message);
                if !matched.is_empty() {
                    on_message(matched);
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
