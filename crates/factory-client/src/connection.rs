// crates/factory-client/src/connection.rs

//! Push-channel lifecycle state and inbound dispatch.
//!
//! ```text
//! Disconnected --start--> Connecting --connect--> Connected
//!      ^                      ^                       |
//!      |                      +--reconnect_attempt----+
//!      +--------connect_error / disconnect------------+
//! ```

use chrono::{DateTime, Local};
use factory_core::CollectionStore;
use factory_protocol::{InboundEvent, OutboundMessage};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::transport::{TransportMode, TransportPreference};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A mutation the server refused. Shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessError {
    pub message: String,
    pub raised_at: DateTime<Local>,
}

pub struct ConnectionManager {
    state: ConnectionState,
    transport_error: Option<String>,
    business_error: Option<BusinessError>,
    online_count: Option<u32>,
    latency_ms: Option<u64>,
    preference_tx: watch::Sender<TransportPreference>,
    outbound_tx: UnboundedSender<OutboundMessage>,
}

impl ConnectionManager {
    /// Create a manager and the receiver the transport driver reads its
    /// mode preference from.
    pub fn new(
        preferred: TransportMode,
        outbound_tx: UnboundedSender<OutboundMessage>,
    ) -> (Self, watch::Receiver<TransportPreference>) {
        let (preference_tx, preference_rx) = watch::channel(TransportPreference::only(preferred));
        let manager = Self {
            state: ConnectionState::Disconnected,
            transport_error: None,
            business_error: None,
            online_count: None,
            latency_ms: None,
            preference_tx,
            outbound_tx,
        };
        (manager, preference_rx)
    }

    /// Mark the connection as in progress. The driver task is already
    /// trying the preferred mode.
    pub fn start(&mut self) {
        if self.state == ConnectionState::Disconnected {
            info!(preference = %self.preference(), "connecting");
            self.state = ConnectionState::Connecting;
        }
    }

    /// Apply one inbound event, in arrival order.
    pub fn dispatch(&mut self, event: InboundEvent, store: &mut CollectionStore) {
        debug!(event = event.name(), "dispatch");

        match event {
            InboundEvent::Connect => {
                info!("connected");
                self.state = ConnectionState::Connected;
                self.transport_error = None;
            }
            InboundEvent::ConnectError(message) => {
                warn!("connect error: {}", message);
                self.state = ConnectionState::Disconnected;
                self.transport_error = Some(message);
            }
            InboundEvent::Error(message) => {
                warn!("transport error: {}", message);
                self.transport_error = Some(message);
            }
            InboundEvent::ReconnectAttempt { attempt } => {
                self.state = ConnectionState::Connecting;
                if self.preference_tx.send_if_modified(|preference| preference.widen()) {
                    info!(attempt, preference = %self.preference(), "transport preference widened");
                } else {
                    debug!(attempt, "reconnecting");
                }
            }
            InboundEvent::Disconnect { reason } => {
                info!("disconnected: {}", reason);
                self.state = ConnectionState::Disconnected;
                self.online_count = None;
            }
            InboundEvent::ServerError { message } => {
                warn!("server refused mutation: {}", message);
                self.business_error = Some(BusinessError {
                    message,
                    raised_at: Local::now(),
                });
            }
            InboundEvent::OnlineCount(count) => {
                self.online_count = Some(count);
            }
            InboundEvent::Pong { latency_ms } => {
                trace!(?latency_ms, "pong");
                if latency_ms.is_some() {
                    self.latency_ms = latency_ms;
                }
            }
            InboundEvent::Snapshot(units) => store.apply_snapshot(units),
            InboundEvent::Inserted(unit) => store.apply_insert(unit),
            InboundEvent::Updated(unit) => {
                let id = unit.id;
                if !store.apply_update(unit) {
                    debug!(%id, "update for unknown unit ignored");
                }
            }
            InboundEvent::Deleted(id) => {
                if !store.apply_delete(id) {
                    debug!(%id, "delete for unknown unit ignored");
                }
            }
        }
    }

    /// Hand a message to the transport. Dropped, with a warning, unless
    /// connected. Returns whether it was handed off.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if self.state != ConnectionState::Connected {
            warn!("not connected, dropping {}", msg.name());
            return false;
        }

        let name = msg.name();
        if self.outbound_tx.send(msg).is_err() {
            warn!("transport gone, dropping {}", name);
            return false;
        }
        debug!(event = name, "queued");
        true
    }

    pub fn dismiss_business_error(&mut self) {
        self.business_error = None;
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn transport_error(&self) -> Option<&str> {
        self.transport_error.as_deref()
    }

    pub fn business_error(&self) -> Option<&BusinessError> {
        self.business_error.as_ref()
    }

    pub fn online_count(&self) -> Option<u32> {
        self.online_count
    }

    pub fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }

    pub fn preference(&self) -> TransportPreference {
        self.preference_tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{GeneratorUnit, UnitId};
    use tokio::sync::mpsc;

    fn manager() -> (
        ConnectionManager,
        watch::Receiver<TransportPreference>,
        mpsc::UnboundedReceiver<OutboundMessage>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (manager, preference_rx) = ConnectionManager::new(TransportMode::WebSocket, tx);
        (manager, preference_rx, rx)
    }

    #[test]
    fn lifecycle_transitions() {
        let (mut conn, _pref, _rx) = manager();
        let mut store = CollectionStore::new();
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        conn.start();
        assert_eq!(conn.state(), ConnectionState::Connecting);

        conn.dispatch(InboundEvent::ConnectError("refused".into()), &mut store);
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.transport_error(), Some("refused"));

        conn.dispatch(InboundEvent::ReconnectAttempt { attempt: 1 }, &mut store);
        assert_eq!(conn.state(), ConnectionState::Connecting);

        conn.dispatch(InboundEvent::Connect, &mut store);
        assert!(conn.is_connected());
        assert_eq!(conn.transport_error(), None);
    }

    #[test]
    fn error_event_keeps_state() {
        let (mut conn, _pref, _rx) = manager();
        let mut store = CollectionStore::new();
        conn.dispatch(InboundEvent::Connect, &mut store);

        conn.dispatch(InboundEvent::Error("glitch".into()), &mut store);
        assert!(conn.is_connected());
        assert_eq!(conn.transport_error(), Some("glitch"));
    }

    #[test]
    fn preference_is_published_to_driver() {
        let (mut conn, pref_rx, _rx) = manager();
        let mut store = CollectionStore::new();

        assert_eq!(pref_rx.borrow().modes(), &[TransportMode::WebSocket]);
        conn.dispatch(InboundEvent::ReconnectAttempt { attempt: 1 }, &mut store);
        assert_eq!(
            pref_rx.borrow().modes(),
            &[TransportMode::Tcp, TransportMode::WebSocket]
        );
    }

    #[test]
    fn send_requires_connection() {
        let (mut conn, _pref, mut rx) = manager();
        let mut store = CollectionStore::new();

        assert!(!conn.send(OutboundMessage::DeleteUnit(UnitId(1))));
        assert!(rx.try_recv().is_err());

        conn.dispatch(InboundEvent::Connect, &mut store);
        assert!(conn.send(OutboundMessage::DeleteUnit(UnitId(1))));
        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::DeleteUnit(UnitId(1)));
    }

    #[test]
    fn store_events_reach_the_replica() {
        let (mut conn, _pref, _rx) = manager();
        let mut store = CollectionStore::new();

        conn.dispatch(
            InboundEvent::Snapshot(vec![GeneratorUnit::new(1, "a", 1, 10, vec![2])]),
            &mut store,
        );
        conn.dispatch(
            InboundEvent::Inserted(GeneratorUnit::new(2, "b", 1, 10, vec![])),
            &mut store,
        );
        conn.dispatch(
            InboundEvent::Updated(GeneratorUnit::new(9, "ghost", 1, 10, vec![])),
            &mut store,
        );
        conn.dispatch(InboundEvent::Deleted(UnitId(1)), &mut store);

        assert_eq!(store.ids(), vec![UnitId(2)]);
    }

    #[test]
    fn presence_and_latency() {
        let (mut conn, _pref, _rx) = manager();
        let mut store = CollectionStore::new();

        conn.dispatch(InboundEvent::OnlineCount(4), &mut store);
        conn.dispatch(InboundEvent::Pong { latency_ms: Some(12) }, &mut store);
        conn.dispatch(InboundEvent::Pong { latency_ms: None }, &mut store);
        assert_eq!(conn.online_count(), Some(4));
        assert_eq!(conn.latency_ms(), Some(12));

        conn.dispatch(InboundEvent::Disconnect { reason: "bye".into() }, &mut store);
        assert_eq!(conn.online_count(), None);
    }
}
