// crates/factory-client/src/transport/driver.rs

use factory_protocol::{decode_inbound, encode_outbound, InboundEvent, OutboundMessage};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{Link, TransportPreference};

/// Why a connected session ended.
enum PumpExit {
    /// Connection lost; the reason goes into the `disconnect` event.
    Closed(String),
    /// The application dropped its end of a channel.
    AppGone,
}

/// Owns the connection: connects, reconnects with backoff, moves envelopes
/// in both directions and sends heartbeats.
pub struct TransportDriver {
    config: ClientConfig,
    preference_rx: watch::Receiver<TransportPreference>,
    inbound_tx: UnboundedSender<InboundEvent>,
}

impl TransportDriver {
    pub fn new(
        config: ClientConfig,
        preference_rx: watch::Receiver<TransportPreference>,
        inbound_tx: UnboundedSender<InboundEvent>,
    ) -> Self {
        Self {
            config,
            preference_rx,
            inbound_tx,
        }
    }

    /// Run until the application goes away or the reconnect limit is hit.
    pub async fn run(self, mut outbound_rx: UnboundedReceiver<OutboundMessage>) {
        // Number of the next reconnect attempt; 0 before the first connect.
        let mut attempt: u32 = 0;

        loop {
            if self.inbound_tx.is_closed() {
                return;
            }

            if attempt > 0 {
                if let Some(max) = self.config.max_reconnect_attempts {
                    if attempt > max {
                        error!("giving up after {} reconnect attempts", max);
                        self.emit(InboundEvent::Error(format!(
                            "giving up after {} reconnect attempts",
                            max
                        )));
                        return;
                    }
                }

                self.emit(InboundEvent::ReconnectAttempt { attempt });
                if !self.backoff(attempt, &mut outbound_rx).await {
                    return;
                }
            }

            let preference = self.preference_rx.borrow().clone();
            match self.connect_any(&preference).await {
                Ok(link) => {
                    self.emit(InboundEvent::Connect);

                    match self.pump(link, &mut outbound_rx).await {
                        PumpExit::Closed(reason) => {
                            info!("disconnected: {}", reason);
                            self.emit(InboundEvent::Disconnect { reason });
                            attempt = 1;
                        }
                        PumpExit::AppGone => return,
                    }
                }
                Err(e) => {
                    self.emit(InboundEvent::ConnectError(e.to_string()));
                    attempt += 1;
                }
            }
        }
    }

    fn emit(&self, event: InboundEvent) {
        if self.inbound_tx.send(event).is_err() {
            debug!("application gone, dropping event");
        }
    }

    /// Sleep out the reconnect delay. Anything the application sends in
    /// the meantime is dropped. Returns false once the outbound channel is
    /// closed.
    async fn backoff(&self, attempt: u32, outbound_rx: &mut UnboundedReceiver<OutboundMessage>) -> bool {
        let delay = self.config.reconnect_delay(attempt);
        debug!(attempt, "reconnecting in {:?}", delay);

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                msg = outbound_rx.recv() => match msg {
                    Some(msg) => warn!("not connected, dropping {}", msg.name()),
                    None => return false,
                },
            }
        }
    }

    /// Try each mode of the preference in order.
    async fn connect_any(&self, preference: &TransportPreference) -> Result<Link, ClientError> {
        let mut failures = Vec::new();

        for &mode in preference.modes() {
            info!(%mode, "connecting");
            match Link::connect(mode, &self.config).await {
                Ok(link) => {
                    info!(%mode, "connected");
                    return Ok(link);
                }
                Err(e) => {
                    warn!(%mode, "connect failed: {}", e);
                    failures.push(format!("{}: {}", mode, e));
                }
            }
        }

        Err(ClientError::NoTransport(failures.join("; ")))
    }

    async fn pump(
        &self,
        mut link: Link,
        outbound_rx: &mut UnboundedReceiver<OutboundMessage>,
    ) -> PumpExit {
        let mut heartbeat = self.config.heartbeat_interval().map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut ping_sent_at: Option<Instant> = None;

        let exit = loop {
            tokio::select! {
                msg = outbound_rx.recv() => {
                    let Some(msg) = msg else {
                        break PumpExit::AppGone;
                    };
                    if let Err(e) = send(&mut link, &msg).await {
                        break PumpExit::Closed(e.to_string());
                    }
                }

                _ = tick(&mut heartbeat) => {
                    ping_sent_at = Some(Instant::now());
                    if let Err(e) = send(&mut link, &OutboundMessage::Ping).await {
                        break PumpExit::Closed(format!("heartbeat failed: {}", e));
                    }
                }

                received = link.recv() => match received {
                    Ok(Some(text)) => self.handle_text(&text, &mut ping_sent_at),
                    Ok(None) => break PumpExit::Closed("closed by server".to_string()),
                    Err(e) => break PumpExit::Closed(e.to_string()),
                },
            }
        };

        link.close().await;
        exit
    }

    fn handle_text(&self, text: &str, ping_sent_at: &mut Option<Instant>) {
        match decode_inbound(text) {
            Ok(Some(InboundEvent::Pong { latency_ms })) => {
                let latency_ms = latency_ms.or_else(|| {
                    ping_sent_at
                        .take()
                        .map(|sent| sent.elapsed().as_millis() as u64)
                });
                self.emit(InboundEvent::Pong { latency_ms });
            }
            Ok(Some(event)) => {
                debug!(event = event.name(), "received");
                self.emit(event);
            }
            Ok(None) => debug!("ignoring unknown event: {}", text),
            Err(e) => warn!("dropping malformed message: {}", e),
        }
    }
}

/// Encode and send. Encoding failures are logged and skipped; only link
/// errors are returned.
async fn send(link: &mut Link, msg: &OutboundMessage) -> Result<(), ClientError> {
    let text = match encode_outbound(msg) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot encode {}: {}", msg.name(), e);
            return Ok(());
        }
    };
    debug!(event = msg.name(), "sending");
    link.send(text).await
}

/// Next heartbeat tick; never resolves when heartbeats are disabled.
async fn tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
