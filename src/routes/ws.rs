// WebSocket /ws: one publisher loop per connection, pushing a fresh snapshot every interval.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at, timeout};

use super::AppState;
use crate::collector::MetricsCollector;
use crate::config::StreamingConfig;

/// Why a publisher loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    PeerClosed,
    SendFailed,
    Shutdown,
}

impl fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamEnd::PeerClosed => "peer closed",
            StreamEnd::SendFailed => "send failed",
            StreamEnd::Shutdown => "server shutdown",
        })
    }
}

/// Decrements the active stream count on drop (connect = +1, drop = -1).
struct StreamGuard(Arc<AtomicUsize>);

impl StreamGuard {
    fn register(count: Arc<AtomicUsize>) -> (Self, usize) {
        let n = count.fetch_add(1, Ordering::Relaxed) + 1;
        (Self(count), n)
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub(super) async fn ws_metrics(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let collector = state.collector.clone();
    let streaming = state.config.streaming.clone();
    let active = state.active_streams.clone();
    let shutdown = state.shutdown.clone();
    ws.on_failed_upgrade(|e: axum::Error| tracing::warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| async move {
            match stream_metrics(socket, collector, streaming, active, shutdown).await {
                Ok(reason) => tracing::info!(%reason, "Client disconnected from metrics stream"),
                Err(e) => tracing::info!("Metrics stream error: {}", e),
            }
        })
}

/// Sends one frame; false on transport error or timeout.
async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: Message,
    limit: Duration,
) -> bool {
    matches!(timeout(limit, sink.send(msg)).await, Ok(Ok(())))
}

async fn stream_metrics(
    socket: WebSocket,
    collector: Arc<MetricsCollector>,
    streaming: StreamingConfig,
    active: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<StreamEnd> {
    let (_guard, active_streams) = StreamGuard::register(active);
    tracing::info!(active_streams, "Client connected to metrics stream");

    let (mut sender, mut receiver) = socket.split();
    let send_timeout = streaming.send_timeout();

    if *shutdown.borrow_and_update() {
        let _ = send(&mut sender, Message::Close(None), send_timeout).await;
        return Ok(StreamEnd::Shutdown);
    }

    // First snapshot goes out after one full interval.
    let period = streaming.interval();
    let mut tick = interval_at(Instant::now() + period, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ping_period = streaming.ping_interval();
    let mut ping_interval = interval_at(Instant::now() + ping_period, ping_period);
    ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let metrics = match collector.collect().await {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(error = %e, operation = "collect", "snapshot collection failed, skipping tick");
                        continue;
                    }
                };
                let json = serde_json::to_string(&metrics)?;
                if !send(&mut sender, Message::Text(json.into()), send_timeout).await {
                    return Ok(StreamEnd::SendFailed);
                }
            }
            _ = ping_interval.tick() => {
                if !send(&mut sender, Message::Ping(Bytes::new()), send_timeout).await {
                    return Ok(StreamEnd::SendFailed);
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => return Ok(StreamEnd::PeerClosed),
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "metrics stream read error");
                        return Ok(StreamEnd::PeerClosed);
                    }
                    // pongs and client chatter are ignored
                    Some(Ok(_)) => {}
                }
            }
            // A dropped sender counts as shutdown too.
            _ = shutdown.changed() => {
                let _ = send(&mut sender, Message::Close(None), send_timeout).await;
                return Ok(StreamEnd::Shutdown);
            }
        }
    }
}
