use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;

use crate::sse::SseDecoder;

use super::dispatcher::{ApplyOutcome, Dispatcher};
use super::document::Document;
use super::transport::{ActionTransport, HttpTransport, TransportError};

/// Counters for one push-channel connection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PushStats {
    pub applied: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

impl PushStats {
    fn record(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Applied => self.applied += 1,
            ApplyOutcome::Duplicate => self.duplicates += 1,
            ApplyOutcome::Malformed => self.malformed += 1,
        }
    }
}

/// Reads the server push channel and feeds every frame to a dispatcher.
///
/// Clones share the dispatcher and the counters of the current connection.
pub struct PushReader<D: Document, T> {
    dispatcher: Dispatcher<D, T>,
    stats: Arc<Mutex<PushStats>>,
}

impl<D: Document, T> Clone for PushReader<D, T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<D, T> PushReader<D, T>
where
    D: Document + Send + 'static,
    D::Element: Send,
    T: ActionTransport + 'static,
{
    pub fn new(dispatcher: Dispatcher<D, T>) -> Self {
        Self {
            dispatcher,
            stats: Arc::default(),
        }
    }

    /// Counters for the connection currently (or most recently) pumped.
    pub fn stats(&self) -> PushStats {
        *self.stats.lock()
    }

    fn record(&self, frame: &[u8]) {
        let outcome = self.dispatcher.apply_snapshot_bytes(frame);
        self.stats.lock().record(outcome);
    }

    /// Pump an SSE byte stream until it ends or fails.
    ///
    /// The client is marked connected while the stream is open (which
    /// replays anything queued offline) and disconnected once it closes.
    pub async fn pump<S, B, E>(&self, stream: S) -> PushStats
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        *self.stats.lock() = PushStats::default();
        let mut decoder = SseDecoder::new();
        self.dispatcher.set_connected(true).await;

        futures::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(error = %e, "Push stream failed");
                    break;
                }
            };
            for frame in decoder.feed(chunk.as_ref()) {
                self.record(frame.data.as_bytes());
            }
        }
        if let Some(frame) = decoder.finish() {
            self.record(frame.data.as_bytes());
        }

        self.dispatcher.set_connected(false).await;
        let stats = self.stats();
        tracing::info!(
            applied = stats.applied,
            duplicates = stats.duplicates,
            malformed = stats.malformed,
            "Push stream closed"
        );
        stats
    }
}

impl<D> PushReader<D, HttpTransport>
where
    D: Document + Send + 'static,
    D::Element: Send,
{
    /// Connect to `/_events/{session}` and pump it until it closes.
    pub async fn run(&self, session: &str) -> Result<PushStats, TransportError> {
        let transport = self.dispatcher.transport();
        let url = transport.events_url(session);
        let response = transport
            .client()
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| TransportError::Connect {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                action: "_events".to_string(),
                status: response.status().as_u16(),
            });
        }

        tracing::info!(%url, "Push channel open");
        Ok(self.pump(response.bytes_stream()).await)
    }
}
