//! Paced outbound message queue.
//!
//! Producers (the scheduler and the command handler) push [`Outbound`]
//! messages into a bounded channel; a single [`Emitter`] task writes them to
//! a [`LineSink`] one line at a time, keeping at least the configured pacing
//! delay between two writes so a slow display controller is not flooded.

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use envmon_core::{DiagnosticSummary, IndicatorUpdate};

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// A message bound for the display side.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Per-area level update from the fast tick.
    Indicator(IndicatorUpdate),
    /// Summary from the slow tick.
    Diagnostic(DiagnosticSummary),
    /// One line of a command reply.
    Reply(String),
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Indicator(update) => fmt::Display::fmt(update, f),
            Outbound::Diagnostic(summary) => fmt::Display::fmt(summary, f),
            Outbound::Reply(line) => f.write_str(line),
        }
    }
}

/// Destination for outbound lines.
#[async_trait]
pub trait LineSink: Send {
    /// Write one line; the sink adds the terminator.
    async fn send_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`LineSink`] over any async writer, newline-terminated and flushed per line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> LineSink for WriterSink<W> {
    async fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Receiving end of the outbound queue.
#[derive(Debug)]
pub struct Emitter {
    rx: mpsc::Receiver<Outbound>,
    pacing: Duration,
}

/// Create the outbound queue.
pub fn channel(capacity: usize, pacing: Duration) -> (mpsc::Sender<Outbound>, Emitter) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, Emitter { rx, pacing })
}

impl Emitter {
    /// Minimum gap between two writes.
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Write queued messages until every sender is dropped.
    ///
    /// Returns the number of lines written. A sink error stops the emitter.
    pub async fn run<S: LineSink + ?Sized>(mut self, sink: &mut S) -> io::Result<u64> {
        let mut sent = 0u64;
        let mut last_sent: Option<Instant> = None;

        while let Some(message) = self.rx.recv().await {
            if let Some(last) = last_sent {
                sleep_until(last + self.pacing).await;
            }
            let line = message.to_string();
            trace!(%line, "Emitting");
            sink.send_line(&line).await?;
            last_sent = Some(Instant::now());
            sent += 1;
        }

        debug!(sent, "Outbound queue closed");
        Ok(sent)
    }
}
