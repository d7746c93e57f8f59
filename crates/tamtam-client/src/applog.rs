//! In-app log viewer backend.
//!
//! Every tracing event is also kept in a small newest-first buffer and
//! fanned out to whoever subscribed. A log view takes a [`LogHub::snapshot`]
//! when it appears and then follows [`LogHub::subscribe`]; it unsubscribes
//! by dropping the receiver. Nothing holds on to a particular view.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tokio::sync::broadcast;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use tamtam_shared::constants::LOG_MAX_ENTRIES;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    /// Where the entry came from (the tracing target)
    pub tag: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.time.format("%H:%M:%S"), self.tag, self.message)
    }
}

/// Bounded log buffer with broadcast subscribers.  Cheap to clone.
#[derive(Clone)]
pub struct LogHub {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    tx: broadcast::Sender<LogEntry>,
    capacity: usize,
}

impl LogHub {
    pub fn new() -> Self {
        Self::with_capacity(LOG_MAX_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            tx,
            capacity,
        }
    }

    pub fn record(&self, tag: impl Into<String>, message: impl Into<String>) {
        let entry = LogEntry {
            time: Local::now(),
            tag: tag.into(),
            message: message.into(),
        };

        {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.push_front(entry.clone());
            entries.truncate(self.capacity);
        }

        // No subscribers is fine
        let _ = self.tx.send(entry);
    }

    /// Current entries, newest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Tracing layer feeding this hub.
    pub fn layer(&self) -> LogHubLayer {
        LogHubLayer { hub: self.clone() }
    }
}

impl Default for LogHub {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LogHubLayer {
    hub: LogHub,
}

impl<S: Subscriber> Layer<S> for LogHubLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.hub.record(event.metadata().target(), visitor.finish());
    }
}

/// Renders `message` followed by the remaining fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields.trim_start().to_string();
        }
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_newest_first_and_bounded() {
        let hub = LogHub::with_capacity(3);
        for i in 0..5 {
            hub.record("test", format!("entry {i}"));
        }
        let messages: Vec<String> = hub.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["entry 4", "entry 3", "entry 2"]);
    }

    #[test]
    fn test_default_capacity() {
        let hub = LogHub::new();
        for i in 0..(LOG_MAX_ENTRIES + 10) {
            hub.record("test", i.to_string());
        }
        assert_eq!(hub.snapshot().len(), LOG_MAX_ENTRIES);
    }

    #[test]
    fn test_subscribers_receive_entries() {
        let hub = LogHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.record("SellingActivity", "Successful response");

        assert_eq!(first.try_recv().unwrap().message, "Successful response");
        assert_eq!(second.try_recv().unwrap().tag, "SellingActivity");

        drop(first);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn test_display_format() {
        let hub = LogHub::new();
        hub.record("Utils", "JPEG data bytes: 42");
        let line = hub.snapshot()[0].to_string();

        let (time, rest) = line.split_at(8);
        assert_eq!(time.len(), 8);
        assert_eq!(&time[2..3], ":");
        assert_eq!(rest, " - Utils - JPEG data bytes: 42");
    }

    #[test]
    fn test_layer_captures_tracing_events() {
        let hub = LogHub::new();
        let subscriber = tracing_subscriber::registry().with(hub.layer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "publish", id = "abc", status = 200, "Successful response");
            tracing::warn!(target: "price", "Bad price");
        });

        let entries = hub.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, "price");
        assert_eq!(entries[0].message, "Bad price");
        assert_eq!(entries[1].message, "Successful response id=abc status=200");
    }
}
