use std::sync::Arc;

use tokio::sync::mpsc;

/// Fire-and-forget event notice handed to the sink
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

/// Delivery target for notification events
///
/// In production this would hand events to a message broker; the default
/// sink writes them to the service log.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, event: &NotificationEvent);
}

/// Sink that writes events to the service log
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, event: &NotificationEvent) {
        tracing::info!(
            event_type = %event.event_type,
            payload = %event.payload,
            "notification event"
        );
    }
}

/// Non-blocking producer side of the notification queue
///
/// A slow or unavailable sink never delays the request path: `emit` only
/// enqueues, and a full queue drops the event with a warning.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<NotificationEvent>,
}

impl Notifier {
    /// Create a notifier and the receiving end for its worker
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue an event without blocking; no delivery guarantee
    pub fn emit(&self, event_type: &str, payload: serde_json::Value) {
        let event = NotificationEvent {
            event_type: event_type.to_string(),
            payload,
        };

        if let Err(err) = self.tx.try_send(event) {
            tracing::warn!(error = %err, "notification queue full or closed, dropping event");
        }
    }
}

/// Drain queued events into the sink until every sender is gone
pub async fn run_worker(mut rx: mpsc::Receiver<NotificationEvent>, sink: Arc<dyn NotificationSink>) {
    while let Some(event) = rx.recv().await {
        sink.deliver(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingSink {
        events: Mutex<Vec<NotificationEvent>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }
    }

    impl NotificationSink for RecordingSink {
        fn deliver(&self, event: &NotificationEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn test_emitted_events_reach_the_sink_in_order() {
        let (notifier, rx) = Notifier::channel(16);
        let sink = RecordingSink::new();
        let worker = tokio::spawn(run_worker(rx, sink.clone()));

        notifier.emit("patient_created", json!({"patient_id": 1}));
        notifier.emit("patient_updated", json!({"patient_id": 1}));
        drop(notifier);
        worker.await.unwrap();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "patient_created");
        assert_eq!(events[1].event_type, "patient_updated");
        assert_eq!(events[0].payload, json!({"patient_id": 1}));
    }

    #[tokio::test]
    async fn test_emit_on_full_queue_drops_instead_of_blocking() {
        let (notifier, rx) = Notifier::channel(1);

        notifier.emit("first", json!({}));
        notifier.emit("second", json!({}));

        // Only the first event fit; the second was dropped silently
        let sink = RecordingSink::new();
        drop(notifier);
        run_worker(rx, sink.clone()).await;

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "first");
    }
}
