use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Events emitted after a ledger or grid mutation commits.
///
/// Consumers (report caches, sync, notifications) subscribe out of band;
/// the ledger itself never waits on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SaleCreated(Uuid),
    SaleUpdated(Uuid),
    SaleDeleted(Uuid),

    DeliveryCreated(Uuid),
    DeliveryUpdated(Uuid),

    TransferCreated {
        transfer_id: Uuid,
        kind: String,
    },

    SheetCreated {
        sheet_id: Uuid,
        owner_id: Uuid,
    },

    ExpenseRecorded(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a bounded event channel sized from configuration.
pub fn event_channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Spawn as a background task
/// when no real consumer is wired up.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "Processing event");
    }
}
