//! In-process domain events.
//!
//! Services emit events after a successful mutation; a background task drains
//! the channel and logs them. Delivery is fire-and-forget and never affects
//! the outcome of the request that produced the event.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProjectCreated(i32),
    WorkerCreated(i32),
    WorkerAssigned {
        worker_id: i32,
        project_id: i32,
    },
    WorkerClockedIn {
        entry_id: i32,
        worker_id: i32,
        project_id: i32,
    },
    WorkerClockedOut {
        entry_id: i32,
        worker_id: i32,
        total_hours: f64,
    },
    QueryTicketOpened(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; a full or closed channel is logged, not propagated.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to publish event: {}", e);
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
}
