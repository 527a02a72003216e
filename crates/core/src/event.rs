//! Domain event system — observability without coupling.
//!
//! The orchestrator and the tool loop publish events as they work; anything
//! interested (a CLI status line, a metrics exporter, a test) subscribes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The router picked a strategy for a chat message
    RequestRouted {
        strategy: String,
        message_preview: String,
        timestamp: DateTime<Utc>,
    },

    /// The language model answered one call
    ModelCalled {
        model: String,
        tokens_used: Option<u32>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A capability was invoked by the tool loop
    CapabilityInvoked {
        capability: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A loop run reached a terminal status
    LoopFinished {
        status: String,
        iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// The fixed program pipeline completed
    ProgramGenerated {
        disciplines: Vec<String>,
        duration_weeks: u32,
        output_chars: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
