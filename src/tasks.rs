//! Background loading of the member list.
//!
//! The load runs on a tokio task so the UI keeps rendering while it is
//! pending. The result comes back as an [`ApiMessage`] on an unbounded
//! channel that the main loop drains with `try_recv()` every tick.
//!
//! Each load carries a generation number. The app only accepts the result
//! for the generation it is waiting on, so a late answer from an earlier
//! load can never overwrite newer state.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::types::MemberBatch;
use crate::api::MembersClient;

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// A member load finished.
    MembersLoaded {
        /// The load this result belongs to.
        generation: u64,
        /// The validated payload, or why the load failed.
        result: Result<MemberBatch, ApiError>,
    },
}

/// Spawns background tasks for async operations.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task that loads members once.
    ///
    /// The returned handle can be aborted when the app exits before the load
    /// completes.
    pub fn spawn_load(&self, client: &MembersClient, generation: u64) -> JoinHandle<()> {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.fetch_members().await;
            if tx
                .send(ApiMessage::MembersLoaded { generation, result })
                .is_err()
            {
                debug!(generation, "Receiver gone, dropping load result");
            }
        })
    }
}
