//! Channels carrying scene snapshots out of the session.
//!
//! Readers only ever see detached copies; nothing downstream can reach back
//! into the live scene.

use crate::shared::snapshot::SceneSnapshot;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};

/// Frames the render side may fall behind before snapshots are dropped.
pub const RENDER_QUEUE_DEPTH: usize = 2;

/// Aggregates the snapshot channels.
///
/// - Session → Storage: every persisted-state change, never dropped.
/// - Session → Render: latest scene, bounded to limit latency.
#[derive(Clone)]
pub struct SceneBus {
    /// Session → Storage: records to persist. Unbounded, so the storage
    /// side must drain it (see [`SceneBus::latest_persisted`]).
    pub persist_tx: Sender<SceneSnapshot>,
    pub persist_rx: Receiver<SceneSnapshot>,

    /// Session → Render: scene snapshots.
    pub render_tx: Sender<SceneSnapshot>,
    pub render_rx: Receiver<SceneSnapshot>,
}

impl SceneBus {
    /// Creates a new bus with all channels initialized.
    pub fn new() -> Self {
        let (persist_tx, persist_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(RENDER_QUEUE_DEPTH);

        Self {
            persist_tx,
            persist_rx,
            render_tx,
            render_rx,
        }
    }

    /// Sends `snapshot` to both readers. A full render queue evicts its
    /// oldest frame so the newest scene is always visible; the persistence
    /// copy is always queued.
    pub fn publish(&self, snapshot: SceneSnapshot) {
        let mut pending = snapshot.clone();
        loop {
            match self.render_tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    log::trace!("BUS: render queue full, oldest frame dropped");
                    let _ = self.render_rx.try_recv();
                    pending = back;
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::debug!("BUS: render side gone");
                    break;
                }
            }
        }
        if self.persist_tx.send(snapshot).is_err() {
            log::debug!("BUS: persistence side gone");
        }
    }

    /// Drains queued persistence records, returning only the newest.
    pub fn latest_persisted(&self) -> Option<SceneSnapshot> {
        self.persist_rx.try_iter().last()
    }
}

impl Default for SceneBus {
    fn default() -> Self {
        Self::new()
    }
}
