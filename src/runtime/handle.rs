use serde::Deserialize;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    core::{
        registry::{Registry, RegistryError},
        reorder::{DragIndicator, ReorderEngine, ReorderError},
    },
    export::{export_document, ExportError, ExportFile},
    serialize::to_pretty_json,
    snippet::{SnippetPayload, SnippetRecord},
    types::{SnippetId, SnippetKind},
};

use super::{debounce::Debouncer, events::ComposerEvent};

/// Failure of a composer request.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Drag gesture misuse.
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    /// Export could not be built.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The composer task is gone.
    #[error("composer task has stopped")]
    ChannelClosed,
}

/// Tunables for [`spawn_composer`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Quiet period before a paragraph edit is committed.
    pub debounce_ms: u64,
    /// Capacity of the command queue.
    pub command_queue_bound: usize,
    /// Broadcast buffer; slow subscribers lag past this.
    pub event_capacity: usize,
    /// Commit pending edits instead of dropping them when the loop stops.
    pub flush_on_shutdown: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            command_queue_bound: 256,
            event_capacity: 1024,
            flush_on_shutdown: true,
        }
    }
}

/// Cloneable front end to the composer task.
pub struct ComposerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ComposerEvent>,
    preview_rx: watch::Receiver<String>,
}

impl Clone for ComposerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
            preview_rx: self.preview_rx.clone(),
        }
    }
}

enum Command {
    Add {
        kind: SnippetKind,
        resp: oneshot::Sender<Result<SnippetId, RuntimeError>>,
    },
    Update {
        id: SnippetId,
        payload: SnippetPayload,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Delete {
        id: SnippetId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    List {
        resp: oneshot::Sender<Vec<SnippetRecord>>,
    },
    HasMeta {
        resp: oneshot::Sender<bool>,
    },
    BeginDrag {
        index: usize,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Hover {
        index: usize,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Drop {
        index: usize,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    CancelDrag {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Indicator {
        resp: oneshot::Sender<DragIndicator>,
    },
    EditParagraph {
        id: SnippetId,
        text: String,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    PendingText {
        id: SnippetId,
        resp: oneshot::Sender<Option<String>>,
    },
    FlushEdits {
        resp: oneshot::Sender<usize>,
    },
    Export {
        resp: oneshot::Sender<Result<ExportFile, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// State owned by the composer task.
struct Composer {
    registry: Registry,
    engine: ReorderEngine,
    edits: Debouncer<SnippetId, String>,
    events_tx: broadcast::Sender<ComposerEvent>,
    preview_tx: watch::Sender<String>,
}

/// Starts the composer loop that owns `registry`.
///
/// Every command runs to completion before the next is taken. Paragraph
/// edits are committed once no newer edit for the same snippet has arrived
/// for `debounce_ms`.
pub fn spawn_composer(registry: Registry, config: ComposerConfig) -> ComposerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ComposerEvent>(config.event_capacity.max(1));
    let (preview_tx, preview_rx) = watch::channel(render_preview(&registry));

    let mut composer = Composer {
        registry,
        engine: ReorderEngine::new(),
        edits: Debouncer::new(Duration::from_millis(config.debounce_ms)),
        events_tx: events_tx.clone(),
        preview_tx,
    };

    tokio::spawn(async move {
        info!(snippets = composer.registry.len(), "composer started");
        loop {
            let deadline = composer.edits.next_deadline();
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if composer.handle_command(cmd, &config) {
                        return;
                    }
                }
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let due = composer.edits.take_due(Instant::now());
                    composer.commit_edits(due);
                }
            }
        }
        composer.stop(&config);
    });

    ComposerHandle {
        cmd_tx,
        events_tx,
        preview_rx,
    }
}

impl ComposerHandle {
    /// New receiver for [`ComposerEvent`]s.
    pub fn subscribe(&self) -> broadcast::Receiver<ComposerEvent> {
        self.events_tx.subscribe()
    }

    /// Live pretty-JSON preview, refreshed after every mutation.
    pub fn preview(&self) -> watch::Receiver<String> {
        self.preview_rx.clone()
    }

    /// Adds a default snippet of `kind`; Meta goes first, others last.
    pub async fn add(&self, kind: SnippetKind) -> Result<SnippetId, RuntimeError> {
        self.request(|resp| Command::Add { kind, resp }).await?
    }

    /// Replaces a snippet's payload and drops its pending edit.
    pub async fn update(&self, id: SnippetId, payload: SnippetPayload) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Update { id, payload, resp }).await?
    }

    /// Removes a snippet and drops its pending edit.
    pub async fn delete(&self, id: SnippetId) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Delete { id, resp }).await?
    }

    /// Records in document order.
    pub async fn list(&self) -> Result<Vec<SnippetRecord>, RuntimeError> {
        self.request(|resp| Command::List { resp }).await
    }

    /// Whether a Meta snippet exists.
    pub async fn has_meta(&self) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::HasMeta { resp }).await
    }

    /// Starts dragging the snippet at `index`.
    pub async fn begin_drag(&self, index: usize) -> Result<(), RuntimeError> {
        self.request(|resp| Command::BeginDrag { index, resp }).await?
    }

    /// Moves the placement indicator.
    pub async fn hover(&self, index: usize) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Hover { index, resp }).await?
    }

    /// Completes the drag; `Ok(true)` when the list changed.
    pub async fn drop(&self, index: usize) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::Drop { index, resp }).await?
    }

    /// Abandons the current drag.
    pub async fn cancel_drag(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::CancelDrag { resp }).await?
    }

    /// Current placement indicator.
    pub async fn indicator(&self) -> Result<DragIndicator, RuntimeError> {
        self.request(|resp| Command::Indicator { resp }).await
    }

    /// Records a keystroke-level edit of a paragraph's content.
    pub async fn edit_paragraph(&self, id: SnippetId, text: impl Into<String>) -> Result<(), RuntimeError> {
        let text = text.into();
        self.request(|resp| Command::EditParagraph { id, text, resp }).await?
    }

    /// Uncommitted text for `id`, which is what the field should display.
    pub async fn pending_text(&self, id: SnippetId) -> Result<Option<String>, RuntimeError> {
        self.request(|resp| Command::PendingText { id, resp }).await
    }

    /// Commits every pending edit now; returns how many were committed.
    pub async fn flush_edits(&self) -> Result<usize, RuntimeError> {
        self.request(|resp| Command::FlushEdits { resp }).await
    }

    /// Download name and JSON bytes for the current document.
    pub async fn export(&self) -> Result<ExportFile, RuntimeError> {
        self.request(|resp| Command::Export { resp }).await?
    }

    /// Stops the loop after flushing (or discarding) pending edits.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

impl Composer {
    /// Returns true when the loop should stop.
    fn handle_command(&mut self, cmd: Command, config: &ComposerConfig) -> bool {
        match cmd {
            Command::Add { kind, resp } => {
                let res = self.registry.add(kind).map(|(id, _)| id).map_err(RuntimeError::from);
                self.publish();
                let _ = resp.send(res);
            }
            Command::Update { id, payload, resp } => {
                let res = self.registry.update(id, payload).map(|_| ()).map_err(RuntimeError::from);
                if res.is_ok() {
                    self.edits.cancel_key(&id);
                }
                self.publish();
                let _ = resp.send(res);
            }
            Command::Delete { id, resp } => {
                let res = self.registry.delete(id).map(|_| ()).map_err(RuntimeError::from);
                if res.is_ok() && self.edits.cancel_key(&id).is_some() {
                    debug!(id, "discarded pending edit of deleted snippet");
                }
                self.publish();
                let _ = resp.send(res);
            }
            Command::List { resp } => {
                let _ = resp.send(self.registry.list());
            }
            Command::HasMeta { resp } => {
                let _ = resp.send(self.registry.has_meta());
            }
            Command::BeginDrag { index, resp } => {
                let len = self.registry.len();
                let res: Result<(), RuntimeError> = if index < len {
                    self.engine.begin_drag(index);
                    self.emit(ComposerEvent::DragChanged(self.engine.indicator()));
                    Ok(())
                } else {
                    Err(RegistryError::IndexOutOfRange { index, len }.into())
                };
                let _ = resp.send(res);
            }
            Command::Hover { index, resp } => {
                let before = self.engine.indicator();
                let res = self.engine.hover(index).map_err(RuntimeError::from);
                if self.engine.indicator() != before {
                    self.emit(ComposerEvent::DragChanged(self.engine.indicator()));
                }
                let _ = resp.send(res);
            }
            Command::Drop { index, resp } => {
                let res = self.drop_dragged(index);
                let _ = resp.send(res);
            }
            Command::CancelDrag { resp } => {
                let res = self.engine.cancel().map_err(RuntimeError::from);
                if res.is_ok() {
                    self.emit(ComposerEvent::DragChanged(self.engine.indicator()));
                }
                let _ = resp.send(res);
            }
            Command::Indicator { resp } => {
                let _ = resp.send(self.engine.indicator());
            }
            Command::EditParagraph { id, text, resp } => {
                let res = self.schedule_edit(id, text);
                let _ = resp.send(res);
            }
            Command::PendingText { id, resp } => {
                let _ = resp.send(self.edits.pending(&id).cloned());
            }
            Command::FlushEdits { resp } => {
                let all = self.edits.take_all();
                let _ = resp.send(self.commit_edits(all));
            }
            Command::Export { resp } => {
                let res = export_document(&self.registry.list()).map_err(RuntimeError::from);
                let _ = resp.send(res);
            }
            Command::Shutdown { resp } => {
                self.stop(config);
                let _ = resp.send(());
                return true;
            }
        }

        false
    }

    fn drop_dragged(&mut self, index: usize) -> Result<bool, RuntimeError> {
        let reorder = self.engine.drop(index)?;
        self.emit(ComposerEvent::DragChanged(self.engine.indicator()));

        let Some(reorder) = reorder else {
            return Ok(false);
        };
        let moved = self.registry.move_item(reorder.from, reorder.to)?;
        self.publish();
        Ok(moved.is_some())
    }

    fn schedule_edit(&mut self, id: SnippetId, text: String) -> Result<(), RuntimeError> {
        let rec = self.registry.get(id).ok_or(RegistryError::NotFound(id))?;
        if rec.kind() != SnippetKind::Paragraph {
            return Err(RegistryError::KindMismatch {
                id,
                expected: rec.kind(),
                found: SnippetKind::Paragraph,
            }
            .into());
        }
        self.edits.schedule(id, text, Instant::now());
        self.emit(ComposerEvent::EditPending { id });
        Ok(())
    }

    fn commit_edits(&mut self, edits: Vec<(SnippetId, String)>) -> usize {
        let mut committed = 0;
        for (id, text) in edits {
            match self.registry.update(id, SnippetPayload::paragraph(text)) {
                Ok(_) => committed += 1,
                Err(err) => warn!(id, %err, "dropping debounced edit"),
            }
        }
        if committed > 0 {
            debug!(committed, "paragraph edits committed");
            self.publish();
        }
        committed
    }

    fn stop(&mut self, config: &ComposerConfig) {
        if config.flush_on_shutdown {
            let all = self.edits.take_all();
            self.commit_edits(all);
        } else if !self.edits.is_empty() {
            warn!(pending = self.edits.len(), "discarding uncommitted edits on shutdown");
        }
        info!("composer stopped");
    }

    /// Emits events for drained changes and refreshes the preview.
    fn publish(&mut self) {
        let changes = self.registry.drain_changes();
        if changes.is_empty() {
            return;
        }
        for stored in &changes {
            self.emit(ComposerEvent::from(&stored.change));
        }
        // A live drag holds an index; any reshuffle invalidates it.
        let reshaped = changes.iter().any(|stored| stored.change.changes_order());
        if reshaped && self.engine.cancel().is_ok() {
            debug!("drag cancelled by concurrent reorder");
            self.emit(ComposerEvent::DragChanged(self.engine.indicator()));
        }
        self.preview_tx.send_replace(render_preview(&self.registry));
        self.emit(ComposerEvent::PreviewUpdated {
            seq: self.registry.latest_change_seq(),
        });
    }

    fn emit(&self, event: ComposerEvent) {
        let _ = self.events_tx.send(event);
    }
}

fn render_preview(registry: &Registry) -> String {
    to_pretty_json(registry.iter()).unwrap_or_else(|err| {
        warn!(%err, "preview serialization failed");
        String::new()
    })
}
