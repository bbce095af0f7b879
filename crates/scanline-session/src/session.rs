//! # Scanner Session
//!
//! Async shell around [`ScannerController`]: one task owns the controller and
//! serializes everything that touches it.
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanner Session Task                             │
//! │                                                                         │
//! │   ScannerSessionHandle ──commands──┐                                    │
//! │                                    │                                    │
//! │   Engine (ResultSink) ──results────┤                                    │
//! │                                    ▼                                    │
//! │   picker / image-scan ──────► tokio::select! ──► ScannerController      │
//! │   completions                      ▲                  │                 │
//! │                                    │                  │ Effects         │
//! │   sleep_until(next_deadline) ──────┘                  ▼                 │
//! │                                        ┌──────────────────────────────┐ │
//! │                                        │ RecordScan  → history writer │ │
//! │                                        │ Persist     → settings store │ │
//! │                                        │ Notify      → emitter        │ │
//! │                                        │ LaunchPicker→ spawned pick   │ │
//! │                                        └──────────────────────────────┘ │
//! │                                                                         │
//! │   After every event: emitter.emit_state(snapshot)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! History writes go through one [`HistoryRecorder`] per session, so they land
//! in the order the results arrived. Shutting down flushes a pending settings
//! write and waits for queued history writes before the task exits.

use std::sync::Arc;
use std::time::Duration;

use scanline_core::{
    export::items_to_csv, SavedSettings, ScanMode, SettingUpdate, Symbology, SymbologyFamily,
};
use scanline_store::{HistoryRepository, SettingsRepository};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::controller::{Effect, ScannerController};
use crate::engine::{EngineResult, ResultSink, ScanEngine};
use crate::error::{SessionError, SessionResult};
use crate::events::{NoOpEmitter, SessionEventEmitter};
use crate::picker::{ImagePicker, PickRequest, PickResponse, PickedImage};
use crate::recorder::HistoryRecorder;
use crate::state::SessionSnapshot;

/// Command queue depth.
const COMMAND_BUFFER: usize = 64;

/// Far-off wake-up used when no timer is armed.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

// =============================================================================
// Dependencies
// =============================================================================

/// Platform services a session needs.
#[derive(Clone)]
pub struct SessionDeps {
    pub settings: Arc<dyn SettingsRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub picker: Arc<dyn ImagePicker>,
    pub emitter: Arc<dyn SessionEventEmitter>,
}

impl SessionDeps {
    /// Dependencies with a no-op emitter.
    pub fn new(
        settings: Arc<dyn SettingsRepository>,
        history: Arc<dyn HistoryRepository>,
        picker: Arc<dyn ImagePicker>,
    ) -> Self {
        SessionDeps {
            settings,
            history,
            picker,
            emitter: Arc::new(NoOpEmitter),
        }
    }

    /// Sets the event emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn SessionEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Commands for the session task.
enum SessionCommand {
    ViewCreated(Arc<dyn ScanEngine>),
    StartScanning,
    StopScanning,
    UpdateSetting {
        update: SettingUpdate,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    ToggleBarcodeType {
        symbology: Symbology,
        enabled: bool,
    },
    EnableAllBarcodeTypes {
        enabled: bool,
        family: SymbologyFamily,
    },
    ResetConfig,
    Resume,
    DismissResults,
    ToggleFlash,
    ToggleZoom,
    ToggleCamera,
    ScanImage,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    ExportCsv(oneshot::Sender<SessionResult<String>>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle for controlling a scanner session.
#[derive(Clone)]
pub struct ScannerSessionHandle {
    id: Uuid,
    mode: ScanMode,
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl ScannerSessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    async fn send(&self, cmd: SessionCommand) -> SessionResult<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::ChannelClosed("Scanner session channel closed".into()))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> SessionResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx)).await?;
        rx.await
            .map_err(|_| SessionError::ChannelClosed("Scanner session dropped reply".into()))
    }

    /// Binds the engine of a freshly created camera view.
    pub async fn view_created(&self, engine: Arc<dyn ScanEngine>) -> SessionResult<()> {
        self.send(SessionCommand::ViewCreated(engine)).await
    }

    pub async fn start_scanning(&self) -> SessionResult<()> {
        self.send(SessionCommand::StartScanning).await
    }

    pub async fn stop_scanning(&self) -> SessionResult<()> {
        self.send(SessionCommand::StopScanning).await
    }

    /// Applies a setting edit; out-of-range values come back as errors.
    pub async fn update_setting(&self, update: SettingUpdate) -> SessionResult<()> {
        self.request(|reply| SessionCommand::UpdateSetting { update, reply })
            .await?
    }

    pub async fn toggle_barcode_type(&self, symbology: Symbology, enabled: bool) -> SessionResult<()> {
        self.send(SessionCommand::ToggleBarcodeType { symbology, enabled })
            .await
    }

    pub async fn enable_all_barcode_types(
        &self,
        enabled: bool,
        family: SymbologyFamily,
    ) -> SessionResult<()> {
        self.send(SessionCommand::EnableAllBarcodeTypes { enabled, family })
            .await
    }

    pub async fn reset_config(&self) -> SessionResult<()> {
        self.send(SessionCommand::ResetConfig).await
    }

    pub async fn resume(&self) -> SessionResult<()> {
        self.send(SessionCommand::Resume).await
    }

    pub async fn dismiss_results(&self) -> SessionResult<()> {
        self.send(SessionCommand::DismissResults).await
    }

    pub async fn toggle_flash(&self) -> SessionResult<()> {
        self.send(SessionCommand::ToggleFlash).await
    }

    pub async fn toggle_zoom(&self) -> SessionResult<()> {
        self.send(SessionCommand::ToggleZoom).await
    }

    pub async fn toggle_camera(&self) -> SessionResult<()> {
        self.send(SessionCommand::ToggleCamera).await
    }

    /// Opens the photo picker and scans the chosen image.
    pub async fn scan_image(&self) -> SessionResult<()> {
        self.send(SessionCommand::ScanImage).await
    }

    pub async fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        self.request(SessionCommand::Snapshot).await
    }

    /// The session's items as CSV.
    pub async fn export_csv(&self) -> SessionResult<String> {
        self.request(SessionCommand::ExportCsv).await?
    }

    /// Flushes pending settings and stops the session task.
    pub async fn shutdown(&self) -> SessionResult<()> {
        self.request(SessionCommand::Shutdown).await
    }
}

// =============================================================================
// Session Task
// =============================================================================

/// Completions of spawned picker and image-scan work.
enum Completion {
    Picked(PickResponse),
    ImageScanned(EngineResult, PickedImage),
}

/// Scanner session for one mode.
pub struct ScannerSession {
    id: Uuid,
    controller: ScannerController,
    result_rx: mpsc::UnboundedReceiver<EngineResult>,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    recorder: HistoryRecorder,
    deps: SessionDeps,
}

impl ScannerSession {
    /// Loads the mode's saved settings and starts the session task.
    ///
    /// A missing or unreadable settings entry leaves the registry defaults.
    pub async fn open(
        mode: ScanMode,
        config: &SessionConfig,
        deps: SessionDeps,
    ) -> ScannerSessionHandle {
        let id = Uuid::new_v4();
        let (sink, result_rx) = ResultSink::channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let mut controller = ScannerController::new(
            mode,
            sink,
            config.timing.clone(),
            config.multiscan.clone(),
        );

        match deps.settings.get_settings(mode).await {
            Ok(Some(saved)) => controller.restore(saved),
            Ok(None) => debug!(%mode, "No saved settings, using defaults"),
            Err(e) => warn!(%mode, error = %e, "Failed to load saved settings, using defaults"),
        }

        let span = tracing::info_span!("scanner_session", id = %id, %mode);
        let recorder = span.in_scope(|| HistoryRecorder::start(deps.history.clone()));

        let session = ScannerSession {
            id,
            controller,
            result_rx,
            done_tx,
            done_rx,
            recorder,
            deps,
        };
        session.start(span)
    }

    fn start(self, span: tracing::Span) -> ScannerSessionHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = ScannerSessionHandle {
            id: self.id,
            mode: self.controller.mode(),
            cmd_tx,
        };

        tokio::spawn(self.run(cmd_rx).instrument(span));

        handle
    }

    /// Main session loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<SessionCommand>) {
        info!("Scanner session started");

        loop {
            let deadline = self.controller.next_deadline();
            let wake = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAKE);

            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if !self.handle_command(cmd).await {
                                break;
                            }
                        }
                        None => {
                            // Every handle dropped
                            self.flush_pending().await;
                            break;
                        }
                    }
                }
                Some(result) = self.result_rx.recv() => {
                    let effects = self.controller.handle_result(result);
                    self.run_effects(effects).await;
                }
                Some(done) = self.done_rx.recv() => {
                    self.handle_completion(done).await;
                }
                _ = sleep_until(wake), if deadline.is_some() => {
                    let effects = self.controller.fire_due(Instant::now());
                    self.run_effects(effects).await;
                }
            }

            self.deps.emitter.emit_state(&self.controller.snapshot());
        }

        info!("Scanner session stopped");
    }

    /// Handles one command. Returns `false` once the session should stop.
    async fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        let now = Instant::now();
        let effects = match cmd {
            SessionCommand::ViewCreated(engine) => {
                self.controller.on_view_created(engine, now);
                Vec::new()
            }
            SessionCommand::StartScanning => {
                self.controller.start_scanning();
                Vec::new()
            }
            SessionCommand::StopScanning => {
                self.controller.stop_scanning();
                Vec::new()
            }
            SessionCommand::UpdateSetting { update, reply } => {
                let result = self
                    .controller
                    .update_setting(update, now)
                    .map_err(SessionError::from);
                if let Err(e) = &result {
                    warn!(error = %e, "Rejected setting update");
                }
                let _ = reply.send(result);
                Vec::new()
            }
            SessionCommand::ToggleBarcodeType { symbology, enabled } => {
                self.controller.toggle_barcode_type(symbology, enabled, now);
                Vec::new()
            }
            SessionCommand::EnableAllBarcodeTypes { enabled, family } => {
                self.controller.enable_all_barcode_types(enabled, family, now);
                Vec::new()
            }
            SessionCommand::ResetConfig => self.controller.reset_config(now),
            SessionCommand::Resume => {
                self.controller.resume();
                Vec::new()
            }
            SessionCommand::DismissResults => {
                self.controller.dismiss_results();
                Vec::new()
            }
            SessionCommand::ToggleFlash => {
                self.controller.toggle_flash();
                Vec::new()
            }
            SessionCommand::ToggleZoom => {
                self.controller.toggle_zoom();
                Vec::new()
            }
            SessionCommand::ToggleCamera => {
                self.controller.toggle_camera();
                Vec::new()
            }
            SessionCommand::ScanImage => self.controller.scan_image_pressed(),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
                Vec::new()
            }
            SessionCommand::ExportCsv(reply) => {
                let csv = items_to_csv(self.controller.items()).map_err(SessionError::from);
                let _ = reply.send(csv);
                Vec::new()
            }
            SessionCommand::Shutdown(reply) => {
                info!("Scanner session shutting down");
                self.flush_pending().await;
                let _ = reply.send(());
                return false;
            }
        };

        self.run_effects(effects).await;
        true
    }

    async fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Picked(response) => {
                let Some(pending) = self.controller.begin_image_scan(response) else {
                    return;
                };
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    match pending.reply.await {
                        Ok(result) => {
                            let _ = done_tx.send(Completion::ImageScanned(result, pending.picked));
                        }
                        Err(_) => warn!("Engine dropped the image scan without answering"),
                    }
                });
            }
            Completion::ImageScanned(result, picked) => {
                let effects = self.controller.handle_image_result(result, &picked);
                self.run_effects(effects).await;
            }
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RecordScan(scan) => self.recorder.record(scan),
                Effect::PersistSettings(saved) => self.persist(saved).await,
                Effect::Notify(notice) => self.deps.emitter.emit_notice(&notice),
                Effect::LaunchPicker => {
                    let picker = self.deps.picker.clone();
                    let done_tx = self.done_tx.clone();
                    tokio::spawn(async move {
                        let response = picker.pick(PickRequest::photo_with_base64()).await;
                        let _ = done_tx.send(Completion::Picked(response));
                    });
                }
            }
        }
    }

    async fn persist(&self, saved: SavedSettings) {
        let mode = self.controller.mode();
        if let Err(e) = self.deps.settings.save_settings(mode, &saved).await {
            error!(%mode, error = %e, "Failed to save scanner settings");
        }
    }

    async fn flush_pending(&mut self) {
        if let Some(saved) = self.controller.take_pending_persist() {
            debug!("Flushing pending settings before shutdown");
            self.persist(saved).await;
        }
        self.recorder.flush().await;
    }
}
