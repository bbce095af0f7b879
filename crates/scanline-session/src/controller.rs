//! # Scanner Controller
//!
//! Live state of one scanner screen and every transition on it.
//!
//! The controller is synchronous. Engine calls happen inline; anything that
//! needs to wait (history writes, settings writes, the picker, notices) is
//! returned as an [`Effect`] for the session actor to carry out. Timers are
//! kept as deadlines: the actor sleeps until [`ScannerController::next_deadline`]
//! and then calls [`ScannerController::fire_due`].
//!
//! ## Timers
//! ```text
//! ┌───────────────┬──────────┬────────────────────────────────────────────┐
//! │ Deadline      │ Default  │ Armed by                                   │
//! ├───────────────┼──────────┼────────────────────────────────────────────┤
//! │ persist_at    │ 500 ms   │ any settings / type edit (re-armed, so     │
//! │               │          │ bursts collapse into one write)            │
//! │ restart_at    │ 100 ms   │ continuous toggled on, threshold change    │
//! │               │          │ while continuous, reset into continuous    │
//! │ gallery_pick  │ 500 ms   │ view ready in Gallery mode                 │
//! └───────────────┴──────────┴────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use scanline_core::registry::{default_enabled_types, default_settings};
use scanline_core::{
    EnabledTypes, ImageRef, NewScan, SavedSettings, ScanMode, ScannedItem, ScannerSettings,
    SettingUpdate, Symbology, SymbologyFamily, ValidationError,
};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::adapter;
use crate::config::{MultiscanConfig, TimingConfig};
use crate::engine::{EngineResult, ResultSink, ScanEngine};
use crate::events::Notice;
use crate::picker::{PickResponse, PickedImage};
use crate::state::{CameraControls, ScanPhase, SessionSnapshot, SessionState};

// =============================================================================
// Effects
// =============================================================================

/// Work the controller hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add to scan history (fire-and-forget).
    RecordScan(NewScan),
    /// Write the mode's settings bundle.
    PersistSettings(SavedSettings),
    /// Show an alert.
    Notify(Notice),
    /// Open the photo picker.
    LaunchPicker,
}

/// An image handed to the engine, waiting for its answer.
#[derive(Debug)]
pub struct PendingImageScan {
    pub reply: oneshot::Receiver<EngineResult>,
    pub picked: PickedImage,
}

// =============================================================================
// Controller
// =============================================================================

pub struct ScannerController {
    mode: ScanMode,
    settings: ScannerSettings,
    enabled_types: EnabledTypes,
    state: SessionState,
    items: Vec<ScannedItem>,
    camera: CameraControls,

    engine: Option<Arc<dyn ScanEngine>>,
    sink: ResultSink,
    /// Whether the engine holds an open scan session.
    engine_scanning: bool,
    picker_open: bool,

    timing: TimingConfig,
    multiscan: MultiscanConfig,
    persist_at: Option<Instant>,
    restart_at: Option<Instant>,
    gallery_pick_at: Option<Instant>,
}

impl ScannerController {
    /// Creates a controller holding the mode's registry defaults.
    pub fn new(
        mode: ScanMode,
        sink: ResultSink,
        timing: TimingConfig,
        multiscan: MultiscanConfig,
    ) -> Self {
        ScannerController {
            mode,
            settings: default_settings(mode),
            enabled_types: default_enabled_types(mode),
            state: SessionState::default(),
            items: Vec::new(),
            camera: CameraControls::default(),
            engine: None,
            sink,
            engine_scanning: false,
            picker_open: false,
            timing,
            multiscan,
            persist_at: None,
            restart_at: None,
            gallery_pick_at: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn settings(&self) -> &ScannerSettings {
        &self.settings
    }

    pub fn enabled_types(&self) -> &EnabledTypes {
        &self.enabled_types
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> ScanPhase {
        self.state.phase()
    }

    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    pub fn camera(&self) -> CameraControls {
        self.camera
    }

    pub fn is_bound(&self) -> bool {
        self.engine.is_some()
    }

    /// The bundle persisted for this mode.
    pub fn saved_settings(&self) -> SavedSettings {
        SavedSettings {
            enabled_types: self.enabled_types.clone(),
            scanner_settings: self.settings.clone(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            phase: self.state.phase(),
            is_paused: self.state.is_paused(),
            frozen_frame: self.state.frozen_frame().cloned(),
            settings: self.settings.clone(),
            enabled_types: self.enabled_types.clone(),
            items: self.items.clone(),
            camera: self.camera,
            active_types: self.enabled_types.active_labels_summary(),
        }
    }

    fn engine(&self, op: &'static str) -> Option<Arc<dyn ScanEngine>> {
        if self.engine.is_none() {
            trace!(op, "Engine not bound, skipping");
        }
        self.engine.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replaces the defaults with a bundle saved by an earlier session.
    ///
    /// When the engine is already bound the bundle is pushed; a running
    /// session picks up the new values on its next start.
    pub fn restore(&mut self, saved: SavedSettings) {
        debug!(mode = %self.mode, "Restoring saved settings");
        self.enabled_types = saved.enabled_types;
        self.settings = saved.scanner_settings;

        if let Some(engine) = self.engine("restore") {
            adapter::push_decoders(&*engine, &self.enabled_types, self.mode);
            adapter::apply_settings(&*engine, &self.settings, self.mode);
        }
    }

    /// Binds the engine, configures it and starts the mode's first action.
    pub fn on_view_created(&mut self, engine: Arc<dyn ScanEngine>, now: Instant) {
        info!(mode = %self.mode, "Engine view ready");

        adapter::configure(&*engine, &self.settings, &self.enabled_types, self.mode);
        adapter::apply_mode_extras(&*engine, self.mode, &self.multiscan);
        self.engine = Some(engine.clone());

        if self.mode.scans_live() {
            self.begin_scanning(&*engine);
        } else {
            self.gallery_pick_at = Some(now + self.timing.gallery_pick_delay());
        }
    }

    pub fn start_scanning(&mut self) {
        if let Some(engine) = self.engine("start_scanning") {
            self.begin_scanning(&*engine);
        }
    }

    pub fn stop_scanning(&mut self) {
        self.restart_at = None;
        if let Some(engine) = self.engine("stop_scanning") {
            engine.stop_scanning();
            self.engine_scanning = false;
            self.state.set_idle();
        }
    }

    fn begin_scanning(&mut self, engine: &dyn ScanEngine) {
        if self.engine_scanning {
            engine.stop_scanning();
        }
        engine.start_scanning(self.sink.clone());
        self.engine_scanning = true;
        self.state.set_scanning();
        debug!(mode = %self.mode, "Scanning started");
    }

    /// Stops now and schedules a start after the restart delay.
    fn restart_after_delay(&mut self, engine: &dyn ScanEngine, now: Instant) {
        engine.stop_scanning();
        self.engine_scanning = false;
        self.state.set_idle();
        self.restart_at = Some(now + self.timing.restart_delay());
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Handles one live decode event.
    ///
    /// Only the first decode is used. The pause decision reads the setting as
    /// it is when the result lands. Results still queued when the session
    /// paused or stopped are dropped, so the frozen frame stays the one that
    /// caused the pause.
    pub fn handle_result(&mut self, result: EngineResult) -> Vec<Effect> {
        if self.state.is_paused() || !self.engine_scanning {
            debug!(phase = ?self.state.phase(), "Dropping result outside a scan session");
            return Vec::new();
        }

        let Some(first) = result.first() else {
            trace!("Engine result without decodes");
            return Vec::new();
        };

        let full_image = result
            .image_base64
            .as_deref()
            .filter(|img| !img.is_empty())
            .map(ImageRef::from_engine_payload);
        let display_image = result
            .thumbnails_base64
            .first()
            .filter(|thumb| !thumb.is_empty())
            .map(|thumb| ImageRef::from_engine_payload(thumb))
            .or_else(|| full_image.clone());

        let item = ScannedItem::new(first.text.clone(), first.type_name.clone(), display_image);
        debug!(symbology = %item.symbology, "Barcode scanned");
        self.items.insert(0, item.clone());

        if !self.settings.continuous_scanning {
            // The engine closes its session on a result when not continuous
            self.engine_scanning = false;
            self.state.pause(full_image);
        }

        vec![Effect::RecordScan(item)]
    }

    /// Leaves the pause overlay and scans again.
    pub fn resume(&mut self) {
        self.state.clear_pause();
        if !self.mode.scans_live() || self.engine_scanning {
            return;
        }
        self.restart_at = None;
        if let Some(engine) = self.engine("resume") {
            self.begin_scanning(&*engine);
        }
    }

    /// Closes the result sheet: drops the session's items and resumes.
    pub fn dismiss_results(&mut self) {
        self.items.clear();
        self.resume();
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Applies one setting edit.
    ///
    /// An out-of-range value is rejected before anything changes.
    pub fn update_setting(
        &mut self,
        update: SettingUpdate,
        now: Instant,
    ) -> Result<(), ValidationError> {
        update.apply(&mut self.settings)?;
        self.schedule_persist(now);
        debug!(key = ?update.key(), "Setting updated");

        let Some(engine) = self.engine("update_setting") else {
            return Ok(());
        };

        adapter::push_image_flags(&*engine, &self.settings);
        adapter::apply_setting(&*engine, update, &self.settings, self.mode);

        let restart = match update {
            SettingUpdate::ContinuousScanning(on) => on,
            SettingUpdate::ContinuousThreshold(_) => self.settings.continuous_scanning,
            _ => false,
        };
        if restart && self.mode.scans_live() {
            self.restart_after_delay(&*engine, now);
        }

        Ok(())
    }

    /// Enables or disables one symbology.
    ///
    /// `ocrText` can only be toggled in VIN mode.
    pub fn toggle_barcode_type(&mut self, symbology: Symbology, enabled: bool, now: Instant) {
        if symbology == Symbology::OcrText && !self.mode.allows_ocr() {
            debug!(mode = %self.mode, "Ignoring text recognition toggle outside VIN");
            return;
        }

        self.enabled_types.set(symbology, enabled);
        self.push_decoders();
        self.schedule_persist(now);
    }

    /// Enables or disables a whole family, skipping `ocrText` outside VIN.
    pub fn enable_all_barcode_types(
        &mut self,
        enabled: bool,
        family: SymbologyFamily,
        now: Instant,
    ) {
        for &symbology in family.members() {
            if symbology == Symbology::OcrText && !self.mode.allows_ocr() {
                continue;
            }
            self.enabled_types.set(symbology, enabled);
        }
        self.push_decoders();
        self.schedule_persist(now);
    }

    /// Back to the registry defaults, persisted immediately.
    pub fn reset_config(&mut self, now: Instant) -> Vec<Effect> {
        self.settings = default_settings(self.mode);
        self.enabled_types = default_enabled_types(self.mode);

        if let Some(engine) = self.engine("reset_config") {
            adapter::apply_settings(&*engine, &self.settings, self.mode);
            adapter::push_decoders(&*engine, &self.enabled_types, self.mode);
            if self.settings.continuous_scanning && self.mode.scans_live() {
                self.restart_after_delay(&*engine, now);
            }
        }

        self.persist_at = None;
        info!(mode = %self.mode, "Scanner configuration reset");
        vec![Effect::PersistSettings(self.saved_settings())]
    }

    fn push_decoders(&self) {
        if let Some(engine) = self.engine("push_decoders") {
            adapter::push_decoders(&*engine, &self.enabled_types, self.mode);
        }
    }

    fn schedule_persist(&mut self, now: Instant) {
        self.persist_at = Some(now + self.timing.persist_debounce());
    }

    /// Takes a not-yet-written settings change, for flushing on shutdown.
    pub fn take_pending_persist(&mut self) -> Option<SavedSettings> {
        self.persist_at.take().map(|_| self.saved_settings())
    }

    // =========================================================================
    // Camera
    // =========================================================================

    pub fn toggle_flash(&mut self) {
        let on = self.camera.toggle_flash();
        if let Some(engine) = self.engine("toggle_flash") {
            engine.set_flash_enabled(on);
        }
    }

    pub fn toggle_zoom(&mut self) {
        let zoom = self.camera.toggle_zoom();
        if let Some(engine) = self.engine("toggle_zoom") {
            engine.set_zoom_factor(zoom);
        }
    }

    pub fn toggle_camera(&mut self) {
        let camera_id = self.camera.toggle_camera();
        if let Some(engine) = self.engine("toggle_camera") {
            engine.set_camera(camera_id);
        }
    }

    // =========================================================================
    // Image Scan
    // =========================================================================

    /// Asks for the photo picker, unless one is already open.
    pub fn scan_image_pressed(&mut self) -> Vec<Effect> {
        if self.picker_open {
            debug!("Image picker already open");
            return Vec::new();
        }
        self.picker_open = true;
        vec![Effect::LaunchPicker]
    }

    /// Hands a picked image to the engine.
    ///
    /// Cancellation and picker errors are logged only.
    pub fn begin_image_scan(&mut self, response: PickResponse) -> Option<PendingImageScan> {
        self.picker_open = false;

        let picked = match response {
            PickResponse::Cancelled => {
                info!("User cancelled image picker");
                return None;
            }
            PickResponse::Failed { code, message } => {
                warn!(%code, %message, "Image picker error");
                return None;
            }
            PickResponse::Picked(picked) if picked.base64.is_empty() => {
                warn!("No valid image selected");
                return None;
            }
            PickResponse::Picked(picked) => picked,
        };

        let engine = self.engine("scan_image")?;
        let (tx, rx) = oneshot::channel();
        engine.scan_image(&picked.base64, tx);
        Some(PendingImageScan { reply: rx, picked })
    }

    /// Adds the first decode of an image scan to the session items.
    pub fn handle_image_result(&mut self, result: EngineResult, picked: &PickedImage) -> Vec<Effect> {
        let Some(first) = result.first() else {
            return vec![Effect::Notify(Notice::no_barcode())];
        };

        let image = result
            .thumbnails_base64
            .first()
            .filter(|thumb| !thumb.is_empty())
            .map(|thumb| ImageRef::from_engine_payload(thumb))
            .unwrap_or_else(|| picked.display_image());

        debug!(symbology = %first.type_name, "Barcode found in picked image");
        self.items.insert(
            0,
            ScannedItem::new(first.text.clone(), first.type_name.clone(), Some(image)),
        );
        Vec::new()
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.persist_at, self.restart_at, self.gallery_pick_at]
            .into_iter()
            .flatten()
            .min()
    }

    /// Runs every timer whose deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.restart_at.is_some_and(|at| at <= now) {
            self.restart_at = None;
            if let Some(engine) = self.engine("restart") {
                self.begin_scanning(&*engine);
            }
        }

        if self.gallery_pick_at.is_some_and(|at| at <= now) {
            self.gallery_pick_at = None;
            effects.extend(self.scan_image_pressed());
        }

        if self.persist_at.is_some_and(|at| at <= now) {
            self.persist_at = None;
            effects.push(Effect::PersistSettings(self.saved_settings()));
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::OCR_OPTION;
    use crate::testing::{EngineCall, RecordingEngine};
    use std::time::Duration;

    fn controller(mode: ScanMode) -> ScannerController {
        let (sink, _rx) = ResultSink::channel();
        ScannerController::new(mode, sink, TimingConfig::default(), MultiscanConfig::default())
    }

    fn bound(mode: ScanMode) -> (ScannerController, Arc<RecordingEngine>, Instant) {
        let mut ctl = controller(mode);
        let engine = Arc::new(RecordingEngine::new());
        let now = Instant::now();
        ctl.on_view_created(engine.clone(), now);
        engine.clear();
        (ctl, engine, now)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_view_created_starts_live_modes() {
        let mut ctl = controller(ScanMode::V1);
        let engine = Arc::new(RecordingEngine::new());
        ctl.on_view_created(engine.clone(), Instant::now());

        assert!(engine.has(&EngineCall::Configure));
        assert_eq!(engine.count(&EngineCall::StartScanning), 1);
        assert!(!engine.has(&EngineCall::StopScanning));
        assert_eq!(ctl.phase(), ScanPhase::Scanning);
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn test_gallery_picks_once_after_delay() {
        let mut ctl = controller(ScanMode::Gallery);
        let engine = Arc::new(RecordingEngine::new());
        let now = Instant::now();
        ctl.on_view_created(engine.clone(), now);

        assert!(!engine.has(&EngineCall::StartScanning));
        assert_eq!(ctl.phase(), ScanPhase::Idle);
        assert_eq!(ctl.next_deadline(), Some(now + ms(500)));

        assert!(ctl.fire_due(now + ms(499)).is_empty());
        assert_eq!(ctl.fire_due(now + ms(500)), vec![Effect::LaunchPicker]);
        assert!(ctl.fire_due(now + ms(2000)).is_empty());
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn test_result_pauses_when_not_continuous() {
        let (mut ctl, _engine, _) = bound(ScanMode::Mode1D);
        assert!(!ctl.settings().continuous_scanning);

        let effects = ctl.handle_result(
            EngineResult::single("4006381333931", "EAN-13")
                .with_image("FULL")
                .with_thumbnail("THUMB"),
        );

        let item = &ctl.items()[0];
        assert_eq!(item.text, "4006381333931");
        assert_eq!(
            item.image.as_ref().map(ImageRef::as_str),
            Some("data:image/jpeg;base64,THUMB")
        );
        assert_eq!(effects, vec![Effect::RecordScan(item.clone())]);

        assert!(ctl.state().is_paused());
        assert_eq!(
            ctl.state().frozen_frame().map(ImageRef::as_str),
            Some("data:image/jpeg;base64,FULL")
        );
    }

    #[test]
    fn test_result_keeps_scanning_when_continuous() {
        let (mut ctl, _engine, _) = bound(ScanMode::Continuous);
        ctl.handle_result(EngineResult::single("a", "QR").with_image("data:image/png;base64,X"));

        assert_eq!(ctl.phase(), ScanPhase::Scanning);
        assert!(ctl.state().frozen_frame().is_none());
        // No thumbnail: the full image is displayed, already prefixed
        assert_eq!(
            ctl.items()[0].image.as_ref().map(ImageRef::as_str),
            Some("data:image/png;base64,X")
        );
    }

    #[test]
    fn test_first_result_only_and_empty_ignored() {
        let (mut ctl, _engine, _) = bound(ScanMode::Multiscan);
        let mut result = EngineResult::single("first", "QR");
        result.decoder_results.push(crate::engine::DecoderResult::new("second", "QR"));
        ctl.handle_result(result);
        assert!(ctl.handle_result(EngineResult::default()).is_empty());

        assert_eq!(ctl.items().len(), 1);
        assert_eq!(ctl.items()[0].text, "first");
    }

    #[test]
    fn test_results_queued_behind_pause_are_dropped() {
        let (mut ctl, _engine, _) = bound(ScanMode::Mode1D);
        ctl.handle_result(EngineResult::single("first", "QR").with_image("F1"));

        let effects = ctl.handle_result(EngineResult::single("second", "QR").with_image("F2"));
        assert!(effects.is_empty());
        assert_eq!(ctl.items().len(), 1);
        assert_eq!(
            ctl.state().frozen_frame().map(ImageRef::as_str),
            Some("data:image/jpeg;base64,F1")
        );

        // Resumed: results are taken again
        ctl.resume();
        assert_eq!(ctl.handle_result(EngineResult::single("third", "QR")).len(), 1);
        assert_eq!(ctl.items()[0].text, "third");
    }

    #[test]
    fn test_results_ignored_while_stopped() {
        let (mut ctl, _engine, now) = bound(ScanMode::Continuous);
        ctl.stop_scanning();
        assert!(ctl.handle_result(EngineResult::single("late", "QR")).is_empty());

        // Waiting out a restart delay is not scanning either
        ctl.start_scanning();
        ctl.update_setting(SettingUpdate::ContinuousThreshold(3), now)
            .unwrap();
        assert!(ctl.handle_result(EngineResult::single("late", "QR")).is_empty());
        ctl.fire_due(now + Duration::from_millis(100));
        assert_eq!(ctl.handle_result(EngineResult::single("fresh", "QR")).len(), 1);
        assert_eq!(ctl.items().len(), 1);
    }

    #[test]
    fn test_pause_uses_setting_at_result_time() {
        let (mut ctl, _engine, now) = bound(ScanMode::Continuous);
        ctl.update_setting(SettingUpdate::ContinuousScanning(false), now)
            .unwrap();
        ctl.handle_result(EngineResult::single("a", "QR"));
        assert!(ctl.state().is_paused());
        // No full image: nothing frozen
        assert!(ctl.state().frozen_frame().is_none());
    }

    #[test]
    fn test_resume_restarts_after_pause() {
        let (mut ctl, engine, _) = bound(ScanMode::V1);
        ctl.handle_result(EngineResult::single("a", "QR").with_image("F"));
        assert!(ctl.state().is_paused());

        ctl.resume();
        assert_eq!(ctl.phase(), ScanPhase::Scanning);
        assert!(ctl.state().frozen_frame().is_none());
        assert_eq!(engine.calls(), vec![EngineCall::StartScanning]);

        // Already scanning: nothing to do
        ctl.resume();
        assert_eq!(engine.count(&EngineCall::StartScanning), 1);
    }

    #[test]
    fn test_dismiss_clears_items_and_resumes() {
        let (mut ctl, engine, _) = bound(ScanMode::V1);
        ctl.handle_result(EngineResult::single("a", "QR"));
        ctl.dismiss_results();

        assert!(ctl.items().is_empty());
        assert!(!ctl.state().is_paused());
        assert!(engine.has(&EngineCall::StartScanning));
    }

    #[test]
    fn test_continuous_on_restarts_after_delay() {
        let (mut ctl, engine, now) = bound(ScanMode::V1);
        ctl.handle_result(EngineResult::single("a", "QR").with_image("F"));
        assert!(ctl.state().is_paused());

        ctl.update_setting(SettingUpdate::ContinuousScanning(true), now)
            .unwrap();
        assert!(!ctl.state().is_paused());
        assert!(ctl.state().frozen_frame().is_none());
        assert!(engine.has(&EngineCall::StopScanning));
        assert!(engine.has(&EngineCall::Threshold(0)));
        assert!(!engine.has(&EngineCall::StartScanning));

        ctl.fire_due(now + ms(99));
        assert!(!engine.has(&EngineCall::StartScanning));
        ctl.fire_due(now + ms(100));
        assert_eq!(engine.count(&EngineCall::StartScanning), 1);
        assert_eq!(ctl.phase(), ScanPhase::Scanning);
    }

    #[test]
    fn test_continuous_off_does_not_restart() {
        let (mut ctl, engine, now) = bound(ScanMode::Continuous);
        ctl.update_setting(SettingUpdate::ContinuousScanning(false), now)
            .unwrap();

        assert!(engine.has(&EngineCall::CloseSessionOnResult(true)));
        assert!(!engine.has(&EngineCall::StopScanning));
        assert_eq!(ctl.next_deadline(), Some(now + ms(500)));
    }

    #[test]
    fn test_threshold_restart_only_when_continuous() {
        let (mut ctl, engine, now) = bound(ScanMode::Mode2D);
        ctl.update_setting(SettingUpdate::ContinuousThreshold(5), now)
            .unwrap();
        assert!(engine.has(&EngineCall::Threshold(5)));
        assert!(!engine.has(&EngineCall::StopScanning));

        let (mut ctl, engine, now) = bound(ScanMode::Continuous);
        ctl.update_setting(SettingUpdate::ContinuousThreshold(10), now)
            .unwrap();
        assert!(engine.has(&EngineCall::StopScanning));
        // Threshold 10 turns images back on
        assert!(engine.has(&EngineCall::ImageResult(true)));
        ctl.fire_due(now + ms(100));
        assert!(engine.has(&EngineCall::StartScanning));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let (mut ctl, engine, now) = bound(ScanMode::Continuous);
        let before = ctl.snapshot();

        let err = ctl
            .update_setting(SettingUpdate::ContinuousThreshold(11), now)
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { value: 11, .. }));
        assert_eq!(ctl.snapshot(), before);
        assert!(engine.calls().is_empty());
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn test_debounce_collapses_bursts() {
        let (mut ctl, _engine, now) = bound(ScanMode::V1);
        ctl.update_setting(SettingUpdate::BeepOnSuccess(false), now)
            .unwrap();
        ctl.toggle_barcode_type(Symbology::Aztec, true, now + ms(300));
        ctl.update_setting(SettingUpdate::VibrateOnSuccess(false), now + ms(600))
            .unwrap();

        assert!(ctl.fire_due(now + ms(1099)).is_empty());
        let effects = ctl.fire_due(now + ms(1100));
        assert_eq!(effects.len(), 1);
        let Effect::PersistSettings(saved) = &effects[0] else {
            panic!("expected persist, got {effects:?}");
        };
        assert!(!saved.scanner_settings.beep_on_success);
        assert!(!saved.scanner_settings.vibrate_on_success);
        assert!(saved.enabled_types.is_enabled(Symbology::Aztec));
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn test_reset_twice_identical_and_immediate() {
        let (mut ctl, _engine, now) = bound(ScanMode::Multiscan);
        ctl.update_setting(SettingUpdate::Resolution(scanline_core::Resolution::FHD), now)
            .unwrap();
        ctl.toggle_barcode_type(Symbology::Qr, false, now);

        let effects = ctl.reset_config(now);
        let first = ctl.snapshot();
        assert_eq!(
            effects,
            vec![Effect::PersistSettings(SavedSettings {
                enabled_types: default_enabled_types(ScanMode::Multiscan),
                scanner_settings: default_settings(ScanMode::Multiscan),
            })]
        );
        // Pending debounce was cancelled; only the restart remains
        assert_eq!(ctl.next_deadline(), Some(now + ms(100)));

        ctl.reset_config(now);
        assert_eq!(ctl.snapshot(), first);
    }

    #[test]
    fn test_vin_ocr_toggle_sets_custom_option() {
        let (mut ctl, engine, now) = bound(ScanMode::Vin);
        ctl.toggle_barcode_type(Symbology::OcrText, false, now);
        assert_eq!(engine.custom_option(OCR_OPTION), Some(0));

        ctl.toggle_barcode_type(Symbology::OcrText, true, now);
        assert_eq!(engine.custom_option(OCR_OPTION), Some(1));
        assert!(ctl.enabled_types().is_enabled(Symbology::OcrText));
    }

    #[test]
    fn test_ocr_toggle_is_noop_outside_vin() {
        let (mut ctl, engine, now) = bound(ScanMode::Mode1D);
        let before = ctl.snapshot();

        ctl.toggle_barcode_type(Symbology::OcrText, true, now);
        assert_eq!(ctl.snapshot(), before);
        assert!(engine.calls().is_empty());
        assert!(ctl.next_deadline().is_none());
    }

    #[test]
    fn test_enable_all_touches_only_family() {
        let (mut ctl, engine, now) = bound(ScanMode::Mode2D);
        ctl.enable_all_barcode_types(true, SymbologyFamily::TwoD, now);

        for &sym in Symbology::TWO_D {
            assert_eq!(
                ctl.enabled_types().is_enabled(sym),
                sym != Symbology::OcrText,
                "{sym}"
            );
        }
        for &sym in Symbology::ONE_D {
            assert!(!ctl.enabled_types().is_enabled(sym), "{sym}");
        }
        assert_eq!(engine.custom_option(OCR_OPTION), Some(0));

        ctl.enable_all_barcode_types(false, SymbologyFamily::TwoD, now);
        assert_eq!(ctl.enabled_types().enabled_count(), 0);
    }

    #[test]
    fn test_unbound_calls_are_skipped() {
        let mut ctl = controller(ScanMode::V1);
        let now = Instant::now();

        ctl.update_setting(SettingUpdate::ContinuousScanning(true), now)
            .unwrap();
        ctl.toggle_flash();
        ctl.toggle_zoom();
        ctl.start_scanning();

        assert!(ctl.settings().continuous_scanning);
        assert!(ctl.camera().flash_on);
        assert_eq!(ctl.camera().zoom, 1.5);
        assert_eq!(ctl.phase(), ScanPhase::Idle);
        // Only the persist is armed; no restart without an engine
        assert_eq!(ctl.next_deadline(), Some(now + ms(500)));
        assert!(ctl.begin_image_scan(PickResponse::Picked(PickedImage::new("AA", None))).is_none());
    }

    #[test]
    fn test_camera_toggles_reach_engine() {
        let (mut ctl, engine, _) = bound(ScanMode::V1);
        ctl.toggle_flash();
        ctl.toggle_zoom();
        ctl.toggle_camera();
        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::Flash(true),
                EngineCall::Zoom(1.5),
                EngineCall::Camera(1)
            ]
        );
    }

    #[tokio::test]
    async fn test_image_scan_prefers_thumbnail() {
        let (mut ctl, engine, _) = bound(ScanMode::V1);
        engine.script_image_result(EngineResult::single("img", "QR").with_thumbnail("T"));

        assert_eq!(ctl.scan_image_pressed(), vec![Effect::LaunchPicker]);
        // A second press while the picker is open is ignored
        assert!(ctl.scan_image_pressed().is_empty());

        let pending = ctl
            .begin_image_scan(PickResponse::Picked(PickedImage::new("PICKED", Some("image/png"))))
            .unwrap();
        assert!(engine.has(&EngineCall::ScanImage("PICKED".into())));

        let result = pending.reply.await.unwrap();
        assert!(ctl.handle_image_result(result, &pending.picked).is_empty());
        assert_eq!(
            ctl.items()[0].image.as_ref().map(ImageRef::as_str),
            Some("data:image/jpeg;base64,T")
        );
        // Image scans never pause
        assert_eq!(ctl.phase(), ScanPhase::Scanning);
    }

    #[test]
    fn test_image_scan_falls_back_to_picked_and_notices() {
        let (mut ctl, _engine, _) = bound(ScanMode::V1);
        let picked = PickedImage::new("PICKED", Some("image/png"));

        ctl.handle_image_result(EngineResult::single("x", "QR"), &picked);
        assert_eq!(
            ctl.items()[0].image.as_ref().map(ImageRef::as_str),
            Some("data:image/png;base64,PICKED")
        );

        let effects = ctl.handle_image_result(EngineResult::default(), &picked);
        assert_eq!(effects, vec![Effect::Notify(Notice::no_barcode())]);
        assert_eq!(ctl.items().len(), 1);
    }

    #[test]
    fn test_picker_cancel_and_error_are_silent() {
        let (mut ctl, engine, _) = bound(ScanMode::V1);
        assert!(ctl.begin_image_scan(PickResponse::Cancelled).is_none());
        assert!(ctl
            .begin_image_scan(PickResponse::Failed {
                code: "permission".into(),
                message: "denied".into(),
            })
            .is_none());
        assert!(ctl
            .begin_image_scan(PickResponse::Picked(PickedImage::new("", None)))
            .is_none());
        assert!(engine.calls().is_empty());
        // Picker may be reopened
        assert_eq!(ctl.scan_image_pressed(), vec![Effect::LaunchPicker]);
    }

    #[test]
    fn test_restore_replaces_defaults() {
        let mut ctl = controller(ScanMode::Dpm);
        let mut saved = ctl.saved_settings();
        saved.enabled_types.set(Symbology::Aztec, true);
        saved.scanner_settings.beep_on_success = false;

        ctl.restore(saved.clone());
        assert_eq!(ctl.saved_settings(), saved);
        assert!(ctl.snapshot().active_types.contains("Aztec"));
    }

    #[test]
    fn test_take_pending_persist() {
        let (mut ctl, _engine, now) = bound(ScanMode::V1);
        assert!(ctl.take_pending_persist().is_none());
        ctl.update_setting(SettingUpdate::PinchToZoom(false), now)
            .unwrap();
        let pending = ctl.take_pending_persist().unwrap();
        assert!(!pending.scanner_settings.pinch_to_zoom);
        assert!(ctl.next_deadline().is_none());
    }
}
