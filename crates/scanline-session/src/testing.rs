//! Test doubles: a recording engine, a scripted picker, a recording emitter.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use scanline_core::{
    ArHeaderShowMode, ArLocationType, ArMode, ArOverlayRefresh, DecodingSpeed, RegionOfInterest,
    Resolution, Symbology,
};
use tokio::sync::oneshot;

use crate::engine::{EngineConfig, EngineResult, ResultSink, ScanEngine};
use crate::events::{Notice, SessionEventEmitter};
use crate::picker::{ImagePicker, PickRequest, PickResponse};
use crate::state::SessionSnapshot;

// =============================================================================
// Recording Engine
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Flash(bool),
    Zoom(f32),
    Camera(u8),
    PinchToZoom(bool),
    LocationInPreview(bool),
    RoiVisible(bool),
    Roi(RegionOfInterest),
    Beep(bool),
    Vibrate(bool),
    Deblur(bool),
    Misshaped(bool),
    DecodingSpeed(DecodingSpeed),
    Resolution(Resolution),
    Composite(bool),
    CloseSessionOnResult(bool),
    Threshold(i32),
    CustomOption(String, i32),
    ImageResult(bool),
    Thumbnail(bool),
    ArMode(ArMode),
    ArLocationType(ArLocationType),
    ArHeaderShowMode(ArHeaderShowMode),
    ArOverlayRefresh(ArOverlayRefresh),
    ArDoubleTap(bool),
    ArSelectedColor(String),
    ArNonSelectedColor(String),
    MaxResults(u32),
    CachingDuration(u32),
    CachingEnabled(bool),
    VinRestrictions(bool),
    BarcodeType(Symbology, bool),
    DatamatrixDpm(bool),
    Configure,
    StartScanning,
    StopScanning,
    ScanImage(String),
}

/// Engine that records every call and answers image scans from a script.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    configs: Mutex<Vec<EngineConfig>>,
    sink: Mutex<Option<ResultSink>>,
    image_replies: Mutex<VecDeque<EngineResult>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer to the next `scan_image`. Unscripted scans find
    /// nothing.
    pub fn script_image_result(&self, result: EngineResult) {
        self.image_replies.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has(&self, call: &EngineCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Last value set for a custom option.
    pub fn custom_option(&self, name: &str) -> Option<i32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|c| match c {
                EngineCall::CustomOption(n, v) if n == name => Some(*v),
                _ => None,
            })
    }

    pub fn last_config(&self) -> Option<EngineConfig> {
        self.configs.lock().unwrap().last().cloned()
    }

    /// The sink handed over by the last `start_scanning`.
    pub fn sink(&self) -> Option<ResultSink> {
        self.sink.lock().unwrap().clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ScanEngine for RecordingEngine {
    fn set_flash_enabled(&self, enabled: bool) {
        self.record(EngineCall::Flash(enabled));
    }
    fn set_zoom_factor(&self, zoom: f32) {
        self.record(EngineCall::Zoom(zoom));
    }
    fn set_camera(&self, camera_id: u8) {
        self.record(EngineCall::Camera(camera_id));
    }
    fn set_pinch_to_zoom_enabled(&self, enabled: bool) {
        self.record(EngineCall::PinchToZoom(enabled));
    }
    fn set_location_in_preview_enabled(&self, enabled: bool) {
        self.record(EngineCall::LocationInPreview(enabled));
    }
    fn set_region_of_interest_visible(&self, visible: bool) {
        self.record(EngineCall::RoiVisible(visible));
    }
    fn set_region_of_interest(&self, roi: RegionOfInterest) {
        self.record(EngineCall::Roi(roi));
    }
    fn set_beep_on_success_enabled(&self, enabled: bool) {
        self.record(EngineCall::Beep(enabled));
    }
    fn set_vibrate_on_success_enabled(&self, enabled: bool) {
        self.record(EngineCall::Vibrate(enabled));
    }
    fn set_upc_ean_deblur_enabled(&self, enabled: bool) {
        self.record(EngineCall::Deblur(enabled));
    }
    fn set_misshaped_1d_enabled(&self, enabled: bool) {
        self.record(EngineCall::Misshaped(enabled));
    }
    fn set_decoding_speed(&self, speed: DecodingSpeed) {
        self.record(EngineCall::DecodingSpeed(speed));
    }
    fn set_resolution(&self, resolution: Resolution) {
        self.record(EngineCall::Resolution(resolution));
    }
    fn set_composite_enabled(&self, enabled: bool) {
        self.record(EngineCall::Composite(enabled));
    }
    fn set_close_session_on_result_enabled(&self, enabled: bool) {
        self.record(EngineCall::CloseSessionOnResult(enabled));
    }
    fn set_threshold_between_duplicate_scans(&self, seconds: i32) {
        self.record(EngineCall::Threshold(seconds));
    }
    fn set_custom_option(&self, name: &str, value: i32) {
        self.record(EngineCall::CustomOption(name.to_string(), value));
    }
    fn set_image_result_enabled(&self, enabled: bool) {
        self.record(EngineCall::ImageResult(enabled));
    }
    fn set_thumbnail_on_result_enabled(&self, enabled: bool) {
        self.record(EngineCall::Thumbnail(enabled));
    }
    fn set_ar_mode(&self, mode: ArMode) {
        self.record(EngineCall::ArMode(mode));
    }
    fn set_ar_location_type(&self, location_type: ArLocationType) {
        self.record(EngineCall::ArLocationType(location_type));
    }
    fn set_ar_header_show_mode(&self, show_mode: ArHeaderShowMode) {
        self.record(EngineCall::ArHeaderShowMode(show_mode));
    }
    fn set_ar_overlay_refresh(&self, refresh: ArOverlayRefresh) {
        self.record(EngineCall::ArOverlayRefresh(refresh));
    }
    fn set_ar_double_tap_to_freeze_enabled(&self, enabled: bool) {
        self.record(EngineCall::ArDoubleTap(enabled));
    }
    fn set_ar_selected_location_color(&self, hex: &str) {
        self.record(EngineCall::ArSelectedColor(hex.to_string()));
    }
    fn set_ar_non_selected_location_color(&self, hex: &str) {
        self.record(EngineCall::ArNonSelectedColor(hex.to_string()));
    }
    fn set_maximum_results_count(&self, count: u32) {
        self.record(EngineCall::MaxResults(count));
    }
    fn set_multicode_caching_duration(&self, millis: u32) {
        self.record(EngineCall::CachingDuration(millis));
    }
    fn set_multicode_caching_enabled(&self, enabled: bool) {
        self.record(EngineCall::CachingEnabled(enabled));
    }
    fn set_vin_restrictions_enabled(&self, enabled: bool) {
        self.record(EngineCall::VinRestrictions(enabled));
    }
    fn set_barcode_type_enabled(&self, symbology: Symbology, enabled: bool) {
        self.record(EngineCall::BarcodeType(symbology, enabled));
    }
    fn set_datamatrix_dpm_mode_enabled(&self, enabled: bool) {
        self.record(EngineCall::DatamatrixDpm(enabled));
    }
    fn configure(&self, config: &EngineConfig) {
        self.configs.lock().unwrap().push(config.clone());
        self.record(EngineCall::Configure);
    }
    fn start_scanning(&self, sink: ResultSink) {
        *self.sink.lock().unwrap() = Some(sink);
        self.record(EngineCall::StartScanning);
    }
    fn stop_scanning(&self) {
        self.record(EngineCall::StopScanning);
    }
    fn scan_image(&self, base64: &str, reply: oneshot::Sender<EngineResult>) {
        self.record(EngineCall::ScanImage(base64.to_string()));
        let result = self
            .image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        let _ = reply.send(result);
    }
}

// =============================================================================
// Scripted Picker
// =============================================================================

/// Picker answering from a queue; an empty queue means the user cancelled.
#[derive(Default)]
pub struct ScriptedPicker {
    responses: Mutex<VecDeque<PickResponse>>,
    requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: PickResponse) -> Self {
        let picker = Self::default();
        picker.responses.lock().unwrap().push_back(response);
        picker
    }

    /// Queues one more answer.
    pub fn push_response(&self, response: PickResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn pick_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ImagePicker for ScriptedPicker {
    async fn pick(&self, request: PickRequest) -> PickResponse {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PickResponse::Cancelled)
    }
}

// =============================================================================
// Recording Emitter
// =============================================================================

#[derive(Default)]
pub struct RecordingEmitter {
    notices: Mutex<Vec<Notice>>,
    states: Mutex<Vec<SessionSnapshot>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last_state(&self) -> Option<SessionSnapshot> {
        self.states.lock().unwrap().last().cloned()
    }

    pub fn state_count(&self) -> usize {
        self.states.lock().unwrap().len()
    }
}

impl SessionEventEmitter for RecordingEmitter {
    fn emit_notice(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn emit_state(&self, snapshot: &SessionSnapshot) {
        self.states.lock().unwrap().push(snapshot.clone());
    }
}
