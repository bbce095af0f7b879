//! # Scan Engine Handle
//!
//! The barcode engine is a closed SDK. The session only sees this trait: a
//! bag of fire-and-forget setters, a bulk `configure`, and the start/stop and
//! one-shot image-scan entry points.
//!
//! ## Result Delivery
//! ```text
//! ┌──────────────┐  start_scanning(sink)   ┌──────────────────────────────┐
//! │   Session    │ ──────────────────────► │        Engine (SDK)          │
//! │   actor      │                         │                              │
//! │              │ ◄────── sink.deliver ── │  one EngineResult per        │
//! │  select! on  │     (unbounded mpsc)    │  accepted decode event       │
//! │  result_rx   │                         │                              │
//! │              │  scan_image(b64, tx)    │                              │
//! │              │ ──────────────────────► │                              │
//! │              │ ◄──── oneshot reply ─── │  exactly one EngineResult    │
//! └──────────────┘                         └──────────────────────────────┘
//! ```
//!
//! Setters never fail from the caller's point of view; an engine that cannot
//! honour a value ignores it.

use scanline_core::{
    ArHeaderShowMode, ArLocationType, ArMode, ArOverlayRefresh, DecoderConfigMap, DecodingSpeed,
    RegionOfInterest, Resolution, Symbology,
};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// Results
// =============================================================================

/// One decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderResult {
    pub text: String,
    /// Engine-reported type name, e.g. `"QR"` or `"Code 128"`.
    pub type_name: String,
}

impl DecoderResult {
    pub fn new(text: impl Into<String>, type_name: impl Into<String>) -> Self {
        DecoderResult {
            text: text.into(),
            type_name: type_name.into(),
        }
    }
}

/// One decode event as delivered by the engine.
///
/// Images arrive as bare base64 or as data URIs depending on the engine
/// build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineResult {
    pub decoder_results: Vec<DecoderResult>,
    pub image_base64: Option<String>,
    pub thumbnails_base64: Vec<String>,
}

impl EngineResult {
    /// A result carrying a single decode and no images.
    pub fn single(text: impl Into<String>, type_name: impl Into<String>) -> Self {
        EngineResult {
            decoder_results: vec![DecoderResult::new(text, type_name)],
            ..Default::default()
        }
    }

    pub fn with_image(mut self, base64: impl Into<String>) -> Self {
        self.image_base64 = Some(base64.into());
        self
    }

    pub fn with_thumbnail(mut self, base64: impl Into<String>) -> Self {
        self.thumbnails_base64.push(base64.into());
        self
    }

    /// The first decode, which is the only one the session acts on.
    pub fn first(&self) -> Option<&DecoderResult> {
        self.decoder_results.first()
    }
}

/// Channel end the engine pushes live results into.
#[derive(Debug, Clone)]
pub struct ResultSink {
    tx: mpsc::UnboundedSender<EngineResult>,
}

impl ResultSink {
    pub fn new(tx: mpsc::UnboundedSender<EngineResult>) -> Self {
        ResultSink { tx }
    }

    /// Creates a sink and the receiver the session listens on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ResultSink { tx }, rx)
    }

    /// Hands a result to the session. Returns `false` once the session is gone.
    pub fn deliver(&self, result: EngineResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

// =============================================================================
// Bulk Configuration
// =============================================================================

/// Payload of [`ScanEngine::configure`].
///
/// Image flags left as `None` keep their current engine value.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub decoders: DecoderConfigMap,
    pub image_result_enabled: Option<bool>,
    pub thumbnail_on_result_enabled: Option<bool>,
}

impl EngineConfig {
    /// Decoder map plus both image flags.
    pub fn full(decoders: DecoderConfigMap, images_enabled: bool) -> Self {
        EngineConfig {
            decoders,
            image_result_enabled: Some(images_enabled),
            thumbnail_on_result_enabled: Some(images_enabled),
        }
    }

    /// Decoder map only.
    pub fn decoders_only(decoders: DecoderConfigMap) -> Self {
        EngineConfig {
            decoders,
            image_result_enabled: None,
            thumbnail_on_result_enabled: None,
        }
    }
}

// =============================================================================
// Engine Trait
// =============================================================================

/// Handle to one live engine instance (one camera view).
pub trait ScanEngine: Send + Sync {
    // Camera
    fn set_flash_enabled(&self, enabled: bool);
    fn set_zoom_factor(&self, zoom: f32);
    fn set_camera(&self, camera_id: u8);

    // Preview
    fn set_pinch_to_zoom_enabled(&self, enabled: bool);
    fn set_location_in_preview_enabled(&self, enabled: bool);
    fn set_region_of_interest_visible(&self, visible: bool);
    fn set_region_of_interest(&self, roi: RegionOfInterest);

    // Feedback
    fn set_beep_on_success_enabled(&self, enabled: bool);
    fn set_vibrate_on_success_enabled(&self, enabled: bool);

    // Decoding
    fn set_upc_ean_deblur_enabled(&self, enabled: bool);
    fn set_misshaped_1d_enabled(&self, enabled: bool);
    fn set_decoding_speed(&self, speed: DecodingSpeed);
    fn set_resolution(&self, resolution: Resolution);
    fn set_composite_enabled(&self, enabled: bool);
    fn set_close_session_on_result_enabled(&self, enabled: bool);
    /// Seconds between accepted repeats of the same code; `-1` = never repeat.
    fn set_threshold_between_duplicate_scans(&self, seconds: i32);
    fn set_custom_option(&self, name: &str, value: i32);

    // Image results
    fn set_image_result_enabled(&self, enabled: bool);
    fn set_thumbnail_on_result_enabled(&self, enabled: bool);

    // AR overlay
    fn set_ar_mode(&self, mode: ArMode);
    fn set_ar_location_type(&self, location_type: ArLocationType);
    fn set_ar_header_show_mode(&self, show_mode: ArHeaderShowMode);
    fn set_ar_overlay_refresh(&self, refresh: ArOverlayRefresh);
    fn set_ar_double_tap_to_freeze_enabled(&self, enabled: bool);
    fn set_ar_selected_location_color(&self, hex: &str);
    fn set_ar_non_selected_location_color(&self, hex: &str);

    // Mode extras
    fn set_maximum_results_count(&self, count: u32);
    fn set_multicode_caching_duration(&self, millis: u32);
    fn set_multicode_caching_enabled(&self, enabled: bool);
    fn set_vin_restrictions_enabled(&self, enabled: bool);
    fn set_barcode_type_enabled(&self, symbology: Symbology, enabled: bool);
    fn set_datamatrix_dpm_mode_enabled(&self, enabled: bool);

    // Lifecycle
    fn configure(&self, config: &EngineConfig);
    fn start_scanning(&self, sink: ResultSink);
    fn stop_scanning(&self);
    /// Scans a still image; the engine answers once on `reply`.
    fn scan_image(&self, base64: &str, reply: oneshot::Sender<EngineResult>);
}
