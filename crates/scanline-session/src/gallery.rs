//! # Home-Screen Gallery Scan
//!
//! One-off scan of a photo from the library, outside any scanner session.
//! A hidden engine view is configured with the whole catalog and image
//! results on; each [`GalleryScanner::scan`] picks, scans, records history
//! and hands back the item for the details screen.
//!
//! Unlike the live scanner screen, picker failures are shown to the user.

use std::sync::Arc;

use scanline_core::{DecoderConfigMap, EnabledTypes, ScanMode, ScannedItem};
use scanline_store::HistoryRepository;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::engine::{EngineConfig, ScanEngine};
use crate::error::{SessionError, SessionResult};
use crate::events::{Notice, SessionEventEmitter};
use crate::picker::{ImagePicker, PickRequest, PickResponse};

pub struct GalleryScanner {
    engine: Arc<dyn ScanEngine>,
    picker: Arc<dyn ImagePicker>,
    history: Arc<dyn HistoryRepository>,
    emitter: Arc<dyn SessionEventEmitter>,
}

impl GalleryScanner {
    /// Configures `engine` for still-image scanning of every symbology.
    pub fn new(
        engine: Arc<dyn ScanEngine>,
        picker: Arc<dyn ImagePicker>,
        history: Arc<dyn HistoryRepository>,
        emitter: Arc<dyn SessionEventEmitter>,
    ) -> Self {
        engine.configure(&EngineConfig {
            decoders: DecoderConfigMap::from_enabled(&EnabledTypes::all(true), ScanMode::Gallery),
            image_result_enabled: Some(true),
            thumbnail_on_result_enabled: None,
        });
        debug!("Gallery engine configured");

        GalleryScanner {
            engine,
            picker,
            history,
            emitter,
        }
    }

    /// Picks a photo and scans it.
    ///
    /// Returns `None` when the user cancelled, the picker failed, or nothing
    /// was detected; the last two also raise a notice.
    pub async fn scan(&self) -> SessionResult<Option<ScannedItem>> {
        let picked = match self.picker.pick(PickRequest::photo_with_base64()).await {
            PickResponse::Cancelled => {
                info!("User cancelled image picker");
                return Ok(None);
            }
            PickResponse::Failed { code, message } => {
                error!(%code, %message, "Image picker error");
                self.emitter.emit_notice(&Notice::error(message));
                return Ok(None);
            }
            PickResponse::Picked(picked) if picked.base64.is_empty() => {
                debug!("Picker returned no image data");
                return Ok(None);
            }
            PickResponse::Picked(picked) => picked,
        };

        let (tx, rx) = oneshot::channel();
        self.engine.scan_image(&picked.base64, tx);
        let result = rx
            .await
            .map_err(|_| SessionError::ChannelClosed("Engine dropped image scan".into()))?;

        let Some(first) = result.first() else {
            self.emitter.emit_notice(&Notice::no_barcode());
            return Ok(None);
        };

        let item = ScannedItem::new(
            first.text.clone(),
            first.type_name.clone(),
            Some(picked.display_image()),
        );
        info!(symbology = %item.symbology, "Barcode found in gallery image");

        if let Err(e) = self.history.add_scan(item.clone()).await {
            error!(error = %e, "Failed to record scan history");
        }

        Ok(Some(item))
    }
}
