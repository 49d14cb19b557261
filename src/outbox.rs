use std::sync::Arc;

use parking_lot::Mutex;

use crate::export::{EncodedRaster, InpaintRequest, InpaintSink, SaveSink};

#[derive(Debug, Default)]
struct Submissions {
    inpaint: Vec<InpaintRequest>,
    saved: Vec<EncodedRaster>,
}

/// Collects everything the editor hands off, standing in for the job
/// submission and download services of the surrounding application.
///
/// Cloning shares the same storage.
#[derive(Debug, Default, Clone)]
pub struct Outbox {
    submissions: Arc<Mutex<Submissions>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inpaint_requests(&self) -> Vec<InpaintRequest> {
        self.submissions.lock().inpaint.clone()
    }

    pub fn inpaint_count(&self) -> usize {
        self.submissions.lock().inpaint.len()
    }

    pub fn saved(&self) -> Vec<EncodedRaster> {
        self.submissions.lock().saved.clone()
    }

    pub fn len(&self) -> usize {
        let submissions = self.submissions.lock();
        submissions.inpaint.len() + submissions.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InpaintSink for Outbox {
    fn submit(&self, request: InpaintRequest) {
        match serde_json::to_string(&request) {
            Ok(manifest) => log::info!("Inpaint request queued: {manifest}"),
            Err(err) => log::warn!("Could not describe inpaint request {}: {err}", request.id),
        }
        self.submissions.lock().inpaint.push(request);
    }
}

impl SaveSink for Outbox {
    fn save(&self, raster: EncodedRaster) {
        log::info!(
            "Saved {}x{} {} ({} bytes)",
            raster.width,
            raster.height,
            raster.mime,
            raster.bytes.len()
        );
        self.submissions.lock().saved.push(raster);
    }
}
