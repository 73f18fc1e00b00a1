//! Event normalizer - raw delivery batches to [`NormalizedRecord`]s
//!
//! Each unit is decoded independently; a unit that fails to decode is
//! dropped from the output and the rest of the batch carries on. Output order
//! is arrival order within the batch.

use tracing::{debug, warn};

use crate::codec::{self, SmsDeliver};
use crate::domain::{NormalizedRecord, PduFormat, RawDeliveryBatch};

/// Stateless decoder for transport deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Decode every unit of the batch, skipping the ones that fail.
    pub fn normalize(&self, batch: Option<&RawDeliveryBatch>) -> Vec<NormalizedRecord> {
        let Some(batch) = batch else {
            warn!("[Normalizer] Delivery carried no batch");
            return Vec::new();
        };

        let format = PduFormat::from_tag(batch.format.as_deref());
        debug!(
            units = batch.len(),
            format = batch.format.as_deref().unwrap_or("<none>"),
            "[Normalizer] Processing delivery batch"
        );

        batch
            .units
            .iter()
            .enumerate()
            .filter_map(|(index, unit)| {
                format
                    .clone()
                    .and_then(|format| codec::decode(unit, format))
                    .map(SmsDeliver::into_record)
                    .map_err(|e| {
                        debug!(index, error = %e, "[Normalizer] Skipping undecodable unit");
                    })
                    .ok()
            })
            .collect()
    }
}
