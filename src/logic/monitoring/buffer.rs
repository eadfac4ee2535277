//! Observation Buffer - bounded, arrival-ordered record store
//!
//! Overflow policy: once the length exceeds `capacity`, drop everything but
//! the newest `retain` records in one step (not per-element FIFO).

use parking_lot::Mutex;
use serde::Serialize;

use super::record::PredictionRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const MAX_BUFFER_SIZE: usize = 10_000;
pub const RETAIN_ON_OVERFLOW: usize = 5_000;

// ============================================================================
// BUFFER
// ============================================================================

pub struct ObservationBuffer {
    records: Mutex<Vec<PredictionRecord>>,
    capacity: usize,
    retain: usize,
}

impl Default for ObservationBuffer {
    fn default() -> Self {
        Self::with_limits(MAX_BUFFER_SIZE, RETAIN_ON_OVERFLOW)
    }
}

impl ObservationBuffer {
    /// `retain` is clamped to `capacity`
    pub fn with_limits(capacity: usize, retain: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity,
            retain: retain.min(capacity),
        }
    }

    /// Append, then truncate under the same guard
    pub fn push(&self, record: PredictionRecord) {
        let mut records = self.records.lock();
        records.push(record);

        if records.len() > self.capacity {
            let current_len = records.len();
            records.drain(0..current_len - self.retain);
            log::debug!(
                "Observation buffer overflow: kept newest {} of {} records",
                self.retain,
                current_len
            );
        }
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<PredictionRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn retain(&self) -> usize {
        self.retain
    }
}

/// Buffer health for observability
#[derive(Debug, Clone, Serialize)]
pub struct BufferStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub retain: usize,
    pub rejected: u64,
    pub ready_for_report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureVector;

    fn record(i: usize) -> PredictionRecord {
        let v = FeatureVector::new([i as f64, 1.0, 1.0, 1.0]).unwrap();
        PredictionRecord::new(&v, 0, &[1.0, 0.0, 0.0], 1.0)
    }

    #[test]
    fn test_halve_on_overflow() {
        let buffer = ObservationBuffer::with_limits(10, 5);
        for i in 0..10 {
            buffer.push(record(i));
        }
        assert_eq!(buffer.len(), 10);

        buffer.push(record(10));
        let kept = buffer.snapshot();
        assert_eq!(kept.len(), 5);
        // newest five, arrival order preserved
        let firsts: Vec<f64> = kept.iter().map(|r| r.features[0]).collect();
        assert_eq!(firsts, vec![6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_retain_clamped_to_capacity() {
        let buffer = ObservationBuffer::with_limits(3, 8);
        assert_eq!(buffer.retain(), 3);
        for i in 0..4 {
            buffer.push(record(i));
        }
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_default_limits() {
        let buffer = ObservationBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), MAX_BUFFER_SIZE);
        assert_eq!(buffer.retain(), RETAIN_ON_OVERFLOW);
        buffer.push(record(1));
        assert!(!buffer.is_empty());
    }
}
