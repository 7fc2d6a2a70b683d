//! # Test Helpers
//!
//! In-memory implementations of the external collaborator traits, used by
//! the integration tests and the dry-run tooling. Shipped in the library
//! (not under `#[cfg(test)]`) so integration tests and downstream embedders
//! can drive the orchestrator without real services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::RawRecord;
use crate::services::{
    ContactOutcome, ContactRequest, RecordPatch, RecordStore, StoreError, VoiceCallingService,
    VoiceError,
};

/// Record store backed by a map, with per-record last-write-wins updates and
/// injectable failures for exercising the retry and reduced-write paths.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, RawRecord>>,
    /// Patches applied, in order, for assertions.
    applied: RwLock<Vec<(String, RecordPatch)>>,
    /// Fail the next N full-patch updates per record id.
    fail_full_updates: RwLock<HashMap<String, u32>>,
    /// Also fail reduced writes for these record ids.
    fail_reduced_writes: RwLock<HashMap<String, bool>>,
    /// Fail every `list_records` call outright.
    unavailable: RwLock<bool>,
}

impl InMemoryRecordStore {
    pub fn new(records: Vec<RawRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.record_id.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
            ..Self::default()
        }
    }

    pub fn record(&self, record_id: &str) -> Option<RawRecord> {
        self.records.read().get(record_id).cloned()
    }

    pub fn applied_patches(&self) -> Vec<(String, RecordPatch)> {
        self.applied.read().clone()
    }

    /// Make the next `count` full-patch updates for `record_id` fail.
    pub fn fail_next_updates(&self, record_id: &str, count: u32) {
        self.fail_full_updates
            .write()
            .insert(record_id.to_string(), count);
    }

    /// Make reduced writes for `record_id` fail as well.
    pub fn fail_reduced_writes(&self, record_id: &str) {
        self.fail_reduced_writes
            .write()
            .insert(record_id.to_string(), true);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    fn apply(&self, record: &mut RawRecord, patch: &RecordPatch) {
        if let Some(stage) = patch.stage {
            record.stage = Some(stage.to_string());
        }
        if let Some(trigger) = &patch.next_trigger_date {
            record.next_trigger_date = trigger.map(|d| d.to_string());
        }
        if let Some(event) = &patch.append_contact {
            record.contact_history.push(event.clone());
        }
        if let Some(completed) = patch.completed {
            record.completed = Some(completed);
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        if *self.unavailable.read() {
            return Err(StoreError::unavailable("store offline"));
        }
        Ok(self.records.read().values().cloned().collect())
    }

    async fn update_record(&self, record_id: &str, patch: RecordPatch) -> Result<(), StoreError> {
        if !patch.is_reduced() {
            let mut failures = self.fail_full_updates.write();
            if let Some(remaining) = failures.get_mut(record_id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(StoreError::rejected(record_id, "injected update failure"));
                }
            }
        } else if self
            .fail_reduced_writes
            .read()
            .get(record_id)
            .copied()
            .unwrap_or(false)
        {
            return Err(StoreError::rejected(record_id, "injected reduced-write failure"));
        }

        let mut records = self.records.write();
        let record = records
            .get_mut(record_id)
            .ok_or_else(|| StoreError::NotFound {
                record_id: record_id.to_string(),
            })?;
        self.apply(record, &patch);
        self.applied
            .write()
            .push((record_id.to_string(), patch));
        Ok(())
    }
}

/// Voice service returning scripted outcomes per record id, with a call log
/// and a concurrency high-water mark for dispatch assertions.
pub struct ScriptedVoiceService {
    outcomes: RwLock<HashMap<String, Result<ContactOutcome, String>>>,
    default_outcome: ContactOutcome,
    calls: RwLock<Vec<ContactRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    /// Artificial per-call latency so concurrency is observable.
    call_delay: std::time::Duration,
}

impl ScriptedVoiceService {
    pub fn new() -> Self {
        Self {
            outcomes: RwLock::new(HashMap::new()),
            default_outcome: answered_outcome("Customer acknowledged the reminder."),
            calls: RwLock::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            call_delay: std::time::Duration::from_millis(0),
        }
    }

    pub fn with_call_delay(mut self, delay: std::time::Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Script the outcome for one record id; an `Err` string becomes a
    /// placement failure from the service.
    pub fn script(&self, record_id: &str, outcome: Result<ContactOutcome, String>) {
        self.outcomes.write().insert(record_id.to_string(), outcome);
    }

    pub fn calls_placed(&self) -> Vec<ContactRequest> {
        self.calls.read().clone()
    }

    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedVoiceService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceCallingService for ScriptedVoiceService {
    async fn place_contact(&self, request: ContactRequest) -> Result<ContactOutcome, VoiceError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.write().push(request.clone());

        match self.outcomes.read().get(&request.record_id) {
            Some(Ok(outcome)) => Ok(outcome.clone()),
            Some(Err(message)) => Err(VoiceError::placement_failed(
                request.record_id.clone(),
                message.clone(),
            )),
            None => Ok(self.default_outcome.clone()),
        }
    }
}

/// A successfully answered contact outcome.
pub fn answered_outcome(summary: &str) -> ContactOutcome {
    ContactOutcome {
        success: true,
        summary: summary.to_string(),
        evaluation: "true".to_string(),
        ended_reason: "customer-ended-call".to_string(),
    }
}

/// A voicemail outcome: placed and concluded, but unanswered.
pub fn voicemail_outcome() -> ContactOutcome {
    ContactOutcome {
        success: true,
        summary: "Left a voicemail with the reminder details.".to_string(),
        evaluation: "false".to_string(),
        ended_reason: "voicemail".to_string(),
    }
}

/// A placement-level failure reported by the service.
pub fn failed_outcome() -> ContactOutcome {
    ContactOutcome {
        success: false,
        summary: String::new(),
        evaluation: "false".to_string(),
        ended_reason: "twilio-failed-to-connect-call".to_string(),
    }
}
