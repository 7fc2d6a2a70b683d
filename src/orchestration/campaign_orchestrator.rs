//! # Campaign Orchestrator
//!
//! Top-level driver for one campaign pass: enumerate records, classify and
//! evaluate the population, partition the eligible set by (classification,
//! stage), dispatch batch or sequential contact execution, then advance and
//! persist every confirmed contact.
//!
//! ## Dispatch model
//!
//! Batch partitions fan out concurrently under a semaphore bound and join
//! all outcomes before persisting. Sequential partitions run strictly one
//! record at a time so a persistent failure cannot cascade silently across
//! a partition, and each record's outcome can be handled individually.
//!
//! ## Failure containment
//!
//! Per-record errors never abort the pass. The persistence step (and only
//! the persistence step) carries a bounded retry policy; if the full patch
//! keeps failing, a reduced write (the contact marker alone) keeps the
//! dedup guard sound so the next invocation cannot double-dial the record.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::OutreachConfig;
use crate::constants::events;
use crate::eligibility::{
    EligibilityDecision, EligibilityEvaluator, SafetyNetEvaluator,
};
use crate::error::OutreachError;
use crate::models::{
    digest_summary, CallEvaluation, ContactEvent, EndedReason, PolicyRecord, RawRecord,
};
use crate::schedule::{self, CallingMode};
use crate::services::{
    ContactOutcome, ContactRequest, RecordPatch, RecordStore, VoiceCallingService, VoiceError,
};

use super::errors::{OrchestrationError, OrchestrationResult};
use super::stage_advancer;
use super::types::{
    ContactResult, ContactStatus, EligibleContact, PartitionKey, PassSummary,
};

pub struct CampaignOrchestrator<S, V> {
    store: Arc<S>,
    voice: Arc<V>,
    config: OutreachConfig,
    tz: Tz,
    evaluator: EligibilityEvaluator,
    safety_net: SafetyNetEvaluator,
}

impl<S, V> CampaignOrchestrator<S, V>
where
    S: RecordStore,
    V: VoiceCallingService,
{
    pub fn new(
        store: Arc<S>,
        voice: Arc<V>,
        config: OutreachConfig,
    ) -> crate::error::Result<Self> {
        let tz = config
            .operating_tz()
            .map_err(|e| OutreachError::ConfigurationError(e.to_string()))?;

        let evaluator =
            EligibilityEvaluator::new(config.engine.catch_up_window_business_days, tz);
        let safety_net = SafetyNetEvaluator::new(config.engine.safety_net_lookback_days, tz);

        Ok(Self {
            store,
            voice,
            config,
            tz,
            evaluator,
            safety_net,
        })
    }

    /// Run one campaign pass. `now` is the injected clock instant; "today"
    /// is derived from it in the operating timezone, never read from ambient
    /// state. `force` bypasses the time-of-day gate for manual runs.
    ///
    /// Idempotent-safe to call multiple times per day: the dedup guard
    /// blocks every record already contacted on today's calendar date.
    pub async fn run_pass(
        &self,
        now: DateTime<Utc>,
        force: bool,
    ) -> OrchestrationResult<PassSummary> {
        let local_now = now.with_timezone(&self.tz);
        let today = local_now.date_naive();

        if !force && self.config.gating.enabled {
            let hour = local_now.hour();
            let gating = &self.config.gating;
            if hour < gating.window_start_hour || hour >= gating.window_end_hour {
                info!(
                    event = events::PASS_GATED,
                    pass_date = %today,
                    local_hour = hour,
                    "⏰ Outside calling window; pass skipped"
                );
                return Ok(PassSummary::gated(today));
            }
        }

        info!(
            event = events::PASS_STARTED,
            pass_date = %today,
            forced = force,
            "🚀 Campaign pass started"
        );

        let raw_records = self
            .store
            .list_records()
            .await
            .map_err(|e| OrchestrationError::store_unavailable(e.to_string()))?;

        let mut summary = PassSummary {
            pass_date: Some(today),
            total_records: raw_records.len(),
            ..PassSummary::default()
        };

        let records = self.ingest(raw_records, &mut summary);
        let partitions = self.partition_eligible(&records, today, &mut summary);

        for (key, contacts) in partitions {
            let template = schedule::template_for(key.class)
                .expect("partitions only hold classified records");
            let stage_def = template
                .stage(key.stage)
                .expect("partitions only hold in-template stages");

            info!(
                class = %key.class,
                stage = key.stage,
                count = contacts.len(),
                mode = ?stage_def.calling_mode,
                script_variant = stage_def.script_variant,
                "📞 Dispatching partition"
            );

            let results = match stage_def.calling_mode {
                CallingMode::Batch => {
                    self.dispatch_batch(contacts, stage_def.script_variant, today, now)
                        .await?
                }
                CallingMode::Sequential => {
                    self.dispatch_sequential(contacts, stage_def.script_variant, today, now)
                        .await?
                }
            };

            for result in &results {
                summary.record_result(&result.status);
            }
        }

        info!(
            event = events::PASS_COMPLETED,
            pass_date = %today,
            eligible = summary.eligible,
            persisted = summary.contacts_persisted,
            failed = summary.contacts_failed,
            "🏁 Campaign pass completed"
        );

        Ok(summary)
    }

    /// Map raw rows into typed records; ingestion failures are isolated and
    /// counted, never fatal.
    fn ingest(&self, raw_records: Vec<RawRecord>, summary: &mut PassSummary) -> Vec<PolicyRecord> {
        let mut records = Vec::with_capacity(raw_records.len());
        for raw in raw_records {
            let record_id = raw.record_id.clone();
            match PolicyRecord::from_raw(raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    summary.ingestion_failures += 1;
                    warn!(
                        event = events::RECORD_INGESTION_FAILED,
                        record_id = %record_id,
                        error = %e,
                        "Record excluded from this pass"
                    );
                }
            }
        }
        records
    }

    /// Classify + evaluate the population and group the eligible set by
    /// (classification, stage). Primary path first; the safety net is
    /// consulted only for declined status-triggered records.
    fn partition_eligible(
        &self,
        records: &[PolicyRecord],
        today: NaiveDate,
        summary: &mut PassSummary,
    ) -> BTreeMap<PartitionKey, Vec<EligibleContact>> {
        let mut partitions: BTreeMap<PartitionKey, Vec<EligibleContact>> = BTreeMap::new();

        for record in records {
            let mut decision = self.evaluator.evaluate(record, today);

            if !decision.is_eligible() && record.classification.is_status_triggered() {
                let rescue = self.safety_net.evaluate(record, today);
                if rescue.is_eligible() {
                    decision = rescue;
                }
            }

            match decision {
                EligibilityDecision::Eligible { stage, path } => {
                    summary.eligible += 1;
                    debug!(
                        event = events::RECORD_ELIGIBLE,
                        record_id = %record.record_id,
                        classification = %record.classification,
                        stage = stage,
                        path = ?path,
                        "Record due for contact"
                    );
                    partitions
                        .entry(PartitionKey {
                            class: record.classification,
                            stage,
                        })
                        .or_default()
                        .push(EligibleContact {
                            record: record.clone(),
                            stage,
                            path,
                        });
                }
                EligibilityDecision::Ineligible { reason } => {
                    summary.skipped += 1;
                    debug!(
                        event = events::RECORD_SKIPPED,
                        record_id = %record.record_id,
                        classification = %record.classification,
                        reason = %reason,
                        "Record skipped"
                    );
                }
            }
        }

        partitions
    }

    /// Bounded-concurrency fan-out/fan-in: every call in the partition is
    /// issued under the semaphore, all outcomes are awaited, then each
    /// confirmed contact is advanced and persisted.
    async fn dispatch_batch(
        &self,
        contacts: Vec<EligibleContact>,
        script_variant: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> OrchestrationResult<Vec<ContactResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.dispatch.max_concurrent_calls));

        let placements = contacts.iter().map(|contact| {
            let semaphore = Arc::clone(&semaphore);
            let request = self.contact_request(contact, script_variant);
            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");
                self.place_bounded(request).await
            }
        });

        let outcomes = join_all(placements).await;

        let mut results = Vec::with_capacity(contacts.len());
        for (contact, outcome) in contacts.into_iter().zip(outcomes) {
            results.push(self.conclude_contact(contact, outcome, today, now).await?);
        }
        Ok(results)
    }

    /// Strictly one record at a time: the outcome for record *i*, including
    /// its persistence, is resolved before record *i + 1* begins.
    async fn dispatch_sequential(
        &self,
        contacts: Vec<EligibleContact>,
        script_variant: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> OrchestrationResult<Vec<ContactResult>> {
        let mut results = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let request = self.contact_request(&contact, script_variant);
            let outcome = self.place_bounded(request).await;
            results.push(self.conclude_contact(contact, outcome, today, now).await?);
        }
        Ok(results)
    }

    fn contact_request(&self, contact: &EligibleContact, script_variant: &str) -> ContactRequest {
        ContactRequest {
            record_id: contact.record.record_id.clone(),
            company: contact.record.company.clone(),
            phone_number: contact.record.phone_number.clone(),
            script_variant: script_variant.to_string(),
        }
    }

    /// Place one contact under the configured outcome timeout. A timeout is
    /// failed-but-possibly-placed: the contact is never re-placed this pass.
    async fn place_bounded(
        &self,
        request: ContactRequest,
    ) -> Result<ContactOutcome, OrchestrationError> {
        let record_id = request.record_id.clone();
        let wait = Duration::from_secs(self.config.dispatch.call_timeout_seconds);

        match timeout(wait, self.voice.place_contact(request)).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(VoiceError::Unavailable { message })) => {
                Err(OrchestrationError::VoiceUnavailable { message })
            }
            Ok(Err(e)) => Err(OrchestrationError::contact_placement(
                record_id,
                e.to_string(),
            )),
            Err(_) => Err(OrchestrationError::contact_timeout(
                record_id,
                self.config.dispatch.call_timeout_seconds,
            )),
        }
    }

    /// Turn a placement outcome into a contact result: compose the event,
    /// advance the stage, persist with the bounded retry policy. Failures
    /// leave the record untouched and eligible for the next pass.
    async fn conclude_contact(
        &self,
        contact: EligibleContact,
        outcome: Result<ContactOutcome, OrchestrationError>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> OrchestrationResult<ContactResult> {
        let record_id = contact.record.record_id.clone();

        let outcome = match outcome {
            Ok(outcome) if outcome.success => outcome,
            // Connectivity-level failure aborts the whole pass; everything
            // else is contained to this record.
            Err(e) if e.is_fatal() => return Err(e),
            Ok(outcome) => {
                warn!(
                    event = events::CONTACT_FAILED,
                    record_id = %record_id,
                    ended_reason = %outcome.ended_reason,
                    "Calling service reported placement failure; record not advanced"
                );
                return Ok(ContactResult {
                    record_id,
                    status: ContactStatus::PlacementFailed,
                    event: None,
                });
            }
            Err(OrchestrationError::ContactTimeout { .. }) => {
                warn!(
                    event = events::CONTACT_TIMED_OUT,
                    record_id = %record_id,
                    timeout_seconds = self.config.dispatch.call_timeout_seconds,
                    "No outcome in time; possibly placed, will not re-place this pass"
                );
                return Ok(ContactResult {
                    record_id,
                    status: ContactStatus::TimedOut,
                    event: None,
                });
            }
            Err(e) => {
                warn!(
                    event = events::CONTACT_FAILED,
                    record_id = %record_id,
                    error = %e,
                    "Contact placement failed; record not advanced"
                );
                return Ok(ContactResult {
                    record_id,
                    status: ContactStatus::PlacementFailed,
                    event: None,
                });
            }
        };

        let event = ContactEvent {
            occurred_at: now,
            digest: digest_summary(&outcome.summary),
            evaluation: CallEvaluation::from_wire(&outcome.evaluation),
            ended_reason: EndedReason::from_wire(&outcome.ended_reason),
            summary: outcome.summary,
        };

        let template = schedule::template_for(contact.record.classification)
            .expect("contacted records are classified");
        let advance = stage_advancer::advance(
            template,
            contact.stage,
            contact.record.deadline_date,
            today,
        );

        info!(
            event = events::STAGE_ADVANCED,
            record_id = %record_id,
            from_stage = contact.stage,
            to_stage = advance.new_stage,
            next_trigger = ?advance.next_trigger_date,
            "Stage advanced after contact"
        );

        let patch = RecordPatch::after_contact(
            advance.new_stage,
            advance.next_trigger_date,
            event.clone(),
            today,
        );

        let status = self.persist_with_retry(&record_id, patch, &event).await;
        Ok(ContactResult {
            record_id,
            status,
            event: Some(event),
        })
    }

    /// Bounded retry applies to persistence only, never to the contact
    /// step, which would risk duplicate calls. After the attempts are
    /// exhausted the reduced write keeps the dedup guard sound; losing even
    /// that is surfaced at error severity for the operator.
    async fn persist_with_retry(
        &self,
        record_id: &str,
        patch: RecordPatch,
        event: &ContactEvent,
    ) -> ContactStatus {
        let max_attempts = self.config.persistence.max_attempts;
        let base_delay = Duration::from_millis(self.config.persistence.retry_delay_ms);

        for attempt in 1..=max_attempts {
            match self.store.update_record(record_id, patch.clone()).await {
                Ok(()) => return ContactStatus::Persisted,
                Err(e) => {
                    warn!(
                        event = events::PERSISTENCE_RETRY,
                        record_id = %record_id,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Record update failed"
                    );
                    if attempt < max_attempts {
                        sleep(base_delay * attempt).await;
                    }
                }
            }
        }

        warn!(
            event = events::PERSISTENCE_REDUCED_WRITE,
            record_id = %record_id,
            "Falling back to reduced write (contact marker only)"
        );

        let reduced = RecordPatch::contact_marker_only(event.clone());
        match self.store.update_record(record_id, reduced).await {
            Ok(()) => ContactStatus::PersistedReduced,
            Err(e) => {
                error!(
                    event = events::PERSISTENCE_LOST,
                    record_id = %record_id,
                    error = %e,
                    "❌ Contact could not be recorded at all; duplicate-call risk on next run"
                );
                ContactStatus::PersistenceLost
            }
        }
    }
}
