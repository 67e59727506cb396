//! Folding routed messages into the accumulator

use super::routing::{lookup_opcode, route_key, Dialect, KeyRoute, OpcodeAction};
use crate::schema::SchemaAccumulator;
use crate::types::{Category, JsonValue};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What happened to a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Folded(Category),
    Sent,
    Ignored,
    /// Unknown opcode or entity key
    Unhandled,
    /// Missing discriminator or body
    Malformed,
}

/// Counts per outcome for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub folded: BTreeMap<Category, usize>,
    pub sent: usize,
    pub ignored: usize,
    pub unhandled: usize,
    pub malformed: usize,
    /// Taken from the first folded record; `None` if nothing was folded
    pub dialect: Option<Dialect>,
}

impl IngestReport {
    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Folded(category) => *self.folded.entry(category).or_insert(0) += 1,
            RecordOutcome::Sent => self.sent += 1,
            RecordOutcome::Ignored => self.ignored += 1,
            RecordOutcome::Unhandled => self.unhandled += 1,
            RecordOutcome::Malformed => self.malformed += 1,
        }
    }

    /// Number of records folded into `category`
    pub fn folded_into(&self, category: Category) -> usize {
        self.folded.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.folded.values().sum::<usize>()
            + self.sent
            + self.ignored
            + self.unhandled
            + self.malformed
    }
}

/// Routes messages into a `SchemaAccumulator`
#[derive(Debug, Clone)]
pub struct Ingestor {
    /// Fields whose literal value identifies a sent message shape
    key_fields: Vec<String>,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(vec!["action".to_string(), "key".to_string()])
    }
}

impl Ingestor {
    pub fn new(key_fields: Vec<String>) -> Self {
        Self { key_fields }
    }

    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Ingest messages strictly in order
    pub fn ingest(&self, accumulator: &mut SchemaAccumulator, records: &[JsonValue]) -> IngestReport {
        let mut report = IngestReport::default();
        for record in records {
            let outcome = self.ingest_record(accumulator, record, &mut report.dialect);
            report.record(outcome);
        }
        debug!(?report, "Ingestion finished");
        report
    }

    /// Ingest one message; sets `dialect` on the first folded record
    pub fn ingest_record(
        &self,
        accumulator: &mut SchemaAccumulator,
        record: &JsonValue,
        dialect: &mut Option<Dialect>,
    ) -> RecordOutcome {
        let Some(opcode) = record.get("opcode").and_then(JsonValue::as_str) else {
            debug!("Skipping message without a string opcode");
            return RecordOutcome::Malformed;
        };

        match lookup_opcode(opcode) {
            None => {
                warn!("Unhandled opcode key {opcode}");
                RecordOutcome::Unhandled
            }
            Some(OpcodeAction::Ignore) => RecordOutcome::Ignored,
            Some(OpcodeAction::Sent(body)) => match body.locate(record) {
                Some(JsonValue::Object(message)) => {
                    accumulator.record_sent(message, &self.key_fields);
                    RecordOutcome::Sent
                }
                _ => {
                    warn!("Outgoing '{opcode}' message has no object body, skipping");
                    RecordOutcome::Malformed
                }
            },
            Some(OpcodeAction::Object) => Self::ingest_object(accumulator, record, dialect),
        }
    }

    fn ingest_object(
        accumulator: &mut SchemaAccumulator,
        record: &JsonValue,
        dialect: &mut Option<Dialect>,
    ) -> RecordOutcome {
        let result = record.get("result");
        let key = result.and_then(|r| r.get("key")).and_then(JsonValue::as_str);
        let val = result.and_then(|r| r.get("val"));
        let (Some(key), Some(val)) = (key, val) else {
            warn!("Object message without result.key/result.val, skipping");
            return RecordOutcome::Malformed;
        };

        accumulator.track_enums(val);

        match route_key(key) {
            KeyRoute::Category(category) => {
                let JsonValue::Object(fields) = val else {
                    warn!("Value for key {key} is not an object, skipping");
                    return RecordOutcome::Malformed;
                };
                accumulator.fold(category, fields);
                if dialect.is_none() {
                    let detected = Dialect::from_key(key);
                    debug!(?detected, "Detected protocol dialect from key {key}");
                    *dialect = Some(detected);
                }
                RecordOutcome::Folded(category)
            }
            KeyRoute::Ignored => RecordOutcome::Ignored,
            KeyRoute::Unhandled => {
                warn!("Unhandled object key {key}");
                RecordOutcome::Unhandled
            }
        }
    }
}
