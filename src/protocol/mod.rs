//! Protocol routing module
//!
//! Decides what each captured message contributes to the schema.
//!
//! # Overview
//!
//! - `object` messages carry room or player state and are folded into the
//!   matching category tree, routed by their entity key
//! - `client/send`, `text/update` and `object/update` are outgoing actions,
//!   kept only as shape fingerprints
//! - a fixed set of bookkeeping opcodes is ignored
//! - anything else is logged and skipped

mod ingest;
mod routing;

pub use ingest::{IngestReport, Ingestor, RecordOutcome};
pub use routing::{lookup_opcode, route_key, Dialect, KeyRoute, OpcodeAction, SentBody};
