#![forbid(unsafe_code)]

//! JSONL transcripts and blake3 fingerprints of step sequences.
//!
//! A fingerprint pins a producer's output: identical input must always give
//! the identical fingerprint.
//!
//! ```json
//! {"kind":"start","payload":{"shape":"bounds","values":[1,3,5],"low":0,"high":2},"note":"..."}
//! {"kind":"compare","payload":{"shape":"probe","low":0,"mid":1,"high":2,"value":3,"target":3},"note":"..."}
//! ```

use stepplay_core::{StepRecord, StepSequence};

/// Prefix on every fingerprint string.
pub const FINGERPRINT_PREFIX: &str = "blake3:";

/// One JSON object per record, newline separated.
#[must_use]
pub fn records_jsonl(records: &[StepRecord]) -> String {
    records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Digest of [`records_jsonl`], hex encoded with [`FINGERPRINT_PREFIX`].
#[must_use]
pub fn fingerprint(records: &[StepRecord]) -> String {
    let hash = blake3::hash(records_jsonl(records).as_bytes());
    format!("{FINGERPRINT_PREFIX}{}", hash.to_hex())
}

/// Materialize `sequence` and fingerprint every record.
#[must_use]
pub fn sequence_fingerprint(sequence: &mut StepSequence) -> String {
    sequence.materialize();
    fingerprint(sequence.records())
}
