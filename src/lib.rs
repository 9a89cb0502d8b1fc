//! SRD Corpus Builder: turns SRD monster data into a training corpus.
//!
//! Loads raw monster records from JSON or a plain-text stat-block format,
//! normalizes them into one canonical Monster/Action schema, and writes a
//! reproducible set of corpus artifacts plus a house-rules snapshot.

pub mod core;
pub mod schema;
