//! Transaction risk scoring: a deterministic rule table over normalized
//! form input, plus a bounded, persisted history of results.

pub mod clock;
pub mod config;
pub mod desk;
pub mod error;
pub mod event;
pub mod history;
pub mod normalizer;
pub mod record;
pub mod rng;
pub mod rules;
pub mod snapshot;
pub mod storage;
pub mod types;
