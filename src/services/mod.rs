// src/services/mod.rs
//
// Storage-backed core used by the HTTP handlers. Every function takes the
// executor it runs on, so callers decide between the pool and a transaction.

pub mod answer_key;
pub mod exams;
pub mod export;
pub mod ledger;
pub mod results;
pub mod scoring;
