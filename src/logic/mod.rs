//! Logic Module - Business Logic & Engines
//!
//! - `features/` - Feature schema and validated input vectors
//! - `dataset/` - Reference dataset and stratified splitting
//! - `model/` - Model lifecycle (train, persist, load, predict)
//! - `monitoring/` - Observation buffer and drift reports

pub mod config;
pub mod features;
pub mod dataset;
pub mod model;
pub mod monitoring;
