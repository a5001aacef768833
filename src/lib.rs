//! Mask Off - a seven-day guided self-reflection journal.
//!
//! A user starts a cycle on a chosen topic, answers one task per day for
//! seven days, and receives a closing report (summary, keywords and a
//! five-axis radar) from a text-generation service. State is persisted
//! locally and restored on the next launch.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
