//! HTTP sync with the ledger backend
//!
//! This module owns every network call the client makes:
//! - POST /upload-audio — expense clip uploads
//! - POST /api/voice_goal — goal clip uploads
//! - GET /api/expenses, /api/goals — list refreshes
//! - GET /api/analytics/summary — spending summary

mod client;

pub use client::{SyncClient, UploadAck};
