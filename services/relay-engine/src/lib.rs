//! Relay Engine
//!
//! Holds every master's signal queue and every slave's delivery history, and
//! implements the rules that decide what a slave sees next:
//! - Ingestion with per-action insert policies (append, supersede, dedup)
//! - Bounded per-master queues with time-based retention
//! - One-signal-at-a-time FIFO polling with per-slave processed tracking
//! - Operational clears and read-only status snapshots
//!
//! # Architecture
//!
//! ```text
//!  Master uploads            Slave polls
//!        │                        │
//!   ┌────▼─────┐            ┌─────▼──────┐
//!   │ Ingest   │            │ Dispatcher │──► Registry (last_poll)
//!   └────┬─────┘            └──┬──────┬──┘
//!        │  per-master lock    │      │ per-slave lock
//!   ┌────▼─────────────────────▼┐  ┌──▼───────────────┐
//!   │ MasterQueue (≤50, 10 min) │  │ ProcessedTracker │
//!   └────▲──────────────────────┘  └──────────────────┘
//!        │
//!   ┌────┴─────┐
//!   │ Sweeper  │  ← every 60 s
//!   └──────────┘
//! ```

pub mod admin;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod ingestion;
pub mod master_queue;
pub mod metrics;
pub mod registry;
pub mod status;
pub mod sweeper;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RelayConfig;
pub use engine::RelayEngine;
pub use sweeper::RetentionSweeper;
