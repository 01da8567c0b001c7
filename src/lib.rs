//! Wait for network conditions and measure connectivity-loss windows.
//!
//! Two small utilities make up the crate:
//!
//! - [`wait::wait_for`] blocks until a caller-supplied predicate reports
//!   ready, retrying through whitelisted transient errors and failing with
//!   a descriptive timeout otherwise.
//! - [`ping_stream::PingGroups`] turns live `ping` output lines into a
//!   lazy stream of [`ping::PingSample`] records, tracking the length of
//!   the current unbroken run of replies so callers can detect
//!   "connectivity restored" and account for lost packets.
//!
//! [`probe::Prober`] (single ICMP echo) and [`ping_runner::PingRunner`]
//! (spawned `ping` process feeding a channel) supply ready-made inputs for
//! both.

pub mod config;
pub mod ping;
pub mod ping_runner;
pub mod ping_stream;
pub mod probe;
pub mod resolve;
pub mod wait;

pub use config::AppConfig;
pub use ping::{LossStats, PingSample};
pub use ping_runner::PingRunner;
pub use ping_stream::PingGroups;
pub use probe::{Prober, ProbeError};
pub use wait::{Fault, FaultKind, WaitError, WaitOpts, wait_for};
