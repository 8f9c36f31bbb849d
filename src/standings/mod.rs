// Standings: per-player season totals and tie-aware competition ranks.

pub mod ranking;
pub mod stats;
