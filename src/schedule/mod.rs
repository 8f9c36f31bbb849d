// Schedule engine: round-set records, swap repair, constraint checks,
// week state gating, availability policy, filtering, and score progress.

pub mod availability;
pub mod filter;
pub mod gate;
pub mod model;
pub mod progress;
pub mod swap;
pub mod violations;
