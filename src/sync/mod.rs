//! Admin data sync.
//!
//! `AdminDashboard` keeps local project and skill lists consistent with a
//! `DocumentStore` across unreliable connectivity. Writes go through a
//! `FallbackChain` of `WriteStrategy` values and produce one `WriteOutcome`.

mod connectivity;
mod dashboard;
mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use connectivity::*;
pub use dashboard::*;
pub use strategy::*;
