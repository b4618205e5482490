// Legendary card domain: the card documents themselves, pack issuance,
// the activation/reveal lifecycle, and the historical performance pool.

pub mod card;
pub mod issuance;
pub mod lifecycle;
pub mod pool;

pub use card::{CardStatus, CardTier, LegendaryCard};
pub use issuance::{DistributionMechanic, PackGrant, TeamStanding};
pub use lifecycle::CardError;
pub use pool::{HistoricalPerformance, PerformancePool};
