//! Data access: provider traits, universe resolution, alignment.

pub mod align;
pub mod memory;
pub mod provider;
pub mod universe;

pub use align::{align_closes, AlignedCloses};
pub use memory::InMemoryProvider;
pub use provider::{
    FundamentalsSource, MarketData, OwnershipSource, PeerUniverse, PriceHistory, ProviderError,
};
pub use universe::{resolve_universe, Universe, FALLBACK_UNIVERSE};
