//! Domain types: bars, fundamentals, ownership.

pub mod bar;
pub mod fundamentals;
pub mod ownership;

pub use bar::{closes, is_strictly_ordered, slice_as_of, volumes, PriceBar};
pub use fundamentals::{
    earnings_series, latest_equity, BalanceSheetSnapshot, EarningsBasis, FundamentalSnapshot,
    Fundamentals, PeriodType,
};
pub use ownership::{OwnershipHistory, OwnershipSnapshot};

/// Symbol type alias
pub type Symbol = String;
