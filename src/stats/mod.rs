pub mod calculator;
pub mod milestone;
pub mod refresh;

pub use calculator::{StatsCalculator, StatsError};
pub use refresh::StatsRefresh;
