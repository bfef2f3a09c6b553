mod assignment;
mod covariance;
mod distribution;
mod map;
mod market;
mod objective;
mod ranking;

pub use assignment::{Assignment, AssignmentError, MAX_ASSETS};
pub use covariance::{CovarianceError, CovarianceMatrix};
pub use distribution::{Distribution, DistributionDto, DistributionError, MAX_DENSE_ASSETS};
pub use map::Map;
pub use market::{AssetId, Market, MarketDto, MarketError};
pub use objective::{BudgetPenalty, Evaluation, QuadraticObjective};
pub use ranking::{RankedEntry, RankedResult};
