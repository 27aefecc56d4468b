pub mod derive;
pub mod fees;
pub mod filter;
pub mod grouping;
pub mod metrics;
pub mod planner;
pub mod series;

pub use derive::*;
pub use fees::*;
pub use filter::*;
pub use grouping::*;
pub use metrics::*;
pub use planner::*;
pub use series::*;
