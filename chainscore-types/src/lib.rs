pub mod error;
pub mod factor;
pub mod identity;
pub mod query;
pub mod result;

pub use error::ScoreError;
pub use factor::{AuxFactor, FactorName, FactorReport};
pub use identity::Identity;
pub use query::{ActiveView, QueryState};
pub use result::{CompositeResult, Tier};
