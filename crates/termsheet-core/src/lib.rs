pub mod cost_of_capital;
pub mod distribution;
pub mod error;
pub mod scenarios;
pub mod terms;
pub mod types;

pub use cost_of_capital::{cost_of_capital, CostOfCapitalResult};
pub use distribution::{distribute, WaterfallResult};
pub use error::TermSheetError;
pub use scenarios::{compare, ExitScenario, ScenarioSet};
pub use terms::DealTerms;
pub use types::*;

/// Standard result type for all termsheet operations
pub type TermSheetResult<T> = Result<T, TermSheetError>;
