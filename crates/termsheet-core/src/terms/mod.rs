pub mod deal;
pub mod preference;
pub mod validate;

pub use deal::{Compounding, DealTerms, DividendTerms, LiquidationPreference, PreferenceType};
pub use preference::{accrued_dividends, preference_stack, PreferenceStack};
pub use validate::{consistency_warnings, validate_exit, validate_terms};
