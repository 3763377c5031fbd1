pub mod model;

pub use model::{
    analyze_cost_of_capital, break_even_exit, cost_of_capital, preference_irr,
    CostOfCapitalInput, CostOfCapitalResult,
};
