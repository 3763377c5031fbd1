pub mod cost_of_capital;
pub mod scenarios;
pub mod waterfall;
