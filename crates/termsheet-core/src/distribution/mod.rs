pub mod waterfall;

pub use waterfall::{
    analyze_distribution, distribute, distribute_with_policy, DistributionInput, ProceedsPolicy,
    WaterfallResult,
};
