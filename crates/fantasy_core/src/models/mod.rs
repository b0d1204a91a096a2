pub mod breakdown;
pub mod performance;
pub mod role;

pub use breakdown::{AppliedMultiplier, BattingDetail, BowlingDetail, ScoreBreakdown};
pub use performance::{
    BattingFacet, BowlingFacet, FieldingFacet, InningsContext, Overs, RawPerformance,
    MAX_WICKETS_PER_INNINGS,
};
pub use role::{PlayerRole, RoleRegistry};
