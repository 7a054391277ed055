pub mod category;
pub mod common;
pub mod expense;
pub mod statistics;

pub use category::Category;
pub use common::{Displayable, Identifiable, Index, TimeUnit};
pub use expense::{Description, Expense, Price, Timestamp, UniqueIdentifier};
pub use statistics::{
    ComparisonReport, GroupDifference, GroupKey, GroupTotal, Mode, Statistics, StatisticsReport,
    StatsWindow,
};
