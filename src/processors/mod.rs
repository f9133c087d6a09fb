pub mod daily_aggregator;
pub mod pipeline;
pub mod series_merger;
pub mod table_joiner;

pub use daily_aggregator::DailyAggregator;
pub use pipeline::{Pipeline, PipelineSummary};
pub use series_merger::SeriesMerger;
pub use table_joiner::TableJoiner;
