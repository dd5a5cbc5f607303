pub mod binner;
pub mod bucket_layout;
pub mod downsample;
pub mod labels;
pub mod summary;

pub use binner::{Histogram, bin, bin_with_layout};
pub use bucket_layout::{BinMode, BucketLayout};
pub use downsample::{
    DEFAULT_MAX_GROUPS, GroupLayout, MAX_VALUE_SPAN, consecutive_labels, counts_per_value,
    downsample, grouped_value_counts,
};
pub use labels::{BucketLabel, bucket_labels};
pub use summary::{ExtentSummary, SummaryStatistics, summarize, summarize_extent};
