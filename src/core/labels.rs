use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::bucket_layout::{BinMode, BucketLayout};

/// Human-readable label for one bucket.
///
/// Serializes as a bare number for `Value` and as `"<start> to <end>"` for
/// `Range`, which is what chart widgets expect on a category axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketLabel {
    Value(f64),
    Range { start: f64, end: f64 },
}

impl BucketLabel {
    /// Upper value named by the label.
    #[must_use]
    pub fn upper(self) -> f64 {
        match self {
            Self::Value(value) => value,
            Self::Range { end, .. } => end,
        }
    }
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Range { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

impl Serialize for BucketLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_f64(*value),
            Self::Range { .. } => serializer.collect_str(self),
        }
    }
}

/// Produces one label per bucket of `layout`, left to right.
///
/// - width 1: one bare value per integer position starting at `min`
/// - continuous: `start to end` spans
/// - discrete: each bucket's start value; the last bucket is labelled `max`
///
/// Outside discrete mode the last label spans `start to max`, or collapses to
/// `max` when the last bucket starts there.
#[must_use]
pub fn bucket_labels(layout: &BucketLayout, mode: BinMode) -> Vec<BucketLabel> {
    let count = layout.count();
    let last = count - 1;
    let mut labels = Vec::with_capacity(count);

    if layout.width() == 1.0 {
        for index in 0..last {
            labels.push(BucketLabel::Value(layout.bucket_start(index)));
        }
        labels.push(last_span_label(layout));
        return labels;
    }

    match mode {
        BinMode::Continuous => {
            for index in 0..last {
                labels.push(BucketLabel::Range {
                    start: layout.bucket_start(index),
                    end: layout.bucket_end(index),
                });
            }
            labels.push(last_span_label(layout));
        }
        BinMode::Discrete => {
            for index in 0..last {
                labels.push(BucketLabel::Value(layout.bucket_start(index)));
            }
            labels.push(BucketLabel::Value(layout.max()));
        }
    }
    labels
}

// The last bucket is closed at `max`, so it may hold more than one integer
// position even when the width is 1.
fn last_span_label(layout: &BucketLayout) -> BucketLabel {
    let last_start = layout.bucket_start(layout.count() - 1);
    if last_start == layout.max() {
        BucketLabel::Value(layout.max())
    } else {
        BucketLabel::Range {
            start: last_start,
            end: layout.max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_integral_values_without_fraction() {
        assert_eq!(BucketLabel::Value(5.0).to_string(), "5");
        assert_eq!(
            BucketLabel::Range {
                start: 2.5,
                end: 10.0
            }
            .to_string(),
            "2.5 to 10"
        );
    }

    #[test]
    fn serialization_keeps_values_numeric() {
        let labels = vec![
            BucketLabel::Value(3.0),
            BucketLabel::Range {
                start: 0.0,
                end: 5.0,
            },
        ];
        let json = serde_json::to_string(&labels).expect("serialize labels");
        assert_eq!(json, r#"[3.0,"0 to 5"]"#);
    }
}
