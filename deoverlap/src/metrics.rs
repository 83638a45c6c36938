//! Keeping horizontal metrics in step with rewritten outlines

use crate::{path::Path, round::OtRound, store::HorizontalMetric};

/// The metric for `outline`: the left side bearing becomes the outline's
/// horizontal minimum, the advance is kept.
pub fn reconcile_metric(outline: &Path, metric: HorizontalMetric) -> HorizontalMetric {
    HorizontalMetric {
        advance: metric.advance,
        side_bearing: outline.x_min().ot_round(),
    }
}
