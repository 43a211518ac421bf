//! The doughnut chart for the selected bin.
//!
//! The chart is never updated in place. Every selection tears the previous
//! chart down and builds a new one with a higher revision.

use eco_guardian_bin_models::{Bin, MAX_FILL_LEVEL, clamp_fill_level};
use eco_guardian_view_models::ChartView;

const USED_COLOR: &str = "#2ecc71";
const REMAINING_COLOR: &str = "#ecf0f1";
const CUTOUT_PERCENT: u8 = 70;

/// Builds a used-vs-remaining chart for `bin`.
#[must_use]
pub fn render_chart(bin: &Bin, revision: u64) -> ChartView {
    let used = clamp_fill_level(bin.fill_level);
    ChartView {
        bin_id: bin.id,
        title: bin.short_name(),
        labels: ["Used".to_string(), "Remaining".to_string()],
        data: [used, MAX_FILL_LEVEL - used],
        colors: [USED_COLOR.to_string(), REMAINING_COLOR.to_string()],
        cutout_percent: CUTOUT_PERCENT,
        revision,
    }
}

/// Holds the single live detail chart.
#[derive(Debug, Clone, Default)]
pub struct DetailChart {
    current: Option<ChartView>,
    revision: u64,
}

impl DetailChart {
    /// Creates a holder with no chart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            revision: 0,
        }
    }

    /// Destroys any existing chart and builds a new one for `bin`.
    pub fn replace(&mut self, bin: &Bin) -> &ChartView {
        if let Some(old) = self.current.take() {
            log::debug!(
                "Destroying chart revision {} for bin #{}",
                old.revision,
                old.bin_id
            );
        }
        self.revision += 1;
        self.current.insert(render_chart(bin, self.revision))
    }

    /// The live chart, if a bin was ever selected.
    #[must_use]
    pub const fn current(&self) -> Option<&ChartView> {
        self.current.as_ref()
    }
}
