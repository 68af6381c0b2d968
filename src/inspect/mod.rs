//! Dataset inspection.
//!
//! Summarises an indexed dataset without decoding any sample: counts per
//! class and image dimensions read from file headers.

mod report;

pub use report::{ClassCount, ClassesSection, ImageStats, InspectReport, SummarySection};

use std::collections::BTreeMap;

use tracing::warn;

use crate::dataset::{Advance, ADVANCE_CLASSES};
use crate::index::SampleIndex;

/// Options for dataset inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Number of top classes to show in the histogram.
    pub top_classes: usize,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            top_classes: 13,
            bar_width: 20,
        }
    }
}

/// Inspect an ADVANCE dataset.
pub fn inspect_dataset(dataset: &Advance, opts: &InspectOptions) -> InspectReport {
    let mut report = inspect_index(dataset.index(), opts);
    report.summary.root = dataset.root().display().to_string();
    report.summary.missing_classes = ADVANCE_CLASSES
        .iter()
        .filter(|class| dataset.index().class_id(class).is_none())
        .map(|class| class.to_string())
        .collect();
    report
}

/// Inspect a bare sample index.
pub fn inspect_index(index: &SampleIndex, opts: &InspectOptions) -> InspectReport {
    InspectReport {
        summary: SummarySection {
            root: String::new(),
            samples: index.len(),
            classes: index.classes().len(),
            missing_classes: Vec::new(),
        },
        classes: compute_classes(index, opts.top_classes),
        images: compute_image_stats(index),
        bar_width: opts.bar_width,
    }
}

fn compute_classes(index: &SampleIndex, top_n: usize) -> ClassesSection {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for entry in index.entries() {
        *counts.entry(entry.label).or_insert(0) += 1;
    }

    let mut sorted: Vec<ClassCount> = counts
        .into_iter()
        .map(|(label, count)| ClassCount {
            class: index.classes()[label].clone(),
            label,
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.class.cmp(&b.class)));

    let total_distinct = sorted.len();
    let rest = if sorted.len() > top_n {
        sorted.split_off(top_n)
    } else {
        Vec::new()
    };

    ClassesSection {
        top_n,
        total_distinct,
        total_samples: index.len(),
        entries: sorted,
        other_count: rest.iter().map(|entry| entry.count).sum(),
    }
}

fn compute_image_stats(index: &SampleIndex) -> ImageStats {
    let mut stats = ImageStats::default();

    for entry in index.entries() {
        match imagesize::size(&entry.image) {
            Ok(size) => {
                stats.measured += 1;
                stats.min_width = Some(stats.min_width.map_or(size.width, |w| w.min(size.width)));
                stats.max_width = Some(stats.max_width.map_or(size.width, |w| w.max(size.width)));
                stats.min_height =
                    Some(stats.min_height.map_or(size.height, |h| h.min(size.height)));
                stats.max_height =
                    Some(stats.max_height.map_or(size.height, |h| h.max(size.height)));
            }
            Err(source) => {
                warn!(image = %entry.image.display(), %source, "could not read image header");
                stats.unreadable += 1;
            }
        }
    }

    stats
}
