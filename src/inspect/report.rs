//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

/// The result of inspecting a dataset.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    pub summary: SummarySection,
    pub classes: ClassesSection,
    pub images: ImageStats,
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the dataset.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Dataset root directory.
    pub root: String,
    /// Number of indexed samples.
    pub samples: usize,
    /// Number of distinct classes observed.
    pub classes: usize,
    /// Classes of the full dataset that have no samples on disk.
    pub missing_classes: Vec<String>,
}

/// Per-class sample distribution.
#[derive(Clone, Debug, Serialize)]
pub struct ClassesSection {
    /// How many top classes to show.
    pub top_n: usize,
    /// Total distinct classes.
    pub total_distinct: usize,
    /// Total samples counted.
    pub total_samples: usize,
    /// Top entries (count descending, then name ascending).
    pub entries: Vec<ClassCount>,
    /// Sum of counts for classes not in the top N.
    pub other_count: usize,
}

/// A class with its sample count.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCount {
    pub class: String,
    pub label: usize,
    pub count: usize,
}

/// Image dimensions read from file headers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageStats {
    /// Images whose header could be read.
    pub measured: usize,
    /// Images whose header could not be read.
    pub unreadable: usize,
    pub min_width: Option<usize>,
    pub max_width: Option<usize>,
    pub min_height: Option<usize>,
    pub max_height: Option<usize>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│              🛰  Dataset Inspection Report                   │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        self.fmt_classes(f)?;
        writeln!(f)?;

        self.fmt_images(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        writeln!(f, "┌─ Summary ─────────────────────────────────────────────────┐")?;
        writeln!(f, "│                                                           │")?;
        writeln!(f, "│   Root:          {}", s.root)?;
        writeln!(
            f,
            "│   Samples:       {:>8}                                  │",
            format_number(s.samples)
        )?;
        writeln!(
            f,
            "│   Classes:       {:>8}                                  │",
            format_number(s.classes)
        )?;
        if !s.missing_classes.is_empty() {
            writeln!(f, "│                                                           │")?;
            writeln!(
                f,
                "│   Not present:   {}",
                s.missing_classes.join(", ")
            )?;
        }
        writeln!(f, "│                                                           │")?;
        writeln!(f, "└───────────────────────────────────────────────────────────┘")?;

        Ok(())
    }

    fn fmt_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.classes;

        let header = if c.total_distinct > c.top_n {
            format!("Classes (top {} of {})", c.top_n, c.total_distinct)
        } else {
            format!("Classes ({})", c.total_distinct)
        };

        writeln!(f, "┌─ {} {}┐", header, "─".repeat(57usize.saturating_sub(header.len())))?;
        writeln!(f, "│                                                           │")?;

        if c.entries.is_empty() {
            writeln!(f, "│   No samples found.                                       │")?;
        } else {
            let max_count = c.entries.iter().map(|e| e.count).max().unwrap_or(1);

            for entry in &c.entries {
                let bar = render_bar(entry.count, max_count, self.bar_width);
                writeln!(
                    f,
                    "│   {:<16} {:>7} {:>6}  {}│",
                    truncate_label(&entry.class, 16),
                    format_number(entry.count),
                    fmt_percent(entry.count, c.total_samples),
                    pad_bar(&bar, self.bar_width)
                )?;
            }

            if c.other_count > 0 {
                let bar = render_bar(c.other_count, max_count, self.bar_width);
                writeln!(
                    f,
                    "│   {:<16} {:>7} {:>6}  {}│",
                    "(other)",
                    format_number(c.other_count),
                    fmt_percent(c.other_count, c.total_samples),
                    pad_bar(&bar, self.bar_width)
                )?;
            }
        }

        writeln!(f, "│                                                           │")?;
        writeln!(f, "└───────────────────────────────────────────────────────────┘")?;

        Ok(())
    }

    fn fmt_images(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.images;

        writeln!(f, "┌─ Images ──────────────────────────────────────────────────┐")?;
        writeln!(f, "│                                                           │")?;

        if let (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) =
            (i.min_width, i.max_width, i.min_height, i.max_height)
        {
            writeln!(
                f,
                "│   Width  (px):    min {:>8}    max {:>8}                │",
                min_w, max_w
            )?;
            writeln!(
                f,
                "│   Height (px):    min {:>8}    max {:>8}                │",
                min_h, max_h
            )?;
        } else {
            writeln!(f, "│   No readable image headers.                              │")?;
        }

        if i.unreadable > 0 {
            writeln!(f, "│                                                           │")?;
            writeln!(
                f,
                "│     ⚠ Unreadable headers: {:>7} / {:>7}                  │",
                format_number(i.unreadable),
                format_number(i.measured + i.unreadable)
            )?;
        }

        writeln!(f, "│                                                           │")?;
        writeln!(f, "└───────────────────────────────────────────────────────────┘")?;

        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Pad a bar so the closing border lines up.
fn pad_bar(bar: &str, width: usize) -> String {
    let padding = (width + 2).saturating_sub(bar.chars().count());
    format!("{}{}", bar, " ".repeat(padding))
}

/// Truncate a label to `max_chars` characters, marking the cut with `…`.
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
