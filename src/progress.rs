//! Progress reporting
//!
//! The runner advances a [`ProgressSink`] once per page. [`BarProgress`]
//! draws an `indicatif` bar on stderr; [`NoProgress`] discards updates.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives page-level progress
pub trait ProgressSink: Send {
    /// Called once with the number of pages
    fn start(&mut self, total_units: u64);

    /// Called after each page
    fn advance(&mut self, n: u64);

    /// Called after the last page
    fn finish(&mut self);
}

/// Terminal progress bar
pub struct BarProgress {
    label: String,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    /// Creates a bar labelled with the target name
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bar: None,
        }
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, total_units: u64) {
        let bar = ProgressBar::new(total_units);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");
        bar.set_style(style);
        bar.set_message(self.label.clone());
        self.bar = Some(bar);
    }

    fn advance(&mut self, n: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(n);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

/// Discards progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _total_units: u64) {}

    fn advance(&mut self, _n: u64) {}

    fn finish(&mut self) {}
}

/// Creates the sink for one target
pub fn progress_for(label: &str, enabled: bool) -> Box<dyn ProgressSink> {
    if enabled {
        Box::new(BarProgress::new(label))
    } else {
        Box::new(NoProgress)
    }
}
