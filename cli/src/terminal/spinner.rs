use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} [{bar:24.green/bright_black}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("━╸ ")
}

/// Progress bar of a probe run, attached to a tracing span so log lines print above it.
pub struct ProbeProgress {
    span: Span,
}

impl ProbeProgress {
    pub fn new(total: usize) -> Self {
        let span = info_span!("probe", indicatif.pb_show = true);
        span.pb_set_style(&style());
        span.pb_set_length(total as u64);
        span.pb_set_message(&format!("{}", "resolving...".italic()));
        Self { span }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn report(&self, done: usize, total: usize) {
        self.span.pb_set_length(total as u64);
        self.span.pb_set_position(done as u64);
        let remaining = total.saturating_sub(done);
        let message = match remaining {
            0 => "done".green().to_string(),
            n => format!("{} domains left", n.to_string().bold()),
        };
        self.span.pb_set_message(&message);
    }

    pub fn stopping(&self) {
        self.span
            .pb_set_message(&format!("{}", "stopping, finishing in-flight domains...".yellow()));
    }
}
