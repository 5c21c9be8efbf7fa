use indicatif::{ProgressBar, ProgressStyle};

/// Bar for a run with a known number of rows.
pub fn row_progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template(
            "{msg} [{elapsed_precise}] {wide_bar} {human_pos}/{human_len} rows ({percent}%)",
        )
        .expect("hardcoded"),
    )
}

/// Spinner for a scan over a file whose row count isn't known up front.
pub fn scan_progress_bar() -> ProgressBar {
    ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {human_pos} rows scanned ({per_sec})")
            .expect("hardcoded"),
    )
}
