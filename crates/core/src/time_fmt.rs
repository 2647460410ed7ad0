// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compact elapsed-time formatting ("5s", "2m", "1h", "3d").

/// Format a number of elapsed seconds using the largest whole unit.
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

/// Like [`format_elapsed`], but sub-second durations are shown in milliseconds.
pub fn format_elapsed_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format_elapsed(ms / 1000)
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
