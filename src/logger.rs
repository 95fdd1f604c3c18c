//! Terminal logging with colored module prefixes.
//!
//! Status lines are written as `[module] message`, where the prefix color
//! identifies the subsystem that produced it:
//!
//! | Module    | Color          | Producer                          |
//! |-----------|----------------|-----------------------------------|
//! | `store`   | bright cyan    | content store queries             |
//! | `archive` | bright magenta | archive filter / terminal views   |
//! | `serve`   | bright blue    | HTTP server                       |
//!
//! Command results (slugs, post JSON, archive rows) go through `out!`
//! instead: no prefix and no truncation, so they survive pipes intact.
//!
//! # Example
//!
//! ```ignore
//! log!("store"; "fetched {} posts", posts.len());
//! out!("{slug}");
//! ```

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;
use std::{
    io::{self, Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;
/// Width used when the terminal size cannot be detected (pipes, CI)
const FALLBACK_WIDTH: u16 = 120;

/// Total prefix length for a module name: `[`, `]` and the trailing space.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(FALLBACK_WIDTH))
}

// ============================================================================
// Macros
// ============================================================================

/// Log a status message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print command output verbatim on its own line.
#[macro_export]
macro_rules! out {
    ($($arg:tt)*) => {{
        $crate::logger::print(&format!($($arg)*))
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Write a message with a colored module prefix to stdout.
///
/// Single-line messages are truncated to the terminal width; multi-line
/// messages (error chains, pretty JSON) are printed as-is.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let mut stdout = stdout().lock();

    let message = if message.contains('\n') {
        message
    } else {
        let max_columns = (get_terminal_width() as usize).saturating_sub(calc_prefix_len(module.len()));
        truncate_to_width(message, max_columns)
    };

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Write command output to stdout without prefix or truncation.
pub fn print(message: &str) {
    write_output(&mut stdout().lock(), message).ok();
}

fn write_output<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{message}")?;
    out.flush()
}

#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "store" => prefix.bright_cyan().bold(),
        "archive" => prefix.bright_magenta().bold(),
        "serve" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

// ============================================================================
// Display Width
// ============================================================================

/// Terminal columns taken by `c`: 2 for East Asian wide and fullwidth
/// characters, 1 otherwise.
fn char_width(c: char) -> usize {
    match u32::from(c) {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD => 2,
        _ => 1,
    }
}

/// Longest prefix of `s` that fits in `max_columns` terminal columns.
fn truncate_to_width(s: &str, max_columns: usize) -> &str {
    let mut columns = 0;
    for (index, c) in s.char_indices() {
        columns += char_width(c);
        if columns > max_columns {
            return &s[..index];
        }
    }
    s
}

// ============================================================================
// Tests
// ============================================================================
