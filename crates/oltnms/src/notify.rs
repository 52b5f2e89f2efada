//! Terminal rendering of core notices.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use oltnms_core::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr, one line each.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    fn format(&self, notice: &Notice) -> String {
        let (mark, message) = (marker(notice.level), notice.message.as_str());
        if !self.color {
            return format!("{mark} {message}");
        }
        match notice.level {
            NoticeLevel::Success => format!("{} {message}", mark.green()),
            NoticeLevel::Info => format!("{} {message}", mark.cyan()),
            NoticeLevel::Warning => format!("{} {}", mark.yellow(), message.yellow()),
            NoticeLevel::Error => format!("{} {}", mark.red(), message.red()),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        // Warnings and errors get through --quiet.
        if self.quiet && notice.level < NoticeLevel::Warning {
            return;
        }
        let _ = writeln!(io::stderr().lock(), "{}", self.format(&notice));
    }
}

fn marker(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Info => "•",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "✗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_format_has_marker() {
        let n = TerminalNotifier::new(false, false);
        assert_eq!(n.format(&Notice::success("OLT 'A' created")), "✓ OLT 'A' created");
        assert_eq!(n.format(&Notice::warning("refresh failed")), "! refresh failed");
    }
}
