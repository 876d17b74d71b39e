//! Display utilities for the CLI

use std::error::Error;
use std::fmt::Display;

use colored::Colorize;

/// A formatted section title
pub(crate) struct SectionTitle(pub(crate) &'static str);

impl Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub(crate) const fn section_title(title: &'static str) -> SectionTitle {
    SectionTitle(title)
}

/// Format a success message
pub(crate) fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a failed check
pub(crate) fn check_failed(message: &str) -> String {
    format!("❌ {}", message.red().bold())
}

/// Format a key-value section for command outputs
pub(crate) fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

/// Format a fatal error with its kind and, for device refusals, the status word
pub(crate) fn failure(error: &(dyn Error + 'static)) -> String {
    let Some(error) = error.downcast_ref::<ledger_cosmos::Error>() else {
        return format!("{} {}", "error:".red().bold(), error);
    };

    let kind = match error {
        ledger_cosmos::Error::Transport(_) => "transport",
        ledger_cosmos::Error::Framing(_) => "framing",
        ledger_cosmos::Error::Device { .. } => "device",
        ledger_cosmos::Error::NotFound => "not found",
        ledger_cosmos::Error::InvalidResponse(_) => "invalid response",
        ledger_cosmos::Error::MessageTooLarge { .. } => "message too large",
        _ => "client",
    };

    let mut message = format!("{} {}", format!("{kind} error:").red().bold(), error);
    if let Some(status) = error.status_word() {
        message.push_str(&format!(" (SW {:#06x})", status.to_u16()));
    }
    message
}
