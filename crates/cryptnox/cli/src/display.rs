//! Terminal formatting for command output

use colored::Colorize;

/// Format a success message
#[cfg_attr(not(feature = "pcsc"), allow(dead_code))]
pub(crate) fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub(crate) fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format a key-value section
pub(crate) fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_box_lists_items() {
        colored::control::set_override(false);
        let out = key_value_box("Card", vec![("UID", "04A2".to_string())]);
        assert_eq!(out, "Card\n  UID: 04A2");
    }
}
