// ── Display-name transformation ──

use serde::{Deserialize, Serialize};

/// One literal substring replacement applied to module names before
/// they become accessory display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub from: String,
    pub to: String,
}

/// Apply the configured replacement rules in order.
///
/// Each rule replaces the first occurrence of its literal `from`
/// substring, matching the host-platform convention these rules were
/// written for.
pub fn apply_replacements(name: &str, rules: &[ReplaceRule]) -> String {
    rules.iter().fold(name.to_owned(), |acc, rule| {
        acc.replacen(&rule.from, &rule.to, 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &str, to: &str) -> ReplaceRule {
        ReplaceRule {
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn replaces_literal_substring() {
        let rules = vec![rule("Relay", "Outlet")];
        assert_eq!(apply_replacements("Relay 1", &rules), "Outlet 1");
    }

    #[test]
    fn applies_rules_in_order() {
        let rules = vec![rule("Relay", "Outlet"), rule("Outlet 1", "Kitchen Outlet")];
        assert_eq!(apply_replacements("Relay 1", &rules), "Kitchen Outlet");
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let rules = vec![rule("a", "b")];
        assert_eq!(apply_replacements("banana", &rules), "bbnana");
    }

    #[test]
    fn untouched_without_rules() {
        assert_eq!(apply_replacements("Relay 1", &[]), "Relay 1");
    }
}
