//! The result of a channel audit, and its text rendering.

use std::collections::BTreeSet;

use super::tally::ReactionTally;

/// Link text used when a permalink cannot be resolved.
pub const NO_LINK: &str = "No Link";

/// A thread nobody has checked off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnacknowledgedEntry {
    pub permalink: String,
    pub time: String,
    /// Everyone who reacted to the thread with anything.
    pub reactors: BTreeSet<String>,
}

/// Everything gathered during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub window_label: String,
    pub total_messages: usize,
    pub tally: ReactionTally,
    pub unacknowledged: Vec<UnacknowledgedEntry>,
}

impl AuditSummary {
    pub fn new(window_label: impl Into<String>) -> Self {
        Self {
            window_label: window_label.into(),
            ..Default::default()
        }
    }

    pub fn pending(&self) -> usize {
        self.unacknowledged.len()
    }

    pub fn acknowledged(&self) -> usize {
        self.total_messages - self.pending()
    }

    /// Renders the report, listing at most `display_cap` pending threads.
    pub fn render(&self, display_cap: usize) -> String {
        let stats = self
            .tally
            .ranked()
            .iter()
            .map(|s| format!("• *{}*: ✅ {} | 👀 {} | Other: {}", s.name, s.acknowledged, s.eyes, s.other))
            .collect::<Vec<_>>()
            .join("\n");

        let pending = if self.unacknowledged.is_empty() {
            "🎉 All Slack Requests are Resolved!".to_string()
        } else {
            self.unacknowledged
                .iter()
                .take(display_cap)
                .enumerate()
                .map(|(index, entry)| {
                    let reactors = if entry.reactors.is_empty() {
                        "No reactions".to_string()
                    } else {
                        entry.reactors.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                    };

                    format!("{}. *Created On:* {} | *Acknowledged By:* {} | <{}|Link>", index + 1, entry.time, reactors, entry.permalink)
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut text = format!(
            "📊 *Thread Summary ({})*\n\n🧵 Total Slack Requests: *{}*\n🚫 Pending: *{}*\n\n👤 *Engineer Reaction Stats:*\n{}\n\n{}\n",
            self.window_label,
            self.total_messages,
            self.pending(),
            stats,
            pending
        );

        if self.unacknowledged.len() > display_cap {
            text.push_str(&format!("\n_Only showing first {} links._\n", display_cap));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize, reactors: &[&str]) -> UnacknowledgedEntry {
        UnacknowledgedEntry {
            permalink: format!("https://example.slack.com/archives/C1/p{n}"),
            time: "2025-07-10 09:30:00".to_string(),
            reactors: reactors.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn render_all_clear() {
        let mut summary = AuditSummary::new("July 2025");
        summary.total_messages = 1;
        summary.tally.record("ada", "white_check_mark");

        let text = summary.render(50);

        assert_eq!(
            text,
            "📊 *Thread Summary (July 2025)*\n\n🧵 Total Slack Requests: *1*\n🚫 Pending: *0*\n\n👤 *Engineer Reaction Stats:*\n• *ada*: ✅ 1 | 👀 0 | Other: 0\n\n🎉 All Slack Requests are Resolved!\n"
        );
    }

    #[test]
    fn render_lists_pending_threads() {
        let mut summary = AuditSummary::new("July 2025");
        summary.total_messages = 2;
        summary.tally.record("bob", "eyes");
        summary.tally.record("ada", "eyes");
        summary.unacknowledged.push(entry(1, &["bob", "ada"]));
        summary.unacknowledged.push(entry(2, &[]));

        let text = summary.render(50);

        assert!(text.contains("🚫 Pending: *2*"));
        assert!(text.contains("1. *Created On:* 2025-07-10 09:30:00 | *Acknowledged By:* ada, bob | <https://example.slack.com/archives/C1/p1|Link>"));
        assert!(text.contains("2. *Created On:* 2025-07-10 09:30:00 | *Acknowledged By:* No reactions | <https://example.slack.com/archives/C1/p2|Link>"));
        assert!(!text.contains("All Slack Requests are Resolved"));
        assert!(!text.contains("Only showing first"));
    }

    #[test]
    fn render_truncates_past_the_cap() {
        let mut summary = AuditSummary::new("July 2025");
        summary.total_messages = 4;
        summary.unacknowledged = (1..=4).map(|n| entry(n, &[])).collect();

        let text = summary.render(3);

        assert!(text.contains("3. *Created On:*"));
        assert!(!text.contains("4. *Created On:*"));
        assert!(text.ends_with("\n_Only showing first 3 links._\n"));
    }

    #[test]
    fn render_at_the_cap_has_no_note() {
        let mut summary = AuditSummary::new("July 2025");
        summary.total_messages = 3;
        summary.unacknowledged = (1..=3).map(|n| entry(n, &[])).collect();

        let text = summary.render(3);

        assert!(text.contains("3. *Created On:*"));
        assert!(!text.contains("Only showing first"));
    }

    #[test]
    fn acknowledged_is_total_minus_pending() {
        let mut summary = AuditSummary::new("July 2025");
        summary.total_messages = 5;
        summary.unacknowledged = (1..=2).map(|n| entry(n, &[])).collect();

        assert_eq!(summary.pending(), 2);
        assert_eq!(summary.acknowledged(), 3);
    }
}
