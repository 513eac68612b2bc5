//! Keyword shortcuts: canned answers for questions that should never hit
//! retrieval or the model (greetings, "who made you", contact requests).
//!
//! Matching is case-insensitive substring search over the question; first
//! matching shortcut in declaration order wins.

/// One canned answer triggered by any of its keywords.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub keywords: Vec<String>,
    pub answer: String,
}

impl Shortcut {
    pub fn new(keywords: Vec<String>, answer: impl Into<String>) -> Self {
        Self {
            keywords,
            answer: answer.into(),
        }
    }
}

/// An ordered table of shortcuts checked before the pipeline proper.
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutTable {
    pub fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self { shortcuts }
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Return the canned answer for the first shortcut whose keyword occurs
    /// in the question, if any.
    pub fn lookup(&self, question: &str) -> Option<&str> {
        let lowered = question.to_lowercase();
        self.shortcuts
            .iter()
            .find(|s| {
                s.keywords
                    .iter()
                    .any(|k| lowered.contains(&k.to_lowercase()))
            })
            .map(|s| s.answer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ShortcutTable {
        ShortcutTable::new(vec![
            Shortcut::new(
                vec!["email".into(), "contact".into()],
                "You can reach me at me@example.com",
            ),
            Shortcut::new(vec!["who made you".into()], "I was built as a personal project."),
        ])
    }

    #[test]
    fn matches_case_insensitively() {
        let t = table();
        assert_eq!(
            t.lookup("What is your EMAIL address?"),
            Some("You can reach me at me@example.com")
        );
    }

    #[test]
    fn first_match_wins() {
        let t = table();
        // "contact" appears before "who made you" in declaration order.
        assert_eq!(
            t.lookup("who made you and how do I contact you"),
            Some("You can reach me at me@example.com")
        );
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(table().lookup("where did you study?"), None);
    }

    #[test]
    fn empty_table_never_matches() {
        assert_eq!(ShortcutTable::default().lookup("email me"), None);
    }
}
