/// Decision returned by a content moderator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    Approved,
    Rejected { reason: String },
}

/// Screens user-written report text before it is stored.
pub trait ContentModerator: Send + Sync {
    fn review(&self, text: &str) -> ModerationVerdict;
}

/// Case-insensitive substring match against a block list.
#[derive(Debug, Clone, Default)]
pub struct KeywordModerator {
    blocked: Vec<String>,
}

impl KeywordModerator {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocked = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { blocked }
    }

    pub fn blocked_terms(&self) -> &[String] {
        &self.blocked
    }
}

impl ContentModerator for KeywordModerator {
    fn review(&self, text: &str) -> ModerationVerdict {
        let haystack = text.to_lowercase();
        match self.blocked.iter().find(|term| haystack.contains(term.as_str())) {
            Some(term) => ModerationVerdict::Rejected {
                reason: format!("contains blocked term '{term}'"),
            },
            None => ModerationVerdict::Approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blocked_terms_regardless_of_case() {
        let moderator = KeywordModerator::new(["Scam", " spam "]);

        match moderator.review("This pothole is a SCAM by the contractor") {
            ModerationVerdict::Rejected { reason } => assert!(reason.contains("'scam'")),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(moderator.blocked_terms(), ["scam", "spam"]);
    }

    #[test]
    fn approves_clean_text_and_empty_lists() {
        let moderator = KeywordModerator::new(["spam"]);
        assert_eq!(
            moderator.review("Streetlight out near the bus stop"),
            ModerationVerdict::Approved
        );
        assert_eq!(
            KeywordModerator::default().review("anything at all"),
            ModerationVerdict::Approved
        );
    }
}
