/// The three interchangeable entity-extraction backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Local regex/keyword extractor. The default when no flag is set.
    RuleBased,
    /// Local LLM reached through the Ollama API.
    LocalLlm,
    /// Gemini. The only backend that can also consume raw image bytes.
    CloudLlm,
}

impl BackendKind {
    /// Resolve the backend from the two request flags.
    ///
    /// When both flags are set the cloud backend wins; the local LLM wins
    /// over the rule-based default. The precedence is fixed here rather
    /// than left to handler fall-through so it can be tested in isolation.
    pub fn from_flags(use_cloud_llm: bool, use_local_llm: bool) -> Self {
        if use_cloud_llm {
            Self::CloudLlm
        } else if use_local_llm {
            Self::LocalLlm
        } else {
            Self::RuleBased
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::LocalLlm => "local_llm",
            Self::CloudLlm => "cloud_llm",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_selects_rule_based() {
        assert_eq!(BackendKind::from_flags(false, false), BackendKind::RuleBased);
    }

    #[test]
    fn local_flag_selects_local_llm() {
        assert_eq!(BackendKind::from_flags(false, true), BackendKind::LocalLlm);
    }

    #[test]
    fn cloud_flag_selects_cloud_llm() {
        assert_eq!(BackendKind::from_flags(true, false), BackendKind::CloudLlm);
    }

    #[test]
    fn cloud_wins_over_local_when_both_set() {
        assert_eq!(BackendKind::from_flags(true, true), BackendKind::CloudLlm);
    }

    #[test]
    fn backend_display() {
        assert_eq!(BackendKind::RuleBased.to_string(), "rule_based");
        assert_eq!(BackendKind::LocalLlm.to_string(), "local_llm");
        assert_eq!(BackendKind::CloudLlm.to_string(), "cloud_llm");
    }
}
