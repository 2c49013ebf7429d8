//! Host name patterns compiled from a [`PartsList`](crate::PartsList).

use regex::{Regex, RegexBuilder};

/// Whole-string, case-insensitive regular expressions.
///
/// Patterns that fail to compile are logged and never match.
#[derive(Debug, Clone, Default)]
pub(crate) struct HostPatterns {
    compiled: Vec<Regex>,
    configured: usize,
}

impl HostPatterns {
    pub fn compile(patterns: &[String]) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|pattern| match anchored(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("ignoring invalid host pattern {:?}: {}", pattern, e);
                    None
                }
            })
            .collect();
        Self {
            compiled,
            configured: patterns.len(),
        }
    }

    /// True when no pattern was configured (invalid ones still count as configured).
    pub fn is_empty(&self) -> bool {
        self.configured == 0
    }

    pub fn matches(&self, host: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(host))
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(list: &[&str]) -> HostPatterns {
        let owned: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        HostPatterns::compile(&owned)
    }

    #[test]
    fn matches_whole_host_only() {
        let p = patterns(&["(.*)\\.example\\.com"]);
        assert!(p.matches("www.example.com"));
        assert!(p.matches("a.b.example.com"));
        assert!(!p.matches("example.com"));
        assert!(!p.matches("www.example.com.evil.org"));
    }

    #[test]
    fn alternation_is_anchored_as_a_group() {
        let p = patterns(&["a\\.com|b\\.com"]);
        assert!(p.matches("a.com"));
        assert!(p.matches("b.com"));
        assert!(!p.matches("a.com.evil"));
        assert!(!p.matches("xb.com"));
    }

    #[test]
    fn case_insensitive() {
        let p = patterns(&["API\\.Example\\.COM"]);
        assert!(p.matches("api.example.com"));
    }

    #[test]
    fn unescaped_dot_matches_any_character() {
        let p = patterns(&["example.com"]);
        assert!(p.matches("example.com"));
        assert!(p.matches("examplexcom"));
    }

    #[test]
    fn invalid_pattern_is_configured_but_never_matches() {
        let p = patterns(&["([unclosed"]);
        assert!(!p.is_empty());
        assert!(!p.matches("([unclosed"));
        assert!(patterns(&[]).is_empty());
    }
}
