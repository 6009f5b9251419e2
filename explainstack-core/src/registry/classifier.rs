//! Keyword classifier
//!
//! Picks an agent for free text using ordered substring rules over the
//! lower-cased input. The first matching rule wins; nothing matching falls
//! through to the code expert.

use crate::agents::AgentKind;

enum Matcher {
    AnyKeyword(&'static [&'static str]),
    DiffShape,
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::AnyKeyword(keywords) => keywords.iter().any(|keyword| text.contains(keyword)),
            Matcher::DiffShape => text.starts_with("diff ") || text.contains("---") || text.contains("+++"),
        }
    }
}

struct Rule {
    matcher: Matcher,
    target: AgentKind,
}

const PERFORMANCE_KEYWORDS: &[&str] = &[
    "performance",
    "optimize",
    "optimise",
    "optimization",
    "bottleneck",
    "scalability",
    "profiling",
    "latency",
    "throughput",
    "memory usage",
];

const SECURITY_KEYWORDS: &[&str] = &[
    "security",
    "vulnerability",
    "vulnerabilities",
    "cve",
    "owasp",
    "exploit",
    "injection",
    "xss",
    "csrf",
];

const IMPORT_KEYWORDS: &[&str] = &["clean imports", "nettoie", "organize imports", "import"];

const COMMIT_KEYWORDS: &[&str] = &["commit message", "commit msg", "suggest commit", "git commit"];

static RULES: [Rule; 5] = [
    Rule {
        matcher: Matcher::AnyKeyword(PERFORMANCE_KEYWORDS),
        target: AgentKind::PerformanceExpert,
    },
    Rule {
        matcher: Matcher::AnyKeyword(SECURITY_KEYWORDS),
        target: AgentKind::SecurityExpert,
    },
    Rule {
        matcher: Matcher::DiffShape,
        target: AgentKind::PatchReviewer,
    },
    Rule {
        matcher: Matcher::AnyKeyword(IMPORT_KEYWORDS),
        target: AgentKind::ImportCleaner,
    },
    Rule {
        matcher: Matcher::AnyKeyword(COMMIT_KEYWORDS),
        target: AgentKind::CommitWriter,
    },
];

/// Stateless rule-based agent classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Agent that should handle `input`
    pub fn classify(&self, input: &str) -> AgentKind {
        let text = input.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.matcher.matches(&text))
            .map(|rule| rule.target)
            .unwrap_or(AgentKind::CodeExpert)
    }
}
