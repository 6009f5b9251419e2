//! Classification table and properties

use explainstack_core::{AgentKind, Classifier};
use proptest::prelude::*;
use test_case::test_case;

#[test_case("diff --git a/nova/api.py b/nova/api.py", AgentKind::PatchReviewer ; "diff prefix")]
#[test_case("--- a/setup.cfg\n+++ b/setup.cfg", AgentKind::PatchReviewer ; "unified diff markers")]
#[test_case("please optimize this loop for speed", AgentKind::PerformanceExpert ; "optimize")]
#[test_case("where is the bottleneck here", AgentKind::PerformanceExpert ; "bottleneck")]
#[test_case("Is this vulnerable to SQL injection?", AgentKind::SecurityExpert ; "injection")]
#[test_case("check for any known CVE", AgentKind::SecurityExpert ; "cve")]
#[test_case("vulnerability\n--- a/x.py\n+++ b/x.py", AgentKind::SecurityExpert ; "security before diff")]
#[test_case("profiling shows a vulnerability", AgentKind::PerformanceExpert ; "performance before security")]
#[test_case("clean imports in this module", AgentKind::ImportCleaner ; "clean imports")]
#[test_case("nettoie ce fichier", AgentKind::ImportCleaner ; "french")]
#[test_case("import os\nimport sys", AgentKind::ImportCleaner ; "bare import keyword")]
#[test_case("suggest commit text for this", AgentKind::CommitWriter ; "suggest commit")]
#[test_case("write a Commit Message", AgentKind::CommitWriter ; "mixed case commit message")]
#[test_case("def add(a, b): return a + b", AgentKind::CodeExpert ; "plain code")]
#[test_case("", AgentKind::CodeExpert ; "empty")]
fn test_classification_table(input: &str, expected: AgentKind) {
    assert_eq!(Classifier::new().classify(input), expected);
}

proptest! {
    #[test]
    fn classify_is_deterministic(input in ".{0,200}") {
        let classifier = Classifier::new();
        prop_assert_eq!(classifier.classify(&input), classifier.classify(&input));
    }

    #[test]
    fn classify_ignores_ascii_case(input in "[ -~\n]{0,200}") {
        let classifier = Classifier::new();
        let expected = classifier.classify(&input);
        prop_assert_eq!(classifier.classify(&input.to_ascii_uppercase()), expected);
        prop_assert_eq!(classifier.classify(&input.to_ascii_lowercase()), expected);
    }

    #[test]
    fn security_keyword_outranks_diff_markers(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let input = format!("{}vulnerability{}\n--- a\n+++ b", prefix, suffix);
        let kind = Classifier::new().classify(&input);
        // A random prefix/suffix can only add a performance keyword, which ranks higher
        prop_assert!(kind == AgentKind::SecurityExpert || kind == AgentKind::PerformanceExpert);
    }
}
