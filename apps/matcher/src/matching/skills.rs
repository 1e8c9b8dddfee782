//! Skill Matcher — maps free text to canonical skills via a static pattern registry.
//!
//! A fixed synonym table, not a learned model: deterministic, auditable,
//! zero training cost, acceptable false-negative rate for a recommendation
//! tool. The registry is compiled once at startup and never mutated.

use std::collections::BTreeSet;

use regex::Regex;

/// Canonical skill identifiers, ordered and deduplicated.
/// Every skill string in the system is drawn from the registry table below;
/// free-text skills never enter a `SkillSet`.
pub type SkillSet = BTreeSet<String>;

/// Canonical skill → detection patterns, in declaration order.
///
/// Patterns are word-boundary anchored so substrings never match
/// ("javascript" must not produce `java`). Skills containing `+` or `#`
/// cannot use `\b` on the symbol side, so they anchor on whitespace or
/// string edges instead — the normalizer guarantees single-space
/// separation, which makes that equivalent.
const SKILL_TABLE: &[(&str, &[&str])] = &[
    ("python", &[r"\bpython\b"]),
    ("java", &[r"\bjava\b"]),
    ("c++", &[r"(?:^|\s)c\+\+(?:$|\s)"]),
    ("c#", &[r"(?:^|\s)c#(?:$|\s)", r"\bc sharp\b"]),
    ("sql", &[r"\bsql\b", r"\bstructured query language\b"]),
    ("html", &[r"\bhtml\b"]),
    ("css", &[r"\bcss\b"]),
    ("javascript", &[r"\bjavascript\b", r"\bjs\b"]),
    ("react", &[r"\breact\b", r"\breactjs\b", r"\breact\.js\b"]),
    ("node", &[r"\bnode\b", r"\bnodejs\b", r"\bnode\.js\b"]),
    ("flask", &[r"\bflask\b"]),
    ("django", &[r"\bdjango\b"]),
    ("machine learning", &[r"\bmachine learning\b", r"\bml\b"]),
    ("deep learning", &[r"\bdeep learning\b", r"\bdl\b"]),
    ("nlp", &[r"\bnlp\b", r"\bnatural language processing\b"]),
    ("tensorflow", &[r"\btensorflow\b"]),
    ("keras", &[r"\bkeras\b"]),
    (
        "data analysis",
        &[r"\bdata analysis\b", r"\bdata analyst\b", r"\bdata analytics\b"],
    ),
    ("power bi", &[r"\bpower bi\b", r"\bpowerbi\b"]),
    ("excel", &[r"\bexcel\b"]),
    ("communication", &[r"\bcommunication\b", r"\bcommunicative\b"]),
    ("leadership", &[r"\bleadership\b", r"\bleader\b"]),
    ("git", &[r"\bgit\b"]),
    ("linux", &[r"\blinux\b"]),
    ("cloud", &[r"\bcloud\b"]),
    ("aws", &[r"\baws\b", r"\bamazon web services\b"]),
    ("azure", &[r"\bazure\b", r"\bmicrosoft azure\b"]),
    ("docker", &[r"\bdocker\b"]),
    ("kubernetes", &[r"\bkubernetes\b", r"\bk8s\b"]),
    ("react native", &[r"\breact native\b"]),
    ("rest api", &[r"\brest api\b", r"\brestful\b", r"\bapi\b"]),
    ("opencv", &[r"\bopencv\b"]),
    ("pandas", &[r"\bpandas\b"]),
    ("numpy", &[r"\bnumpy\b"]),
    ("matplotlib", &[r"\bmatplotlib\b"]),
    ("scikit-learn", &[r"\bscikit[- ]?learn\b", r"\bsklearn\b"]),
    ("excel vba", &[r"\bvba\b", r"\bexcel vba\b"]),
];

struct SkillEntry {
    skill: &'static str,
    patterns: Vec<Regex>,
}

/// Immutable registry of canonical skills and their compiled patterns.
/// Built once in `main` and shared read-only for the process lifetime.
pub struct SkillRegistry {
    entries: Vec<SkillEntry>,
    separators: Regex,
    whitespace: Regex,
}

impl SkillRegistry {
    /// Compiles the built-in skill table. The table is static, so a pattern
    /// that fails to compile is a programmer error, not a runtime condition.
    pub fn builtin() -> Self {
        let entries = SKILL_TABLE
            .iter()
            .map(|&(skill, patterns)| SkillEntry {
                skill,
                patterns: patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&format!("(?i){p}")).expect("static skill pattern compiles")
                    })
                    .collect(),
            })
            .collect();

        SkillRegistry {
            entries,
            separators: Regex::new(r"[\n\r\t,;/\(\)\[\]\{\}:<>\-]").expect("separator pattern"),
            whitespace: Regex::new(r"\s+").expect("whitespace pattern"),
        }
    }

    /// Number of canonical skills in the registry.
    pub fn skill_count(&self) -> usize {
        self.entries.len()
    }

    /// Replaces structural punctuation with spaces, collapses runs of
    /// whitespace, and lowercases. `+` and `#` survive so that skills like
    /// `c++` and `c#` keep matching.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let spaced = self.separators.replace_all(text, " ");
        let collapsed = self.whitespace.replace_all(&spaced, " ");
        collapsed.trim().to_lowercase()
    }

    /// Returns the set of canonical skills mentioned in `text`.
    ///
    /// Per skill, patterns are tried in declaration order and the first hit
    /// short-circuits that skill; skills are evaluated independently, so one
    /// match never suppresses another skill.
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let normalized = self.normalize(text);
        let mut found = SkillSet::new();
        for entry in &self.entries {
            if entry.patterns.iter().any(|p| p.is_match(&normalized)) {
                found.insert(entry.skill.to_string());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SkillRegistry {
        SkillRegistry::builtin()
    }

    fn set(skills: &[&str]) -> SkillSet {
        skills.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let reg = registry();
        let text = "Python, Docker and a bit of SQL";
        assert_eq!(reg.extract_skills(text), reg.extract_skills(text));
    }

    #[test]
    fn test_javascript_does_not_yield_java() {
        let reg = registry();
        let skills = reg.extract_skills("expert in javascript only");
        assert!(skills.contains("javascript"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn test_java_alone_yields_java() {
        let reg = registry();
        let skills = reg.extract_skills("expert in Java");
        assert!(skills.contains("java"));
        assert!(!skills.contains("javascript"));
    }

    #[test]
    fn test_ml_abbreviation_maps_to_machine_learning() {
        let reg = registry();
        let short = reg.extract_skills("5 years of ML experience");
        let long = reg.extract_skills("5 years of machine learning experience");
        assert!(short.contains("machine learning"));
        assert!(long.contains("machine learning"));
    }

    #[test]
    fn test_cpp_and_csharp_survive_normalization() {
        let reg = registry();
        let skills = reg.extract_skills("Languages: C++, C#, Java");
        assert!(skills.contains("c++"), "got {skills:?}");
        assert!(skills.contains("c#"), "got {skills:?}");
        assert!(skills.contains("java"));
    }

    #[test]
    fn test_normalization_collapses_separators() {
        let reg = registry();
        assert_eq!(
            reg.normalize("Python,Java/SQL\n\n(Docker)"),
            "python java sql docker"
        );
    }

    #[test]
    fn test_hyphenated_synonym_matches() {
        let reg = registry();
        // The normalizer turns "scikit-learn" into "scikit learn".
        let skills = reg.extract_skills("worked with scikit-learn pipelines");
        assert!(skills.contains("scikit-learn"));
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        let reg = registry();
        assert!(reg.extract_skills("").is_empty());
        assert!(reg.extract_skills("   \n\t ").is_empty());
    }

    #[test]
    fn test_skills_are_canonical_lowercase() {
        let reg = registry();
        let skills = reg.extract_skills("PYTHON and Machine Learning");
        assert_eq!(skills, set(&["machine learning", "python"]));
    }

    #[test]
    fn test_registry_has_full_table() {
        assert_eq!(registry().skill_count(), SKILL_TABLE.len());
    }
}
