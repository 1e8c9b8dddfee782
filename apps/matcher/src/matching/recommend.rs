//! Recommendation Builder — skill set differences and course suggestions.

use serde::{Deserialize, Serialize};

use crate::catalog::CourseCatalog;
use crate::matching::skills::SkillSet;

/// Both directions of the job/candidate skill comparison, as sorted
/// sequences for deterministic output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    /// `job ∩ candidate`
    pub matched: Vec<String>,
    /// `job ∖ candidate`
    pub missing: Vec<String>,
    /// `candidate ∖ job`
    pub extra: Vec<String>,
}

/// A course recommended for one missing skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSuggestion {
    pub skill: String,
    pub platform: String,
    pub course_title: String,
    pub url: String,
}

/// Computes matched/missing/extra between the job's skills and a
/// candidate's skills. `missing ∪ matched = job` and
/// `extra ∪ matched = candidate` always hold.
pub fn skill_gap(job: &SkillSet, candidate: &SkillSet) -> SkillGap {
    SkillGap {
        matched: job.intersection(candidate).cloned().collect(),
        missing: job.difference(candidate).cloned().collect(),
        extra: candidate.difference(job).cloned().collect(),
    }
}

/// Maps missing skills to catalog courses.
///
/// One suggestion per skill at most, taken from the highest-priority
/// catalog source with a title match; skills with no match in any source
/// are silently omitted.
pub fn suggest_courses(missing: &[String], catalog: &CourseCatalog) -> Vec<CourseSuggestion> {
    missing
        .iter()
        .filter_map(|skill| {
            catalog.find_course(skill).map(|(platform, course)| CourseSuggestion {
                skill: skill.clone(),
                platform: platform.to_string(),
                course_title: course.title.clone(),
                url: course.url.clone(),
            })
        })
        .collect()
}
