//! Report Builder — assembles the exportable match report as markup.
//!
//! Rendering to PDF is an external collaborator; this module only produces
//! the report content. Course URLs are attribute values in the markup, so
//! they are XML-escaped before embedding.

use serde::Serialize;

use crate::matching::pipeline::AnalysisOutcome;
use crate::matching::recommend::CourseSuggestion;

/// Everything the exported report shows for one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub username: String,
    pub match_percentage: f64,
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub courses: Vec<CourseSuggestion>,
}

impl MatchReport {
    pub fn from_analysis(username: &str, outcome: &AnalysisOutcome) -> Self {
        MatchReport {
            username: username.to_string(),
            match_percentage: outcome.match_percentage,
            resume_skills: outcome.resume_skills.clone(),
            job_skills: outcome.job_skills.clone(),
            matched_skills: outcome.gap.matched.clone(),
            missing_skills: outcome.gap.missing.clone(),
            courses: outcome.courses.clone(),
        }
    }

    /// Renders the report as markup for the external PDF renderer.
    /// Text nodes and attribute values are escaped; course links stay
    /// clickable via the `href` attribute.
    pub fn markup(&self) -> String {
        let mut out = String::new();
        out.push_str("<report>\n");
        out.push_str(&format!(
            "  <user>{}</user>\n",
            xml_escape(&self.username)
        ));
        out.push_str(&format!(
            "  <match-percentage>{:.2}</match-percentage>\n",
            self.match_percentage
        ));
        push_skill_list(&mut out, "resume-skills", &self.resume_skills);
        push_skill_list(&mut out, "job-skills", &self.job_skills);
        push_skill_list(&mut out, "matched-skills", &self.matched_skills);
        push_skill_list(&mut out, "missing-skills", &self.missing_skills);
        out.push_str("  <courses>\n");
        for course in &self.courses {
            out.push_str(&format!(
                "    <course skill=\"{}\" platform=\"{}\" href=\"{}\">{}</course>\n",
                xml_escape(&course.skill),
                xml_escape(&course.platform),
                xml_escape(&course.url),
                xml_escape(&course.course_title)
            ));
        }
        out.push_str("  </courses>\n");
        out.push_str("</report>\n");
        out
    }
}

fn push_skill_list(out: &mut String, tag: &str, skills: &[String]) {
    out.push_str(&format!("  <{tag}>\n"));
    for skill in skills {
        out.push_str(&format!("    <skill>{}</skill>\n", xml_escape(skill)));
    }
    out.push_str(&format!("  </{tag}>\n"));
}

/// Escapes the five XML-reserved characters.
pub fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
