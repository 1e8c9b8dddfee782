//! Request pipelines — the batch matcher and the interactive analyzer.
//!
//! Both wrap the same flow: extract text → vectorize → cosine similarity →
//! skill lookup → recommendations. Validation happens here, at the request
//! boundary, before any ranking runs: an empty corpus has no meaningful
//! vector space, so blank input is rejected with a user-visible message.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::{self, UploadedDocument};
use crate::matching::recommend::{self, CourseSuggestion, SkillGap};
use crate::matching::similarity;
use crate::state::AppState;
use crate::store::{HistoryEntry, Session, UserStore};

/// One ranked candidate from the batch matcher.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub candidate: String,
    /// 0–100, rounded to 2 decimal places.
    pub score: f64,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
}

/// Batch matcher output: the top-K candidates plus the job's skill set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub job_skills: Vec<String>,
    pub top_matches: Vec<MatchResult>,
}

/// Interactive analyzer output for a single résumé.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub match_percentage: f64,
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub gap: SkillGap,
    pub courses: Vec<CourseSuggestion>,
}

/// Ranks N résumés against one job description.
///
/// Side effect: each upload is written to the uploads directory (created on
/// demand) before extraction, then the configured retention policy applies.
/// Résumés whose extraction yields no text stay in the corpus with an empty
/// document; only an entirely empty corpus is rejected.
pub fn match_batch(
    state: &AppState,
    job_description: &str,
    documents: &[UploadedDocument],
) -> Result<BatchOutcome, AppError> {
    if documents.is_empty() || job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one resume and enter a job description".to_string(),
        ));
    }

    let mut resume_texts = Vec::with_capacity(documents.len());
    for document in documents {
        let path = extract::save_upload(&state.config.upload_dir, document)?;
        resume_texts.push(extract::extract(document));
        extract::apply_retention(&path, state.config.retention)?;
    }

    if resume_texts.iter().all(|t| t.trim().is_empty()) {
        return Err(AppError::Validation(
            "No text could be extracted from the uploaded resumes".to_string(),
        ));
    }

    let scores = similarity::score_candidates(job_description, &resume_texts);
    let ranked = similarity::top_k(&scores, state.config.top_k);

    let job_skills = state.registry.extract_skills(job_description);
    let top_matches = ranked
        .into_iter()
        .map(|candidate| {
            let resume_skills = state.registry.extract_skills(&resume_texts[candidate.index]);
            let gap = recommend::skill_gap(&job_skills, &resume_skills);
            MatchResult {
                candidate: documents[candidate.index].file_name.clone(),
                score: candidate.score,
                missing_skills: gap.missing,
                extra_skills: gap.extra,
            }
        })
        .collect();

    info!(
        "Batch match: {} resume(s), top {} returned",
        documents.len(),
        state.config.top_k.min(documents.len())
    );

    Ok(BatchOutcome {
        job_skills: job_skills.into_iter().collect(),
        top_matches,
    })
}

/// Analyzes one résumé against one job description for a logged-in user,
/// appending the run to that user's history (saved immediately).
pub fn analyze_resume(
    state: &AppState,
    store: &mut UserStore,
    session: &Session,
    document: &UploadedDocument,
    job_description: &str,
) -> Result<AnalysisOutcome, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description".to_string(),
        ));
    }

    let resume_text = extract::extract(document);
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the uploaded resume".to_string(),
        ));
    }

    let scores = similarity::score_candidates(job_description, &[resume_text.clone()]);
    let match_percentage = scores[0];

    let job_skills = state.registry.extract_skills(job_description);
    let resume_skills = state.registry.extract_skills(&resume_text);
    let gap = recommend::skill_gap(&job_skills, &resume_skills);
    let courses = recommend::suggest_courses(&gap.missing, &state.catalog);

    store.append_history(
        session,
        HistoryEntry {
            timestamp: Utc::now(),
            match_percentage,
            resume_skills: resume_skills.iter().cloned().collect(),
            job_skills: job_skills.iter().cloned().collect(),
            missing_skills: gap.missing.clone(),
        },
    )?;

    info!(
        "Analysis for '{}': {match_percentage}% match, {} missing skill(s)",
        session.username,
        gap.missing.len()
    );

    Ok(AnalysisOutcome {
        match_percentage,
        resume_skills: resume_skills.into_iter().collect(),
        job_skills: job_skills.into_iter().collect(),
        gap,
        courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, CourseCatalog};
    use crate::config::{Config, RetentionPolicy};
    use crate::matching::skills::SkillRegistry;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let config = Config {
            upload_dir: dir.path().join("uploads"),
            store_path: dir.path().join("users.json"),
            retention: RetentionPolicy::Keep,
            top_k: 3,
            catalog_sources: Vec::new(),
            rust_log: "info".to_string(),
        };
        AppState {
            config,
            registry: SkillRegistry::builtin(),
            catalog: CourseCatalog::from_data(vec![(
                "Coursera".to_string(),
                vec![Course {
                    title: "AWS Fundamentals".to_string(),
                    url: "https://example.com/aws?ref=a&b".to_string(),
                }],
            )]),
        }
    }

    fn txt(name: &str, content: &str) -> UploadedDocument {
        UploadedDocument::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_batch_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let no_resumes = match_batch(&state, "a job", &[]);
        assert!(matches!(no_resumes, Err(AppError::Validation(_))));

        let blank_jd = match_batch(&state, "   \n", &[txt("a.txt", "python")]);
        assert!(matches!(blank_jd, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_batch_rejects_all_empty_extractions() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let result = match_batch(&state, "python developer", &[txt("a.unknown", "python")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_batch_end_to_end_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let outcome = match_batch(
            &state,
            "Looking for a Python developer with AWS and Docker experience",
            &[txt(
                "ada.txt",
                "Experienced Python developer, worked with Docker containers",
            )],
        )
        .unwrap();

        assert_eq!(outcome.job_skills, vec!["aws", "docker", "python"]);
        assert_eq!(outcome.top_matches.len(), 1);
        let top = &outcome.top_matches[0];
        assert_eq!(top.candidate, "ada.txt");
        assert!(top.score > 0.0);
        assert_eq!(top.missing_skills, vec!["aws"]);
        assert!(top.extra_skills.is_empty());
    }

    #[test]
    fn test_batch_ranks_and_caps_at_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let jd = "python developer with aws and docker";
        let documents = vec![
            txt("best.txt", "python developer with aws and docker"),
            txt("ok.txt", "python developer"),
            txt("off.txt", "watercolor painter and ceramics teacher"),
            txt("fourth.txt", "another python developer with aws"),
        ];
        let outcome = match_batch(&state, jd, &documents).unwrap();

        assert_eq!(outcome.top_matches.len(), 3);
        assert_eq!(outcome.top_matches[0].candidate, "best.txt");
        for pair in outcome.top_matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_batch_keeps_uploads_under_keep_policy() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        match_batch(&state, "python", &[txt("kept.txt", "python")]).unwrap();
        assert!(state.config.upload_dir.join("kept.txt").exists());
    }

    #[test]
    fn test_batch_delete_policy_removes_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = test_state(&dir);
        state.config.retention = RetentionPolicy::Delete;
        match_batch(&state, "python", &[txt("gone.txt", "python")]).unwrap();
        assert!(!state.config.upload_dir.join("gone.txt").exists());
    }

    #[test]
    fn test_analyze_appends_history_and_suggests_courses() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut store = UserStore::load(&state.config.store_path).unwrap();
        store.register("ada", "hunter2").unwrap();
        let session = store.login("ada", "hunter2").unwrap();

        let outcome = analyze_resume(
            &state,
            &mut store,
            &session,
            &txt("ada.txt", "Python developer, Docker containers"),
            "Python developer with AWS and Docker experience",
        )
        .unwrap();

        assert!(outcome.match_percentage > 0.0);
        assert_eq!(outcome.gap.missing, vec!["aws"]);
        assert_eq!(outcome.courses.len(), 1);
        assert_eq!(outcome.courses[0].skill, "aws");

        let history = store.history(&session).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].missing_skills, vec!["aws"]);
        assert_eq!(history[0].match_percentage, outcome.match_percentage);
    }

    #[test]
    fn test_analyze_rejects_unreadable_resume_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut store = UserStore::load(&state.config.store_path).unwrap();
        store.register("ada", "hunter2").unwrap();
        let session = store.login("ada", "hunter2").unwrap();

        let result = analyze_resume(
            &state,
            &mut store,
            &session,
            &txt("bad.pdf", "not really a pdf"),
            "python developer",
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.history(&session).unwrap().is_empty());
    }
}
