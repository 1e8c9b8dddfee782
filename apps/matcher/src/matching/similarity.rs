//! Similarity Ranker — TF-IDF vector space over the request corpus, cosine
//! similarity of the job description against every résumé.
//!
//! The vectorizer is fit jointly over `{jd} ∪ resumes` on every call, so
//! vocabulary and IDF weights are corpus-local to one request and nothing
//! is persisted between invocations.

use std::collections::HashMap;

use regex::Regex;

/// One candidate with its 0–100 similarity score, carrying the original
/// upload index so callers can map back to names and skill sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: f64,
}

/// Scores every candidate text against the reference text.
///
/// Returns one score per candidate, in candidate order, as a percentage in
/// [0, 100] rounded to 2 decimal places. Callers must reject empty or
/// whitespace-only input before calling; an empty corpus has no meaningful
/// vector space and scores degenerate to 0.
pub fn score_candidates(reference: &str, candidates: &[String]) -> Vec<f64> {
    let mut corpus: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
    corpus.push(reference);
    corpus.extend(candidates.iter().map(String::as_str));

    let vectors = tfidf_vectors(&corpus);
    let jd_vec = &vectors[0];

    vectors[1..]
        .iter()
        .map(|resume_vec| {
            let score = cosine_similarity(jd_vec, resume_vec) * 100.0;
            round2(score.clamp(0.0, 100.0))
        })
        .collect()
}

/// Selects the top `k` candidates, descending by score.
///
/// Tie-break rule: equal scores keep original upload order (lower index
/// first). `k` is capped at the candidate count.
pub fn top_k(scores: &[f64], k: usize) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| RankedCandidate { index, score })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });

    ranked.truncate(k.min(scores.len()));
    ranked
}

// ────────────────────────────────────────────────────────────────────────────
// TF-IDF internals
// ────────────────────────────────────────────────────────────────────────────

/// Tokens are lowercased runs of 2+ word characters, matching the
/// conventional vectorizer token pattern `\b\w\w+\b`.
fn tokenize(text: &str, token: &Regex) -> Vec<String> {
    token
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Builds L2-normalized TF-IDF vectors for the whole corpus.
///
/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`, which never zeroes a term
/// and tolerates terms present in every document.
fn tfidf_vectors(corpus: &[&str]) -> Vec<Vec<f64>> {
    let token = Regex::new(r"\b\w\w+\b").expect("static token pattern");
    let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc, &token)).collect();

    // Vocabulary: first-seen order over the whole corpus.
    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    for doc in &tokenized {
        for token in doc {
            let next_id = vocabulary.len();
            vocabulary.entry(token.as_str()).or_insert(next_id);
        }
    }

    // Document frequency per term.
    let mut df = vec![0usize; vocabulary.len()];
    for doc in &tokenized {
        let mut seen = vec![false; vocabulary.len()];
        for token in doc {
            let id = vocabulary[token.as_str()];
            if !seen[id] {
                seen[id] = true;
                df[id] += 1;
            }
        }
    }

    let n = corpus.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    tokenized
        .iter()
        .map(|doc| {
            let mut vector = vec![0.0f64; vocabulary.len()];
            for token in doc {
                vector[vocabulary[token.as_str()]] += 1.0;
            }
            for (id, weight) in vector.iter_mut().enumerate() {
                *weight *= idf[id];
            }
            l2_normalize(&mut vector);
            vector
        })
        .collect()
}

fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine of the angle between two vectors; 0.0 when either is all-zero.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
