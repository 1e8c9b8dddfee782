//! Course catalog — static tabular course data queried by substring match.
//!
//! Sources load once at startup from CSV and are never mutated. Lookup
//! priority is the declared source order from `Config::catalog_sources`:
//! the first source that yields a course for a skill wins, later sources
//! are only consulted as fallback.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::config::CatalogSource;
use crate::errors::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone)]
struct LoadedSource {
    platform: String,
    courses: Vec<Course>,
}

/// All catalog sources, in priority order.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    sources: Vec<LoadedSource>,
}

impl CourseCatalog {
    /// Loads every configured source. A missing file is logged and treated
    /// as an empty source (the catalog is optional external data); a
    /// malformed CSV row is a configuration error and propagates.
    pub fn load(sources: &[CatalogSource]) -> Result<Self, AppError> {
        let mut loaded = Vec::with_capacity(sources.len());
        for source in sources {
            let courses = match read_courses(&source.path) {
                Ok(courses) => courses,
                Err(AppError::Io(e)) => {
                    warn!(
                        "Catalog source '{}' unavailable ({e}); continuing without it",
                        source.platform
                    );
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            loaded.push(LoadedSource {
                platform: source.platform.clone(),
                courses,
            });
        }
        Ok(CourseCatalog { sources: loaded })
    }

    /// Builds a catalog directly from in-memory data, priority order as given.
    pub fn from_data(sources: Vec<(String, Vec<Course>)>) -> Self {
        CourseCatalog {
            sources: sources
                .into_iter()
                .map(|(platform, courses)| LoadedSource { platform, courses })
                .collect(),
        }
    }

    /// Finds the first course whose title contains `skill`, case-insensitive,
    /// consulting sources in priority order. Returns the owning platform
    /// label with the course; `None` when no source has a match.
    pub fn find_course(&self, skill: &str) -> Option<(&str, &Course)> {
        let needle = skill.to_lowercase();
        for source in &self.sources {
            if let Some(course) = source
                .courses
                .iter()
                .find(|c| c.title.to_lowercase().contains(&needle))
            {
                return Some((source.platform.as_str(), course));
            }
        }
        None
    }

    pub fn total_courses(&self) -> usize {
        self.sources.iter().map(|s| s.courses.len()).sum()
    }
}

fn read_courses(path: &Path) -> Result<Vec<Course>, AppError> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut courses = Vec::new();
    for record in reader.deserialize() {
        let course: Course = record?;
        courses.push(course);
    }
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn course(title: &str, url: &str) -> Course {
        Course {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    fn two_source_catalog() -> CourseCatalog {
        CourseCatalog::from_data(vec![
            (
                "Coursera".to_string(),
                vec![
                    course("AWS Fundamentals", "https://example.com/aws"),
                    course("Python for Everybody", "https://example.com/python"),
                ],
            ),
            (
                "Udemy".to_string(),
                vec![
                    course("Docker Deep Dive", "https://example.com/docker"),
                    course("AWS Certified Architect", "https://example.com/aws2"),
                ],
            ),
        ])
    }

    #[test]
    fn test_primary_source_wins() {
        let catalog = two_source_catalog();
        let (platform, course) = catalog.find_course("aws").unwrap();
        assert_eq!(platform, "Coursera");
        assert_eq!(course.title, "AWS Fundamentals");
    }

    #[test]
    fn test_falls_back_to_secondary_source() {
        let catalog = two_source_catalog();
        let (platform, course) = catalog.find_course("docker").unwrap();
        assert_eq!(platform, "Udemy");
        assert_eq!(course.title, "Docker Deep Dive");
    }

    #[test]
    fn test_no_match_anywhere_returns_none() {
        let catalog = two_source_catalog();
        assert!(catalog.find_course("cobol").is_none());
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let catalog = two_source_catalog();
        assert!(catalog.find_course("PYTHON").is_some());
    }

    #[test]
    fn test_load_reads_csv_and_skips_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "title,url").unwrap();
        writeln!(file, "Kubernetes Basics,https://example.com/k8s").unwrap();

        let sources = vec![
            CatalogSource {
                platform: "Primary".to_string(),
                path: path.clone(),
            },
            CatalogSource {
                platform: "Gone".to_string(),
                path: dir.path().join("missing.csv"),
            },
        ];
        let catalog = CourseCatalog::load(&sources).unwrap();
        assert_eq!(catalog.total_courses(), 1);
        assert!(catalog.find_course("kubernetes").is_some());
        assert!(catalog.find_course("anything-else").is_none());
    }
}
