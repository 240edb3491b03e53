//! Weighted resume/job match scoring
//!
//! Four independent factors share a 100 point budget: job title words,
//! declared job skills, unique description words, and unique requirements
//! words. Each factor is the fraction of its terms found as whole words in the
//! resume text, multiplied by its weight. A factor with nothing to match
//! contributes zero rather than failing.

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::entities::EntityExtractor;
use crate::processing::lexicon::contains_whole_word_lower;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Read-only projection of a job posting owned by the Jobs collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Serialized with the labels the platform's consumers already display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchClassification {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Average Match")]
    Average,
    #[serde(rename = "Below Average Match")]
    BelowAverage,
    #[serde(rename = "Poor Match")]
    Poor,
}

impl MatchClassification {
    /// Inclusive lower bounds: 85, 70, 50, 30
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=100 => MatchClassification::Excellent,
            70..=84 => MatchClassification::Good,
            50..=69 => MatchClassification::Average,
            30..=49 => MatchClassification::BelowAverage,
            _ => MatchClassification::Poor,
        }
    }
}

impl fmt::Display for MatchClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchClassification::Excellent => "Excellent Match",
            MatchClassification::Good => "Good Match",
            MatchClassification::Average => "Average Match",
            MatchClassification::BelowAverage => "Below Average Match",
            MatchClassification::Poor => "Poor Match",
        };
        write!(f, "{}", label)
    }
}

/// Per-factor sub-scores, each normalized to 0-100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub title_match: u8,
    pub skills_match: u8,
    pub description_match: u8,
    pub requirements_match: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u8,
    pub classification: MatchClassification,
    pub breakdown: MatchBreakdown,
    /// Job skills found in the resume, in the job's skill-list order
    pub matched_skills: Vec<String>,
    /// Job skills absent from the resume, in the job's skill-list order
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
}

pub struct MatchScorer {
    entities: EntityExtractor,
    weights: ScoringConfig,
}

impl MatchScorer {
    pub fn new() -> Result<Self> {
        Self::with_weights(ScoringConfig::default())
    }

    pub fn with_weights(weights: ScoringConfig) -> Result<Self> {
        Ok(Self {
            entities: EntityExtractor::new()?,
            weights,
        })
    }

    /// Compare resume text against a job posting. Pure and deterministic:
    /// identical inputs always produce identical results.
    pub fn compare(&self, resume_text: &str, job: &JobPosting) -> MatchResult {
        let resume_lower = resume_text.to_lowercase();

        // Factor 1: job title words longer than 3 characters
        let title_words: Vec<String> = job
            .title
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .map(|w| w.to_string())
            .collect();
        let title_fraction = fraction_found(&resume_lower, &title_words);

        // Factor 2: declared job skills
        let matched_skills: Vec<String> = job
            .skills
            .iter()
            .filter(|s| contains_whole_word_lower(&resume_lower, &s.to_lowercase()))
            .cloned()
            .collect();
        let missing_skills: Vec<String> = job
            .skills
            .iter()
            .filter(|s| !contains_whole_word_lower(&resume_lower, &s.to_lowercase()))
            .cloned()
            .collect();
        let skills_fraction = if job.skills.is_empty() {
            0.0
        } else {
            matched_skills.len() as f64 / job.skills.len() as f64
        };

        // Factors 3 and 4: unique description / requirements words
        let description_words = unique_words(&job.description);
        let description_fraction = fraction_found(&resume_lower, &description_words);

        let requirements_words = unique_words(&job.requirements);
        let requirements_fraction = fraction_found(&resume_lower, &requirements_words);

        let title_points = title_fraction * self.weights.title_weight;
        let skills_points = skills_fraction * self.weights.skills_weight;
        let description_points = description_fraction * self.weights.description_weight;
        let requirements_points = requirements_fraction * self.weights.requirements_weight;

        let overall_score =
            (title_points + skills_points + description_points + requirements_points).round()
                as u8;

        let breakdown = MatchBreakdown {
            title_match: (title_fraction * 100.0).round() as u8,
            skills_match: (skills_fraction * 100.0).round() as u8,
            description_match: (description_fraction * 100.0).round() as u8,
            requirements_match: (requirements_fraction * 100.0).round() as u8,
        };

        let recommendations = self.recommendations(
            overall_score,
            &breakdown,
            &missing_skills,
            resume_text,
        );

        MatchResult {
            overall_score,
            classification: MatchClassification::from_score(overall_score),
            breakdown,
            matched_skills,
            missing_skills,
            recommendations,
        }
    }

    /// Recommendation rules fire independently; any subset may apply.
    fn recommendations(
        &self,
        overall_score: u8,
        breakdown: &MatchBreakdown,
        missing_skills: &[String],
        resume_text: &str,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if overall_score < 50 {
            recommendations.push(
                "This resume doesn't appear to match well with the job requirements.".to_string(),
            );
        }

        if !missing_skills.is_empty() {
            recommendations.push(format!(
                "Add the following key skills if applicable: {}",
                missing_skills.join(", ")
            ));
        }

        if breakdown.title_match < 48 {
            recommendations.push(
                "The resume should better highlight experience relevant to the job title."
                    .to_string(),
            );
        }

        if breakdown.requirements_match < 50 {
            recommendations.push(
                "The resume should better address the specific job requirements.".to_string(),
            );
        }

        if self.entities.extract_skills(resume_text).len() < 5 {
            recommendations.push(
                "The resume should list more technical and professional skills.".to_string(),
            );
        }

        recommendations
    }
}

/// Unique words longer than 3 characters, lowercased, in first-seen order
fn unique_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .filter(|w| seen.insert(w.to_string()))
        .map(|w| w.to_string())
        .collect()
}

/// Fraction of `words` present as whole words in the lowercased resume text.
/// An empty word list contributes zero, never a division error.
fn fraction_found(resume_lower: &str, words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let found = words
        .iter()
        .filter(|w| contains_whole_word_lower(resume_lower, w))
        .count();
    found as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> MatchScorer {
        MatchScorer::new().unwrap()
    }

    fn backend_job() -> JobPosting {
        JobPosting {
            id: None,
            title: "Backend Developer".to_string(),
            description: String::new(),
            requirements: String::new(),
            skills: vec!["React".to_string(), "Node.js".to_string(), "Docker".to_string()],
        }
    }

    #[test]
    fn test_reference_scenario() {
        let resume = "5 years of experience with React and Node.js, Bachelor of Computer Science";
        let result = scorer().compare(resume, &backend_job());

        // 2 of 3 skills found
        assert_eq!(result.breakdown.skills_match, 67);
        assert_eq!(result.matched_skills, vec!["React".to_string(), "Node.js".to_string()]);
        assert_eq!(result.missing_skills, vec!["Docker".to_string()]);
        // 2/3 * 40 = 26.67 points, everything else zero
        assert_eq!(result.overall_score, 27);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Docker")));
    }

    #[test]
    fn test_determinism() {
        let resume = "React and Python developer, 3 years of experience";
        let job = backend_job();
        let s = scorer();
        let first = s.compare(resume, &job);
        let second = s.compare(resume, &job);
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_bounds() {
        let s = scorer();
        let full_match = "Backend Developer with React Node.js Docker experience";
        let job = JobPosting {
            title: "Backend Developer".to_string(),
            description: "backend developer react".to_string(),
            requirements: "react docker".to_string(),
            ..backend_job()
        };
        for resume in [full_match, "", "completely unrelated text here"] {
            let result = s.compare(resume, &job);
            assert!(result.overall_score <= 100);
            assert!(result.breakdown.title_match <= 100);
            assert!(result.breakdown.skills_match <= 100);
            assert!(result.breakdown.description_match <= 100);
            assert!(result.breakdown.requirements_match <= 100);
        }
        let perfect = s.compare(full_match, &job);
        assert_eq!(perfect.breakdown.title_match, 100);
        assert_eq!(perfect.breakdown.skills_match, 100);
    }

    #[test]
    fn test_monotonicity_on_added_skill() {
        let s = scorer();
        let job = backend_job();
        let without = s.compare("React and Node.js developer", &job);
        let with = s.compare("React and Node.js developer, Docker too", &job);
        assert!(with.breakdown.skills_match > without.breakdown.skills_match);
        assert!(with.overall_score >= without.overall_score);
        assert!(with.missing_skills.is_empty());
    }

    #[test]
    fn test_empty_skills_contribute_zero() {
        let job = JobPosting {
            title: "Backend Developer".to_string(),
            skills: Vec::new(),
            ..Default::default()
        };
        let result = scorer().compare("backend developer resume", &job);
        assert_eq!(result.breakdown.skills_match, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(MatchClassification::from_score(100), MatchClassification::Excellent);
        assert_eq!(MatchClassification::from_score(85), MatchClassification::Excellent);
        assert_eq!(MatchClassification::from_score(84), MatchClassification::Good);
        assert_eq!(MatchClassification::from_score(70), MatchClassification::Good);
        assert_eq!(MatchClassification::from_score(69), MatchClassification::Average);
        assert_eq!(MatchClassification::from_score(50), MatchClassification::Average);
        assert_eq!(MatchClassification::from_score(49), MatchClassification::BelowAverage);
        assert_eq!(MatchClassification::from_score(30), MatchClassification::BelowAverage);
        assert_eq!(MatchClassification::from_score(29), MatchClassification::Poor);
        assert_eq!(MatchClassification::from_score(0), MatchClassification::Poor);
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(MatchClassification::Excellent.to_string(), "Excellent Match");
        assert_eq!(MatchClassification::BelowAverage.to_string(), "Below Average Match");
    }

    #[test]
    fn test_title_words_shorter_than_four_chars_ignored() {
        let job = JobPosting {
            title: "VP of Engineering".to_string(),
            skills: Vec::new(),
            ..Default::default()
        };
        // only "engineering" counts; "VP" and "of" are too short
        let result = scorer().compare("Engineering leader for a decade", &job);
        assert_eq!(result.breakdown.title_match, 100);
    }

    #[test]
    fn test_recommendations_accumulate_independently() {
        let job = JobPosting {
            title: "Backend Developer".to_string(),
            requirements: "kubernetes helm observability".to_string(),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let result = scorer().compare("short unrelated resume", &job);
        // all five rules fire: low overall, missing skills, weak title,
        // weak requirements, fewer than five resume skills
        assert_eq!(result.recommendations.len(), 5);
    }

    #[test]
    fn test_rich_resume_triggers_no_skill_count_recommendation() {
        let resume = "Backend Developer with React, Node.js and Docker. \
                      Python, AWS, Kubernetes, PostgreSQL and Git daily.";
        let result = scorer().compare(resume, &backend_job());
        assert!(!result
            .recommendations
            .iter()
            .any(|r| r.contains("list more technical")));
    }
}
