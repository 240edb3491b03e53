//! Analysis orchestration across remote and local backends
//!
//! One analysis request walks a fixed pipeline: probe the remote service,
//! try the advanced endpoint, then the standard endpoint, then the local
//! extract/analyze/score fallback. Each stage either fully produces the
//! result or is discarded; a stage is never retried. Callers always receive
//! the same `AnalysisOutcome` shape regardless of which stage served them.

use crate::config::Config;
use crate::error::Result;
use crate::input::text_extractor::TextExtractor;
use crate::processing::entities::{EntityExtractor, ResumeProfile};
use crate::processing::scorer::{JobPosting, MatchResult, MatchScorer};
use crate::remote::connector::{RemoteAnalysis, RemoteAnalyzer};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

/// A job reference supplied by the caller: either an already-resolved posting
/// or an identifier to look up through the Jobs collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum JobRef {
    Resolved(JobPosting),
    ById(String),
}

/// Read-only boundary to the platform's job postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_job_by_id(&self, id: &str) -> Result<Option<JobPosting>>;
}

/// Uniform analysis envelope returned to callers from every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub success: bool,
    pub using_remote_service: bool,
    /// True when no backend served the request and the analysis payload is a
    /// fabricated placeholder. Callers may refuse degraded data.
    pub degraded: bool,
    pub text_preview: String,
    pub profile: Option<ResumeProfile>,
    pub match_result: Option<MatchResult>,
    /// The remote backend's payload, passed through as-is
    pub remote_analysis: Option<Value>,
    pub error: Option<String>,
}

impl AnalysisOutcome {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            using_remote_service: false,
            degraded: false,
            text_preview: String::new(),
            profile: None,
            match_result: None,
            remote_analysis: None,
            error: Some(error),
        }
    }
}

/// Pipeline stages, attempted strictly in this order within one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnalysisStage {
    ProbeRemote,
    RemoteAdvanced,
    RemoteStandard,
    LocalFallback,
    Done,
}

pub struct AnalysisOrchestrator {
    extractor: TextExtractor,
    entities: EntityExtractor,
    scorer: MatchScorer,
    remote: Arc<dyn RemoteAnalyzer>,
    jobs: Arc<dyn JobStore>,
    preview_length: usize,
}

impl AnalysisOrchestrator {
    pub fn new(
        config: &Config,
        remote: Arc<dyn RemoteAnalyzer>,
        jobs: Arc<dyn JobStore>,
    ) -> Result<Self> {
        Ok(Self {
            extractor: TextExtractor::new(),
            entities: EntityExtractor::with_min_length(config.analysis.min_text_length)?,
            scorer: MatchScorer::with_weights(config.scoring.clone())?,
            remote,
            jobs,
            preview_length: config.analysis.preview_length,
        })
    }

    /// Analyze a stored resume file, optionally against a job posting.
    pub async fn analyze(&self, resume: &Path, job: Option<JobRef>) -> AnalysisOutcome {
        let job = match job {
            Some(JobRef::Resolved(job)) => Some(job),
            Some(JobRef::ById(id)) => match self.jobs.find_job_by_id(&id).await {
                Ok(Some(job)) => Some(job),
                Ok(None) => return AnalysisOutcome::failure("Job not found".to_string()),
                Err(e) => {
                    warn!("Job lookup failed for {}: {}", id, e);
                    return AnalysisOutcome::failure("Job not found".to_string());
                }
            },
            None => None,
        };

        let mut advanced_available = false;
        let mut standard_available = false;
        let mut outcome = None;

        let mut stage = AnalysisStage::ProbeRemote;
        loop {
            stage = match stage {
                AnalysisStage::ProbeRemote => {
                    // Probes are independent per endpoint
                    advanced_available = self.remote.probe_advanced().await;
                    standard_available = self.remote.probe_standard().await;
                    if advanced_available || standard_available {
                        AnalysisStage::RemoteAdvanced
                    } else {
                        info!("No remote analysis endpoints available, using local analysis");
                        AnalysisStage::LocalFallback
                    }
                }
                AnalysisStage::RemoteAdvanced => {
                    if advanced_available {
                        match self.remote.analyze_advanced(resume, job.as_ref()).await {
                            Ok(analysis) => {
                                info!("Advanced remote analysis succeeded");
                                outcome = Some(self.remote_outcome(resume, analysis).await);
                                AnalysisStage::Done
                            }
                            Err(e) => {
                                warn!("Advanced analysis failed, falling back to standard: {}", e);
                                AnalysisStage::RemoteStandard
                            }
                        }
                    } else {
                        AnalysisStage::RemoteStandard
                    }
                }
                AnalysisStage::RemoteStandard => {
                    if standard_available {
                        match self.remote.analyze_standard(resume, job.as_ref()).await {
                            Ok(analysis) => {
                                info!("Standard remote analysis succeeded");
                                outcome = Some(self.remote_outcome(resume, analysis).await);
                                AnalysisStage::Done
                            }
                            Err(e) => {
                                warn!("Standard analysis failed, falling back to local: {}", e);
                                AnalysisStage::LocalFallback
                            }
                        }
                    } else {
                        AnalysisStage::LocalFallback
                    }
                }
                AnalysisStage::LocalFallback => {
                    outcome = Some(self.local_outcome(resume, job.as_ref()).await);
                    AnalysisStage::Done
                }
                AnalysisStage::Done => break,
            };
        }

        outcome.unwrap_or_else(|| {
            AnalysisOutcome::failure("Analysis pipeline produced no result".to_string())
        })
    }

    /// Analyze purely by application identifier. This path only ever talks to
    /// the remote analyzers; with none available it returns a clearly-labeled
    /// degraded placeholder instead of failing outright.
    pub async fn analyze_by_application(&self, application_id: &str) -> AnalysisOutcome {
        let available = self.remote.probe_advanced().await || self.remote.probe_standard().await;

        if available {
            match self.remote.analyze_by_application(application_id).await {
                Ok(analysis) => {
                    return AnalysisOutcome {
                        success: true,
                        using_remote_service: true,
                        degraded: false,
                        text_preview: String::new(),
                        profile: None,
                        match_result: None,
                        remote_analysis: Some(analysis),
                        error: None,
                    };
                }
                Err(e) => {
                    warn!("Remote analysis failed for application {}: {}", application_id, e);
                }
            }
        }

        info!(
            "Remote service unavailable, returning degraded placeholder for application {}",
            application_id
        );
        AnalysisOutcome {
            success: true,
            using_remote_service: false,
            degraded: true,
            text_preview: String::new(),
            profile: None,
            match_result: None,
            remote_analysis: Some(placeholder_analysis()),
            error: None,
        }
    }

    /// Wrap a remote payload, adding the locally extracted preview and profile
    /// for comparison, as callers of the platform have always received.
    async fn remote_outcome(&self, resume: &Path, analysis: RemoteAnalysis) -> AnalysisOutcome {
        let extracted = self.extractor.extract(resume).await;
        let text_preview = if extracted.success {
            preview(&extracted.text, self.preview_length)
        } else {
            "Text preview not available".to_string()
        };
        let profile = if extracted.success {
            self.entities.analyze(&extracted.text).ok()
        } else {
            None
        };

        AnalysisOutcome {
            success: true,
            using_remote_service: true,
            degraded: false,
            text_preview,
            profile,
            match_result: analysis.job_match(),
            remote_analysis: Some(analysis.as_value()),
            error: None,
        }
    }

    async fn local_outcome(&self, resume: &Path, job: Option<&JobPosting>) -> AnalysisOutcome {
        let extracted = self.extractor.extract(resume).await;
        if !extracted.success {
            return AnalysisOutcome::failure(
                extracted
                    .error
                    .unwrap_or_else(|| "Failed to read resume file".to_string()),
            );
        }

        let profile = match self.entities.analyze(&extracted.text) {
            Ok(profile) => profile,
            Err(e) => return AnalysisOutcome::failure(e.to_string()),
        };

        let match_result: Option<MatchResult> =
            job.map(|job| self.scorer.compare(&extracted.text, job));

        AnalysisOutcome {
            success: true,
            using_remote_service: false,
            degraded: false,
            text_preview: preview(&extracted.text, self.preview_length),
            profile: Some(profile),
            match_result,
            remote_analysis: None,
            error: None,
        }
    }
}

/// First `max_chars` characters of the text, with an ellipsis when truncated
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// The placeholder analysis served when no backend is reachable. Shaped like
/// a real remote payload but always accompanied by `degraded = true`.
fn placeholder_analysis() -> Value {
    json!({
        "matchScore": 72,
        "skillsMatched": ["javascript", "react", "html", "css"],
        "missingSkills": ["typescript", "vue"],
        "experienceYears": 2,
        "education": ["Bachelor in Computer Science"],
        "semanticMatchScore": 68,
        "strengths": ["Frontend development experience", "Good communication skills"],
        "weaknesses": ["Limited backend experience"],
        "analysis": "Candidate has relevant frontend skills with some limitations in backend technologies.",
        "recommendation": "Consider for interview - potential good fit"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("0123456789abc", 10), "0123456789...");
        // multibyte text must not panic
        assert_eq!(preview("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_failure_outcome_shape() {
        let outcome = AnalysisOutcome::failure("Job not found".to_string());
        assert!(!outcome.success);
        assert!(!outcome.using_remote_service);
        assert!(!outcome.degraded);
        assert_eq!(outcome.error.as_deref(), Some("Job not found"));
        assert!(outcome.profile.is_none());
        assert!(outcome.match_result.is_none());
    }

    #[test]
    fn test_placeholder_analysis_is_plausible() {
        let value = placeholder_analysis();
        assert_eq!(value["matchScore"], 72);
        assert!(value["skillsMatched"].is_array());
    }
}
