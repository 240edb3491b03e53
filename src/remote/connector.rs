//! HTTP connector to the remote AI analysis service
//!
//! The service exposes a standard and an advanced ("ats2025") analysis
//! endpoint plus a health endpoint. Availability is probed per endpoint with a
//! short timeout; submissions are multipart uploads of the resume binary with
//! a JSON job context. Responses are structurally validated before being
//! trusted; a response that fails validation counts as a transport failure.

use crate::config::RemoteConfig;
use crate::error::{Result, ScreenerError};
use crate::processing::scorer::{JobPosting, MatchResult};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Job context blob sent alongside the resume upload
#[derive(Debug, Serialize)]
struct JobContext<'a> {
    title: &'a str,
    description: &'a str,
    requirements: &'a str,
    skills: &'a [String],
}

impl<'a> From<&'a JobPosting> for JobContext<'a> {
    fn from(job: &'a JobPosting) -> Self {
        Self {
            title: &job.title,
            description: &job.description,
            requirements: &job.requirements,
            skills: &job.skills,
        }
    }
}

/// A structurally validated analysis payload from the remote service. The
/// exact schema is backend-defined; only `success` is required here, the rest
/// rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAnalysis {
    pub success: bool,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

impl RemoteAnalysis {
    /// The job match section of the payload, if present and shaped like ours
    pub fn job_match(&self) -> Option<MatchResult> {
        self.payload
            .get("jobMatch")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn as_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Boundary to the remote analysis backend. The orchestrator only sees this
/// trait, which keeps the fallback state machine testable without a network.
#[async_trait]
pub trait RemoteAnalyzer: Send + Sync {
    async fn probe_advanced(&self) -> bool;
    async fn probe_standard(&self) -> bool;
    async fn analyze_advanced(
        &self,
        resume: &Path,
        job: Option<&JobPosting>,
    ) -> Result<RemoteAnalysis>;
    async fn analyze_standard(
        &self,
        resume: &Path,
        job: Option<&JobPosting>,
    ) -> Result<RemoteAnalysis>;
    async fn analyze_by_application(&self, application_id: &str) -> Result<Value>;
}

pub struct AiServiceConnector {
    client: Client,
    config: RemoteConfig,
}

impl AiServiceConnector {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ScreenerError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        info!("AI service connector initialized with URL: {}", config.base_url);
        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Lightweight per-endpoint existence check. The health endpoint answers
    /// GET; analysis endpoints are probed with OPTIONS. Anything that is not a
    /// 200/204 within the probe timeout counts as unavailable.
    async fn endpoint_available(&self, endpoint: &str) -> bool {
        let method = if endpoint == self.config.health_endpoint {
            Method::GET
        } else {
            Method::OPTIONS
        };

        let result = self
            .client
            .request(method, self.url(endpoint))
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .send()
            .await;

        match result {
            Ok(resp) => {
                let available =
                    resp.status() == StatusCode::OK || resp.status() == StatusCode::NO_CONTENT;
                debug!("Probe {}: status {}", endpoint, resp.status());
                available
            }
            Err(e) => {
                warn!("Endpoint {} not available: {}", endpoint, e);
                false
            }
        }
    }

    async fn submit(
        &self,
        endpoint: &str,
        timeout_secs: u64,
        resume: &Path,
        job: Option<&JobPosting>,
        comprehensive: bool,
    ) -> Result<RemoteAnalysis> {
        let filename = resume
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume".to_string());
        let bytes = tokio::fs::read(resume)
            .await
            .map_err(|e| ScreenerError::InvalidInput(format!("File not found: {}", e)))?;

        let mut form = Form::new().part("resume", Part::bytes(bytes).file_name(filename));
        if let Some(job) = job {
            form = form.text("job_data", serde_json::to_string(&JobContext::from(job))?);
        }
        if comprehensive {
            form = form.text("analysis_level", "comprehensive");
        }

        let response = self
            .client
            .post(self.url(endpoint))
            .timeout(Duration::from_secs(timeout_secs))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScreenerError::Remote(format!(
                "Analysis endpoint {} returned status {}",
                endpoint,
                response.status()
            )));
        }

        let analysis: RemoteAnalysis = response
            .json()
            .await
            .map_err(|e| ScreenerError::Remote(format!("Malformed analysis response: {}", e)))?;

        if !analysis.success {
            return Err(ScreenerError::Remote(format!(
                "Analysis endpoint {} reported failure",
                endpoint
            )));
        }

        Ok(analysis)
    }
}

#[async_trait]
impl RemoteAnalyzer for AiServiceConnector {
    async fn probe_advanced(&self) -> bool {
        self.endpoint_available(&self.config.advanced_endpoint)
            .await
    }

    async fn probe_standard(&self) -> bool {
        self.endpoint_available(&self.config.standard_endpoint)
            .await
    }

    async fn analyze_advanced(
        &self,
        resume: &Path,
        job: Option<&JobPosting>,
    ) -> Result<RemoteAnalysis> {
        info!("Submitting resume to advanced analysis endpoint");
        self.submit(
            &self.config.advanced_endpoint,
            self.config.advanced_timeout_secs,
            resume,
            job,
            true,
        )
        .await
    }

    async fn analyze_standard(
        &self,
        resume: &Path,
        job: Option<&JobPosting>,
    ) -> Result<RemoteAnalysis> {
        info!("Submitting resume to standard analysis endpoint");
        self.submit(
            &self.config.standard_endpoint,
            self.config.standard_timeout_secs,
            resume,
            job,
            false,
        )
        .await
    }

    async fn analyze_by_application(&self, application_id: &str) -> Result<Value> {
        info!("Requesting analysis for application {}", application_id);
        let url = format!(
            "{}/{}",
            self.url(&self.config.standard_endpoint),
            application_id
        );

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.standard_timeout_secs))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScreenerError::Remote(format!(
                "Application analysis returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ScreenerError::Remote(format!("Malformed analysis response: {}", e)))?;

        // The service wraps the analysis in a data envelope
        body.get("data")
            .cloned()
            .ok_or_else(|| ScreenerError::Remote("Analysis response missing data field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config_for(base_url: String) -> RemoteConfig {
        RemoteConfig {
            base_url,
            health_endpoint: "/api/health".to_string(),
            standard_endpoint: "/api/ats/analyze-resume".to_string(),
            advanced_endpoint: "/api/ats2025/analyze-resume".to_string(),
            probe_timeout_secs: 2,
            standard_timeout_secs: 5,
            advanced_timeout_secs: 5,
        }
    }

    /// One-shot server answering every request with the given status line
    async fn canned_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!("{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_probe_refused_connection_is_unavailable() {
        // bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let connector = AiServiceConnector::new(config_for(format!("http://{}", addr))).unwrap();
        assert!(!connector.probe_advanced().await);
        assert!(!connector.probe_standard().await);
    }

    #[tokio::test]
    async fn test_probe_accepts_200_and_204() {
        let base = canned_server("HTTP/1.1 204 No Content").await;
        let connector = AiServiceConnector::new(config_for(base)).unwrap();
        assert!(connector.probe_standard().await);

        let base = canned_server("HTTP/1.1 200 OK").await;
        let connector = AiServiceConnector::new(config_for(base)).unwrap();
        assert!(connector.probe_advanced().await);
    }

    #[tokio::test]
    async fn test_probe_rejects_server_errors() {
        let base = canned_server("HTTP/1.1 500 Internal Server Error").await;
        let connector = AiServiceConnector::new(config_for(base)).unwrap();
        assert!(!connector.probe_standard().await);
    }

    #[test]
    fn test_remote_analysis_validation_requires_success_field() {
        let missing: std::result::Result<RemoteAnalysis, _> =
            serde_json::from_str(r#"{"matchScore": 80}"#);
        assert!(missing.is_err());

        let ok: RemoteAnalysis =
            serde_json::from_str(r#"{"success": true, "matchScore": 80}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.payload.get("matchScore"), Some(&serde_json::json!(80)));
    }

    #[test]
    fn test_job_match_extraction_from_payload() {
        let analysis: RemoteAnalysis = serde_json::from_str(
            r#"{
                "success": true,
                "jobMatch": {
                    "overallScore": 72,
                    "classification": "Good Match",
                    "breakdown": {
                        "titleMatch": 50,
                        "skillsMatch": 80,
                        "descriptionMatch": 60,
                        "requirementsMatch": 70
                    },
                    "matchedSkills": ["react"],
                    "missingSkills": ["vue"],
                    "recommendations": []
                }
            }"#,
        )
        .unwrap();

        let job_match = analysis.job_match().unwrap();
        assert_eq!(job_match.overall_score, 72);
        assert_eq!(job_match.missing_skills, vec!["vue".to_string()]);
    }
}
