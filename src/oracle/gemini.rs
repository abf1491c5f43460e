use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use crate::config::OracleConfig;
use crate::oracle::json_extract::extract_json_object;
use crate::oracle::prompts;
use crate::oracle::types::{
    Assessment, Contact, CourseCategory, CourseRecommendation, LinkPurpose, OracleError,
};
use crate::oracle::JudgmentOracle;
use async_trait::async_trait;

/// LLM-backed judgment oracle speaking the Gemini generateContent API.
pub struct GeminiOracle {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    call_delay_ms: u64,
    evidence_char_limit: usize,
    email_regex: Regex,
    max_selected_links: usize,
}

impl GeminiOracle {
    pub fn new(config: &OracleConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.clone(),
            api_key,
            model: config.model.clone(),
            call_delay_ms: config.call_delay_ms,
            evidence_char_limit: config.evidence_char_limit,
            email_regex: Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
                .expect("invalid email regex"),
            max_selected_links: 8,
        }
    }

    pub fn with_max_selected_links(mut self, max: usize) -> Self {
        self.max_selected_links = max;
        self
    }

    /// Sends one prompt and returns the first candidate's text.
    async fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        // Polite spacing between successive LLM calls
        if self.call_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.call_delay_ms)).await;
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(OracleError::Transport(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| OracleError::MalformedReply("no candidates in reply".to_string()))?;

        debug!("Oracle replied with {} chars", text.len());
        Ok(text)
    }

    fn truncate_evidence<'a>(&self, evidence: &'a str) -> &'a str {
        if evidence.len() <= self.evidence_char_limit {
            return evidence;
        }
        let mut end = self.evidence_char_limit;
        while !evidence.is_char_boundary(end) {
            end -= 1;
        }
        &evidence[..end]
    }

    fn sanitize_contact(&self, raw: ContactReply) -> Option<Contact> {
        let name = raw.name?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let email = raw
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| self.email_regex.is_match(e));
        let phone = raw.phone.map(|p| p.trim().to_string()).filter(|p| {
            // "Not Found" and similar placeholders come back often
            p.chars().filter(|c| c.is_ascii_digit()).count() >= 7
        });
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && !is_placeholder(t));

        Some(Contact {
            name,
            title,
            email,
            phone,
        })
    }
}

fn is_placeholder(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "not found" | "n/a" | "na" | "none" | "null" | "unknown" | ""
    )
}

#[async_trait]
impl JudgmentOracle for GeminiOracle {
    async fn assess(&self, evidence: &str) -> Result<Assessment, OracleError> {
        let prompt = prompts::assessment_prompt(self.truncate_evidence(evidence));
        let reply = self.invoke(&prompt).await?;
        parse_assessment_reply(&reply)
    }

    async fn filter_links(
        &self,
        candidates: &[String],
        domain: &str,
        purpose: &LinkPurpose,
    ) -> Result<Vec<String>, OracleError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = match purpose {
            LinkPurpose::CourseRelevance => {
                prompts::link_filter_prompt(candidates, domain, self.max_selected_links)
            }
            LinkPurpose::ContactDiscovery(course) => {
                prompts::contact_link_prompt(candidates, domain, *course, self.max_selected_links)
            }
        };
        let reply = self.invoke(&prompt).await?;
        let chosen = parse_links_reply(&reply)?;
        let mut selected = ground_in_candidates(candidates, &chosen);
        selected.truncate(self.max_selected_links);
        debug!(
            "Oracle selected {}/{} links for {:?}",
            selected.len(),
            candidates.len(),
            purpose
        );
        Ok(selected)
    }

    async fn extract_contacts(
        &self,
        page_text: &str,
        course: CourseCategory,
    ) -> Result<Vec<Contact>, OracleError> {
        let prompt =
            prompts::contact_extraction_prompt(self.truncate_evidence(page_text), course);
        let reply = self.invoke(&prompt).await?;
        let raw = parse_contacts_reply(&reply)?;
        let contacts: Vec<Contact> = raw
            .into_iter()
            .filter_map(|c| self.sanitize_contact(c))
            .collect();
        Ok(contacts)
    }

    async fn force_assess(&self, evidence: &str) -> Result<CourseRecommendation, OracleError> {
        let prompt = prompts::forced_prompt(self.truncate_evidence(evidence));
        let reply = self.invoke(&prompt).await?;
        parse_forced_reply(&reply)
    }
}

// ---- wire envelope ----

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ---- reply shapes ----

#[derive(Deserialize)]
struct AssessmentReply {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    recommended_course: Option<String>,
    #[serde(default)]
    recommendation_reasoning: Option<String>,
    #[serde(default)]
    recommendation_score: Option<f64>,
}

#[derive(Deserialize)]
struct LinksReply {
    #[serde(default)]
    selected_urls: Vec<String>,
}

#[derive(Deserialize)]
struct ContactsReply {
    #[serde(default)]
    contacts: Vec<ContactReply>,
}

#[derive(Deserialize)]
struct ContactReply {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

fn parse_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T, OracleError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| OracleError::MalformedReply("no JSON object in reply".to_string()))?;
    serde_json::from_str(json).map_err(|e| OracleError::MalformedReply(e.to_string()))
}

fn score_to_confidence(score: Option<f64>) -> Option<u8> {
    score.map(|s| s.clamp(0.0, 100.0).round() as u8)
}

fn parse_assessment_reply(reply: &str) -> Result<Assessment, OracleError> {
    let raw: AssessmentReply = parse_reply(reply)?;
    let course = raw
        .recommended_course
        .as_deref()
        .and_then(CourseCategory::from_label);
    Ok(Assessment {
        ready: raw.ready,
        course,
        reasoning: raw.recommendation_reasoning,
        confidence: score_to_confidence(raw.recommendation_score),
    })
}

fn parse_forced_reply(reply: &str) -> Result<CourseRecommendation, OracleError> {
    let raw: AssessmentReply = parse_reply(reply)?;
    // The forced call must always commit; an unrecognized label falls
    // back to Programming, matching the prompt's own tie-break rule.
    let course = raw
        .recommended_course
        .as_deref()
        .and_then(CourseCategory::from_label)
        .unwrap_or(CourseCategory::Programming);
    Ok(CourseRecommendation {
        course,
        reasoning: raw
            .recommendation_reasoning
            .unwrap_or_else(|| "Limited data available".to_string()),
        confidence: score_to_confidence(raw.recommendation_score).unwrap_or(30),
    })
}

fn parse_links_reply(reply: &str) -> Result<Vec<String>, OracleError> {
    let raw: LinksReply = parse_reply(reply)?;
    Ok(raw.selected_urls)
}

/// Keeps only reply URLs that were actually offered as candidates, in
/// candidate order. The model sometimes invents plausible-looking URLs
/// that were never on the page.
fn ground_in_candidates(candidates: &[String], chosen: &[String]) -> Vec<String> {
    let chosen: HashSet<&str> = chosen.iter().map(String::as_str).collect();
    candidates
        .iter()
        .filter(|c| chosen.contains(c.as_str()))
        .cloned()
        .collect()
}

fn parse_contacts_reply(reply: &str) -> Result<Vec<ContactReply>, OracleError> {
    let raw: ContactsReply = parse_reply(reply)?;
    Ok(raw.contacts)
}
