//! # Operational Advice Requests
//!
//! Optional second opinion on a computed plan. The plan's figures are
//! written into a plain-language prompt and posted to an OpenAI-compatible
//! chat-completions endpoint.
//!
//! The advice is informational only. It never feeds back into the model, and
//! any failure here (missing key, HTTP error, empty reply) leaves the
//! computed results untouched.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::debug;

use crate::config::AdvisorConfig;
use crate::fuel_curve::Operation;
use crate::params::UnitParameters;
use crate::plan::Plan;

/// Errors from the advice request.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// API key variable unset or empty
    #[error("API key missing: set the {0} environment variable")]
    MissingApiKey(String),

    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reply had no message content
    #[error("advisor returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

/// Plain-language summary of the inputs and results, ending with the request.
pub fn build_prompt(
    params: &UnitParameters,
    plan: &Plan,
    operation: Option<Operation>,
) -> String {
    let mut prompt = String::from("Given the following field operation:\n");
    if let Some(operation) = operation {
        let profile = operation.profile();
        let (low, high) = profile.speed_range_kmh;
        let _ = writeln!(
            prompt,
            "- Operation: {} (recommended {low:.0}-{high:.0} km/h)",
            profile.label
        );
    }
    let _ = writeln!(prompt, "- Field area: {:.2} ha", params.area_ha());
    let _ = writeln!(
        prompt,
        "- Implement width: {:.2} m at {:.0}% field efficiency",
        params.width_m(),
        params.efficiency() * 100.0
    );
    let _ = writeln!(
        prompt,
        "- Fuel price: {:.2} per litre, labor: {:.2} per hour",
        params.fuel_price(),
        params.labor_rate()
    );
    let _ = writeln!(prompt, "- Time budget: {:.2} h", params.time_budget_h());
    let _ = writeln!(
        prompt,
        "- Speed range considered: {:.1}-{:.1} km/h",
        params.speed_min(),
        params.speed_max()
    );
    match &plan.optimum {
        Ok(optimum) => {
            let best = &optimum.result;
            let _ = writeln!(
                prompt,
                "- Cheapest speed meeting the budget: {:.1} km/h, covering {:.2} ha/h",
                best.speed, best.coverage_rate_ha_per_h
            );
            let _ = writeln!(
                prompt,
                "- At that speed: {:.2} h for one tractor, {:.2} l fuel ({:.2} l/ha), \
                 total cost {:.2}",
                best.time_to_complete_h, best.fuel_consumed_l, best.fuel_per_ha_l, best.total_cost
            );
        }
        Err(error) => {
            let _ = writeln!(prompt, "- One tractor cannot meet the budget: {error}");
        }
    }
    if let Some(custom) = &plan.at_speed {
        let _ = writeln!(
            prompt,
            "- Requested speed {:.1} km/h needs {} tractor(s) and costs {:.2}",
            custom.speed, custom.tractors_required, custom.total_cost
        );
    }
    prompt.push_str("Suggest an optimized operational plan.");
    prompt
}

/// Read the API key from the environment variable named in `config`.
pub fn api_key_from_env(config: &AdvisorConfig) -> Result<String, AdvisorError> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AdvisorError::MissingApiKey(config.api_key_env.clone())),
    }
}

fn extract_content(response: ChatResponse) -> Result<String, AdvisorError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AdvisorError::EmptyResponse)
}

/// Post `prompt` to the configured endpoint and return the reply text.
pub async fn request_advice(
    client: &reqwest::Client,
    config: &AdvisorConfig,
    api_key: &str,
    prompt: &str,
) -> Result<String, AdvisorError> {
    let body = ChatRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: config.temperature,
    };

    debug!(endpoint = %config.endpoint, model = %config.model, "requesting advice");
    let response = client
        .post(&config.endpoint)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json::<ChatResponse>()
        .await?;

    extract_content(response)
}
