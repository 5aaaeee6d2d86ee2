use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::fields::Field;
use crate::http_client::http_client;
use crate::validation::FormValues;

pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch prediction from API";

/// Everything that can end a submission without a prediction. The panel
/// shows the `Display` text regardless of variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    ServerRejection(String),
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "xG")]
    pub xg: f64,
    #[serde(rename = "xGA")]
    pub xga: f64,
    #[serde(rename = "Poss")]
    pub possession: f64,
    #[serde(rename = "xA")]
    pub xa: f64,
    #[serde(rename = "KP")]
    pub key_passes: i64,
    #[serde(rename = "PPA")]
    pub passes_penalty_area: i64,
    #[serde(rename = "PrgP")]
    pub progressive_passes: i64,
}

impl PredictionRequest {
    /// Builds the body from validated values. A missing or invalid field is a
    /// bug upstream, so it surfaces as `Unexpected`.
    pub fn from_values(values: &FormValues) -> Result<Self, SubmitError> {
        let num = |field: Field| {
            values
                .number(field)
                .ok_or_else(|| SubmitError::Unexpected(format!("Missing value for {field}")))
        };
        Ok(Self {
            xg: num(Field::ExpectedGoals)?,
            xga: num(Field::ExpectedGoalsAgainst)?,
            possession: num(Field::Possession)?,
            xa: num(Field::ExpectedAssists)?,
            key_passes: num(Field::KeyPasses)? as i64,
            passes_penalty_area: num(Field::PassesPenaltyArea)? as i64,
            progressive_passes: num(Field::ProgressivePasses)? as i64,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionResult {
    pub prediction: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
}

// Some model servers send confidence as "87" rather than 87.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST. The worker owns exactly one of these.
pub trait PredictionTransport: Send {
    fn post_json(&self, url: &str, body: &str) -> Result<TransportResponse>;
}

pub struct HttpTransport {
    client: &'static Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }
}

impl PredictionTransport for HttpTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<TransportResponse> {
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.to_string())
            .send()
            .context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(TransportResponse { status, body })
    }
}

/// One round-trip: serialize, POST, classify.
pub fn request_prediction(
    transport: &dyn PredictionTransport,
    url: &str,
    request: &PredictionRequest,
) -> Result<PredictionResult, SubmitError> {
    let body =
        serde_json::to_string(request).map_err(|err| SubmitError::Unexpected(err.to_string()))?;
    let resp = transport
        .post_json(url, &body)
        .map_err(|err| SubmitError::Network(format!("{err:#}")))?;
    classify_response(&resp)
}

pub fn classify_response(resp: &TransportResponse) -> Result<PredictionResult, SubmitError> {
    if !resp.is_success() {
        return Err(SubmitError::ServerRejection(parse_error_message(&resp.body)));
    }
    parse_prediction_json(&resp.body).map_err(|err| SubmitError::Unexpected(format!("{err:#}")))
}

pub fn parse_prediction_json(raw: &str) -> Result<PredictionResult> {
    serde_json::from_str::<PredictionResult>(raw).context("invalid prediction response")
}

/// Pulls `error` out of a rejection body, falling back to a generic message
/// when it is missing, empty or the body is not JSON.
pub fn parse_error_message(raw: &str) -> String {
    let Ok(body) = serde_json::from_str::<ErrorBody>(raw) else {
        return FALLBACK_ERROR_MESSAGE.to_string();
    };
    match body.error {
        Some(Value::String(msg)) if !msg.trim().is_empty() => msg,
        Some(Value::Number(n)) => n.to_string(),
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}
