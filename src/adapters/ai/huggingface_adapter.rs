//! Hugging Face inference adapter.
//!
//! Speaks the hosted inference API (and compatible self-hosted endpoints):
//! summarization, zero-shot multi-label classification and speech recognition.
//! One `reqwest::Client` with a bounded timeout is shared by all three ports.

use crate::domain::{ConcernLabel, ConcernScore, DomainError};
use crate::ports::{ClassifierPort, SummarizerPort, SummaryParams, TranscriberPort};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Model ids served under the configured API base URL.
#[derive(Debug, Clone)]
pub struct HfModels {
    pub summarizer: String,
    pub classifier: String,
    pub transcriber: String,
}

/// Hugging Face inference adapter.
pub struct HuggingFaceAdapter {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
    models: HfModels,
}

impl HuggingFaceAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Base URL; model ids are appended
    /// * `api_token` - Bearer token; `None` for unauthenticated local endpoints
    /// * `models` - Model id per capability
    /// * `timeout` - Upper bound for each request
    pub fn new(
        api_url: String,
        api_token: Option<String>,
        models: HfModels,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            models,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.api_url, model)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Send a prepared request and decode the JSON body. `wrap` picks the error variant.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        wrap: fn(String) -> DomainError,
    ) -> Result<T, DomainError> {
        let response = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| wrap(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "inference API returned error");
            return Err(wrap(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| wrap(format!("Failed to parse API response: {}", e)))
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    parameters: P,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

const WAIT: InferenceOptions = InferenceOptions {
    wait_for_model: true,
};

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: Vec<&'a str>,
    multi_label: bool,
}

/// Scores every label independently; the labels do not compete for one distribution.
fn zero_shot_request<'a>(
    text: &'a str,
    labels: &[ConcernLabel],
) -> InferenceRequest<'a, ZeroShotParameters<'static>> {
    InferenceRequest {
        inputs: text,
        parameters: ZeroShotParameters {
            candidate_labels: ConcernLabel::names(labels),
            multi_label: true,
        },
        options: WAIT,
    }
}

#[derive(Deserialize)]
struct SummaryItem {
    #[serde(alias = "generated_text")]
    summary_text: String,
}

/// Zero-shot output. Older endpoints return parallel arrays, newer ones a list of pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

fn summary_from_items(items: Vec<SummaryItem>) -> Result<String, DomainError> {
    let summary = items
        .into_iter()
        .next()
        .map(|item| item.summary_text.trim().to_string())
        .ok_or_else(|| DomainError::Summarization("No summary returned".to_string()))?;
    if summary.is_empty() {
        return Err(DomainError::Summarization("Empty summary returned".to_string()));
    }
    Ok(summary)
}

/// Map a zero-shot response onto the taxonomy, keeping the response's order.
///
/// Fails if a returned label is outside the taxonomy or a requested label is missing.
fn scores_from_response(
    response: ZeroShotResponse,
    requested: &[ConcernLabel],
) -> Result<Vec<ConcernScore>, DomainError> {
    let pairs: Vec<(String, f64)> = match response {
        ZeroShotResponse::Columns { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(DomainError::Classification(format!(
                    "{} labels but {} scores",
                    labels.len(),
                    scores.len()
                )));
            }
            labels.into_iter().zip(scores).collect()
        }
        ZeroShotResponse::Pairs(items) => items.into_iter().map(|p| (p.label, p.score)).collect(),
    };

    let mut out = Vec::with_capacity(pairs.len());
    for (raw, score) in pairs {
        let label = ConcernLabel::from_label(&raw)
            .ok_or_else(|| DomainError::Classification(format!("Unknown label '{}'", raw)))?;
        out.push(ConcernScore::new(label, score.clamp(0.0, 1.0)));
    }

    if let Some(missing) = requested
        .iter()
        .find(|l| !out.iter().any(|s| s.label == **l))
    {
        return Err(DomainError::Classification(format!(
            "No score returned for '{}'",
            missing
        )));
    }
    Ok(out)
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("m4a") | Some("mp4") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[async_trait::async_trait]
impl SummarizerPort for HuggingFaceAdapter {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, DomainError> {
        info!(
            model = %self.models.summarizer,
            text_len = text.len(),
            "sending transcript for summarization"
        );

        let body = InferenceRequest {
            inputs: text,
            parameters: SummarizationParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: !params.deterministic,
            },
            options: WAIT,
        };
        let req = self
            .client
            .post(self.model_url(&self.models.summarizer))
            .json(&body);
        let items: Vec<SummaryItem> = self.send_json(req, DomainError::Summarization).await?;
        let summary = summary_from_items(items)?;

        info!(summary_len = summary.len(), "summarization complete");
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl ClassifierPort for HuggingFaceAdapter {
    async fn classify(
        &self,
        text: &str,
        labels: &[ConcernLabel],
    ) -> Result<Vec<ConcernScore>, DomainError> {
        info!(
            model = %self.models.classifier,
            text_len = text.len(),
            labels = labels.len(),
            "sending transcript for classification"
        );

        let body = zero_shot_request(text, labels);
        let req = self
            .client
            .post(self.model_url(&self.models.classifier))
            .json(&body);
        let response: ZeroShotResponse = self.send_json(req, DomainError::Classification).await?;
        let scores = scores_from_response(response, labels)?;

        debug!(?scores, "classification scores");
        Ok(scores)
    }
}

#[async_trait::async_trait]
impl TranscriberPort for HuggingFaceAdapter {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, DomainError> {
        let audio = tokio::fs::read(audio_path)
            .await
            .map_err(|e| DomainError::Transcription(format!("Failed to read audio: {}", e)))?;
        info!(
            model = %self.models.transcriber,
            audio_bytes = audio.len(),
            "sending audio for transcription"
        );

        let req = self
            .client
            .post(self.model_url(&self.models.transcriber))
            .header("Content-Type", content_type_for(audio_path))
            .body(audio);
        let response: TranscriptionResponse =
            self.send_json(req, DomainError::Transcription).await?;

        let text = response.text.trim().to_string();
        info!(text_len = text.len(), "transcription complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Path as UrlPath, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn adapter(api_url: String) -> HuggingFaceAdapter {
        HuggingFaceAdapter::new(
            api_url,
            Some("test-token".to_string()),
            HfModels {
                summarizer: "sum".to_string(),
                classifier: "cls".to_string(),
                transcriber: "asr".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Fake inference server: echoes request parameters back where useful.
    async fn spawn_fake_api() -> String {
        async fn handle(
            UrlPath(model): UrlPath<String>,
            body: axum::body::Bytes,
        ) -> (StatusCode, Json<Value>) {
            match model.as_str() {
                "sum" => {
                    let req: Value = serde_json::from_slice(&body).unwrap();
                    let p = &req["parameters"];
                    let summary = format!(
                        " max={} min={} sample={} ",
                        p["max_length"], p["min_length"], p["do_sample"]
                    );
                    (StatusCode::OK, Json(json!([{ "summary_text": summary }])))
                }
                "cls" => {
                    let req: Value = serde_json::from_slice(&body).unwrap();
                    let p = &req["parameters"];
                    // A single-label request would come back as one softmax distribution.
                    if p["multi_label"] != json!(true) {
                        let err = json!({ "error": "multi_label must be true" });
                        return (StatusCode::UNPROCESSABLE_ENTITY, Json(err));
                    }
                    // Scores come back in candidate order, so callers can see what was sent.
                    let labels = p["candidate_labels"].as_array().cloned().unwrap_or_default();
                    let scores: Vec<f64> = labels
                        .iter()
                        .map(|l| match l.as_str() {
                            Some("work stress") => 0.81,
                            Some("self-esteem") => 0.2,
                            _ => 0.05,
                        })
                        .collect();
                    let resp = json!({
                        "sequence": req["inputs"],
                        "labels": labels,
                        "scores": scores
                    });
                    (StatusCode::OK, Json(resp))
                }
                "asr" => (
                    StatusCode::OK,
                    Json(json!({ "text": format!(" {} bytes ", body.len()) })),
                ),
                _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown model" }))),
            }
        }
        let app = Router::new().route("/:model", post(handle));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_scores_keep_response_order() {
        let resp = ZeroShotResponse::Columns {
            labels: vec!["self-esteem".into(), "anxiety".into()],
            scores: vec![0.7, 0.2],
        };
        let scores =
            scores_from_response(resp, &[ConcernLabel::Anxiety, ConcernLabel::SelfEsteem])
                .unwrap();
        assert_eq!(scores[0].label, ConcernLabel::SelfEsteem);
        assert_eq!(scores[1].label, ConcernLabel::Anxiety);
    }

    #[test]
    fn test_scores_pairs_format() {
        let resp: ZeroShotResponse =
            serde_json::from_str(r#"[{"label":"depression","score":0.6}]"#).unwrap();
        let scores = scores_from_response(resp, &[ConcernLabel::Depression]).unwrap();
        assert_eq!(scores, vec![ConcernScore::new(ConcernLabel::Depression, 0.6)]);
    }

    #[test]
    fn test_scores_reject_missing_and_unknown_labels() {
        let resp = ZeroShotResponse::Columns {
            labels: vec!["anxiety".into()],
            scores: vec![0.7],
        };
        let err = scores_from_response(resp, &ConcernLabel::ALL).unwrap_err();
        assert!(matches!(err, DomainError::Classification(_)));

        let resp = ZeroShotResponse::Columns {
            labels: vec!["grief".into()],
            scores: vec![0.7],
        };
        assert!(scores_from_response(resp, &[]).is_err());

        let resp = ZeroShotResponse::Columns {
            labels: vec!["anxiety".into()],
            scores: vec![],
        };
        assert!(scores_from_response(resp, &[]).is_err());
    }

    #[test]
    fn test_empty_summary_is_error() {
        assert!(matches!(
            summary_from_items(vec![]),
            Err(DomainError::Summarization(_))
        ));
        let items = vec![SummaryItem {
            summary_text: "   ".to_string(),
        }];
        assert!(summary_from_items(items).is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a.WAV")), "audio/wav");
        assert_eq!(content_type_for(Path::new("a.m4a")), "audio/mp4");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_roundtrip_against_fake_api() {
        let hf = adapter(spawn_fake_api().await);

        let summary = hf
            .summarize("some text", crate::ports::SESSION_SUMMARY_PARAMS)
            .await
            .unwrap();
        assert_eq!(summary, "max=150 min=30 sample=false");

        let scores = hf.classify("some text", &ConcernLabel::ALL).await.unwrap();
        assert_eq!(scores.len(), 6);
        assert_eq!(scores[3], ConcernScore::new(ConcernLabel::WorkStress, 0.81));

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.wav");
        std::fs::write(&audio, [0u8; 16]).unwrap();
        assert_eq!(hf.transcribe(&audio).await.unwrap(), "16 bytes");
    }

    #[tokio::test]
    async fn test_classify_sends_every_label_as_multi_label() {
        let hf = adapter(spawn_fake_api().await);
        let scores = hf.classify("some text", &ConcernLabel::ALL).await.unwrap();
        let sent: Vec<ConcernLabel> = scores.iter().map(|s| s.label).collect();
        assert_eq!(sent, ConcernLabel::ALL.to_vec());

        let v = serde_json::to_value(zero_shot_request("t", &ConcernLabel::ALL)).unwrap();
        assert_eq!(v["parameters"]["multi_label"], json!(true));
        assert_eq!(
            v["parameters"]["candidate_labels"],
            json!([
                "anxiety",
                "depression",
                "relationships",
                "work stress",
                "family issues",
                "self-esteem"
            ])
        );
    }

    #[tokio::test]
    async fn test_classify_sends_only_requested_labels() {
        let hf = adapter(spawn_fake_api().await);
        let labels = [ConcernLabel::SelfEsteem, ConcernLabel::WorkStress];
        let scores = hf.classify("some text", &labels).await.unwrap();
        assert_eq!(
            scores,
            vec![
                ConcernScore::new(ConcernLabel::SelfEsteem, 0.2),
                ConcernScore::new(ConcernLabel::WorkStress, 0.81),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_maps_to_port_error() {
        let hf = adapter(spawn_fake_api().await);
        let mut models = hf.models.clone();
        models.summarizer = "missing/model".to_string();
        let hf = HuggingFaceAdapter { models, ..hf };
        let err = hf
            .summarize("text", crate::ports::SESSION_SUMMARY_PARAMS)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Summarization(_)));
    }

    #[tokio::test]
    async fn test_missing_audio_is_transcription_error() {
        let hf = adapter("http://127.0.0.1:9".to_string());
        let err = hf
            .transcribe(Path::new("/nonexistent/clip.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Transcription(_)));
    }
}
