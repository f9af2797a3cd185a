use crate::config::{DEFAULT_GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::error::GatewayError;
use crate::utils::retry::RetryPolicy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROVIDER: &str = "Gemini API";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Search grounding directive
#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(
            api_key,
            DEFAULT_GEMINI_API_BASE_URL,
            DEFAULT_GEMINI_MODEL,
            RetryPolicy::default(),
            reqwest::Client::new(),
        )
    }

    pub fn with_client(
        api_key: String,
        base_url: &str,
        model: &str,
        retry: RetryPolicy,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            retry,
            client,
        }
    }

    /// Send the prompt and decode the JSON object embedded in the reply.
    /// A bad status, a missing text part and an undecodable object all count as
    /// a failed attempt and are retried.
    pub async fn generate_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, GatewayError> {
        self.retry
            .run(|| async move {
                let text = self.generate_text(prompt).await?;
                parse_embedded_json(&text)
            })
            .await
            .map_err(|e| GatewayError::RetriesExhausted {
                attempts: e.attempts,
                last: Box::new(e.last),
            })
    }

    /// One generateContent call, returning the first candidate's text
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };
        debug!("Requesting generateContent from {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status {
                provider: PROVIDER,
                status: response.status(),
            });
        }

        let envelope: GenerateResponse = serde_json::from_str(&response.text().await?)?;
        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| GatewayError::MalformedPayload("response has no candidate text".into()))
    }
}

/// The span from the first `{` to the last `}`, if there is one
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

pub fn parse_embedded_json<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let object = extract_json_object(text)
        .ok_or_else(|| GatewayError::MalformedPayload("no JSON object in model reply".into()))?;
    Ok(serde_json::from_str(object)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Score {
        gravity_score: f64,
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(
            extract_json_object("Sure! ```json\n{\"a\": {\"b\": 1}}\n``` hope that helps"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_embedded_json_errors() {
        let err = parse_embedded_json::<Score>("nothing").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedPayload(_)));

        let err = parse_embedded_json::<Score>("{\"other\": 1}").unwrap_err();
        assert!(matches!(err, GatewayError::Json(_)));

        let score: Score = parse_embedded_json("Result: {\"gravity_score\": 71}").unwrap();
        assert_eq!(score.gravity_score, 71.0);
    }

    fn envelope(text: &str) -> Value {
        serde_json::json!({
            "candidates": [ { "content": { "parts": [ { "text": text } ] } } ]
        })
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, max_retries: u32) -> GeminiClient {
        GeminiClient::with_client(
            "key".into(),
            base_url,
            "test-model",
            RetryPolicy::new(max_retries, Duration::from_millis(1)),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn test_request_shape_and_reply() {
        let app = Router::new().route(
            "/models/*action",
            post(|Json(body): Json<Value>| async move {
                assert!(body["tools"][0]["google_search"].is_object());
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
                assert_eq!(prompt, "rate it");
                Json(envelope("Here you go: {\"gravity_score\": 64}"))
            }),
        );
        let base_url = spawn(app).await;

        let score: Score = client(&base_url, 0).generate_json("rate it").await.unwrap();
        assert_eq!(score, Score { gravity_score: 64.0 });
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route(
                "/models/*action",
                post(|State(calls): State<Arc<AtomicU32>>| async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StatusCode::SERVICE_UNAVAILABLE)
                    } else {
                        Ok(Json(envelope("{\"gravity_score\": 55}")))
                    }
                }),
            )
            .with_state(calls.clone());
        let base_url = spawn(app).await;

        let score: Score = client(&base_url, 5).generate_json("p").await.unwrap();
        assert_eq!(score.gravity_score, 55.0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_reply_exhausts_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route(
                "/models/*action",
                post(|State(calls): State<Arc<AtomicU32>>| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Json(envelope("I cannot help with that."))
                }),
            )
            .with_state(calls.clone());
        let base_url = spawn(app).await;

        let err = client(&base_url, 2)
            .generate_json::<Score>("p")
            .await
            .unwrap_err();
        match err {
            GatewayError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, GatewayError::MalformedPayload(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
