use async_trait::async_trait;
use log::{ info, warn };
use serde::{ Deserialize, Serialize };

use super::{ ChatProvider, UpstreamError, UpstreamReply };

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

// Every level is optional or defaulted: a structural miss anywhere on
// candidates[0].content.parts[0].text decodes to Empty, never an error.
#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize, Default)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_reply(self) -> UpstreamReply {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);

        match text {
            Some(t) if !t.trim().is_empty() => UpstreamReply::Text(t),
            _ => UpstreamReply::Empty,
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<UpstreamReply, UpstreamError> {
        let payload = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!("GeminiClient::generate() → model={}", self.model);

        let resp = self.http.post(self.endpoint()).json(&payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Gemini returned non-success status {}", status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let decoded: GenerateResponse = serde_json::from_str(&body)?;
        Ok(decoded.into_reply())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> UpstreamReply {
        serde_json::from_str::<GenerateResponse>(body)
            .unwrap()
            .into_reply()
    }

    #[test]
    fn decodes_well_formed_reply() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Use condoms and get tested regularly."}]}}]}"#;
        assert_eq!(
            decode(body),
            UpstreamReply::Text("Use condoms and get tested regularly.".into())
        );
    }

    #[test]
    fn missing_candidates_is_empty() {
        assert_eq!(decode("{}"), UpstreamReply::Empty);
        assert_eq!(decode(r#"{"candidates":[]}"#), UpstreamReply::Empty);
    }

    #[test]
    fn missing_intermediate_keys_are_empty() {
        assert_eq!(decode(r#"{"candidates":[{}]}"#), UpstreamReply::Empty);
        assert_eq!(
            decode(r#"{"candidates":[{"content":{}}]}"#),
            UpstreamReply::Empty
        );
        assert_eq!(
            decode(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#),
            UpstreamReply::Empty
        );
    }

    #[test]
    fn blank_text_is_empty() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        assert_eq!(decode(body), UpstreamReply::Empty);
    }

    #[test]
    fn endpoint_includes_model_and_key() {
        let client = GeminiClient::new(
            "secret".into(),
            DEFAULT_MODEL.into(),
            format!("{}/", DEFAULT_BASE_URL),
        );
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=secret"
        );
    }
}
