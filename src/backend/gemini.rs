#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use base64::Engine;
use futures::stream::{self, TryStreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::{
    config::{Configuration, constants::*, user_agent},
    models::{
        Citation, ConversationHandle, HistoryEntry, MediaOptions, OperationToken, PollStatus,
        ResultRef, Role, SessionConfiguration, TextFragment, merge_citations,
    },
};

use super::{ArcCredentials, Backend, BackendError, FragmentStream, GeminiError};

pub struct Gemini {
    alias: String,
    endpoint: String,
    credentials: ArcCredentials,
    timeout: Option<time::Duration>,
    client: reqwest::Client,

    chat_model: String,
    reasoning_model: String,
    video_model: String,
    tts_model: String,
    voice: String,
    thinking_budget: u32,
}

impl Gemini {
    pub fn new(credentials: ArcCredentials) -> Self {
        Gemini {
            alias: "Gemini".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
            timeout: None,
            client: reqwest::Client::new(),

            chat_model: CHAT_MODEL.to_string(),
            reasoning_model: REASONING_MODEL.to_string(),
            video_model: VIDEO_MODEL.to_string(),
            tts_model: TTS_MODEL.to_string(),
            voice: TTS_VOICE.to_string(),
            thinking_budget: THINKING_BUDGET,
        }
    }

    pub fn from_config(config: &Configuration, credentials: ArcCredentials) -> Self {
        let backend = &config.backend;
        let mut gemini = Gemini::new(credentials)
            .with_endpoint(&backend.endpoint)
            .with_chat_model(&backend.chat_model)
            .with_reasoning_model(&backend.reasoning_model)
            .with_video_model(&backend.video_model)
            .with_tts_model(&backend.tts_model)
            .with_voice(&backend.voice)
            .with_thinking_budget(config.chat.thinking_budget);
        if let Some(timeout) = backend.timeout() {
            gemini = gemini.with_timeout(timeout);
        }
        gemini
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_chat_model(mut self, model: &str) -> Self {
        self.chat_model = format_model(model);
        self
    }

    pub fn with_reasoning_model(mut self, model: &str) -> Self {
        self.reasoning_model = format_model(model);
        self
    }

    pub fn with_video_model(mut self, model: &str) -> Self {
        self.video_model = format_model(model);
        self
    }

    pub fn with_tts_model(mut self, model: &str) -> Self {
        self.tts_model = format_model(model);
        self
    }

    pub fn with_voice(mut self, voice: &str) -> Self {
        self.voice = voice.to_string();
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = budget;
        self
    }

    fn api_key(&self) -> Result<String, BackendError> {
        self.credentials
            .api_key()
            .ok_or_else(|| BackendError::Configuration("API key is not configured".to_string()))
    }

    fn url(&self, path: &str, extra: &[(&str, &str)]) -> Result<reqwest::Url, BackendError> {
        let key = self.api_key()?;
        let mut params = vec![("key", key.as_str())];
        params.extend_from_slice(extra);
        reqwest::Url::parse_with_params(&format!("{}/{}", self.endpoint, path), params.as_slice())
            .map_err(|e| BackendError::Transport(format!("parsing url: {}", e)))
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header("User-Agent", user_agent());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    fn turn_request(
        &self,
        handle: &ConversationHandle,
        text: &str,
    ) -> Result<reqwest::RequestBuilder, BackendError> {
        let url = self.url(
            &format!("models/{}:streamGenerateContent", handle.model()),
            &[("alt", "sse")],
        )?;

        let mut contents = handle
            .history()
            .iter()
            .map(Content::from)
            .collect::<Vec<_>>();
        contents.push(Content::text(Some("user"), text));

        let req = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, handle.system_instruction())),
            generation_config: handle.thinking_budget().map(|budget| GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: budget,
                }),
                ..Default::default()
            }),
            tools: if handle.search_grounding() {
                vec![Tool {
                    google_search: Some(GoogleSearch {}),
                }]
            } else {
                vec![]
            },
        };

        log::trace!("Sending turn request: {:?}", req);
        Ok(self.request(reqwest::Method::POST, url).json(&req))
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> &str {
        &self.alias
    }

    fn start_conversation(&self, config: &SessionConfiguration) -> ConversationHandle {
        let handle = if config.deep_reasoning_enabled {
            ConversationHandle::new(&self.reasoning_model, REASONING_INSTRUCTION)
                .with_thinking_budget(self.thinking_budget)
        } else {
            ConversationHandle::new(&self.chat_model, ASSISTANT_INSTRUCTION)
        };
        log::debug!(
            "Started conversation {} with model {}",
            handle.id(),
            handle.model()
        );
        handle.with_search_grounding(config.search_grounding_enabled)
    }

    fn send_turn(&self, handle: &ConversationHandle, text: &str) -> FragmentStream {
        let request = match self.turn_request(handle, text) {
            Ok(request) => request,
            Err(err) => return Box::pin(stream::once(async move { Err::<TextFragment, _>(err) })),
        };

        let state = TurnStream::Pending {
            request,
            turn: TurnContext {
                handle: handle.clone(),
                user_text: text.to_string(),
                text: String::new(),
                citations: vec![],
            },
        };
        Box::pin(stream::unfold(state, next_fragment))
    }

    async fn start_media_generation(
        &self,
        prompt: &str,
        options: &MediaOptions,
    ) -> Result<OperationToken, BackendError> {
        if prompt.trim().is_empty() {
            return Err(BackendError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }

        let url = self.url(&format!("models/{}:predictLongRunning", self.video_model), &[])?;
        let req = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                aspect_ratio: options.aspect_ratio.clone(),
                resolution: options.resolution.clone(),
                sample_count: options.number_of_items,
            },
        };

        log::trace!("Sending generation request: {:?}", req);
        let resp = self
            .request(reqwest::Method::POST, url)
            .json(&req)
            .send()
            .await?;
        let op: OperationResponse = check_response(resp).await?.json().await?;
        log::debug!("Started media generation {}", op.name);
        Ok(OperationToken { name: op.name })
    }

    async fn poll_media_generation(
        &self,
        token: &OperationToken,
    ) -> Result<PollStatus, BackendError> {
        let url = self.url(token.name.trim_start_matches('/'), &[])?;
        let resp = self.request(reqwest::Method::GET, url).send().await?;
        let op: OperationResponse = check_response(resp).await?.json().await?;
        log::trace!("Operation status: {:?}", op);
        Ok(op.into())
    }

    async fn fetch_result(&self, result: &ResultRef) -> Result<Vec<u8>, BackendError> {
        let mut url = reqwest::Url::parse(&result.uri)
            .map_err(|e| BackendError::Transport(format!("parsing result uri: {}", e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key()?);

        let resp = self.request(reqwest::Method::GET, url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(format!(
                "resource {} does not exist",
                result.uri
            )));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::AuthorizationLost(
                GeminiError::from_body(status.as_u16(), &body).message,
            ));
        }
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "Failed to fetch video: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let url = self.url(&format!("models/{}:generateContent", self.tts_model), &[])?;
        let req = GenerateContentRequest {
            contents: vec![Content::text(None, text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                ..Default::default()
            }),
            tools: vec![],
        };

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(&req)
            .send()
            .await?;
        let resp: GenerateContentResponse = check_response(resp).await?.json().await?;

        let data = resp
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.inline_data.as_ref())
            .map(|blob| blob.data.as_str())
            .filter(|data| !data.is_empty());

        let Some(data) = data else {
            log::debug!("Speech response carried no audio");
            return Ok(None);
        };

        let audio = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| BackendError::Transport(format!("decoding audio: {}", e)))?;
        Ok(Some(audio))
    }
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let http_code = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    log::error!("Error response ({}): {}", http_code, body);
    Err(GeminiError::from_body(http_code, &body).into())
}

type LineReader = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

enum TurnStream {
    Pending {
        request: reqwest::RequestBuilder,
        turn: TurnContext,
    },
    Reading {
        lines: LineReader,
        turn: TurnContext,
    },
    Done,
}

struct TurnContext {
    handle: ConversationHandle,
    user_text: String,
    text: String,
    citations: Vec<Citation>,
}

impl TurnContext {
    fn apply(&mut self, chunk: &GenerateContentResponse) -> TextFragment {
        let mut delta = String::new();
        if let Some(candidate) = chunk.candidates.first() {
            if let Some(content) = &candidate.content {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or_default())
                    .filter_map(|p| p.text.as_deref())
                    .for_each(|text| delta.push_str(text));
            }

            if let Some(metadata) = &candidate.grounding_metadata {
                let observed = metadata
                    .grounding_chunks
                    .iter()
                    .filter_map(|c| c.web.as_ref())
                    .filter_map(|web| match (&web.title, &web.uri) {
                        (Some(title), Some(uri)) => Some(Citation::new(title, uri)),
                        _ => None,
                    });
                merge_citations(&mut self.citations, observed);
            }
        }

        self.text.push_str(&delta);
        TextFragment::new(delta).with_citations(self.citations.clone())
    }
}

async fn open_stream(request: reqwest::RequestBuilder) -> Result<LineReader, BackendError> {
    let resp = check_response(request.send().await?).await?;
    let stream = resp
        .bytes_stream()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Interrupted, e.to_string()));
    let reader: Box<dyn AsyncBufRead + Unpin + Send> =
        Box::new(StreamReader::new(Box::pin(stream)));
    Ok(reader.lines())
}

async fn next_fragment(
    state: TurnStream,
) -> Option<(Result<TextFragment, BackendError>, TurnStream)> {
    let (mut lines, mut turn) = match state {
        TurnStream::Done => return None,
        TurnStream::Reading { lines, turn } => (lines, turn),
        TurnStream::Pending { request, turn } => match open_stream(request).await {
            Ok(lines) => (lines, turn),
            Err(err) => return Some((Err(err), TurnStream::Done)),
        },
    };

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // Only a fully consumed turn becomes part of the context
                turn.handle.record_exchange(turn.user_text, turn.text);
                return None;
            }
            Err(err) => {
                let err = BackendError::Transport(format!("reading stream: {}", err));
                return Some((Err(err), TurnStream::Done));
            }
        };

        log::trace!("streaming response: {}", line);
        let Some(data) = line.trim().strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }

        let chunk = match serde_json::from_str::<GenerateContentResponse>(data) {
            Ok(chunk) => chunk,
            Err(err) => {
                let err = BackendError::Transport(format!("parsing response chunk: {}", err));
                return Some((Err(err), TurnStream::Done));
            }
        };

        // An error frame ends the turn, nothing is recorded in the context
        if let Some(mut err) = chunk.error {
            err.http_code = err.code.unwrap_or_default();
            return Some((Err(err.into()), TurnStream::Done));
        }

        let fragment = turn.apply(&chunk);
        return Some((Ok(fragment), TurnStream::Reading { lines, turn }));
    }
}

fn format_model(model: &str) -> String {
    let model = model.strip_prefix("model/").unwrap_or(model);
    let model = model.strip_prefix("models/").unwrap_or(model);
    model.to_string()
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Content {
            role: role.map(String::from),
            parts: vec![Part {
                text: Some(text.into()),
                ..Default::default()
            }],
        }
    }
}

impl From<&HistoryEntry> for Content {
    fn from(value: &HistoryEntry) -> Self {
        let role = match value.role {
            Role::Model => "model",
            _ => "user",
        };
        Content::text(Some(role), value.text.as_str())
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GoogleSearch {}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_search: Option<GoogleSearch>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateCandidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    aspect_ratio: String,
    resolution: String,
    sample_count: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct VideoUri {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoUri>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoOperationResult {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<VideoOperationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<OperationError>,
}

impl From<OperationResponse> for PollStatus {
    fn from(value: OperationResponse) -> Self {
        let result = value
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri)
            .map(|uri| ResultRef { uri });

        PollStatus {
            done: value.done,
            result,
            error: value.error.map(|e| e.message),
        }
    }
}
