use serde::{Deserialize, Serialize};

/// Lifecycle of a question. `Pending` and `Complete` come from the backend;
/// `Failed` is assigned client-side when a submission never reaches the
/// server. The backend is free to grow new states, so unknown strings are
/// preserved for display instead of being rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionStatus {
    #[default]
    Pending,
    Complete,
    Failed,
    Unknown(String),
}

impl QuestionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Complete => "complete",
            QuestionStatus::Failed => "failed",
            QuestionStatus::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for QuestionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => QuestionStatus::Pending,
            "complete" | "completed" => QuestionStatus::Complete,
            "failed" => QuestionStatus::Failed,
            _ => QuestionStatus::Unknown(s),
        }
    }
}

impl From<QuestionStatus> for String {
    fn from(status: QuestionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A reference-architecture citation attached to a structured answer.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReferenceArchitecture {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// The object form of an answer: generated text plus its citations.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StructuredAnswer {
    pub ai_suggestion: String,
    #[serde(default)]
    pub reference_architectures: Vec<ReferenceArchitecture>,
}

/// The `response` field is polymorphic on the wire: a structured object once
/// the worker has answered, a bare string in older records, `null` while the
/// question is still queued. Variant order matters: an object bearing
/// `ai_suggestion` wins, then a plain string, then anything else.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerBody {
    Structured(StructuredAnswer),
    Text(String),
    Other(serde_json::Value),
}

impl Default for AnswerBody {
    fn default() -> Self {
        AnswerBody::Other(serde_json::Value::Null)
    }
}

impl AnswerBody {
    /// Display text, with literal `\n` escape sequences turned into real
    /// line breaks. Unrecognized shapes render as empty text.
    pub fn answer_text(&self) -> String {
        match self {
            AnswerBody::Structured(answer) => answer.ai_suggestion.replace("\\n", "\n"),
            AnswerBody::Text(text) => text.replace("\\n", "\n"),
            AnswerBody::Other(_) => String::new(),
        }
    }

    pub fn reference_architectures(&self) -> &[ReferenceArchitecture] {
        match self {
            AnswerBody::Structured(answer) => &answer.reference_architectures,
            _ => &[],
        }
    }
}

/// One question record. Fetched rows and optimistic placeholders share this
/// type; placeholders are distinguished by living in their own state list
/// rather than by a marker field.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub status: QuestionStatus,
    #[serde(default)]
    pub response: AnswerBody,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Question {
    /// Placeholder for a just-submitted question. `created_at` is an
    /// ISO-8601 timestamp supplied by the caller (the browser clock).
    pub fn pending(question: String, created_at: String) -> Self {
        Self {
            question,
            status: QuestionStatus::Pending,
            response: AnswerBody::Text(String::new()),
            created_at: Some(created_at),
        }
    }
}

/// One page of the persisted collection. `total` counts every record across
/// all pages; the backend's pagination envelope carries extra fields
/// (`page`, `size`, `pages`) this client does not use.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PageResult {
    pub items: Vec<Question>,
    pub total: u32,
}

/// Body of `POST /query`.
#[derive(Clone, Debug, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Acknowledgement body of `POST /query`: `{"query_id", "status": "queued"}`
/// for a fresh question, or `"matched"` (with an inline response) when the
/// server already knows a near-duplicate. Normal flow only logs it; the
/// persisted answer is observed through a later fetch.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
