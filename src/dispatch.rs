//! Request classification
//!
//! Decides which prompt-construction strategy applies to an incoming
//! [`CombinedRequest`]. Classification is a pure function of the request
//! fields and never touches the network.

use serde::{Deserialize, Serialize};

/// Inbound payload for `POST /generate_response`
///
/// Every field is optional. Missing fields, `null`, and empty strings are all
/// treated as absent. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtopic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
}

impl CombinedRequest {
    /// Build a structured question/answer request
    pub fn qa(
        subject: impl Into<String>,
        topic: impl Into<String>,
        subtopic: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            topic: Some(topic.into()),
            subtopic: Some(subtopic.into()),
            prompt: None,
        }
    }

    /// Build a free-form prompt request
    pub fn freeform(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Attach a prompt to an existing request
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn subtopic(&self) -> Option<&str> {
        self.subtopic.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

/// Strategy selected for a request
///
/// Borrows from the request it was classified from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Subject, topic and subtopic are all present
    Qa {
        subject: &'a str,
        topic: &'a str,
        subtopic: &'a str,
    },
    /// The structured triple is incomplete but a prompt is present
    Freeform { prompt: &'a str },
    /// Neither strategy applies
    Invalid,
}

impl Dispatch<'_> {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Dispatch::Qa { .. } => "qa",
            Dispatch::Freeform { .. } => "freeform",
            Dispatch::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for Dispatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the value only when it is present and non-empty
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Classify a request into exactly one strategy
///
/// The structured triple is checked first: a request carrying a complete
/// subject/topic/subtopic triple is a QA request even when `prompt` is also
/// set, and the prompt is ignored.
pub fn classify(request: &CombinedRequest) -> Dispatch<'_> {
    let triple = (
        present(request.subject()),
        present(request.topic()),
        present(request.subtopic()),
    );

    match (triple, present(request.prompt())) {
        ((Some(subject), Some(topic), Some(subtopic)), _) => Dispatch::Qa {
            subject,
            topic,
            subtopic,
        },
        (_, Some(prompt)) => Dispatch::Freeform { prompt },
        _ => Dispatch::Invalid,
    }
}
