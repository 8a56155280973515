//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::logic::{AnalysisResult, CharTone, FormList, FrameworkOut, NoMatch};
use crate::rhyme::PatternResolution;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Analyze {
        text: String,
        #[serde(default)]
        rhymebook: Option<String>,
    },
    SelectRhymePattern {
        text: String,
        #[serde(default)]
        rhymebook: Option<String>,
        #[serde(rename = "formName")]
        form_name: String,
        author: String,
        #[serde(rename = "patternId", default)]
        pattern_id: usize,
    },
    FillwordFramework {
        #[serde(rename = "formName")]
        form_name: String,
        author: String,
    },
    CharTone {
        char: String,
    },
    ListForms,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Analysis {
        result: Box<AnalysisResult>,
    },
    NoMatch {
        diagnostics: NoMatch,
    },
    RhymePattern {
        pattern: PatternResolution,
    },
    Framework {
        framework: FrameworkOut,
    },
    CharTone {
        tone: CharTone,
    },
    Forms {
        list: FormList,
    },
    Error {
        message: String,
    },
}

/// Uniform HTTP response body: `{ success, data, error }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    /// Failure that still carries diagnostic data.
    pub fn fail_with(data: T, error: impl Into<String>) -> Self {
        Self { success: false, data: Some(data), error: Some(error.into()) }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    pub fn from_result(r: Result<T, AnalysisError>) -> Self {
        match r {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

pub const NO_MATCH_MESSAGE: &str = "no registered form matches this text; check the text or the form registry";

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rhymebook: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RhymePatternIn {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rhymebook: Option<String>,
    #[serde(rename = "formName", default)]
    pub form_name: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "patternId", default)]
    pub pattern_id: usize,
}

#[derive(Debug, Deserialize)]
pub struct FrameworkIn {
    #[serde(rename = "formName", default)]
    pub form_name: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct CharToneIn {
    #[serde(default)]
    pub char: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
