//! JSON session documents.
//!
//! A session stores the form attributes of every pipe plus the shared gap
//! and clearance mode, so a row can be saved and reloaded:
//!
//! ```json
//! {
//!   "metadata": { "version": "1.0", "timestamp": "2025-01-01T00:00:00Z", "gap": 25, "mode": "pp" },
//!   "pipes": [
//!     { "name": "Steam", "size": "6", "cls": "150", "p_ins": 50, "f_ins": 0,
//!       "bop_enabled": false, "bop_val": 0 }
//!   ]
//! }
//! ```
//!
//! Numeric fields accept numbers or numeric strings, since sessions written
//! from form fields store every value as text. Text that does not parse
//! reads as zero.

use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use pipespace_core::{BaseOffset, ClearanceMode, lookup::DimensionLookup};

use crate::row::{PipeInput, Row};

/// Version written into saved sessions.
pub const SESSION_VERSION: &str = "1.0";

/// Errors from loading or saving sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed session: {reason}")]
    MalformedSession { reason: String },

    #[error("unsupported session version `{version}`, expected {SESSION_VERSION}")]
    UnsupportedVersion { version: String },
}

/// Shared settings of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "default_version")]
    version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    gap: f64,

    #[serde(default, deserialize_with = "lenient_mode")]
    mode: ClearanceMode,
}

/// Stored attributes of one pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPipe {
    #[serde(default, deserialize_with = "lenient_text")]
    name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    size: String,

    #[serde(default, deserialize_with = "lenient_text")]
    cls: String,

    #[serde(default, deserialize_with = "lenient_number")]
    p_ins: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    f_ins: f64,

    #[serde(default, deserialize_with = "lenient_flag")]
    bop_enabled: bool,

    #[serde(default, deserialize_with = "lenient_number")]
    bop_val: f64,
}

impl From<&PipeInput> for SessionPipe {
    fn from(input: &PipeInput) -> Self {
        Self {
            name: input.name().to_string(),
            size: input.size().to_string(),
            cls: input.class().to_string(),
            p_ins: input.insulation(),
            f_ins: input.flange_insulation(),
            bop_enabled: input.base_offset().is_enabled(),
            bop_val: input.base_offset().stored(),
        }
    }
}

impl From<&SessionPipe> for PipeInput {
    fn from(pipe: &SessionPipe) -> Self {
        PipeInput::new(pipe.name.clone(), pipe.size.clone(), pipe.cls.clone())
            .with_insulation(pipe.p_ins)
            .with_flange_insulation(pipe.f_ins)
            .with_base_offset(BaseOffset::new(pipe.bop_enabled, pipe.bop_val))
    }
}

/// A saved row: shared settings plus per-pipe attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    metadata: Metadata,
    pipes: Vec<SessionPipe>,
}

impl Session {
    /// Creates a session from form inputs.
    pub fn new(inputs: &[PipeInput], gap: f64, mode: ClearanceMode) -> Self {
        Self {
            metadata: Metadata {
                version: default_version(),
                timestamp: None,
                gap,
                mode,
            },
            pipes: inputs.iter().map(SessionPipe::from).collect(),
        }
    }

    /// Parses a session document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MalformedSession`] if the document lacks a
    /// `metadata` object or a `pipes` array, [`SessionError::UnsupportedVersion`]
    /// for a major version other than 1, and [`SessionError::Json`] for
    /// invalid JSON.
    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let value: Value = serde_json::from_str(text)?;

        if !value.get("metadata").is_some_and(Value::is_object) {
            return Err(SessionError::MalformedSession {
                reason: "missing `metadata` object".to_string(),
            });
        }
        if !value.get("pipes").is_some_and(Value::is_array) {
            return Err(SessionError::MalformedSession {
                reason: "missing `pipes` array".to_string(),
            });
        }

        let session: Self = serde_json::from_value(value)?;
        session.check_version()?;

        info!(
            pipes = session.pipes.len(),
            gap = session.metadata.gap,
            mode = session.metadata.mode.code();
            "Session loaded"
        );
        Ok(session)
    }

    /// Serializes the session as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, SessionError> {
        let text = serde_json::to_string_pretty(self)?;
        debug!(pipes = self.pipes.len(); "Session serialized");
        Ok(text)
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.metadata.timestamp.as_deref()
    }

    pub fn gap(&self) -> f64 {
        self.metadata.gap
    }

    pub fn mode(&self) -> ClearanceMode {
        self.metadata.mode
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.metadata.gap = gap;
        self
    }

    pub fn with_mode(mut self, mode: ClearanceMode) -> Self {
        self.metadata.mode = mode;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.metadata.timestamp = Some(timestamp.into());
        self
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// The stored pipes as form inputs.
    pub fn pipe_inputs(&self) -> Vec<PipeInput> {
        self.pipes.iter().map(PipeInput::from).collect()
    }

    /// Resolves the stored pipes into a [`Row`].
    pub fn to_row(&self, lookup: &dyn DimensionLookup) -> Row {
        Row::resolve(&self.pipe_inputs(), self.gap(), self.mode(), lookup)
    }

    fn check_version(&self) -> Result<(), SessionError> {
        let major = self.metadata.version.trim().split('.').next().unwrap_or_default();
        if major.parse::<u32>().ok() == Some(1) {
            Ok(())
        } else {
            Err(SessionError::UnsupportedVersion {
                version: self.metadata.version.clone(),
            })
        }
    }
}

fn default_version() -> String {
    SESSION_VERSION.to_string()
}

/// A form value as it may appear in a session file.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        Some(FormValue::Number(value)) if value.is_finite() => value,
        Some(FormValue::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or_else(|| {
                if !text.trim().is_empty() {
                    warn!(value = text; "Unparsable number in session, using 0");
                }
                0.0
            }),
        Some(FormValue::Number(_)) => 0.0,
        Some(FormValue::Flag(_)) | None => 0.0,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        Some(FormValue::Text(text)) => text,
        Some(FormValue::Number(value)) => value.to_string(),
        Some(FormValue::Flag(flag)) => flag.to_string(),
        None => String::new(),
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        Some(FormValue::Flag(flag)) => flag,
        Some(FormValue::Number(value)) => value != 0.0,
        Some(FormValue::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        ),
        None => false,
    })
}

fn lenient_mode<'de, D>(deserializer: D) -> Result<ClearanceMode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = lenient_text(deserializer)?;
    Ok(code.parse().unwrap_or_else(|_| {
        warn!(mode = code; "Unknown clearance mode in session, using pipe-to-pipe");
        ClearanceMode::PipeToPipe
    }))
}
