//! Error families raised by field arithmetic, code construction, decoding and persistence.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and context carried by every [`QldpcError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier such as `css-incompatible` or `hash-mismatch`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Offending values keyed by name, for example `order`, `rows` or `trials`.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy, for example switching from `QCCode` to `LPCode`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context key/value pair.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Every fallible operation in the workspace returns this type.
///
/// The variant names the layer that failed and serializes as the `family` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum QldpcError {
    /// Orders that are not prime powers and elements outside the field.
    #[error("field error: {0}")]
    Field(ErrorInfo),
    /// Shape mismatches and matrices over different fields.
    #[error("matrix error: {0}")]
    Matrix(ErrorInfo),
    /// Malformed Tanner graphs and graph products.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Invalid Cayley tables or subsets and protographs over mismatched groups.
    #[error("group error: {0}")]
    Group(ErrorInfo),
    /// Non-commuting checks, trivial codes, exhausted random-code draws.
    #[error("code error: {0}")]
    Code(ErrorInfo),
    /// Non-prime fields, malformed syndromes and exhausted distance-bound trials.
    #[error("decoder error: {0}")]
    Decoder(ErrorInfo),
    /// Malformed payloads, wrong code kinds and hash mismatches.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl QldpcError {
    /// Payload shared by all families.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            QldpcError::Field(info)
            | QldpcError::Matrix(info)
            | QldpcError::Graph(info)
            | QldpcError::Group(info)
            | QldpcError::Code(info)
            | QldpcError::Decoder(info)
            | QldpcError::Serde(info) => info,
        }
    }

    /// Shorthand for `self.info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
