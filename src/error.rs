//! Error type shared by the library.

/// Errors raised while building samplers, tables and runs.
///
/// Callback paths (stepping, sensitive detector, event bookkeeping) never
/// return these; they skip silently instead.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Beta endpoint energy must be finite and > 0, got {0} MeV")]
    InvalidEndpointEnergy(f64),

    #[error("Cone half-angle must be within [0, pi], got {0} rad")]
    InvalidConeAngle(f64),

    #[error("Invalid table '{table}': {message}")]
    InvalidTable { table: String, message: String },

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid histogram binning: {0}")]
    InvalidHistogram(String),

    #[error("Run script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn table(table: &str, message: impl Into<String>) -> Self {
        SimError::InvalidTable {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn parameter(name: &str, message: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn script(line: usize, message: impl Into<String>) -> Self {
        SimError::Script {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
