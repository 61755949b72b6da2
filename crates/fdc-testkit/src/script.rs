use fdc_cart::{CartCommand, PendingPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A recorded cart session: commands applied in order to a fresh cart.
///
/// ```yaml
/// name: switch restaurants
/// pending_policy: keep_first   # optional, overrides config
/// steps:
///   - op: add_item
///     restaurant: { id: 1, name: Burger Barn }
///     menu_item: { id: 100, name: Classic Burger, price_micros: 10000000 }
///     quantity: 1
///   - op: confirm_restaurant_change
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_policy: Option<PendingPolicy>,
    pub steps: Vec<CartCommand>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScriptFormat {
    Json,
    Yaml,
}

impl ScriptFormat {
    /// `.yaml`/`.yml` are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ScriptFormat::Yaml
            }
            _ => ScriptFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptFormat::Json => "json",
            ScriptFormat::Yaml => "yaml",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptError {
    Io { path: String, message: String },
    Parse { format: ScriptFormat, message: String },
    NoSteps,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Io { path, message } => {
                write!(f, "SCRIPT_IO path={path}: {message}")
            }
            ScriptError::Parse { format, message } => {
                write!(f, "SCRIPT_PARSE format={}: {message}", format.as_str())
            }
            ScriptError::NoSteps => write!(f, "SCRIPT_EMPTY: script has no steps"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl Script {
    pub fn parse(raw: &str, format: ScriptFormat) -> Result<Self, ScriptError> {
        let script: Script = match format {
            ScriptFormat::Json => serde_json::from_str(raw).map_err(|e| ScriptError::Parse {
                format,
                message: e.to_string(),
            })?,
            ScriptFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| ScriptError::Parse {
                format,
                message: e.to_string(),
            })?,
        };
        if script.steps.is_empty() {
            return Err(ScriptError::NoSteps);
        }
        Ok(script)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScriptError> {
        Self::parse(raw, ScriptFormat::Json)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ScriptError> {
        Self::parse(raw, ScriptFormat::Yaml)
    }

    /// Read a script file; the format follows the extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&raw, ScriptFormat::from_path(path))
    }
}
