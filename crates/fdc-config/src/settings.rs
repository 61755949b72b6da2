use fdc_cart::PendingPolicy;
use serde_json::Value;

/// Typed settings read from the merged config tree.
///
/// | pointer               | default       |
/// |-----------------------|---------------|
/// | `/cart/pending_policy`| `overwrite`   |
/// | `/cart/currency`      | `USD`         |
/// | `/logging/filter`     | `info`        |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartSettings {
    pub pending_policy: PendingPolicy,
    /// ISO-4217 code used when rendering micros for humans.
    pub currency: String,
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            pending_policy: PendingPolicy::Overwrite,
            currency: "USD".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// `/cart/pending_policy` is not one of the known policies.
    UnknownPendingPolicy { value: String },
    /// `/cart/currency` is not a three-letter code.
    InvalidCurrency { value: String },
    /// A consumed pointer holds the wrong JSON type.
    WrongType {
        pointer: &'static str,
        expected: &'static str,
    },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPendingPolicy { value } => write!(
                f,
                "cart.pending_policy must be one of: overwrite | keep_first (got '{value}')"
            ),
            Self::InvalidCurrency { value } => write!(
                f,
                "cart.currency must be a three-letter ISO-4217 code (got '{value}')"
            ),
            Self::WrongType { pointer, expected } => {
                write!(f, "config {pointer} must be a {expected}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl CartSettings {
    /// Build from canonical config JSON (produced by `load_layered_yaml*`).
    /// Missing keys take their defaults.
    pub fn from_config_json(cfg: &Value) -> Result<Self, SettingsError> {
        let mut out = Self::default();

        if let Some(raw) = read_str(cfg, "/cart/pending_policy")? {
            out.pending_policy = parse_pending_policy(raw)?;
        }

        if let Some(raw) = read_str(cfg, "/cart/currency")? {
            let code = raw.trim().to_ascii_uppercase();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(SettingsError::InvalidCurrency {
                    value: raw.to_string(),
                });
            }
            out.currency = code;
        }

        if let Some(raw) = read_str(cfg, "/logging/filter")? {
            if !raw.trim().is_empty() {
                out.log_filter = raw.trim().to_string();
            }
        }

        Ok(out)
    }
}

fn read_str<'a>(cfg: &'a Value, pointer: &'static str) -> Result<Option<&'a str>, SettingsError> {
    match cfg.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SettingsError::WrongType {
            pointer,
            expected: "string",
        }),
    }
}

fn parse_pending_policy(raw: &str) -> Result<PendingPolicy, SettingsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "overwrite" => Ok(PendingPolicy::Overwrite),
        "keep_first" | "keep-first" => Ok(PendingPolicy::KeepFirst),
        _ => Err(SettingsError::UnknownPendingPolicy {
            value: raw.to_string(),
        }),
    }
}
