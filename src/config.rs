use std::{env, fmt, fs, path::Path};
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, CredentialError};

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
pub const DEFAULT_BUFFER_SIZE: u32 = 100;

pub const SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    pub primary_keyword: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub optional_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    pub days_back: u32,
    #[serde(default = "default_buffer_size")]
    pub result_buffer_size: u32,
}

impl SearchConfig {
    pub fn new(
        primary_keyword: &str,
        optional_keywords: Vec<String>,
        categories: Vec<String>,
        days_back: u32
    ) -> Self {
        SearchConfig {
            primary_keyword: primary_keyword.to_string(),
            optional_keywords,
            categories,
            days_back,
            result_buffer_size: DEFAULT_BUFFER_SIZE
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.primary_keyword.trim().is_empty() {
            return Err(ConfigError::Invalid("primary_keyword must not be empty".into()));
        }
        if self.result_buffer_size == 0 {
            return Err(ConfigError::Invalid("result_buffer_size must be positive".into()));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    search: Option<SearchConfig>
}

fn default_buffer_size() -> u32 {
    DEFAULT_BUFFER_SIZE
}

// `optional_keywords:` with no value parses as null.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reads the YAML file at `path` and returns its `search` section.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SearchConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source
    })?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<SearchConfig, ConfigError> {
    let file: ConfigFile = serde_yaml::from_str(text)?;
    file.search
        .ok_or(ConfigError::MissingSection)?
        .validate()
}

/// Mail account settings, built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct EmailCredentials {
    pub sender_address: String,
    pub sender_secret: String,
    pub recipient_address: String,
}

impl EmailCredentials {
    pub fn new(sender_address: &str, sender_secret: &str, recipient_address: &str) -> Self {
        EmailCredentials {
            sender_address: sender_address.to_string(),
            sender_secret: sender_secret.to_string(),
            recipient_address: recipient_address.to_string()
        }
    }

    pub fn from_env() -> Result<Self, CredentialError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves every key through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |key: &'static str| {
            match lookup(key).filter(|value| !value.is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };
        let sender_address = get(SENDER_EMAIL);
        let sender_secret = get(SENDER_PASSWORD);
        let recipient_address = get(RECIPIENT_EMAIL);

        if !missing.is_empty() {
            return Err(CredentialError::Missing(missing));
        }
        Ok(EmailCredentials {
            sender_address,
            sender_secret,
            recipient_address
        })
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender_address", &self.sender_address)
            .field("sender_secret", &"<redacted>")
            .field("recipient_address", &self.recipient_address)
            .finish()
    }
}
