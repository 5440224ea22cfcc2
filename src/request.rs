use crate::error::KeyGenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pool used by the string method when none is given.
pub const DEFAULT_POOL: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._~+/";

/// Length used by the string and bytes methods when none is given.
pub const DEFAULT_LENGTH: u32 = 36;

/// Random bits carried by a version-4 UUID.
const UUID_V4_RANDOM_BITS: f64 = 122.0;

/// Symbols in a base32-formatted key.
const BASE32_SYMBOLS: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    String,
    #[serde(alias = "byte")]
    Bytes,
    Base32,
    Base62,
    #[serde(rename = "uuidv4")]
    UuidV4,
    /// Declared for compatibility; has no strategy.
    #[serde(rename = "uuidv5")]
    UuidV5,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::String => "string",
            Method::Bytes => "bytes",
            Method::Base32 => "base32",
            Method::Base62 => "base62",
            Method::UuidV4 => "uuidv4",
            Method::UuidV5 => "uuidv5",
        }
    }

    /// Name used in constraint messages ("pool is not supported for byte method").
    pub(crate) fn noun(&self) -> &'static str {
        match self {
            Method::Bytes => "byte",
            other => other.as_str(),
        }
    }

    pub fn uses_pool(&self) -> bool {
        matches!(self, Method::String)
    }

    pub fn uses_length(&self) -> bool {
        matches!(self, Method::String | Method::Bytes)
    }

    pub fn uses_dashes(&self) -> bool {
        matches!(self, Method::Base32 | Method::UuidV4)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = KeyGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Method::String),
            "bytes" | "byte" => Ok(Method::Bytes),
            "base32" => Ok(Method::Base32),
            "base62" => Ok(Method::Base62),
            "uuidv4" => Ok(Method::UuidV4),
            "uuidv5" => Ok(Method::UuidV5),
            _ => Err(KeyGenError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Input to a single generation call.
///
/// Fields a method does not use must stay at their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub method: Method,
    pub length: u32,
    pub pool: String,
    pub prefix: String,
    pub batch: u32,
    pub dashes: bool,
}

impl GenerationRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = pool.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_batch(mut self, batch: u32) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_dashes(mut self, dashes: bool) -> Self {
        self.dashes = dashes;
        self
    }

    /// Number of keys a call produces.
    pub fn key_count(&self) -> usize {
        self.batch.max(1) as usize
    }

    /// Batch mode starts above one; zero and one both mean a single key.
    pub fn is_batch(&self) -> bool {
        self.batch > 1
    }

    /// Length after defaulting.
    pub fn effective_length(&self) -> u32 {
        if self.length == 0 {
            DEFAULT_LENGTH
        } else {
            self.length
        }
    }

    /// Pool characters after defaulting.
    pub fn effective_pool(&self) -> Vec<char> {
        if self.pool.is_empty() {
            DEFAULT_POOL.chars().collect()
        } else {
            self.pool.chars().collect()
        }
    }

    /// The rendered prefix, `"<prefix>."`, or nothing.
    pub fn rendered_prefix(&self) -> String {
        if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}.", self.prefix)
        }
    }

    /// Estimated random bits in one key, prefix excluded.
    pub fn entropy_bits(&self) -> f64 {
        match self.method {
            Method::String => {
                let pool_size = self.effective_pool().len() as f64;
                self.effective_length() as f64 * pool_size.log2()
            }
            Method::Bytes => self.effective_length() as f64 * 8.0,
            Method::Base32 => BASE32_SYMBOLS * 5.0,
            Method::Base62 | Method::UuidV4 => UUID_V4_RANDOM_BITS,
            Method::UuidV5 => 0.0,
        }
    }
}
