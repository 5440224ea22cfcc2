use crate::encoding::{base32_uuid, base62, hex_lower};
use crate::error::{KeyGenError, Result};
use crate::identifier;
use crate::request::{GenerationRequest, Method};
use crate::source::{ByteSource, IndexSource, OsRngSource, ThreadRngSource};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use zeroize::Zeroizing;

/// One generated key. The backing buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedKey(Zeroizing<String>);

impl GeneratedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for GeneratedKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GeneratedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneratedKey(<{} chars>)", self.0.chars().count())
    }
}

impl Serialize for GeneratedKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Result of a generation call.
///
/// A batch of zero or one produces `Single`; anything larger produces
/// `Batch` with exactly `batch` keys in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Generated {
    Single(GeneratedKey),
    Batch(Vec<GeneratedKey>),
}

impl Generated {
    fn from_keys(mut keys: Vec<GeneratedKey>, batch: bool) -> Self {
        if !batch && keys.len() == 1 {
            if let Some(key) = keys.pop() {
                return Generated::Single(key);
            }
        }
        Generated::Batch(keys)
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Generated::Batch(_))
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn keys(&self) -> &[GeneratedKey] {
        match self {
            Generated::Single(key) => std::slice::from_ref(key),
            Generated::Batch(keys) => keys,
        }
    }

    /// The key of a single-mode result.
    pub fn single(&self) -> Option<&GeneratedKey> {
        match self {
            Generated::Single(key) => Some(key),
            Generated::Batch(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<GeneratedKey> {
        match self {
            Generated::Single(key) => vec![key],
            Generated::Batch(keys) => keys,
        }
    }
}

/// Generates keys with a fresh thread PRNG and the OS CSPRNG.
pub fn generate(request: &GenerationRequest) -> Result<Generated> {
    let mut index = ThreadRngSource::new();
    let mut bytes = OsRngSource;
    generate_with(request, &mut index, &mut bytes)
}

/// Generates keys from caller-supplied sources.
///
/// Option constraints are checked before either source is touched. The
/// first failing key aborts the whole call.
pub fn generate_with<I, B>(
    request: &GenerationRequest,
    index: &mut I,
    bytes: &mut B,
) -> Result<Generated>
where
    I: IndexSource + ?Sized,
    B: ByteSource + ?Sized,
{
    let strategy = Strategy::for_request(request)?;
    let prefix = request.rendered_prefix();

    let keys = (0..request.key_count())
        .map(|_| strategy.produce(&prefix, index, bytes).map(GeneratedKey))
        .collect::<Result<Vec<_>>>()?;

    Ok(Generated::from_keys(keys, request.is_batch()))
}

/// A method with its options validated and defaulted.
#[derive(Debug)]
enum Strategy {
    Pool { pool: Vec<char>, length: usize },
    Bytes { length: usize },
    Base32 { dashes: bool },
    Base62,
    UuidV4 { dashes: bool },
}

impl Strategy {
    fn for_request(request: &GenerationRequest) -> Result<Self> {
        let method = request.method;
        let strategy = match method {
            Method::String => Strategy::Pool {
                pool: request.effective_pool(),
                length: request.effective_length() as usize,
            },
            Method::Bytes => Strategy::Bytes {
                length: request.effective_length() as usize,
            },
            Method::Base32 => Strategy::Base32 {
                dashes: request.dashes,
            },
            Method::Base62 => Strategy::Base62,
            Method::UuidV4 => Strategy::UuidV4 {
                dashes: request.dashes,
            },
            Method::UuidV5 => return Err(KeyGenError::UnsupportedMethod(method.to_string())),
        };

        check_option(method, "pool", method.uses_pool() || request.pool.is_empty())?;
        check_option(method, "length", method.uses_length() || request.length == 0)?;
        check_option(method, "dashes", method.uses_dashes() || !request.dashes)?;

        Ok(strategy)
    }

    fn produce<I, B>(&self, prefix: &str, index: &mut I, bytes: &mut B) -> Result<Zeroizing<String>>
    where
        I: IndexSource + ?Sized,
        B: ByteSource + ?Sized,
    {
        let body = match self {
            Strategy::Pool { pool, length } => {
                let mut body = Zeroizing::new(String::with_capacity(*length));
                for _ in 0..*length {
                    body.push(pool[index.next_index(pool.len())]);
                }
                body
            }
            Strategy::Bytes { length } => {
                let mut raw = Zeroizing::new(vec![0u8; *length]);
                bytes.fill(&mut raw)?;
                Zeroizing::new(hex_lower(&raw))
            }
            Strategy::Base32 { dashes } => {
                let id = identifier::new_v4(bytes)?;
                Zeroizing::new(base32_uuid(&id, *dashes))
            }
            Strategy::Base62 => {
                let id = identifier::new_v4(bytes)?;
                Zeroizing::new(base62(id.as_u128()))
            }
            Strategy::UuidV4 { dashes } => {
                let id = identifier::new_v4(bytes)?;
                let text = if *dashes {
                    id.hyphenated().to_string()
                } else {
                    id.simple().to_string()
                };
                Zeroizing::new(text)
            }
        };

        let mut key = Zeroizing::new(String::with_capacity(prefix.len() + body.len()));
        key.push_str(prefix);
        key.push_str(&body);
        Ok(key)
    }
}

fn check_option(method: Method, option: &'static str, allowed: bool) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(KeyGenError::ConstraintViolation {
            option,
            method: method.noun(),
        })
    }
}
