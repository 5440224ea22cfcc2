pub mod encoding;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod request;
pub mod source;

pub use error::{KeyGenError, Result};
pub use generator::{generate, generate_with, Generated, GeneratedKey};
pub use request::{GenerationRequest, Method, DEFAULT_LENGTH, DEFAULT_POOL};
pub use source::{ByteSource, IndexSource, KeystreamSource, OsRngSource, ThreadRngSource};
