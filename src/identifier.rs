use crate::error::Result;
use crate::source::ByteSource;
use uuid::{Builder, Uuid};
use zeroize::Zeroizing;

/// Builds a version-4 UUID from 16 bytes of the given source.
///
/// The version and variant bits are forced by [`Builder::from_random_bytes`];
/// the remaining 122 bits come straight from the source.
pub fn new_v4<B: ByteSource + ?Sized>(source: &mut B) -> Result<Uuid> {
    let mut bytes = Zeroizing::new([0u8; 16]);
    source.fill(&mut bytes[..])?;

    Ok(Builder::from_random_bytes(*bytes).into_uuid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{KeystreamSource, OsRngSource};
    use uuid::{Variant, Version};

    #[test]
    fn test_version_and_variant() {
        let id = new_v4(&mut OsRngSource).unwrap();
        assert_eq!(id.get_version(), Some(Version::Random));
        assert_eq!(id.get_variant(), Variant::RFC4122);
    }

    #[test]
    fn test_version_nibble_in_text() {
        let id = new_v4(&mut OsRngSource).unwrap();
        let text = id.hyphenated().to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(&text[14..15], "4");
    }

    #[test]
    fn test_seeded_source_reproducible() {
        let a = new_v4(&mut KeystreamSource::new(&[3u8; 32])).unwrap();
        let b = new_v4(&mut KeystreamSource::new(&[3u8; 32])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fresh_per_call() {
        let mut source = KeystreamSource::new(&[3u8; 32]);
        let a = new_v4(&mut source).unwrap();
        let b = new_v4(&mut source).unwrap();
        assert_ne!(a, b);
    }
}
