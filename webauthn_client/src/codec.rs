//! Base64url codec for binary fields carried inside JSON.
//!
//! Credential material (challenges, user handles, credential ids, signatures)
//! is binary, while the wire protocol is JSON only. Every such field travels
//! as URL-safe base64 without padding and is a raw buffer everywhere else.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

pub use base64::DecodeError;

/// `-`/`_` alphabet, never emits `=`, accepts input with or without it.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a buffer so it can be embedded in a JSON string or a URL.
pub fn encode(buffer: impl AsRef<[u8]>) -> String {
    BASE64URL.encode(buffer)
}

/// Reverse [`encode`].
///
/// Also accepts the standard `+`/`/` alphabet, which some relying parties
/// emit for ids. Input comes from the relying party and is trusted, so a
/// failure here means the document was corrupted and the ceremony cannot
/// continue.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    if text.contains(|c: char| matches!(c, '+' | '/')) {
        let normalized: String = text
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect();
        return BASE64URL.decode(normalized);
    }
    BASE64URL.decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_bytes_encode_without_padding() {
        let text = encode([0u8, 0, 0]);
        assert_eq!(text, "AAAA");
        assert!(!text.contains('='));
        assert_eq!(decode(&text).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn empty_buffer() {
        assert_eq!(encode(b""), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn short_server_strings() {
        assert_eq!(decode("AAE").unwrap(), vec![0, 1]);
        assert_eq!(decode("Ag").unwrap(), vec![2]);
    }

    #[test]
    fn url_safe_alphabet() {
        assert_eq!(encode([0xfbu8, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn padded_input_is_tolerated() {
        assert_eq!(decode("Ag==").unwrap(), vec![2]);
        assert_eq!(decode("AAE=").unwrap(), vec![0, 1]);
    }

    #[test]
    fn standard_alphabet_is_accepted() {
        assert_eq!(decode("+/8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode("+/8=").unwrap(), vec![0xfb, 0xff]);
        // a mixed id decodes the same as its url-safe spelling
        assert_eq!(decode("3q2+7w==").unwrap(), decode("3q2-7w").unwrap());
    }

    #[test]
    fn impossible_length_is_rejected() {
        assert!(decode("A").is_err());
        assert!(decode("AAAAA").is_err());
    }

    proptest! {
        #[test]
        fn round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let text = encode(&bytes);
            prop_assert!(!text.contains(|c: char| matches!(c, '+' | '/' | '=')));
            prop_assert_eq!(decode(&text).unwrap(), bytes);
        }
    }
}
