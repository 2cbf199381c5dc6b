// Plain-text decoder

use crate::decode::Decoded;

/// Passes the content through verbatim. No line or encoding transformation
/// happens here, and no truncation either; the normalizer owns the cap.
pub fn decode(input: String) -> Decoded {
    Decoded::PlainText(input)
}
