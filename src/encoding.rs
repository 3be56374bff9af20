// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character-encoding support for the query component, layered over
//! [`encoding_rs`].
//!
//! `encoding_rs` already implements the label table from the Encoding
//! Standard (`Encoding::for_label`), so the registry here is a thin
//! wrapper that also resolves the *output encoding* (UTF-8 for
//! `replacement` and the UTF-16 variants) and runs the URL Standard's
//! "percent-encode after encoding" with the `%26%23…%3B` fallback for
//! code points the target encoding cannot represent.

use encoding_rs::{Encoding, EncoderResult, UTF_8};

use crate::percent_encoding::{percent_encode_bytes, PercentEncodeSet};

/// A possibly-overridden query encoding. `None` means UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingOverride {
    encoding: Option<&'static Encoding>,
}

impl EncodingOverride {
    #[inline]
    pub fn utf8() -> EncodingOverride {
        EncodingOverride { encoding: None }
    }

    /// Look up a WHATWG encoding label. Labels are ASCII-whitespace
    /// trimmed and matched case-insensitively, as the Encoding Standard
    /// requires; unknown labels yield `None`.
    pub fn lookup(label: &str) -> Option<EncodingOverride> {
        Encoding::for_label(label.as_bytes()).map(|encoding| EncodingOverride {
            encoding: if encoding == UTF_8 { None } else { Some(encoding) },
        })
    }

    /// <https://encoding.spec.whatwg.org/#get-an-output-encoding>
    pub fn to_output_encoding(self) -> EncodingOverride {
        match self.encoding {
            Some(encoding) => {
                let output = encoding.output_encoding();
                EncodingOverride {
                    encoding: if output == UTF_8 { None } else { Some(output) },
                }
            }
            None => self,
        }
    }

    #[inline]
    pub fn is_utf8(&self) -> bool {
        self.encoding.is_none()
    }

    pub fn name(&self) -> &'static str {
        self.encoding.unwrap_or(UTF_8).name()
    }

    /// The URL Standard's "percent-encode after encoding": transcode
    /// `input` into this encoding, percent-escape the bytes that fall in
    /// `set` (preserving existing `%HH` escapes when the set covers `%`),
    /// and replace code points the encoding cannot express with a
    /// percent-encoded `&#N;` numeric reference.
    pub fn percent_encode_after_encoding(
        &self,
        input: &str,
        set: &PercentEncodeSet,
        space_as_plus: bool,
    ) -> String {
        let mut output = String::with_capacity(input.len());
        let encoding = match self.encoding {
            None => {
                percent_encode_bytes(input.as_bytes(), set, space_as_plus, &mut output);
                return output;
            }
            Some(encoding) => encoding,
        };

        let mut encoder = encoding.new_encoder();
        let mut remaining = input;
        let mut bytes = Vec::new();
        loop {
            // Size the buffer so a run can only stop at end of input or at
            // an unmappable code point, never mid-escape.
            let needed = encoder
                .max_buffer_length_from_utf8_without_replacement(remaining.len())
                .expect("encoder buffer size overflow");
            bytes.resize(needed.max(16), 0);
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(remaining, &mut bytes, false);
            percent_encode_bytes(&bytes[..written], set, space_as_plus, &mut output);
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::Unmappable(c) => {
                    output.push_str("%26%23");
                    output.push_str(&(c as u32).to_string());
                    output.push_str("%3B");
                }
                EncoderResult::OutputFull => {}
            }
        }
        // Flush any pending encoder state (ISO-2022-JP shift sequences).
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(0)
            .expect("encoder buffer size overflow");
        bytes.resize(needed.max(16), 0);
        let (_, _, written) = encoder.encode_from_utf8_without_replacement("", &mut bytes, true);
        percent_encode_bytes(&bytes[..written], set, space_as_plus, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percent_encoding::{QUERY_ENCODE_SET, SPECIAL_QUERY_ENCODE_SET};

    #[test]
    fn label_lookup() {
        assert_eq!(EncodingOverride::lookup("utf-8"), Some(EncodingOverride::utf8()));
        assert_eq!(EncodingOverride::lookup("  UTF8\t"), Some(EncodingOverride::utf8()));
        assert_eq!(EncodingOverride::lookup("latin1").unwrap().name(), "windows-1252");
        assert_eq!(EncodingOverride::lookup("sjis").unwrap().name(), "Shift_JIS");
        assert!(EncodingOverride::lookup("no-such-encoding").is_none());
    }

    #[test]
    fn output_encoding_resolution() {
        assert!(EncodingOverride::lookup("utf-16be")
            .unwrap()
            .to_output_encoding()
            .is_utf8());
        assert!(EncodingOverride::lookup("replacement")
            .unwrap()
            .to_output_encoding()
            .is_utf8());
        assert_eq!(
            EncodingOverride::lookup("windows-1251")
                .unwrap()
                .to_output_encoding()
                .name(),
            "windows-1251"
        );
    }

    #[test]
    fn utf8_query_encoding() {
        let utf8 = EncodingOverride::utf8();
        assert_eq!(
            utf8.percent_encode_after_encoding("a b", &QUERY_ENCODE_SET, false),
            "a%20b"
        );
        assert_eq!(
            utf8.percent_encode_after_encoding("héllo", &QUERY_ENCODE_SET, false),
            "h%C3%A9llo"
        );
    }

    #[test]
    fn legacy_query_encoding() {
        let windows_1252 = EncodingOverride::lookup("windows-1252").unwrap();
        assert_eq!(
            windows_1252.percent_encode_after_encoding("héllo", &SPECIAL_QUERY_ENCODE_SET, false),
            "h%E9llo"
        );
    }

    #[test]
    fn unmappable_becomes_numeric_reference() {
        let windows_1252 = EncodingOverride::lookup("windows-1252").unwrap();
        // U+4E2D cannot be expressed in windows-1252.
        assert_eq!(
            windows_1252.percent_encode_after_encoding("中", &QUERY_ENCODE_SET, false),
            "%26%2320013%3B"
        );
        assert_eq!(
            windows_1252.percent_encode_after_encoding("a中b", &QUERY_ENCODE_SET, false),
            "a%26%2320013%3Bb"
        );
    }
}
