// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Percent-encode sets and the encoders/decoders driven by them.
//!
//! Different characters need to be encoded in different parts of an URL.
//! For example, a literal `?` question mark in an URL's path would indicate
//! the start of the query string, so a question mark meant to be part of
//! the path needs to be percent-encoded. In the query string a question
//! mark has no special meaning.
//!
//! A [`PercentEncodeSet`] is a predicate over code points: a code point is
//! a member if it was listed explicitly or if it lies above the set's
//! threshold (by default `~`, the last printable ASCII character, so that
//! every non-ASCII code point is a member). Sets are plain values and
//! compose with `|` (union), `&` (intersection), [`add`](PercentEncodeSet::add)
//! and [`sub`](PercentEncodeSet::sub), which is what lets the safe-URL
//! facade combine the WHATWG sets with the RFC 3986 and RFC 2396 ones.

use std::fmt::Write;
use std::ops::{BitAnd, BitOr};
use std::sync::LazyLock;

/// A set of code points that should be percent-encoded.
///
/// Membership: `c` is in the set iff `c` is an explicit member or
/// `c > threshold`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PercentEncodeSet {
    /// Sorted, deduplicated explicit members.
    members: Vec<char>,
    threshold: char,
}

const DEFAULT_THRESHOLD: char = '~';

impl PercentEncodeSet {
    /// Set with the given explicit members and the default `~` threshold.
    pub fn new(chars: &str) -> PercentEncodeSet {
        Self::with_threshold(chars, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(chars: &str, threshold: char) -> PercentEncodeSet {
        let mut members: Vec<char> = chars.chars().collect();
        members.sort_unstable();
        members.dedup();
        PercentEncodeSet { members, threshold }
    }

    /// Inverted constructor: the members are all code points up to the
    /// default threshold that are *not* in `chars`. This is how the RFC
    /// grammars read ("everything except unreserved…").
    pub fn excluding(chars: &str) -> PercentEncodeSet {
        let members = (0..=DEFAULT_THRESHOLD as u32)
            .filter_map(char::from_u32)
            .filter(|c| !chars.contains(*c))
            .collect();
        PercentEncodeSet {
            members,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        c > self.threshold || self.members.binary_search(&c).is_ok()
    }

    /// A copy of this set with `chars` added as explicit members.
    pub fn add(&self, chars: &str) -> PercentEncodeSet {
        let mut members = self.members.clone();
        members.extend(chars.chars());
        members.sort_unstable();
        members.dedup();
        PercentEncodeSet {
            members,
            threshold: self.threshold,
        }
    }

    /// A copy of this set with `chars` removed from the explicit members.
    /// The threshold is untouched: code points above it stay members.
    pub fn sub(&self, chars: &str) -> PercentEncodeSet {
        let members = self
            .members
            .iter()
            .copied()
            .filter(|c| !chars.contains(*c))
            .collect();
        PercentEncodeSet {
            members,
            threshold: self.threshold,
        }
    }
}

/// Union. The threshold drops to the smaller of the two because
/// membership above a threshold is unconditional in either operand.
impl BitOr for &PercentEncodeSet {
    type Output = PercentEncodeSet;

    fn bitor(self, other: &PercentEncodeSet) -> PercentEncodeSet {
        let mut members = self.members.clone();
        members.extend_from_slice(&other.members);
        members.sort_unstable();
        members.dedup();
        PercentEncodeSet {
            members,
            threshold: self.threshold.min(other.threshold),
        }
    }
}

/// Intersection. The threshold rises to the larger of the two.
impl BitAnd for &PercentEncodeSet {
    type Output = PercentEncodeSet;

    fn bitand(self, other: &PercentEncodeSet) -> PercentEncodeSet {
        let members = self
            .members
            .iter()
            .copied()
            .filter(|c| other.members.binary_search(c).is_ok())
            .collect();
        PercentEncodeSet {
            members,
            threshold: self.threshold.max(other.threshold),
        }
    }
}

fn c0_controls() -> String {
    (0u32..0x20).filter_map(char::from_u32).collect()
}

// Sets from the URL Standard, <https://url.spec.whatwg.org/#percent-encoded-bytes>.

pub static C0_CONTROL_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| PercentEncodeSet::new(&c0_controls()));

pub static FRAGMENT_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| C0_CONTROL_ENCODE_SET.add(" \"<>`"));

pub static QUERY_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| C0_CONTROL_ENCODE_SET.add(" \"#<>"));

pub static SPECIAL_QUERY_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| QUERY_ENCODE_SET.add("'"));

pub static PATH_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| QUERY_ENCODE_SET.add("?`{}"));

pub static USERINFO_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| PATH_ENCODE_SET.add("/:;=@[\\]^|"));

// Sets from RFC 3986. The grammars there say which characters may appear
// unescaped, so these are built with the inverted constructor.

const ASCII_ALPHANUMERIC: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

static RFC3986_UNRESERVED: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| PercentEncodeSet::excluding(&format!("{}-._~", ASCII_ALPHANUMERIC)));

static RFC3986_SUB_DELIMS: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| PercentEncodeSet::excluding("!$&'()*+,;="));

pub static RFC3986_USERINFO_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| (&*RFC3986_UNRESERVED & &*RFC3986_SUB_DELIMS).sub(":"));

static RFC3986_PCHAR: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| (&*RFC3986_UNRESERVED & &*RFC3986_SUB_DELIMS).sub(":@"));

pub static RFC3986_PATH_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| RFC3986_PCHAR.sub("/"));

pub static RFC3986_QUERY_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| RFC3986_PCHAR.sub("/?"));

pub static RFC3986_FRAGMENT_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| RFC3986_PCHAR.sub("/?"));

// Sets from RFC 2396, the generation of the URI syntax that predates
// RFC 3986. `safe_url` keeps its output lawful under this grammar too.

static RFC2396_UNRESERVED: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| PercentEncodeSet::excluding(&format!("{}-_.!~*'()", ASCII_ALPHANUMERIC)));

pub static RFC2396_USERINFO_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| &*RFC2396_UNRESERVED & &PercentEncodeSet::excluding(";:&=+$,"));

pub static RFC2396_ABS_PATH_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| &*RFC2396_UNRESERVED & &PercentEncodeSet::excluding(":@&=+$,;/"));

pub static RFC2396_URIC_ENCODE_SET: LazyLock<PercentEncodeSet> =
    LazyLock::new(|| &*RFC2396_UNRESERVED & &PercentEncodeSet::excluding(";/?:@&=+$,"));

// The unions used by the safe-URL facade: escape whatever any of the three
// grammars requires escaped for the component.

pub static SAFE_USERINFO_ENCODE_SET: LazyLock<PercentEncodeSet> = LazyLock::new(|| {
    &(&*USERINFO_ENCODE_SET | &*RFC3986_USERINFO_ENCODE_SET) | &*RFC2396_USERINFO_ENCODE_SET
});

pub static SAFE_PATH_ENCODE_SET: LazyLock<PercentEncodeSet> = LazyLock::new(|| {
    &(&*PATH_ENCODE_SET | &*RFC3986_PATH_ENCODE_SET) | &*RFC2396_ABS_PATH_ENCODE_SET
});

pub static SAFE_QUERY_ENCODE_SET: LazyLock<PercentEncodeSet> = LazyLock::new(|| {
    &(&*QUERY_ENCODE_SET | &*RFC3986_QUERY_ENCODE_SET) | &*RFC2396_URIC_ENCODE_SET
});

pub static SAFE_SPECIAL_QUERY_ENCODE_SET: LazyLock<PercentEncodeSet> = LazyLock::new(|| {
    &(&*SPECIAL_QUERY_ENCODE_SET | &*RFC3986_QUERY_ENCODE_SET) | &*RFC2396_URIC_ENCODE_SET
});

pub static SAFE_FRAGMENT_ENCODE_SET: LazyLock<PercentEncodeSet> = LazyLock::new(|| {
    &(&*FRAGMENT_ENCODE_SET | &*RFC3986_FRAGMENT_ENCODE_SET) | &*RFC2396_URIC_ENCODE_SET
});

/// Percent-encode the UTF-8 encoding of `input` with `set`.
///
/// Existing escape sequences are preserved when the set contains `%`:
/// a `%` followed by two ASCII hex digits is taken to be an escape that is
/// already in place and is copied through, which is what keeps the encoder
/// idempotent. A `%` not followed by two hex digits becomes `%25`.
pub fn utf8_percent_encode(input: &str, set: &PercentEncodeSet) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::with_capacity(input.len());
    for (i, &c) in chars.iter().enumerate() {
        if !set.contains(c) {
            output.push(c);
        } else if c == '%'
            && chars.get(i + 1).is_some_and(char::is_ascii_hexdigit)
            && chars.get(i + 2).is_some_and(char::is_ascii_hexdigit)
        {
            output.push('%');
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                write!(output, "%{:02X}", byte).unwrap();
            }
        }
    }
    output
}

/// Percent-encode a byte sequence (already in the target encoding) with
/// `set`, applying the same idempotency rule at the byte level.
pub(crate) fn percent_encode_bytes(
    bytes: &[u8],
    set: &PercentEncodeSet,
    space_as_plus: bool,
    output: &mut String,
) {
    for (i, &byte) in bytes.iter().enumerate() {
        if space_as_plus && byte == b' ' {
            output.push('+');
        } else if !set.contains(char::from(byte)) {
            output.push(char::from(byte));
        } else if byte == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            output.push('%');
        } else {
            write!(output, "%{:02X}", byte).unwrap();
        }
    }
}

/// Percent-decode bytes. A `%` is only consumed when two ASCII hex digits
/// follow; anything else is copied through unchanged.
pub fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte == b'%' && i + 2 < input.len() {
            if let (Some(h), Some(l)) = (from_hex(input[i + 1]), from_hex(input[i + 2])) {
                output.push(h * 0x10 + l);
                i += 3;
                continue;
            }
        }
        output.push(byte);
        i += 1;
    }
    output
}

/// Percent-decode the UTF-8 bytes of a string.
#[inline]
pub fn percent_decode_str(input: &str) -> Vec<u8> {
    percent_decode(input.as_bytes())
}

#[inline]
pub(crate) fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte + 10 - b'A'),
        b'a'..=b'f' => Some(byte + 10 - b'a'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        assert!(QUERY_ENCODE_SET.contains('#'));
        assert!(QUERY_ENCODE_SET.contains(' '));
        assert!(QUERY_ENCODE_SET.contains('\u{1F}'));
        assert!(!QUERY_ENCODE_SET.contains('a'));
        assert!(!QUERY_ENCODE_SET.contains('%'));
        // Above-threshold membership is unconditional.
        assert!(QUERY_ENCODE_SET.contains('é'));
        assert!(QUERY_ENCODE_SET.contains('\u{10FFFF}'));
    }

    #[test]
    fn union_and_intersection_agree_with_membership() {
        let a = PercentEncodeSet::new("abc");
        let b = PercentEncodeSet::new("cde");
        let union = &a | &b;
        let inter = &a & &b;
        for c in "abcdefg".chars() {
            assert_eq!(union.contains(c), a.contains(c) || b.contains(c), "{:?}", c);
            assert_eq!(inter.contains(c), a.contains(c) && b.contains(c), "{:?}", c);
        }
    }

    #[test]
    fn add_and_sub() {
        let set = PercentEncodeSet::new("a");
        assert!(set.add("x").contains('x'));
        assert!(!set.add("x").contains('b'));
        assert!(!set.add("x").sub("x").contains('x'));
        // sub never removes above-threshold membership
        assert!(set.sub("é").contains('é'));
    }

    #[test]
    fn excluding_inverts() {
        let set = PercentEncodeSet::excluding("az");
        assert!(!set.contains('a'));
        assert!(!set.contains('z'));
        assert!(set.contains('b'));
        assert!(set.contains('%'));
        assert!(set.contains('\u{80}'));
    }

    #[test]
    fn basic_encoding() {
        assert_eq!(utf8_percent_encode("foo bar", &QUERY_ENCODE_SET), "foo%20bar");
        assert_eq!(utf8_percent_encode("/é", &C0_CONTROL_ENCODE_SET), "/%C3%A9");
    }

    #[test]
    fn existing_escapes_survive() {
        // '%' is in the RFC 3986 sets, so the idempotency rule is live.
        let set = &RFC3986_PATH_ENCODE_SET;
        assert_eq!(utf8_percent_encode("a%2Fb", set), "a%2Fb");
        assert_eq!(utf8_percent_encode("a%b", set), "a%25b");
        assert_eq!(utf8_percent_encode("a%2", set), "a%252");
        // With '%' outside the set it passes through untouched either way.
        assert_eq!(utf8_percent_encode("a%2Fb", &PATH_ENCODE_SET), "a%2Fb");
        assert_eq!(utf8_percent_encode("a%zz", &PATH_ENCODE_SET), "a%zz");
    }

    #[test]
    fn byte_level_encoding() {
        let mut out = String::new();
        percent_encode_bytes(b"a b", &QUERY_ENCODE_SET, false, &mut out);
        assert_eq!(out, "a%20b");
        let mut out = String::new();
        percent_encode_bytes(b"a b", &QUERY_ENCODE_SET, true, &mut out);
        assert_eq!(out, "a+b");
        let mut out = String::new();
        percent_encode_bytes(b"%41%4", &SAFE_QUERY_ENCODE_SET, false, &mut out);
        assert_eq!(out, "%41%254");
    }

    #[test]
    fn decoding() {
        assert_eq!(percent_decode_str("%41%20%7e"), b"A ~");
        assert_eq!(percent_decode_str("%4"), b"%4");
        assert_eq!(percent_decode_str("%zz"), b"%zz");
        assert_eq!(percent_decode_str("%%34%32"), b"%42");
    }

    #[test]
    fn safe_sets_cover_all_three_grammars() {
        // '<' comes from the WHATWG sets, '^' from RFC 3986 (not unreserved,
        // not a sub-delim), '{' from both RFCs.
        for c in ['<', '^', '{', '%'] {
            assert!(SAFE_QUERY_ENCODE_SET.contains(c), "{:?}", c);
        }
        // Characters lawful everywhere stay unescaped.
        for c in ['a', 'Z', '5', '-', '.', '~'] {
            assert!(!SAFE_PATH_ENCODE_SET.contains(c), "{:?}", c);
        }
        // '/' separates path segments and must never be escaped from the
        // path encoder.
        assert!(!SAFE_PATH_ENCODE_SET.contains('/'));
    }
}
