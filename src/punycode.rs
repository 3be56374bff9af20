// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Punycode ([RFC 3492](https://tools.ietf.org/html/rfc3492)) encoding of
//! Unicode labels, as used for the `xn--` ASCII-compatible form of
//! internationalised domain name labels.

use smallvec::SmallVec;

// Bootstring parameters for Punycode
const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

#[inline]
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

#[inline]
fn digit_value(byte: u8) -> Option<u32> {
    Some(match byte {
        b'0'..=b'9' => byte - b'0' + 26,
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a',
        _ => return None,
    } as u32)
}

#[inline]
fn value_to_digit(value: u32) -> char {
    match value {
        0..=25 => (value as u8 + b'a') as char,        // a..z
        26..=35 => (value as u8 - 26 + b'0') as char,  // 0..9
        _ => unreachable!(),
    }
}

/// Convert Punycode to a Unicode `String`.
///
/// Returns `None` on malformed input or overflow. Overflow can only happen
/// on inputs that take more than 63 encoded bytes, the DNS limit on domain
/// name labels.
pub fn decode_to_string(input: &str) -> Option<String> {
    let input = input.as_bytes();

    // Basic (ASCII) code points are carried as-is before the last
    // delimiter, if any.
    let (base, extended) = match input.iter().rposition(|&b| b == b'-') {
        Some(position) if position > 0 => (&input[..position], &input[position + 1..]),
        _ => (&input[..0], input),
    };
    if !base.is_ascii() {
        return None;
    }

    // Delta decoding produces (position, code point) insertions into the
    // basic string; positions are final positions in the decoded label.
    let mut insertions: SmallVec<[(usize, char); 59]> = SmallVec::new();
    let mut length = base.len() as u32;
    let mut code_point = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut i = 0u32;
    let mut iter = extended.iter();
    loop {
        let mut byte = match iter.next() {
            None => break,
            Some(byte) => byte,
        };
        let previous_i = i;
        let mut weight = 1u32;
        let mut k = BASE;

        // Decode one generalized variable-length integer into a delta,
        // which gets added to i.
        loop {
            let digit = digit_value(*byte)?;
            if digit > (u32::MAX - i) / weight {
                return None; // overflow
            }
            i += digit * weight;
            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            if weight > u32::MAX / (BASE - t) {
                return None; // overflow
            }
            weight *= BASE - t;
            k += BASE;
            byte = iter.next()?;
        }

        bias = adapt(i - previous_i, length + 1, previous_i == 0);
        if i / (length + 1) > u32::MAX - code_point {
            return None; // overflow
        }

        // i wraps around from length+1 to 0, incrementing code_point each
        // time.
        code_point += i / (length + 1);
        i %= length + 1;
        let c = char::from_u32(code_point)?;

        // Earlier insertions move further out in the string.
        for (idx, _) in insertions.iter_mut() {
            if *idx >= i as usize {
                *idx += 1;
            }
        }
        insertions.push((i as usize, c));
        length += 1;
        i += 1;
    }

    insertions.sort_by_key(|(idx, _)| *idx);
    let mut output: Vec<char> = base.iter().map(|&b| char::from(b)).collect();
    output.reserve(insertions.len());
    for &(idx, c) in &insertions {
        output.insert(idx, c);
    }
    Some(output.into_iter().collect())
}

/// Convert a Unicode `str` to Punycode.
///
/// Returns `None` on overflow, which can only happen on inputs that would
/// take more than 63 encoded bytes, the DNS limit on domain name labels.
pub fn encode_str(input: &str) -> Option<String> {
    let mut output = String::with_capacity(input.len());

    // Basic (ASCII) code points are carried as-is.
    let mut input_length = 0u32;
    let mut basic_length = 0u32;
    for c in input.chars() {
        input_length = input_length.checked_add(1)?;
        if c.is_ascii() {
            output.push(c);
            basic_length += 1;
        }
    }
    if basic_length > 0 {
        output.push('-');
    }

    let mut code_point = INITIAL_N;
    let mut delta = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut processed = basic_length;
    while processed < input_length {
        // All code points below code_point are handled; find the next
        // larger one.
        let min_code_point = input
            .chars()
            .map(|c| c as u32)
            .filter(|&c| c >= code_point)
            .min()
            .unwrap();
        if min_code_point - code_point > (u32::MAX - delta) / (processed + 1) {
            return None; // overflow
        }
        // Advance the decoder's <code_point, i> state to <min_code_point, 0>.
        delta += (min_code_point - code_point) * (processed + 1);
        code_point = min_code_point;
        for c in input.chars() {
            let c = c as u32;
            if c < code_point {
                delta = delta.checked_add(1)?;
            }
            if c == code_point {
                // Represent delta as a generalized variable-length integer.
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };
                    if q < t {
                        break;
                    }
                    output.push(value_to_digit(t + ((q - t) % (BASE - t))));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(value_to_digit(q));
                bias = adapt(delta, processed + 1, processed == basic_length);
                delta = 0;
                processed += 1;
            }
        }
        delta += 1;
        code_point += 1;
    }
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sample strings from RFC 3492 section 7.1.
    #[test]
    fn rfc_sample_arabic() {
        let unicode = "\u{644}\u{64A}\u{647}\u{645}\u{627}\u{628}\u{62A}\u{643}\u{644}\
                       \u{645}\u{648}\u{634}\u{639}\u{631}\u{628}\u{64A}\u{61F}";
        let encoded = "egbpdaj6bu4bxfgehfvwxn";
        assert_eq!(encode_str(unicode).as_deref(), Some(encoded));
        assert_eq!(decode_to_string(encoded).as_deref(), Some(unicode));
    }

    #[test]
    fn rfc_sample_mixed_ascii() {
        let unicode = "3\u{5E74}B\u{7D44}\u{91D1}\u{516B}\u{5148}\u{751F}";
        let encoded = "3B-ww4c5e180e575a65lsy2b";
        assert_eq!(encode_str(unicode).as_deref(), Some(encoded));
        assert_eq!(decode_to_string(encoded).as_deref(), Some(unicode));
    }

    #[test]
    fn test_tld() {
        assert_eq!(encode_str("テスト").as_deref(), Some("zckzah"));
        assert_eq!(decode_to_string("zckzah").as_deref(), Some("テスト"));
    }

    #[test]
    fn empty_and_ascii_only() {
        assert_eq!(decode_to_string("").as_deref(), Some(""));
        assert_eq!(encode_str("").as_deref(), Some(""));
        // A lone delimiter is not a valid extended string.
        assert_eq!(decode_to_string("-"), None);
        assert_eq!(decode_to_string("abc-"), Some("abc".to_string()));
    }

    #[test]
    fn malformed() {
        assert_eq!(decode_to_string("xyz!"), None);
        assert_eq!(decode_to_string("ls8h="), None);
    }
}
