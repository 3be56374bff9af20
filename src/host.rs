// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Host parsing and serialization: domains (through IDNA), opaque hosts,
//! and the IPv4/IPv6 address formats of the URL Standard, legacy spellings
//! included.

use std::fmt::{self, Formatter, Write};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::infra::is_c0_control;
use crate::percent_encoding::{
    from_hex, percent_decode_str, utf8_percent_encode, C0_CONTROL_ENCODE_SET,
};
use crate::uts46;
use crate::ParseError;

/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
const FORBIDDEN_HOST_CODE_POINTS: &str = "\0\t\n\r #/:<>?@[\\]^|";

fn is_forbidden_host_code_point(c: char) -> bool {
    FORBIDDEN_HOST_CODE_POINTS.contains(c)
}

/// Forbidden-host plus C0 controls, `%` and DELETE.
fn is_forbidden_domain_code_point(c: char) -> bool {
    is_forbidden_host_code_point(c) || is_c0_control(c) || c == '%' || c == '\u{007F}'
}

/// The host name of an URL.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub enum Host {
    /// A (DNS) domain name, already in its ASCII form.
    Domain(String),
    /// The host of a non-special URL, kept verbatim apart from C0
    /// percent-encoding. May be empty.
    Opaque(String),
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address, written inside `[…]` square brackets so that `:`
    /// colons in the address are not ambiguous with the port delimiter.
    Ipv6(Ipv6Addr),
}

impl Host {
    /// Parse a host within a URL of the given specialness: an IPv6 address
    /// in square brackets, an opaque host for non-special schemes, and
    /// otherwise a domain run through IDNA, with an all-numeric final
    /// label turning the whole host into an IPv4 address.
    pub fn parse(input: &str, is_special: bool) -> Result<Host, ParseError> {
        if let Some(rest) = input.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or(ParseError::InvalidIpv6Address)?;
            return parse_ipv6(inner).map(Host::Ipv6);
        }
        if !is_special {
            return Host::parse_opaque(input);
        }
        let decoded = percent_decode_str(input);
        let domain = String::from_utf8_lossy(&decoded);
        let ascii_domain =
            uts46::domain_to_ascii(&domain).map_err(|_| ParseError::IdnaError)?;
        if ascii_domain.chars().any(is_forbidden_domain_code_point) {
            return Err(ParseError::InvalidDomainCharacter);
        }
        if ends_in_a_number(&ascii_domain) {
            return parse_ipv4(&ascii_domain).map(Host::Ipv4);
        }
        Ok(Host::Domain(ascii_domain))
    }

    /// <https://url.spec.whatwg.org/#concept-opaque-host-parser>
    fn parse_opaque(input: &str) -> Result<Host, ParseError> {
        if input.chars().any(is_forbidden_host_code_point) {
            return Err(ParseError::ForbiddenHostCodePoint);
        }
        Ok(Host::Opaque(utf8_percent_encode(
            input,
            &C0_CONTROL_ENCODE_SET,
        )))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(domain) | Host::Opaque(domain) => f.write_str(domain),
            Host::Ipv4(addr) => addr.fmt(f),
            Host::Ipv6(addr) => {
                f.write_str("[")?;
                write_ipv6(addr, f)?;
                f.write_str("]")
            }
        }
    }
}

/// <https://url.spec.whatwg.org/#ends-in-a-number-checker>
fn ends_in_a_number(input: &str) -> bool {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") {
        if parts.len() == 1 {
            return false;
        }
        parts.pop();
    }
    let last = match parts.last() {
        Some(last) => *last,
        None => return false,
    };
    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    parse_ipv4_number(last).is_ok()
}

/// <https://url.spec.whatwg.org/#ipv4-number-parser>
///
/// Accepts the legacy `0x` hexadecimal and `0` octal prefixes. Values
/// saturate well above the 32-bit range; the callers' range checks reject
/// anything saturated.
fn parse_ipv4_number(input: &str) -> Result<u64, ()> {
    if input.is_empty() {
        return Err(());
    }
    let (digits, radix) = if input.starts_with("0x") || input.starts_with("0X") {
        (&input[2..], 16)
    } else if input.len() >= 2 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };
    if digits.is_empty() {
        return Ok(0);
    }
    let mut value = 0u64;
    for byte in digits.bytes() {
        let digit = from_hex(byte).filter(|&d| u32::from(d) < radix).ok_or(())?;
        value = value
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
    }
    Ok(value)
}

/// <https://url.spec.whatwg.org/#concept-ipv4-parser>
pub(crate) fn parse_ipv4(input: &str) -> Result<Ipv4Addr, ParseError> {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    if parts.len() > 4 {
        return Err(ParseError::InvalidIpv4Address);
    }
    let mut numbers = Vec::with_capacity(parts.len());
    for part in parts {
        numbers.push(parse_ipv4_number(part).map_err(|()| ParseError::InvalidIpv4Address)?);
    }
    let last = *numbers.last().ok_or(ParseError::InvalidIpv4Address)?;
    if numbers[..numbers.len() - 1].iter().any(|&n| n > 255) {
        return Err(ParseError::InvalidIpv4Address);
    }
    if last >= 256u64.pow(5 - numbers.len() as u32) {
        return Err(ParseError::InvalidIpv4Address);
    }
    let mut address = last as u32;
    for (counter, &n) in numbers[..numbers.len() - 1].iter().enumerate() {
        address += (n as u32) << (8 * (3 - counter as u32));
    }
    Ok(Ipv4Addr::from(address))
}

/// <https://url.spec.whatwg.org/#concept-ipv6-parser>
pub(crate) fn parse_ipv6(input: &str) -> Result<Ipv6Addr, ParseError> {
    let input = input.as_bytes();
    let len = input.len();
    let mut pieces = [0u16; 8];
    let mut piece_index = 0;
    let mut compress = None;
    let mut pointer = 0;

    if input.first() == Some(&b':') {
        if input.get(1) != Some(&b':') {
            return Err(ParseError::InvalidIpv6Address);
        }
        pointer = 2;
        piece_index = 1;
        compress = Some(piece_index);
    }

    while pointer < len {
        if piece_index == 8 {
            return Err(ParseError::InvalidIpv6Address);
        }
        if input[pointer] == b':' {
            if compress.is_some() {
                return Err(ParseError::InvalidIpv6Address);
            }
            pointer += 1;
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }
        let mut value = 0u16;
        let mut length = 0;
        while length < 4 && pointer < len {
            match from_hex(input[pointer]) {
                Some(digit) => {
                    value = value * 0x10 + u16::from(digit);
                    pointer += 1;
                    length += 1;
                }
                None => break,
            }
        }
        if pointer < len && input[pointer] == b'.' {
            // Embedded dotted-quad in the final 32 bits.
            if length == 0 {
                return Err(ParseError::InvalidIpv6Address);
            }
            pointer -= length;
            if piece_index > 6 {
                return Err(ParseError::InvalidIpv6Address);
            }
            let mut numbers_seen = 0;
            while pointer < len {
                if numbers_seen > 0 {
                    if numbers_seen < 4 && input[pointer] == b'.' {
                        pointer += 1;
                    } else {
                        return Err(ParseError::InvalidIpv6Address);
                    }
                }
                let mut ipv4_piece: Option<u16> = None;
                if !input.get(pointer).is_some_and(u8::is_ascii_digit) {
                    return Err(ParseError::InvalidIpv6Address);
                }
                while pointer < len && input[pointer].is_ascii_digit() {
                    let number = u16::from(input[pointer] - b'0');
                    ipv4_piece = match ipv4_piece {
                        None => Some(number),
                        Some(0) => return Err(ParseError::InvalidIpv6Address),
                        Some(piece) => Some(piece * 10 + number),
                    };
                    if ipv4_piece > Some(255) {
                        return Err(ParseError::InvalidIpv6Address);
                    }
                    pointer += 1;
                }
                pieces[piece_index] = pieces[piece_index] * 0x100
                    + ipv4_piece.ok_or(ParseError::InvalidIpv6Address)?;
                numbers_seen += 1;
                if numbers_seen == 2 || numbers_seen == 4 {
                    piece_index += 1;
                }
            }
            if numbers_seen != 4 {
                return Err(ParseError::InvalidIpv6Address);
            }
            break;
        } else if pointer < len && input[pointer] == b':' {
            pointer += 1;
            if pointer == len {
                return Err(ParseError::InvalidIpv6Address);
            }
        } else if pointer < len {
            return Err(ParseError::InvalidIpv6Address);
        }
        pieces[piece_index] = value;
        piece_index += 1;
    }

    match compress {
        Some(compress) => {
            let mut swaps = piece_index - compress;
            piece_index = 7;
            while piece_index != 0 && swaps > 0 {
                pieces.swap(piece_index, compress + swaps - 1);
                piece_index -= 1;
                swaps -= 1;
            }
        }
        None => {
            if piece_index != 8 {
                return Err(ParseError::InvalidIpv6Address);
            }
        }
    }
    Ok(Ipv6Addr::new(
        pieces[0], pieces[1], pieces[2], pieces[3], pieces[4], pieces[5], pieces[6], pieces[7],
    ))
}

/// Index of the first longest run of at least two zero pieces, the run the
/// serializer elides as `::`.
fn first_longest_zero_run(pieces: &[u16; 8]) -> Option<usize> {
    let mut best = None;
    let mut best_length = 0;
    let mut current_length = 0;
    for (i, &piece) in pieces.iter().enumerate() {
        if piece != 0 {
            current_length = 0;
            continue;
        }
        current_length += 1;
        if current_length > best_length && current_length >= 2 {
            best = Some(i + 1 - current_length);
            best_length = current_length;
        }
    }
    best
}

/// <https://url.spec.whatwg.org/#concept-ipv6-serializer>
fn write_ipv6(addr: &Ipv6Addr, f: &mut Formatter<'_>) -> fmt::Result {
    let pieces = addr.segments();
    let compress = first_longest_zero_run(&pieces);
    let mut ignore0 = false;
    for (piece_index, &piece) in pieces.iter().enumerate() {
        if ignore0 {
            if piece == 0 {
                continue;
            }
            ignore0 = false;
        }
        if compress == Some(piece_index) {
            f.write_str(if piece_index == 0 { "::" } else { ":" })?;
            ignore0 = true;
            continue;
        }
        write!(f, "{:x}", piece)?;
        if piece_index != 7 {
            f.write_char(':')?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ipv4(input: &str) -> Result<Ipv4Addr, ParseError> {
        parse_ipv4(input)
    }

    fn ipv6(input: &str) -> String {
        Host::Ipv6(parse_ipv6(input).unwrap()).to_string()
    }

    #[test]
    fn domains() {
        assert_matches!(
            Host::parse("example.com", true),
            Ok(Host::Domain(d)) if d == "example.com"
        );
        assert_matches!(
            Host::parse("EXAMPLE.com", true),
            Ok(Host::Domain(d)) if d == "example.com"
        );
        assert_matches!(
            Host::parse("ex%61mple.com", true),
            Ok(Host::Domain(d)) if d == "example.com"
        );
        assert_matches!(
            Host::parse("例え.テスト", true),
            Ok(Host::Domain(d)) if d == "xn--r8jz45g.xn--zckzah"
        );
    }

    #[test]
    fn forbidden_domain_code_points() {
        assert_matches!(Host::parse("a%ZZb", true), Err(ParseError::InvalidDomainCharacter));
        assert_matches!(Host::parse("a b", true), Err(_));
        assert_matches!(Host::parse("a\u{0}b", true), Err(_));
    }

    #[test]
    fn opaque_hosts() {
        assert_matches!(
            Host::parse("EXAMPLE.com", false),
            Ok(Host::Opaque(h)) if h == "EXAMPLE.com"
        );
        assert_matches!(
            Host::parse("a%ZZb", false),
            Ok(Host::Opaque(h)) if h == "a%ZZb"
        );
        assert_matches!(Host::parse("a<b", false), Err(ParseError::ForbiddenHostCodePoint));
        assert_matches!(Host::parse("a b", false), Err(ParseError::ForbiddenHostCodePoint));
        // Non-ASCII is percent-encoded, not IDNA-mapped.
        assert_matches!(
            Host::parse("café", false),
            Ok(Host::Opaque(h)) if h == "caf%C3%A9"
        );
    }

    #[test]
    fn ipv4_plain() {
        assert_eq!(ipv4("192.168.0.1").unwrap(), Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(ipv4("0.0.0.0").unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(ipv4("255.255.255.255").unwrap(), Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn ipv4_legacy_forms() {
        // Hex, octal, fewer-than-four parts and a trailing dot all parse.
        assert_eq!(ipv4("0x7f.0.0.1").unwrap(), Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(ipv4("017700000001").unwrap(), Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(ipv4("2130706433").unwrap(), Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(ipv4("192.168.257").unwrap(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(ipv4("192.168.0.1.").unwrap(), Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(ipv4("0x").unwrap(), Ipv4Addr::new(0, 0, 0, 0));
    }

    #[test]
    fn ipv4_range_errors() {
        assert_matches!(ipv4("256.0.0.1"), Err(ParseError::InvalidIpv4Address));
        assert_matches!(ipv4("192.168.0.256"), Err(ParseError::InvalidIpv4Address));
        assert_matches!(ipv4("4294967296"), Err(ParseError::InvalidIpv4Address));
        assert_matches!(ipv4("1.2.3.4.5"), Err(ParseError::InvalidIpv4Address));
        assert_matches!(ipv4("1..2"), Err(ParseError::InvalidIpv4Address));
        assert_matches!(ipv4("0x100000000"), Err(ParseError::InvalidIpv4Address));
    }

    #[test]
    fn host_dispatches_numeric_endings_to_ipv4() {
        assert_matches!(Host::parse("192.168.0.1", true), Ok(Host::Ipv4(_)));
        assert_matches!(Host::parse("example.0x7F", true), Err(ParseError::InvalidIpv4Address));
        // A name whose last label is not numeric stays a domain.
        assert_matches!(Host::parse("192.168.0.example", true), Ok(Host::Domain(_)));
    }

    #[test]
    fn ipv6_parsing() {
        assert_eq!(
            parse_ipv6("1:2:3:4:5:6:7:8").unwrap().segments(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(parse_ipv6("::1").unwrap(), Ipv6Addr::LOCALHOST);
        assert_eq!(parse_ipv6("::").unwrap().segments(), [0; 8]);
        assert_eq!(
            parse_ipv6("2001:db8::8:800:200c:417a").unwrap().segments(),
            [0x2001, 0xdb8, 0, 0, 8, 0x800, 0x200c, 0x417a]
        );
        assert_eq!(
            parse_ipv6("::ffff:192.168.0.1").unwrap().segments(),
            [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x1]
        );
    }

    #[test]
    fn ipv6_errors() {
        for input in [
            "",
            ":",
            ":::",
            "1:2:3:4:5:6:7:8:9",
            "1::2::3",
            "12345::",
            "1:2:3",
            "::ffff:1.2.3.4.5",
            "::ffff:300.1.1.1",
            "::ffff:1.2",
            "1:",
            "::%eth0",
        ] {
            assert_matches!(parse_ipv6(input), Err(ParseError::InvalidIpv6Address), "{}", input);
        }
    }

    #[test]
    fn ipv6_serialization_compresses_first_longest_run() {
        assert_eq!(ipv6("::1"), "[::1]");
        assert_eq!(ipv6("::"), "[::]");
        assert_eq!(ipv6("1:0:0:2:0:0:0:3"), "[1:0:0:2::3]");
        assert_eq!(ipv6("1:0:0:2:0:0:3:4"), "[1::2:0:0:3:4]");
        // A lone zero piece is never compressed.
        assert_eq!(ipv6("1:2:3:4:5:6:0:8"), "[1:2:3:4:5:6:0:8]");
        assert_eq!(ipv6("2001:DB8::8:800:200C:417A"), "[2001:db8::8:800:200c:417a]");
    }

    #[test]
    fn ends_in_a_number_checker() {
        assert!(ends_in_a_number("192.168.0.1"));
        assert!(ends_in_a_number("example.0x1f"));
        assert!(ends_in_a_number("example.07"));
        assert!(ends_in_a_number("example.3."));
        assert!(!ends_in_a_number("example.com"));
        assert!(!ends_in_a_number("1.example"));
        assert!(!ends_in_a_number(""));
        assert!(!ends_in_a_number("."));
    }
}
