// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](https://www.unicode.org/reports/tr46/)
//!
//! The mapping data ships as a plain-text table (`IdnaMappingTable.txt`,
//! derived from the Unicode Character Database) that is parsed once, on
//! first use, into a sorted range table. Everything downstream lives
//! here: mapping, NFC normalisation, label validity, CONTEXTJ, bidi,
//! Punycode conversion and the DNS length check.

use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::{canonical_combining_class, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

use crate::joining_types::{joining_type, JoiningType};
use crate::punycode;

const PUNYCODE_PREFIX: &str = "xn--";

/// One entry of the IDNA mapping table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mapping {
    Valid,
    Ignored,
    Mapped(Box<str>),
    Deviation(Box<str>),
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped(Box<str>),
}

struct MappingRange {
    from: u32,
    to: u32,
    mapping: Mapping,
}

/// The code point → (status, mapping) table, keyed by sorted ranges.
pub(crate) struct MappingTable {
    ranges: Vec<MappingRange>,
}

/// A line of mapping data that did not parse. The table is loaded at
/// startup and the processor cannot run without it, so this is fatal.
#[derive(Debug)]
pub struct MappingDataError {
    line: usize,
    reason: &'static str,
}

impl fmt::Display for MappingDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IDNA mapping data line {}: {}", self.line, self.reason)
    }
}

impl StdError for MappingDataError {}

fn parse_code_point(field: &str, line: usize) -> Result<u32, MappingDataError> {
    let cp = u32::from_str_radix(field, 16).map_err(|_| MappingDataError {
        line,
        reason: "expected a hexadecimal code point",
    })?;
    if cp > 0x10FFFF {
        return Err(MappingDataError {
            line,
            reason: "code point out of range",
        });
    }
    Ok(cp)
}

impl MappingTable {
    /// Parse mapping data in the published `IdnaMappingTable.txt` format:
    /// one `codepoint(s) ; status [ ; mapping ]` entry per line, `#` to end
    /// of line is comment, blank lines ignored.
    pub(crate) fn parse(data: &str) -> Result<MappingTable, MappingDataError> {
        let mut ranges: Vec<MappingRange> = Vec::new();
        for (i, full_line) in data.lines().enumerate() {
            let line_number = i + 1;
            let line = full_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(';').map(str::trim);
            let code_points = fields.next().unwrap_or("");
            let status = fields.next().ok_or(MappingDataError {
                line: line_number,
                reason: "missing status field",
            })?;
            let mapping_field = fields.next();
            if fields.next().is_some() {
                return Err(MappingDataError {
                    line: line_number,
                    reason: "too many fields",
                });
            }

            let (from, to) = match code_points.split_once("..") {
                Some((from, to)) => (
                    parse_code_point(from, line_number)?,
                    parse_code_point(to, line_number)?,
                ),
                None => {
                    let cp = parse_code_point(code_points, line_number)?;
                    (cp, cp)
                }
            };
            if from > to {
                return Err(MappingDataError {
                    line: line_number,
                    reason: "range out of order",
                });
            }

            let mapping_chars = |line: usize| -> Result<Box<str>, MappingDataError> {
                mapping_field
                    .unwrap_or("")
                    .split_whitespace()
                    .map(|field| {
                        char::from_u32(parse_code_point(field, line)?).ok_or(MappingDataError {
                            line,
                            reason: "mapping is not a scalar value",
                        })
                    })
                    .collect::<Result<String, _>>()
                    .map(String::into_boxed_str)
            };
            let mapping = match status {
                "valid" => Mapping::Valid,
                "ignored" => Mapping::Ignored,
                "mapped" => Mapping::Mapped(mapping_chars(line_number)?),
                "deviation" => Mapping::Deviation(mapping_chars(line_number)?),
                "disallowed" => Mapping::Disallowed,
                "disallowed_STD3_valid" => Mapping::DisallowedStd3Valid,
                "disallowed_STD3_mapped" => {
                    Mapping::DisallowedStd3Mapped(mapping_chars(line_number)?)
                }
                _ => {
                    return Err(MappingDataError {
                        line: line_number,
                        reason: "unknown status",
                    })
                }
            };
            if let Some(previous) = ranges.last() {
                if previous.to >= from {
                    return Err(MappingDataError {
                        line: line_number,
                        reason: "ranges overlap or are out of order",
                    });
                }
            }
            ranges.push(MappingRange { from, to, mapping });
        }
        Ok(MappingTable { ranges })
    }

    fn get(&self, c: char) -> Option<&Mapping> {
        let cp = c as u32;
        self.ranges
            .binary_search_by(|range| {
                if cp < range.from {
                    std::cmp::Ordering::Greater
                } else if cp > range.to {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|i| &self.ranges[i].mapping)
    }
}

fn mapping_table() -> &'static MappingTable {
    static TABLE: OnceLock<MappingTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        MappingTable::parse(include_str!("IdnaMappingTable.txt"))
            .expect("embedded IDNA mapping data is malformed")
    })
}

/// Flags for UTS #46 processing.
///
/// The defaults are those of the WHATWG URL Standard's domain-to-ASCII in
/// its non-strict form: no STD3 restrictions, non-transitional, hyphens
/// unchecked, no DNS length verification, with the bidi and joiner checks
/// on.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    use_std3_ascii_rules: bool,
    transitional_processing: bool,
    check_hyphens: bool,
    check_bidi: bool,
    check_joiners: bool,
    verify_dns_length: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            use_std3_ascii_rules: false,
            transitional_processing: false,
            check_hyphens: false,
            check_bidi: true,
            check_joiners: true,
            verify_dns_length: false,
        }
    }
}

impl Config {
    #[inline]
    pub fn use_std3_ascii_rules(mut self, value: bool) -> Self {
        self.use_std3_ascii_rules = value;
        self
    }

    #[inline]
    pub fn transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    #[inline]
    pub fn check_hyphens(mut self, value: bool) -> Self {
        self.check_hyphens = value;
        self
    }

    #[inline]
    pub fn check_bidi(mut self, value: bool) -> Self {
        self.check_bidi = value;
        self
    }

    #[inline]
    pub fn check_joiners(mut self, value: bool) -> Self {
        self.check_joiners = value;
        self
    }

    #[inline]
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    /// <https://www.unicode.org/reports/tr46/#ToASCII>
    pub fn to_ascii(self, domain: &str) -> Result<String, Errors> {
        let mut errors = Vec::new();
        let mut result = String::with_capacity(domain.len());
        let mut first = true;
        for label in processing(domain, self, &mut errors).split('.') {
            if !first {
                result.push('.');
            }
            first = false;
            if label.is_ascii() {
                result.push_str(label);
            } else {
                match punycode::encode_str(label) {
                    Some(encoded) => {
                        result.push_str(PUNYCODE_PREFIX);
                        result.push_str(&encoded);
                    }
                    None => errors.push(Error::Punycode),
                }
            }
        }

        if self.verify_dns_length {
            let domain = result.strip_suffix('.').unwrap_or(&result);
            if domain.is_empty() || domain.split('.').any(str::is_empty) {
                errors.push(Error::TooShortForDns);
            }
            if domain.len() > 253 || domain.split('.').any(|label| label.len() > 63) {
                errors.push(Error::TooLongForDns);
            }
        }
        if errors.is_empty() {
            Ok(result)
        } else {
            Err(Errors(errors))
        }
    }
}

/// The domain-to-ASCII entry point with the default (WHATWG, non-strict)
/// configuration.
pub fn domain_to_ascii(domain: &str) -> Result<String, Errors> {
    Config::default().to_ascii(domain)
}

fn map_char(c: char, config: Config, output: &mut String, errors: &mut Vec<Error>) {
    match mapping_table().get(c) {
        Some(Mapping::Valid) => output.push(c),
        Some(Mapping::Ignored) => {}
        Some(Mapping::Mapped(mapping)) => output.push_str(mapping),
        Some(Mapping::Deviation(mapping)) => {
            if config.transitional_processing {
                output.push_str(mapping)
            } else {
                output.push(c)
            }
        }
        Some(Mapping::Disallowed) => {
            errors.push(Error::DisallowedCharacter);
            output.push(c);
        }
        Some(Mapping::DisallowedStd3Valid) => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedByStd3AsciiRules);
            }
            output.push(c)
        }
        Some(Mapping::DisallowedStd3Mapped(mapping)) => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedMappedInStd3);
            }
            output.push_str(mapping)
        }
        // The published table covers the whole code point space; a partial
        // table fails closed.
        None => {
            errors.push(Error::DisallowedCharacter);
            output.push(c);
        }
    }
}

fn is_bidi_domain(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// RFC 5893 bidi rules 1–6, applied per label. Rule 0: the rules only
/// apply inside a bidi domain name, one with at least one RTL label.
fn passes_bidi(label: &str, is_bidi_domain: bool) -> bool {
    if !is_bidi_domain {
        return true;
    }

    let mut chars = label.chars();
    let first_char_class = match chars.next() {
        Some(c) => bidi_class(c),
        None => return true,
    };

    match first_char_class {
        // LTR label
        BidiClass::L => {
            // Rule 5
            for c in chars {
                if !matches!(
                    bidi_class(c),
                    BidiClass::L
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            // Rule 6: ends in L or EN, followed by zero or more NSM.
            let last = label
                .chars()
                .rev()
                .map(bidi_class)
                .find(|&class| class != BidiClass::NSM);
            matches!(last, None | Some(BidiClass::L) | Some(BidiClass::EN))
        }
        // RTL label
        BidiClass::R | BidiClass::AL => {
            let mut found_en = false;
            let mut found_an = false;
            // Rule 2
            for c in chars {
                let class = bidi_class(c);
                found_en |= class == BidiClass::EN;
                found_an |= class == BidiClass::AN;
                if !matches!(
                    class,
                    BidiClass::R
                        | BidiClass::AL
                        | BidiClass::AN
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            // Rule 3: ends in R, AL, EN or AN, followed by zero or more NSM.
            let last = label
                .chars()
                .rev()
                .map(bidi_class)
                .find(|&class| class != BidiClass::NSM);
            if !matches!(
                last,
                Some(BidiClass::R) | Some(BidiClass::AL) | Some(BidiClass::EN) | Some(BidiClass::AN)
            ) {
                return false;
            }
            // Rule 4: EN and AN do not mix.
            !(found_an && found_en)
        }
        // Rule 1: the first character must be L, R or AL.
        _ => false,
    }
}

/// RFC 5892 appendix A.1 (ZERO WIDTH NON-JOINER) and A.2 (ZERO WIDTH
/// JOINER) contextual rules.
fn passes_contextj(label: &str) -> bool {
    if !label.contains(['\u{200C}', '\u{200D}']) {
        return true;
    }
    let chars: Vec<char> = label.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\u{200D}' => {
                // Allowed only directly after a virama.
                if i == 0 || canonical_combining_class(chars[i - 1]) != 9 {
                    return false;
                }
            }
            '\u{200C}' => {
                if i > 0 && canonical_combining_class(chars[i - 1]) == 9 {
                    continue;
                }
                // Otherwise the joiner must sit between L/D and R/D,
                // looking through transparent characters.
                let before = chars[..i]
                    .iter()
                    .rev()
                    .map(|&c| joining_type(c))
                    .find(|jt| *jt != Some(JoiningType::Transparent));
                let after = chars[i + 1..]
                    .iter()
                    .map(|&c| joining_type(c))
                    .find(|jt| *jt != Some(JoiningType::Transparent));
                let before_ok = matches!(
                    before,
                    Some(Some(JoiningType::LeftJoining)) | Some(Some(JoiningType::DualJoining))
                );
                let after_ok = matches!(
                    after,
                    Some(Some(JoiningType::RightJoining)) | Some(Some(JoiningType::DualJoining))
                );
                if !(before_ok && after_ok) {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Validity criteria for one label,
/// <https://www.unicode.org/reports/tr46/#Validity_Criteria>. NFC (V1) is
/// established by the caller; bidi (V8) runs in `processing` because it
/// needs whole-domain context.
fn is_valid(label: &str, config: Config) -> bool {
    let first_char = match label.chars().next() {
        Some(c) => c,
        None => return true,
    };

    if config.check_hyphens {
        // No hyphen in both the third and fourth position, and neither
        // leading nor trailing hyphen.
        if label.as_bytes().get(2..4) == Some(&b"--"[..]) {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
    }

    // Cannot contain a '.', guaranteed by the caller's label split.

    // Cannot begin with a combining mark.
    if is_combining_mark(first_char) {
        return false;
    }

    // Every code point must be valid under the mapping table.
    if label.chars().any(|c| match mapping_table().get(c) {
        Some(Mapping::Valid) => false,
        Some(Mapping::Deviation(_)) => config.transitional_processing,
        Some(Mapping::DisallowedStd3Valid) => config.use_std3_ascii_rules,
        _ => true,
    }) {
        return false;
    }

    if config.check_joiners && !passes_contextj(label) {
        return false;
    }

    true
}

/// <https://www.unicode.org/reports/tr46/#Processing>
fn processing(domain: &str, config: Config, errors: &mut Vec<Error>) -> String {
    // Weed out the common case: all-lowercase ASCII with no label that
    // starts with the Punycode prefix or leads/ends with a hyphen. The
    // hyphen-position rules still need the full path.
    if !config.check_hyphens {
        let (mut prev, mut simple, mut puny_prefix) = ('?', !domain.is_empty(), 0);
        for c in domain.chars() {
            if c == '.' {
                if prev == '-' {
                    simple = false;
                    break;
                }
                puny_prefix = 0;
                continue;
            } else if puny_prefix == 0 && c == '-' {
                simple = false;
                break;
            } else if puny_prefix < 5 {
                if c == ['x', 'n', '-', '-'][puny_prefix] {
                    puny_prefix += 1;
                    if puny_prefix == 4 {
                        simple = false;
                        break;
                    }
                } else {
                    puny_prefix = 5;
                }
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() {
                simple = false;
                break;
            }
            prev = c;
        }
        if simple && prev != '-' {
            return domain.to_owned();
        }
    }

    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        map_char(c, config, &mut mapped, errors)
    }
    let normalized: String = mapped.nfc().collect();

    let mut validated = String::with_capacity(normalized.len());
    let mut valid = true;
    let mut has_bidi_labels = false;
    let mut first = true;
    for label in normalized.split('.') {
        if !first {
            validated.push('.');
        }
        first = false;
        if let Some(remainder) = label.strip_prefix(PUNYCODE_PREFIX) {
            match punycode::decode_to_string(remainder) {
                Some(decoded) => {
                    has_bidi_labels |= is_bidi_domain(&decoded);
                    // A decoded label is validated non-transitionally and
                    // must already be NFC.
                    let config = config.transitional_processing(false);
                    if decoded.nfc().ne(decoded.chars()) || !is_valid(&decoded, config) {
                        valid = false;
                    }
                    validated.push_str(&decoded)
                }
                None => {
                    has_bidi_labels = true;
                    errors.push(Error::Punycode);
                }
            }
        } else {
            has_bidi_labels |= is_bidi_domain(label);
            valid &= is_valid(label, config);
            validated.push_str(label)
        }
    }

    if config.check_bidi {
        for label in validated.split('.') {
            if !passes_bidi(label, has_bidi_labels) {
                valid = false;
                break;
            }
        }
    }

    if !valid {
        errors.push(Error::ValidityCriteria);
    }

    validated
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Error {
    Punycode,
    ValidityCriteria,
    DisallowedByStd3AsciiRules,
    DisallowedMappedInStd3,
    DisallowedCharacter,
    TooLongForDns,
    TooShortForDns,
}

impl Error {
    fn as_str(&self) -> &'static str {
        match self {
            Error::Punycode => "punycode error",
            Error::ValidityCriteria => "failed validity criteria",
            Error::DisallowedByStd3AsciiRules => "disallowed ASCII character",
            Error::DisallowedMappedInStd3 => "disallowed mapped ASCII character",
            Error::DisallowedCharacter => "disallowed character",
            Error::TooLongForDns => "too long for DNS",
            Error::TooShortForDns => "too short for DNS",
        }
    }
}

/// Errors recorded during UTS #46 processing.
#[derive(Debug)]
pub struct Errors(Vec<Error>);

impl StdError for Errors {}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(error.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_accepts_the_published_format() {
        let table = MappingTable::parse(
            "# comment\n\
             \n\
             0041 ; mapped ; 0061  # LATIN CAPITAL LETTER A\n\
             0061..007A ; valid\n\
             00A0 ; disallowed_STD3_mapped ; 0020\n\
             00AD ; ignored\n\
             00DF ; deviation ; 0073 0073\n\
             2260 ; disallowed\n\
             005F ; disallowed_STD3_valid\n",
        );
        // Out-of-order on purpose: 005F after 2260.
        assert!(table.is_err());

        let table = MappingTable::parse(
            "0041 ; mapped ; 0061\n\
             005F ; disallowed_STD3_valid\n\
             0061..007A ; valid\n\
             00A0 ; disallowed_STD3_mapped ; 0020\n\
             00AD ; ignored\n\
             00DF ; deviation ; 0073 0073\n\
             200C..200D ; deviation ;\n\
             2260 ; disallowed\n",
        )
        .unwrap();
        assert_eq!(table.get('A'), Some(&Mapping::Mapped("a".into())));
        assert_eq!(table.get('m'), Some(&Mapping::Valid));
        assert_eq!(table.get('_'), Some(&Mapping::DisallowedStd3Valid));
        assert_eq!(table.get('\u{AD}'), Some(&Mapping::Ignored));
        assert_eq!(table.get('ß'), Some(&Mapping::Deviation("ss".into())));
        assert_eq!(table.get('\u{200C}'), Some(&Mapping::Deviation("".into())));
        assert_eq!(table.get('≠'), Some(&Mapping::Disallowed));
        assert_eq!(table.get('!'), None);
    }

    #[test]
    fn loader_rejects_garbage() {
        assert!(MappingTable::parse("zzzz ; valid\n").is_err());
        assert!(MappingTable::parse("0041 ; sideways\n").is_err());
        assert!(MappingTable::parse("0041\n").is_err());
        assert!(MappingTable::parse("0050..0041 ; valid\n").is_err());
        assert!(MappingTable::parse("0041 ; mapped ; D800\n").is_err());
        assert!(MappingTable::parse("110000 ; valid\n").is_err());
    }

    #[test]
    fn embedded_table_loads() {
        let table = mapping_table();
        assert_eq!(table.get('A'), Some(&Mapping::Mapped("a".into())));
        assert_eq!(table.get('a'), Some(&Mapping::Valid));
        assert!(matches!(table.get('\u{00DF}'), Some(Mapping::Deviation(_))));
    }

    #[test]
    fn ascii_domains_pass_through() {
        assert_eq!(domain_to_ascii("example.com").unwrap(), "example.com");
        assert_eq!(domain_to_ascii("EXAMPLE.COM").unwrap(), "example.com");
        assert_eq!(domain_to_ascii("a.b.c.").unwrap(), "a.b.c.");
    }

    #[test]
    fn unicode_domains_become_punycode() {
        assert_eq!(domain_to_ascii("bücher.de").unwrap(), "xn--bcher-kva.de");
        assert_eq!(
            domain_to_ascii("例え.テスト").unwrap(),
            "xn--r8jz45g.xn--zckzah"
        );
    }

    #[test]
    fn fullwidth_and_case_mapping() {
        // Fullwidth full stop maps to '.', fullwidth letters to ASCII.
        assert_eq!(domain_to_ascii("ｅｘａｍｐｌｅ。com").unwrap(), "example.com");
    }

    #[test]
    fn existing_punycode_is_validated() {
        assert_eq!(
            domain_to_ascii("xn--bcher-kva.de").unwrap(),
            "xn--bcher-kva.de"
        );
        assert!(domain_to_ascii("xn---").is_err());
        assert!(domain_to_ascii("xn--ls8h=").is_err());
    }

    #[test]
    fn transitional_processing_maps_deviations() {
        let transitional = Config::default().transitional_processing(true);
        assert_eq!(transitional.to_ascii("faß.de").unwrap(), "fass.de");
        assert_eq!(domain_to_ascii("faß.de").unwrap(), "xn--fa-hia.de");
    }

    #[test]
    fn hyphen_checks() {
        let config = Config::default().check_hyphens(true);
        assert!(config.to_ascii("-leading.example").is_err());
        assert!(config.to_ascii("trailing-.example").is_err());
        assert!(config.to_ascii("ab--cd.example").is_err());
        assert!(config.to_ascii("ab-cd.example").is_ok());
        // Without the flag all of these pass.
        assert!(domain_to_ascii("-leading.example").is_ok());
        assert!(domain_to_ascii("ab--cd.example").is_ok());
    }

    #[test]
    fn dns_length_checks() {
        let config = Config::default().verify_dns_length(true);
        assert!(config.to_ascii("example.com").is_ok());
        assert!(config.to_ascii("").is_err());
        assert!(config.to_ascii("a..b").is_err());
        let long_label = "a".repeat(64);
        assert!(config.to_ascii(&long_label).is_err());
        assert!(config.to_ascii(&"a".repeat(63)).is_ok());
        let long_domain = format!("{}.{}.{}.{}", "a".repeat(63), "b".repeat(63), "c".repeat(63), "d".repeat(63));
        assert!(config.to_ascii(&long_domain).is_err());
        // A single trailing dot is not counted.
        assert!(config.to_ascii("example.com.").is_ok());
    }

    #[test]
    fn leading_combining_mark_is_invalid() {
        assert!(domain_to_ascii("\u{0301}a.example").is_err());
    }

    #[test]
    fn disallowed_characters_fail() {
        assert!(domain_to_ascii("exa\u{2028}mple.com").is_err());
        assert!(domain_to_ascii("exa\u{FFFD}mple.com").is_err());
    }

    #[test]
    fn contextj_rules() {
        // ZWJ after a virama is allowed.
        assert!(domain_to_ascii("\u{0915}\u{094D}\u{200D}\u{0937}.example").is_ok());
        // ZWJ without a preceding virama is not.
        assert!(domain_to_ascii("\u{0915}\u{200D}\u{0937}.example").is_err());
        // ZWNJ between dual-joining Arabic letters is allowed.
        assert!(domain_to_ascii("\u{0628}\u{200C}\u{0628}.example").is_ok());
        // ZWNJ with no joining context is not.
        assert!(domain_to_ascii("a\u{200C}b.example").is_err());
        // The joiner checks can be disabled.
        let config = Config::default().check_joiners(false);
        assert!(config.to_ascii("a\u{200C}b.example").is_ok());
    }

    #[test]
    fn bidi_rules() {
        // Pure RTL label in an RTL domain.
        assert!(domain_to_ascii("\u{05D0}\u{05D1}.example").is_ok());
        // An LTR label ending in a letter is fine in a bidi domain.
        assert!(domain_to_ascii("ab.\u{05D0}\u{05D1}").is_ok());
        // AN and EN cannot mix in one RTL label.
        assert!(domain_to_ascii("\u{05D0}\u{0660}1.example").is_err());
        // A digit-initial label is invalid in a bidi domain but fine
        // otherwise.
        assert!(domain_to_ascii("0a.\u{05D0}\u{05D1}").is_err());
        assert!(domain_to_ascii("0a.example").is_ok());
    }
}
