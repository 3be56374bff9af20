// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The URL parsing state machine,
//! <https://url.spec.whatwg.org/#url-parsing>.
//!
//! One loop over the input code points, switching on a [`State`]. The
//! cursor can be rewound (`self.pointer -= 1`) so the next state re-reads
//! the current code point, and reaching the end of input still runs one
//! final iteration of the active state with `c == None`. The states share
//! the accumulation buffer and the `at_sign_seen` / `inside_brackets`
//! flags, which is why this is one struct rather than a function per
//! state.

use std::fmt;

use log::debug;

use crate::encoding::EncodingOverride;
use crate::host::Host;
use crate::infra::{is_ascii_tab_or_newline, is_c0_control_or_space, is_noncharacter};
use crate::percent_encoding::{utf8_percent_encode, PercentEncodeSet, C0_CONTROL_ENCODE_SET};
use crate::{default_port, ParseError, Path, Url};

/// A non-fatal deviation from the URL grammar, reported through
/// [`UrlParser::syntax_violation_callback`](crate::UrlParser) or, absent a
/// callback, logged at debug level. Validation errors never fail a parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxViolation {
    /// Leading or trailing C0 control or space characters were stripped.
    C0SpaceIgnored,
    /// ASCII tab or newline characters were removed from the input.
    TabOrNewlineIgnored,
    /// A backslash was treated as a slash.
    Backslash,
    /// `//` was expected after a special scheme.
    ExpectedDoubleSlash,
    /// A `%` is not followed by two ASCII hex digits.
    PercentDecode,
    /// A code point outside the URL code points appeared literally.
    NonUrlCodePoint,
    /// The URL embeds credentials.
    EmbeddedCredentials,
}

impl SyntaxViolation {
    pub fn description(&self) -> &'static str {
        match self {
            SyntaxViolation::C0SpaceIgnored => {
                "leading or trailing control or space character are ignored in URLs"
            }
            SyntaxViolation::TabOrNewlineIgnored => "tabs or newlines are ignored in URLs",
            SyntaxViolation::Backslash => "backslash",
            SyntaxViolation::ExpectedDoubleSlash => "expected //",
            SyntaxViolation::PercentDecode => "expected 2 hex digits after %",
            SyntaxViolation::NonUrlCodePoint => "non-URL code point",
            SyntaxViolation::EmbeddedCredentials => {
                "embedding authentication information (username or password) \
                 in an URL is not recommended"
            }
        }
    }
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The percent-encode set used for each component the parser encodes.
/// [`safe_url`](crate::safe_url) swaps these for the unions that keep the
/// output lawful under the WHATWG, RFC 3986 and RFC 2396 grammars at once.
#[derive(Clone, Copy)]
pub(crate) struct ComponentEncodeSets {
    pub userinfo: &'static PercentEncodeSet,
    pub path: &'static PercentEncodeSet,
    pub query: &'static PercentEncodeSet,
    pub special_query: &'static PercentEncodeSet,
    pub fragment: &'static PercentEncodeSet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
}

pub(crate) struct Parser<'a> {
    input: Vec<char>,
    base: Option<&'a Url>,
    url: Url,
    state: State,
    buffer: String,
    at_sign_seen: bool,
    inside_brackets: bool,
    authority_shortcut_taken: bool,
    pointer: isize,
    encoding: EncodingOverride,
    sets: ComponentEncodeSets,
    violation_fn: Option<&'a dyn Fn(SyntaxViolation)>,
}

impl<'a> Parser<'a> {
    pub fn parse(
        input: &str,
        base: Option<&'a Url>,
        encoding: EncodingOverride,
        sets: ComponentEncodeSets,
        violation_fn: Option<&'a dyn Fn(SyntaxViolation)>,
    ) -> Result<Url, ParseError> {
        let mut parser = Parser {
            input: Vec::new(),
            base,
            url: Url::blank(),
            state: State::SchemeStart,
            buffer: String::new(),
            at_sign_seen: false,
            inside_brackets: false,
            authority_shortcut_taken: false,
            pointer: 0,
            encoding: encoding.to_output_encoding(),
            sets,
            violation_fn,
        };

        let trimmed = input.trim_matches(is_c0_control_or_space);
        if trimmed.len() != input.len() {
            parser.violation(SyntaxViolation::C0SpaceIgnored);
        }
        if trimmed.chars().any(is_ascii_tab_or_newline) {
            parser.violation(SyntaxViolation::TabOrNewlineIgnored);
        }
        parser.input = trimmed
            .chars()
            .filter(|c| !is_ascii_tab_or_newline(*c))
            .collect();

        parser.run()
    }

    fn violation(&self, v: SyntaxViolation) {
        match self.violation_fn {
            Some(f) => f(v),
            None => debug!("URL syntax violation: {}", v),
        }
    }

    fn c(&self) -> Option<char> {
        usize::try_from(self.pointer)
            .ok()
            .and_then(|i| self.input.get(i).copied())
    }

    /// The input from the current code point on.
    fn from_pointer(&self) -> &[char] {
        let start = self.pointer.max(0) as usize;
        &self.input[start.min(self.input.len())..]
    }

    /// The input after the current code point.
    fn remaining(&self) -> &[char] {
        let slice = self.from_pointer();
        if slice.is_empty() {
            slice
        } else {
            &slice[1..]
        }
    }

    fn is_special(&self) -> bool {
        self.url.is_special()
    }

    /// `c` is an authority terminator: end of input, a path/query/fragment
    /// delimiter, or a backslash for special schemes.
    fn at_authority_end(&self, c: Option<char>) -> bool {
        match c {
            None => true,
            Some('/') | Some('?') | Some('#') => true,
            Some('\\') => self.is_special(),
            _ => false,
        }
    }

    fn check_url_code_point(&self, c: char) {
        if c == '%' {
            let hex_follows = self.remaining().len() >= 2
                && self.remaining()[0].is_ascii_hexdigit()
                && self.remaining()[1].is_ascii_hexdigit();
            if !hex_follows {
                self.violation(SyntaxViolation::PercentDecode);
            }
        } else if !is_url_code_point(c) {
            self.violation(SyntaxViolation::NonUrlCodePoint);
        }
    }

    fn run(mut self) -> Result<Url, ParseError> {
        loop {
            let c = self.c();
            self.step(c)?;
            if self.pointer >= self.input.len() as isize {
                break;
            }
            self.pointer += 1;
        }
        Ok(self.url)
    }

    fn step(&mut self, c: Option<char>) -> Result<(), ParseError> {
        match self.state {
            State::SchemeStart => {
                if let Some(c) = c.filter(char::is_ascii_alphabetic) {
                    self.buffer.push(c.to_ascii_lowercase());
                    self.state = State::Scheme;
                } else {
                    self.state = State::NoScheme;
                    self.pointer -= 1;
                }
            }

            State::Scheme => match c {
                Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {
                    self.buffer.push(c.to_ascii_lowercase());
                }
                Some(':') => {
                    self.url.scheme = std::mem::take(&mut self.buffer);
                    if self.url.scheme == "file" {
                        if self.remaining().len() < 2 || self.remaining()[..2] != ['/', '/'] {
                            self.violation(SyntaxViolation::ExpectedDoubleSlash);
                        }
                        self.state = State::File;
                    } else if self.is_special() {
                        if self.base.is_some_and(|base| base.scheme == self.url.scheme) {
                            self.state = State::SpecialRelativeOrAuthority;
                        } else {
                            self.state = State::SpecialAuthoritySlashes;
                        }
                    } else if self.remaining().first() == Some(&'/') {
                        self.state = State::PathOrAuthority;
                        self.pointer += 1;
                    } else {
                        self.url.path = Path::Opaque(String::new());
                        self.state = State::OpaquePath;
                    }
                }
                _ => {
                    self.buffer.clear();
                    self.state = State::NoScheme;
                    // Restart from the very beginning.
                    self.pointer = -1;
                }
            },

            State::NoScheme => {
                let base = match self.base {
                    None => return Err(ParseError::RelativeUrlWithoutBase),
                    Some(base) => base,
                };
                if base.has_opaque_path() {
                    if c != Some('#') {
                        return Err(ParseError::RelativeUrlWithCannotBeABaseBase);
                    }
                    self.url.scheme = base.scheme.clone();
                    self.url.path = base.path.clone();
                    self.url.query = base.query.clone();
                    self.url.fragment = Some(String::new());
                    self.state = State::Fragment;
                } else {
                    self.state = if base.scheme == "file" {
                        State::File
                    } else {
                        State::Relative
                    };
                    self.pointer -= 1;
                }
            }

            State::SpecialRelativeOrAuthority => {
                if c == Some('/') && self.remaining().first() == Some(&'/') {
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pointer += 1;
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    self.state = State::Relative;
                    self.pointer -= 1;
                }
            }

            State::PathOrAuthority => {
                if c == Some('/') {
                    self.state = State::Authority;
                } else {
                    self.state = State::Path;
                    self.pointer -= 1;
                }
            }

            State::Relative => {
                let base = self.base.expect("relative state without a base");
                debug_assert!(base.scheme != "file");
                self.url.scheme = base.scheme.clone();
                if c == Some('/') {
                    self.state = State::RelativeSlash;
                } else if c == Some('\\') && self.is_special() {
                    self.violation(SyntaxViolation::Backslash);
                    self.state = State::RelativeSlash;
                } else {
                    self.url.username = base.username.clone();
                    self.url.password = base.password.clone();
                    self.url.password_token_seen = base.password_token_seen;
                    self.url.host = base.host.clone();
                    self.url.port = base.port;
                    self.url.port_token_seen = base.port_token_seen;
                    self.url.default_port_seen = base.default_port_seen;
                    self.url.path = base.path.clone();
                    self.url.path_token_seen = base.path_token_seen;
                    self.url.query = base.query.clone();
                    match c {
                        Some('?') => {
                            self.url.query = Some(String::new());
                            self.state = State::Query;
                        }
                        Some('#') => {
                            self.url.fragment = Some(String::new());
                            self.state = State::Fragment;
                        }
                        Some(_) => {
                            self.url.query = None;
                            self.url.shorten_path();
                            self.state = State::Path;
                            self.pointer -= 1;
                        }
                        None => {}
                    }
                }
            }

            State::RelativeSlash => {
                if self.is_special() && matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                } else if c == Some('/') {
                    self.state = State::Authority;
                } else {
                    let base = self.base.expect("relative slash state without a base");
                    self.url.username = base.username.clone();
                    self.url.password = base.password.clone();
                    self.url.password_token_seen = base.password_token_seen;
                    self.url.host = base.host.clone();
                    self.url.port = base.port;
                    self.url.port_token_seen = base.port_token_seen;
                    self.url.default_port_seen = base.default_port_seen;
                    self.state = State::Path;
                    self.pointer -= 1;
                }
            }

            State::SpecialAuthoritySlashes => {
                if c == Some('/') && self.remaining().first() == Some(&'/') {
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pointer += 1;
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pointer -= 1;
                }
            }

            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(c, Some('/') | Some('\\')) {
                    self.state = State::Authority;
                    self.pointer -= 1;
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                }
            }

            State::Authority => {
                // Scan ahead once: with no @ in the authority there is no
                // userinfo to accumulate and the host state can take over
                // directly.
                if !self.authority_shortcut_taken {
                    self.authority_shortcut_taken = true;
                    let has_credentials = self
                        .from_pointer()
                        .iter()
                        .take_while(|&&c| !self.at_authority_end(Some(c)))
                        .any(|&c| c == '@');
                    if !has_credentials {
                        self.state = State::Host;
                        self.pointer -= 1;
                        return Ok(());
                    }
                }
                match c {
                    Some('@') => {
                        self.violation(SyntaxViolation::EmbeddedCredentials);
                        if self.at_sign_seen {
                            self.buffer.insert_str(0, "%40");
                        }
                        self.at_sign_seen = true;
                        self.commit_userinfo();
                    }
                    c if self.at_authority_end(c) => {
                        if self.at_sign_seen && self.buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        self.pointer -= self.buffer.chars().count() as isize + 1;
                        self.buffer.clear();
                        self.state = State::Host;
                    }
                    Some(c) => self.buffer.push(c),
                    None => unreachable!("EOF is an authority end"),
                }
            }

            State::Host => match c {
                Some(':') if !self.inside_brackets => {
                    if self.buffer.is_empty() {
                        return Err(ParseError::EmptyHost);
                    }
                    let host = Host::parse(&self.buffer, self.is_special())?;
                    self.url.host = Some(host);
                    self.buffer.clear();
                    self.url.port_token_seen = true;
                    self.state = State::Port;
                }
                c if self.at_authority_end(c) => {
                    self.pointer -= 1;
                    if self.is_special() && self.buffer.is_empty() {
                        return Err(ParseError::EmptyHost);
                    }
                    let host = Host::parse(&self.buffer, self.is_special())?;
                    self.url.host = Some(host);
                    self.buffer.clear();
                    self.state = State::PathStart;
                }
                Some(c) => {
                    if c == '[' {
                        self.inside_brackets = true;
                    } else if c == ']' {
                        self.inside_brackets = false;
                    }
                    self.buffer.push(c);
                }
                None => unreachable!("EOF is an authority end"),
            },

            State::Port => match c {
                Some(c) if c.is_ascii_digit() => self.buffer.push(c),
                c if self.at_authority_end(c) => {
                    if !self.buffer.is_empty() {
                        let port: u16 = self
                            .buffer
                            .parse()
                            .map_err(|_| ParseError::InvalidPort)?;
                        if default_port(&self.url.scheme) == Some(port) {
                            self.url.default_port_seen = true;
                            self.url.port = None;
                        } else {
                            self.url.port = Some(port);
                        }
                        self.buffer.clear();
                    }
                    self.state = State::PathStart;
                    self.pointer -= 1;
                }
                _ => return Err(ParseError::InvalidPort),
            },

            State::File => {
                self.url.scheme = "file".to_string();
                self.url.host = Some(Host::Opaque(String::new()));
                if matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::FileSlash;
                } else if let Some(base) = self.base.filter(|base| base.scheme == "file") {
                    self.url.host = base.host.clone();
                    self.url.path = base.path.clone();
                    self.url.path_token_seen = base.path_token_seen;
                    self.url.query = base.query.clone();
                    match c {
                        Some('?') => {
                            self.url.query = Some(String::new());
                            self.state = State::Query;
                        }
                        Some('#') => {
                            self.url.fragment = Some(String::new());
                            self.state = State::Fragment;
                        }
                        Some(_) => {
                            self.url.query = None;
                            if !starts_with_windows_drive_letter(self.from_pointer()) {
                                self.url.shorten_path();
                            } else {
                                self.url.path = Path::Segments(Vec::new());
                            }
                            self.state = State::Path;
                            self.pointer -= 1;
                        }
                        None => {}
                    }
                } else {
                    self.state = State::Path;
                    self.pointer -= 1;
                }
            }

            State::FileSlash => {
                if matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::FileHost;
                } else {
                    if let Some(base) = self.base.filter(|base| base.scheme == "file") {
                        self.url.host = base.host.clone();
                        if !starts_with_windows_drive_letter(self.from_pointer()) {
                            if let Path::Segments(segments) = &base.path {
                                if let Some(first) = segments
                                    .first()
                                    .filter(|s| is_normalized_windows_drive_letter(s))
                                {
                                    // The drive letter of the base carries
                                    // over even though the rest of its path
                                    // does not.
                                    if let Path::Segments(path) = &mut self.url.path {
                                        path.push(first.clone());
                                    }
                                }
                            }
                        }
                    }
                    self.state = State::Path;
                    self.pointer -= 1;
                }
            }

            State::FileHost => {
                if matches!(c, None | Some('/') | Some('\\') | Some('?') | Some('#')) {
                    self.pointer -= 1;
                    if is_windows_drive_letter(&self.buffer) {
                        // Not a host; reparse the buffer as the first path
                        // segment.
                        self.state = State::Path;
                    } else if self.buffer.is_empty() {
                        self.url.host = Some(Host::Opaque(String::new()));
                        self.state = State::PathStart;
                    } else {
                        let mut host = Host::parse(&self.buffer, false)?;
                        if host == Host::Opaque("localhost".to_string()) {
                            host = Host::Opaque(String::new());
                        }
                        self.url.host = Some(host);
                        self.buffer.clear();
                        self.state = State::PathStart;
                    }
                } else {
                    self.buffer.push(c.expect("checked above"));
                }
            }

            State::PathStart => {
                if self.is_special() {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::Path;
                    if matches!(c, Some('/') | Some('\\')) {
                        self.url.path_token_seen = true;
                    } else {
                        self.pointer -= 1;
                    }
                } else {
                    match c {
                        Some('?') => {
                            self.url.query = Some(String::new());
                            self.state = State::Query;
                        }
                        Some('#') => {
                            self.url.fragment = Some(String::new());
                            self.state = State::Fragment;
                        }
                        Some(other) => {
                            self.state = State::Path;
                            if other == '/' {
                                self.url.path_token_seen = true;
                            } else {
                                self.pointer -= 1;
                            }
                        }
                        None => {}
                    }
                }
            }

            State::Path => {
                let at_segment_end =
                    matches!(c, None | Some('/') | Some('?') | Some('#'))
                        || (c == Some('\\') && self.is_special());
                if at_segment_end {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    let slash_follows =
                        c == Some('/') || (c == Some('\\') && self.is_special());
                    if is_double_dot_path_segment(&self.buffer) {
                        self.url.shorten_path();
                        if !slash_follows {
                            self.url.push_path_segment(String::new());
                        }
                    } else if is_single_dot_path_segment(&self.buffer) {
                        if !slash_follows {
                            self.url.push_path_segment(String::new());
                        }
                    } else {
                        if self.url.scheme == "file"
                            && self.url.path_is_empty()
                            && is_windows_drive_letter(&self.buffer)
                        {
                            self.buffer.replace_range(1..2, ":");
                        }
                        let encoded = utf8_percent_encode(&self.buffer, self.sets.path);
                        self.url.push_path_segment(encoded);
                    }
                    self.buffer.clear();
                    match c {
                        Some('?') => {
                            self.url.query = Some(String::new());
                            self.state = State::Query;
                        }
                        Some('#') => {
                            self.url.fragment = Some(String::new());
                            self.state = State::Fragment;
                        }
                        _ => {}
                    }
                } else {
                    let c = c.expect("segment end covers EOF");
                    self.check_url_code_point(c);
                    self.buffer.push(c);
                }
            }

            State::OpaquePath => match c {
                Some('?') => {
                    self.url.query = Some(String::new());
                    self.state = State::Query;
                }
                Some('#') => {
                    self.url.fragment = Some(String::new());
                    self.state = State::Fragment;
                }
                Some(c) => {
                    self.check_url_code_point(c);
                    let encoded =
                        utf8_percent_encode(&c.to_string(), &C0_CONTROL_ENCODE_SET);
                    if let Path::Opaque(path) = &mut self.url.path {
                        path.push_str(&encoded);
                    }
                }
                None => {}
            },

            State::Query => {
                if c == Some('#') || c.is_none() {
                    // Non-UTF-8 output encodings only apply to special
                    // schemes other than ws and wss.
                    if !self.encoding.is_utf8()
                        && (!self.is_special()
                            || self.url.scheme == "ws"
                            || self.url.scheme == "wss")
                    {
                        self.encoding = EncodingOverride::utf8();
                    }
                    let set = if self.is_special() {
                        self.sets.special_query
                    } else {
                        self.sets.query
                    };
                    let encoded =
                        self.encoding
                            .percent_encode_after_encoding(&self.buffer, set, false);
                    match &mut self.url.query {
                        Some(query) => query.push_str(&encoded),
                        None => self.url.query = Some(encoded),
                    }
                    self.buffer.clear();
                    if c == Some('#') {
                        self.url.fragment = Some(String::new());
                        self.state = State::Fragment;
                    }
                } else if let Some(c) = c {
                    self.check_url_code_point(c);
                    self.buffer.push(c);
                }
            }

            State::Fragment => match c {
                Some(c) => {
                    self.check_url_code_point(c);
                    self.buffer.push(c);
                }
                None => {
                    let encoded = utf8_percent_encode(&self.buffer, self.sets.fragment);
                    match &mut self.url.fragment {
                        Some(fragment) => fragment.push_str(&encoded),
                        None => self.url.fragment = Some(encoded),
                    }
                    self.buffer.clear();
                }
            },
        }
        Ok(())
    }

    /// Split the accumulated authority buffer at the first `:` into
    /// username and password and append both, percent-encoded.
    fn commit_userinfo(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        let (username_part, password_part) = if self.url.password_token_seen {
            (None, Some(buffer.as_str()))
        } else {
            match buffer.split_once(':') {
                Some((user, pass)) => {
                    self.url.password_token_seen = true;
                    (Some(user), Some(pass))
                }
                None => (Some(buffer.as_str()), None),
            }
        };
        if let Some(user) = username_part {
            let encoded = utf8_percent_encode(user, self.sets.userinfo);
            self.url.username.push_str(&encoded);
        }
        if let Some(pass) = password_part {
            let encoded = utf8_percent_encode(pass, self.sets.userinfo);
            self.url.password.push_str(&encoded);
        }
    }
}

/// <https://url.spec.whatwg.org/#url-code-points>
fn is_url_code_point(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '0'..='9'
        | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-'
        | '.' | '/' | ':' | ';' | '=' | '?' | '@' | '_' | '~')
        || (c >= '\u{A0}' && c <= '\u{10FFFD}' && !is_noncharacter(c))
}

/// <https://url.spec.whatwg.org/#windows-drive-letter>
pub(crate) fn is_windows_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && matches!(bytes[1], b':' | b'|')
}

fn is_normalized_windows_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// <https://url.spec.whatwg.org/#start-with-a-windows-drive-letter>
fn starts_with_windows_drive_letter(input: &[char]) -> bool {
    input.len() >= 2
        && input[0].is_ascii_alphabetic()
        && matches!(input[1], ':' | '|')
        && (input.len() == 2 || matches!(input[2], '/' | '\\' | '?' | '#'))
}

/// <https://url.spec.whatwg.org/#double-dot-path-segment>
fn is_double_dot_path_segment(buffer: &str) -> bool {
    let bytes = buffer.as_bytes();
    match bytes.len() {
        2 => bytes == b"..",
        4 => {
            (bytes[0] == b'.' && bytes[1..].eq_ignore_ascii_case(b"%2e"))
                || (bytes[..3].eq_ignore_ascii_case(b"%2e") && bytes[3] == b'.')
        }
        6 => bytes[..3].eq_ignore_ascii_case(b"%2e") && bytes[3..].eq_ignore_ascii_case(b"%2e"),
        _ => false,
    }
}

/// <https://url.spec.whatwg.org/#single-dot-path-segment>
fn is_single_dot_path_segment(buffer: &str) -> bool {
    buffer == "." || buffer.eq_ignore_ascii_case("%2e")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_segments() {
        for s in ["..", ".%2e", "%2E.", "%2e%2E", "%2E%2E"] {
            assert!(is_double_dot_path_segment(s), "{}", s);
        }
        for s in [".", "%2e", "%2E"] {
            assert!(is_single_dot_path_segment(s), "{}", s);
        }
        for s in ["...", "%2e%2", "a.", ".a", "%2ea"] {
            assert!(!is_double_dot_path_segment(s), "{}", s);
            assert!(!is_single_dot_path_segment(s), "{}", s);
        }
    }

    #[test]
    fn windows_drive_letters() {
        assert!(is_windows_drive_letter("C:"));
        assert!(is_windows_drive_letter("c|"));
        assert!(!is_windows_drive_letter("C:x"));
        assert!(!is_windows_drive_letter("3:"));
        assert!(is_normalized_windows_drive_letter("C:"));
        assert!(!is_normalized_windows_drive_letter("C|"));

        let chars: Vec<char> = "C:/x".chars().collect();
        assert!(starts_with_windows_drive_letter(&chars));
        let chars: Vec<char> = "C|".chars().collect();
        assert!(starts_with_windows_drive_letter(&chars));
        let chars: Vec<char> = "C:x".chars().collect();
        assert!(!starts_with_windows_drive_letter(&chars));
    }

    #[test]
    fn url_code_points() {
        assert!(is_url_code_point('a'));
        assert!(is_url_code_point('~'));
        assert!(is_url_code_point('\u{00E9}'));
        assert!(!is_url_code_point('"'));
        assert!(!is_url_code_point('^'));
        assert!(!is_url_code_point('\u{0019}'));
        assert!(!is_url_code_point('\u{FDD0}'));
        assert!(!is_url_code_point('\u{10FFFE}'));
    }
}
