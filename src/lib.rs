// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! WHATWG-compliant URL parsing and serialization, with the UTS #46 IDNA
//! processing and percent-encoding machinery it depends on, and a
//! browser-like URL sanitiser.
//!
//! The central types are [`Url`], an in-memory URL record produced by the
//! parsing state machine, and [`UrlParser`], the options builder for
//! parsing against a base URL or with a legacy query encoding:
//!
//! ```
//! use w3url::Url;
//!
//! let url = Url::parse("http://example.com:80/a/../b?q#f").unwrap();
//! assert_eq!(url.scheme(), "http");
//! assert_eq!(url.port(), None); // default port, elided
//! assert_eq!(url.to_string(), "http://example.com/b?q#f");
//!
//! let joined = url.join("//other.example/x").unwrap();
//! assert_eq!(joined.to_string(), "http://other.example/x");
//! ```
//!
//! [`safe_url`] sanitises a user-supplied URL string the way a browser
//! does, fixing what must be fixed and keeping everything else exactly as
//! written:
//!
//! ```
//! use w3url::safe_url;
//!
//! assert_eq!(
//!     safe_url("http://example.com/a b?x=%26", "utf-8").unwrap(),
//!     "http://example.com/a%20b?x=%26",
//! );
//! ```

mod encoding;
mod host;
mod infra;
mod joining_types;
mod parser;
pub mod percent_encoding;
mod punycode;
pub mod uts46;

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use crate::encoding::EncodingOverride;
use crate::parser::{ComponentEncodeSets, Parser};
use crate::percent_encoding as pct;

pub use crate::host::Host;
pub use crate::parser::SyntaxViolation;
pub use crate::percent_encoding::{percent_decode, percent_decode_str, PercentEncodeSet};

/// Errors that make a URL impossible to parse.
///
/// Issues the URL Standard classifies as mere validation errors (stray
/// backslashes, missing `//`, malformed escapes…) are reported as
/// [`SyntaxViolation`]s instead and never fail the parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    EmptyHost,
    IdnaError,
    InvalidPort,
    InvalidIpv4Address,
    InvalidIpv6Address,
    InvalidDomainCharacter,
    ForbiddenHostCodePoint,
    RelativeUrlWithoutBase,
    RelativeUrlWithCannotBeABaseBase,
    UnknownEncodingLabel,
}

impl ParseError {
    fn description(&self) -> &'static str {
        match self {
            ParseError::EmptyHost => "empty host",
            ParseError::IdnaError => "invalid international domain name",
            ParseError::InvalidPort => "invalid port number",
            ParseError::InvalidIpv4Address => "invalid IPv4 address",
            ParseError::InvalidIpv6Address => "invalid IPv6 address",
            ParseError::InvalidDomainCharacter => "invalid domain character",
            ParseError::ForbiddenHostCodePoint => "forbidden host code point",
            ParseError::RelativeUrlWithoutBase => "relative URL without a base",
            ParseError::RelativeUrlWithCannotBeABaseBase => {
                "relative URL with a cannot-be-a-base base"
            }
            ParseError::UnknownEncodingLabel => "unknown character encoding label",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl StdError for ParseError {}

/// A URL path: either a list of already-encoded segments, or a single
/// opaque string for URLs like `mailto:…` whose scheme is not followed by
/// `//`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Path {
    Segments(Vec<String>),
    Opaque(String),
}

impl Path {
    /// The segments of a structured path, `None` for an opaque path.
    pub fn segments(&self) -> Option<&[String]> {
        match self {
            Path::Segments(segments) => Some(segments),
            Path::Opaque(_) => None,
        }
    }
}

/// <https://url.spec.whatwg.org/#default-port>
pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

pub(crate) fn is_special_scheme(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

/// A parsed URL record.
///
/// Produced by [`Url::parse`] / [`UrlParser::parse`] and immutable from
/// the outside. Besides the components themselves the record keeps a few
/// as-written hints (was an empty password written with an explicit `:`,
/// was the default port spelled out, …) so that serializing with
/// `canonicalize = Some(false)` can reproduce the original spelling where
/// that is still a valid URL. Equality compares the components only, not
/// the spelling hints.
#[derive(Clone, Debug)]
pub struct Url {
    pub(crate) scheme: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) host: Option<Host>,
    pub(crate) port: Option<u16>,
    pub(crate) path: Path,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,

    // As-written delimiter hints. A `:` separated the (possibly empty)
    // password from the username; a `:` followed the host; the port was
    // written even though it is the scheme's default; an explicit `/`
    // started the path.
    pub(crate) password_token_seen: bool,
    pub(crate) port_token_seen: bool,
    pub(crate) default_port_seen: bool,
    pub(crate) path_token_seen: bool,
}

impl Url {
    pub(crate) fn blank() -> Url {
        Url {
            scheme: String::new(),
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: Path::Segments(Vec::new()),
            query: None,
            fragment: None,
            password_token_seen: false,
            port_token_seen: false,
            default_port_seen: false,
            path_token_seen: false,
        }
    }

    /// Parse an absolute URL string.
    pub fn parse(input: &str) -> Result<Url, ParseError> {
        UrlParser::new().parse(input)
    }

    /// Parse `input` with this URL as the base, resolving relative
    /// references.
    pub fn join(&self, input: &str) -> Result<Url, ParseError> {
        UrlParser::new().base_url(self).parse(input)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether the scheme is one of `ftp`, `file`, `http`, `https`, `ws`,
    /// `wss`.
    pub fn is_special(&self) -> bool {
        is_special_scheme(&self.scheme)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The explicit port, or the scheme's default port.
    pub fn port_or_known_default(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_opaque_path(&self) -> bool {
        matches!(self.path, Path::Opaque(_))
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// <https://url.spec.whatwg.org/#shorten-a-urls-path>
    pub(crate) fn shorten_path(&mut self) {
        if let Path::Segments(segments) = &mut self.path {
            if self.scheme == "file"
                && segments.len() == 1
                && parser::is_windows_drive_letter(&segments[0])
            {
                return;
            }
            segments.pop();
        }
    }

    pub(crate) fn push_path_segment(&mut self, segment: String) {
        if let Path::Segments(segments) = &mut self.path {
            segments.push(segment);
        }
    }

    pub(crate) fn path_is_empty(&self) -> bool {
        match &self.path {
            Path::Segments(segments) => segments.is_empty(),
            Path::Opaque(path) => path.is_empty(),
        }
    }

    /// Serialize the record,
    /// <https://url.spec.whatwg.org/#url-serializing>.
    ///
    /// `canonicalize` controls how the as-written spelling hints are used:
    ///
    /// * `None` follows the standard algorithm exactly.
    /// * `Some(true)` canonicalizes: functionally equivalent URLs always
    ///   serialize the same way. (Currently the standard algorithm already
    ///   guarantees this.)
    /// * `Some(false)` reproduces the original spelling wherever the
    ///   result is still a valid URL: an explicitly written default port,
    ///   a bare `:` after the host or the username, and a missing root
    ///   slash all come back out the way they were written.
    pub fn serialize(&self, exclude_fragment: bool, canonicalize: Option<bool>) -> String {
        let as_written = canonicalize == Some(false);
        let mut output = self.scheme.clone();
        output.push(':');
        if let Some(host) = &self.host {
            output.push_str("//");
            if !self.username.is_empty() || !self.password.is_empty() {
                output.push_str(&self.username);
                if !self.password.is_empty() {
                    output.push(':');
                    output.push_str(&self.password);
                } else if as_written && self.password_token_seen {
                    output.push(':');
                }
                output.push('@');
            }
            output.push_str(&host.to_string());
            if let Some(port) = self.port {
                output.push(':');
                output.push_str(&port.to_string());
            } else if as_written {
                if self.default_port_seen {
                    if let Some(port) = default_port(&self.scheme) {
                        output.push(':');
                        output.push_str(&port.to_string());
                    }
                } else if self.port_token_seen {
                    output.push(':');
                }
            }
        } else if let Path::Segments(segments) = &self.path {
            // A path starting with an empty segment would reparse as an
            // authority without this marker.
            if segments.len() > 1 && segments[0].is_empty() {
                output.push_str("/.");
            }
        }
        match &self.path {
            Path::Opaque(path) => output.push_str(path),
            Path::Segments(segments) => {
                let lone_empty_segment = segments.len() == 1 && segments[0].is_empty();
                if !(as_written && lone_empty_segment && !self.path_token_seen) {
                    for segment in segments {
                        output.push('/');
                        output.push_str(segment);
                    }
                }
            }
        }
        if let Some(query) = &self.query {
            output.push('?');
            output.push_str(query);
        }
        if !exclude_fragment {
            if let Some(fragment) = &self.fragment {
                output.push('#');
                output.push_str(fragment);
            }
        }
        output
    }
}

/// Equality of the URL components; the as-written spelling hints do not
/// participate.
impl PartialEq for Url {
    fn eq(&self, other: &Url) -> bool {
        self.scheme == other.scheme
            && self.username == other.username
            && self.password == other.password
            && self.host == other.host
            && self.port == other.port
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Url {}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(false, None))
    }
}

impl FromStr for Url {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Url, ParseError> {
        Url::parse(input)
    }
}

fn whatwg_encode_sets() -> ComponentEncodeSets {
    ComponentEncodeSets {
        userinfo: &*pct::USERINFO_ENCODE_SET,
        path: &*pct::PATH_ENCODE_SET,
        query: &*pct::QUERY_ENCODE_SET,
        special_query: &*pct::SPECIAL_QUERY_ENCODE_SET,
        fragment: &*pct::FRAGMENT_ENCODE_SET,
    }
}

fn safest_encode_sets() -> ComponentEncodeSets {
    ComponentEncodeSets {
        userinfo: &*pct::SAFE_USERINFO_ENCODE_SET,
        path: &*pct::SAFE_PATH_ENCODE_SET,
        query: &*pct::SAFE_QUERY_ENCODE_SET,
        special_query: &*pct::SAFE_SPECIAL_QUERY_ENCODE_SET,
        fragment: &*pct::SAFE_FRAGMENT_ENCODE_SET,
    }
}

/// Parser options: an optional base URL for relative references, an
/// optional legacy query encoding, and an optional callback for syntax
/// violations.
///
/// ```
/// use w3url::{Url, UrlParser};
///
/// let base = Url::parse("http://example.com/a/b").unwrap();
/// let url = UrlParser::new().base_url(&base).parse("../c").unwrap();
/// assert_eq!(url.to_string(), "http://example.com/c");
/// ```
#[derive(Default)]
pub struct UrlParser<'a> {
    base_url: Option<&'a Url>,
    encoding_label: Option<&'a str>,
    violation_fn: Option<&'a dyn Fn(SyntaxViolation)>,
    use_safest_encode_sets: bool,
}

impl<'a> UrlParser<'a> {
    pub fn new() -> UrlParser<'a> {
        UrlParser::default()
    }

    /// Resolve relative references against this base.
    pub fn base_url(mut self, base: &'a Url) -> Self {
        self.base_url = Some(base);
        self
    }

    /// Encode the query with this encoding (a WHATWG encoding label such
    /// as `"windows-1251"`) instead of UTF-8. The label resolves at parse
    /// time; an unknown label fails the parse.
    pub fn encoding(mut self, label: &'a str) -> Self {
        self.encoding_label = Some(label);
        self
    }

    /// Report non-fatal syntax violations to `callback` instead of the
    /// default `log::debug!` sink.
    pub fn syntax_violation_callback(mut self, callback: &'a dyn Fn(SyntaxViolation)) -> Self {
        self.violation_fn = Some(callback);
        self
    }

    pub(crate) fn safest_encode_sets(mut self) -> Self {
        self.use_safest_encode_sets = true;
        self
    }

    pub fn parse(&self, input: &str) -> Result<Url, ParseError> {
        let encoding = match self.encoding_label {
            Some(label) => {
                EncodingOverride::lookup(label).ok_or(ParseError::UnknownEncodingLabel)?
            }
            None => EncodingOverride::utf8(),
        };
        let sets = if self.use_safest_encode_sets {
            safest_encode_sets()
        } else {
            whatwg_encode_sets()
        };
        Parser::parse(input, self.base_url, encoding, sets, self.violation_fn)
    }
}

/// Parse a URL string, optionally against a base URL string, optionally
/// with a legacy query encoding label.
pub fn parse_url(
    input: &str,
    base: Option<&str>,
    encoding: Option<&str>,
) -> Result<Url, ParseError> {
    let mut parser = UrlParser::new();
    if let Some(label) = encoding {
        parser = parser.encoding(label);
    }
    let base_url = match base {
        Some(base) => Some(parser.parse(base)?),
        None => None,
    };
    match &base_url {
        Some(base) => parser.base_url(base).parse(input),
        None => parser.parse(input),
    }
}

/// Serialize a URL record; see [`Url::serialize`].
pub fn serialize_url(url: &Url, exclude_fragment: bool, canonicalize: Option<bool>) -> String {
    url.serialize(exclude_fragment, canonicalize)
}

/// Sanitise a user-supplied URL string the way a browser does.
///
/// The input is parsed with the *safest* percent-encode sets (the unions
/// of the WHATWG sets with their RFC 3986 and RFC 2396 counterparts, so
/// the output is lawful under all three grammars) and serialized
/// preserving the original spelling wherever it is legal: existing
/// escapes are never double-encoded, an explicit default port stays, the
/// host is still IDNA-normalised.
///
/// `encoding` is the WHATWG label of the encoding the URL was extracted
/// from; it determines how non-ASCII query characters are encoded.
pub fn safe_url(input: &str, encoding: &str) -> Result<String, ParseError> {
    let url = UrlParser::new()
        .encoding(encoding)
        .safest_encode_sets()
        .parse(input)?;
    Ok(url.serialize(false, Some(false)))
}
