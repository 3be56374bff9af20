// Copyright 2025 the w3url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use w3url::uts46::{domain_to_ascii, Config};
use w3url::{Host, Url};

fn to_ascii_strictish(domain: &str) -> Result<String, w3url::uts46::Errors> {
    Config::default()
        .check_hyphens(true)
        .verify_dns_length(true)
        .to_ascii(domain)
}

#[test]
fn plain_ascii() {
    assert_eq!(domain_to_ascii("example.com").unwrap(), "example.com");
    assert_eq!(domain_to_ascii("WWW.EXAMPLE.COM").unwrap(), "www.example.com");
}

#[test]
fn unicode_to_punycode() {
    assert_eq!(domain_to_ascii("bücher.de").unwrap(), "xn--bcher-kva.de");
    assert_eq!(domain_to_ascii("例え.テスト").unwrap(), "xn--r8jz45g.xn--zckzah");
}

#[test]
fn punycode_prefix_labels() {
    // An empty remainder decodes to the empty label without the length
    // check; with it, the empty label is an error.
    assert_eq!(domain_to_ascii("xn--").unwrap(), "");
    assert!(to_ascii_strictish("xn--").is_err());
    assert!(domain_to_ascii("xn---").is_err());
    assert!(domain_to_ascii("xn--nxa").is_ok());
}

#[test]
fn mapped_dots_and_width() {
    assert_eq!(domain_to_ascii("ｅｘａｍｐｌｅ。com").unwrap(), "example.com");
    assert_eq!(domain_to_ascii("example．com").unwrap(), "example.com");
}

#[test]
fn ignored_code_points() {
    // SOFT HYPHEN disappears during mapping.
    assert_eq!(domain_to_ascii("exam\u{00AD}ple.com").unwrap(), "example.com");
}

#[test]
fn nfc_is_applied() {
    // e + COMBINING ACUTE composes before Punycode conversion.
    assert_eq!(
        domain_to_ascii("cafe\u{0301}.fr").unwrap(),
        domain_to_ascii("café.fr").unwrap()
    );
}

#[test]
fn hosts_in_urls_go_through_idna() {
    let url = Url::parse("http://ＷＷＷ.Bücher.de/").unwrap();
    assert!(matches!(
        url.host(),
        Some(Host::Domain(d)) if d == "www.xn--bcher-kva.de"
    ));
}

#[test]
fn invalid_domains_fail_url_parsing() {
    assert!(Url::parse("http://\u{2028}.com/").is_err());
    assert!(Url::parse("http://ab\u{FFFD}.com/").is_err());
}
