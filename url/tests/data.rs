// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end parsing, setter, and origin scenarios.

use url::Url;

fn parse(base: &str, input: &str) -> Result<Url, url::ParseError> {
    let base = Url::parse(base).unwrap();
    base.join(input)
}

#[test]
fn relative_path_with_query_and_fragment() {
    let url = parse("http://example.org/foo/bar", "seg1/seg2?a=b#frag").unwrap();
    assert_eq!(url.as_str(), "http://example.org/foo/seg1/seg2?a=b#frag");
    assert_eq!(url.path(), "/foo/seg1/seg2");
    assert_eq!(url.query(), Some("a=b"));
    assert_eq!(url.fragment(), Some("frag"));
}

#[test]
fn file_dot_dot_strips_last_segment() {
    let url = parse("file:///tmp/one/two", "file:..").unwrap();
    assert_eq!(url.scheme(), "file");
    assert_eq!(url.path(), "/tmp/");
}

#[test]
fn file_dot_dot_against_non_file_base_is_empty_host_and_root() {
    let url = parse("http://example.org/test", "file:..").unwrap();
    assert_eq!(url.scheme(), "file");
    assert!(!url.has_host());
    assert_eq!(url.path(), "/");
}

#[test]
fn file_url_with_triple_slash_keeps_empty_host_and_full_path() {
    let url = Url::parse("file:///etc/passwd").unwrap();
    assert!(!url.has_host());
    assert_eq!(url.path(), "/etc/passwd");
}

#[test]
fn http_with_explicit_zero_port() {
    let url = Url::parse("http://f:0/c").unwrap();
    assert_eq!(url.host_str(), Some("f"));
    assert_eq!(url.port(), Some(0));
    assert_eq!(url.port_or_known_default(), Some(0));
    assert_eq!(url.path(), "/c");
}

#[test]
fn ipv6_host_round_trips_with_brackets() {
    let url = Url::parse("http://[2::0]/").unwrap();
    assert_eq!(url.host_str(), Some("[2::]"));
    assert_eq!(url.as_str(), "http://[2::]/");
}

#[test]
fn ipv4_hex_octal_forms_normalize_to_dotted_decimal() {
    let url = Url::parse("http://0x7f.0.0.1/").unwrap();
    assert_eq!(url.host_str(), Some("127.0.0.1"));
}

#[test]
fn invalid_domain_label_is_rejected() {
    let result = Url::parse("http://exa\u{0}mple.com/");
    assert!(result.is_err());
}

#[test]
fn fragment_only_reference_replaces_fragment() {
    let url = parse("http://example.org/foo/bar?x=y", "#newfrag").unwrap();
    assert_eq!(url.path(), "/foo/bar");
    assert_eq!(url.query(), Some("x=y"));
    assert_eq!(url.fragment(), Some("newfrag"));
}

#[test]
fn query_only_reference_replaces_query_and_drops_fragment() {
    let url = parse("http://example.org/foo/bar?x=y#old", "?z=1").unwrap();
    assert_eq!(url.path(), "/foo/bar");
    assert_eq!(url.query(), Some("z=1"));
    assert_eq!(url.fragment(), None);
}

#[test]
fn authority_relative_reference_replaces_host_and_path() {
    let url = parse("http://example.org/foo/bar", "//other.example/baz").unwrap();
    assert_eq!(url.host_str(), Some("other.example"));
    assert_eq!(url.path(), "/baz");
}

#[test]
fn set_scheme_rejects_invalid_syntax() {
    let mut url = Url::parse("http://example.com/").unwrap();
    assert!(url.set_scheme("1http").is_err());
    assert_eq!(url.scheme(), "http");
    assert!(url.set_scheme("HTTPS").is_ok());
    assert_eq!(url.scheme(), "https");
}

#[test]
fn relative_reference_against_opaque_path_base_fails() {
    let base = Url::parse("mailto:me@example.org").unwrap();
    assert!(base.has_opaque_path());
    assert!(base.join("other@example.org").is_err());
}

#[test]
fn set_host_normalizes_idna() {
    let mut url = Url::parse("http://example.org/").unwrap();
    url.set_host(Some("xn--nxasmq6b")).unwrap();
    assert_eq!(url.host_str(), Some("xn--nxasmq6b"));
}

#[test]
fn set_port_rejects_opaque_path_scheme() {
    let mut url = Url::parse("mailto:me@example.org").unwrap();
    assert!(url.set_port(Some(80)).is_err());
}

#[test]
fn set_path_reencodes_reserved_bytes() {
    let mut url = Url::parse("http://example.org/a/b").unwrap();
    url.set_path("/a b/c#d");
    assert_eq!(url.path(), "/a%20b/c%23d");
}

#[test]
fn query_pairs_get_all_and_to_string() {
    let url = Url::parse("http://example.org/?a=1&b=2&a=3").unwrap();
    let all: Vec<String> = url
        .query_pairs()
        .filter(|(k, _)| k == "a")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(all, vec!["1".to_owned(), "3".to_owned()]);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(url.query_pairs());
    assert_eq!(serializer.finish(), "a=1&b=2&a=3");
}

#[test]
fn query_pairs_mut_append_pair_updates_serialization() {
    let mut url = Url::parse("http://example.org/path?a=1").unwrap();
    url.query_pairs_mut().append_pair("b", "2");
    assert_eq!(url.query(), Some("a=1&b=2"));
    assert_eq!(url.as_str(), "http://example.org/path?a=1&b=2");
}

#[test]
fn origin_tuple_equality_ignores_path_and_fragment() {
    let a = Url::parse("http://example.org/a#one").unwrap();
    let b = Url::parse("http://example.org/b#two").unwrap();
    assert_eq!(a.origin(), b.origin());
}

#[test]
fn eq_ignoring_fragment_matches_only_up_to_query() {
    let a = Url::parse("http://example.org/a?x=1#one").unwrap();
    let b = Url::parse("http://example.org/a?x=1#two").unwrap();
    let c = Url::parse("http://example.org/a?x=2#one").unwrap();
    assert!(a.eq_ignoring_fragment(&b));
    assert!(!a.eq_ignoring_fragment(&c));
}

#[test]
fn non_special_scheme_keeps_opaque_path() {
    let url = Url::parse("mailto:me@example.org").unwrap();
    assert!(url.has_opaque_path());
    assert_eq!(url.path(), "me@example.org");
}
