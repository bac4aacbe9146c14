// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [basic URL parser](https://url.spec.whatwg.org/#concept-basic-url-parser)
//! state machine.

use crate::host::{parse_host, Host};
use crate::{Flags, HostInternal, Url, COMPONENT_COUNT, FRAGMENT, HOST, PASSWORD, PATH, PATH_PREFIX,
    PORT, QUERY, SCHEME, SCHEME_SEP, USERNAME};
use percent_encoding::{percent_encode, utf8_percent_encode, AsciiSet, CONTROLS, PATH as PATH_SET,
    SPECIAL_QUERY, QUERY as QUERY_SET, USERINFO};
use std::fmt;

/// <https://url.spec.whatwg.org/#validation-error>, the stable externally
/// observable enumeration of everything that can go wrong (or merely be
/// noted) while parsing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    SchemeInvalidCodePoint,
    DomainToUnicode,
    DomainToAscii,
    DomainInvalidCodePoint,
    HostInvalidCodePoint,
    Ipv4EmptyPart,
    Ipv4NonDecimalPart,
    Ipv4OutOfRangePart,
    Ipv4TooManyParts,
    Ipv4NonNumericPart,
    Ipv6Unclosed,
    Ipv6InvalidCompression,
    Ipv6TooManyPieces,
    Ipv6MultipleCompression,
    Ipv6InvalidCodePoint,
    Ipv6TooFewPieces,
    Ipv4InIpv6TooManyPieces,
    Ipv4InIpv6InvalidCodePoint,
    Ipv4InIpv6OutOfRangePart,
    Ipv4InIpv6TooFewParts,
    InvalidUrlUnit,
    SpecialSchemeMissingFollowingSolidus,
    InvalidReverseSolidus,
    InvalidCredentials,
    FileInvalidWindowsDriveLetter,
    FileInvalidWindowsDriveLetterHost,
    MissingSchemeNonRelativeUrl,
    HostMissing,
    PortOutOfRange,
    PortInvalid,
    Overflow,
    InvalidBase,
}

impl ParseError {
    /// Whether this error is merely reportable (the parse continues) or a
    /// hard failure (the parse aborts and the record stays invalid).
    ///
    /// See the error taxonomy: everything is a hard failure in this
    /// implementation except the handful of non-fatal domain/IPv4 oddities
    /// the standard explicitly tolerates.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            ParseError::DomainToUnicode
                | ParseError::Ipv4EmptyPart
                | ParseError::Ipv4NonDecimalPart
                | ParseError::InvalidUrlUnit
                | ParseError::InvalidReverseSolidus
                | ParseError::FileInvalidWindowsDriveLetter
                | ParseError::FileInvalidWindowsDriveLetterHost
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for ParseError {}

pub(crate) fn is_special_scheme(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

fn is_ascii_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

fn starts_with_windows_drive_letter(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 2
        && is_ascii_alpha(b[0])
        && matches!(b[1], b':' | b'|')
        && (b.len() == 2 || matches!(b[2], b'/' | b'\\' | b'?' | b'#'))
}

/// <https://url.spec.whatwg.org/#concept-basic-url-parser>, step 1-2: trim
/// leading/trailing C0-controls-and-space, strip interior tabs and newlines.
/// The returned bool records whether any such unit was found, purely for a
/// caller that wants to surface `ParseError::InvalidUrlUnit` as a non-fatal
/// reportable error; this implementation does not surface it separately.
fn strip_invalid_url_units(input: &str) -> (String, bool) {
    let trimmed = input.trim_matches(|c: char| c.is_ascii_control() || c == ' ');
    let had_invalid_unit = trimmed.len() != input.len();
    let mut filtered = String::with_capacity(trimmed.len());
    let mut had_tab_or_newline = false;
    for c in trimmed.chars() {
        if matches!(c, '\t' | '\n' | '\r') {
            had_tab_or_newline = true;
        } else {
            filtered.push(c);
        }
    }
    (filtered, had_invalid_unit || had_tab_or_newline)
}

/// The writer role shared by a fresh parse (strictly append-only) and a
/// setter (which parses into a scratch buffer before splicing). This
/// implementation only needs the append-only role: setters are implemented
/// in `lib.rs` by rebuilding an `href` string and reparsing.
pub(crate) struct UrlBuilder {
    serialization: String,
    ends: [u32; COMPONENT_COUNT],
    flags: Flags,
    host: HostInternal,
    port: Option<u16>,
}

impl UrlBuilder {
    fn new() -> Self {
        UrlBuilder {
            serialization: String::new(),
            ends: [0; COMPONENT_COUNT],
            flags: Flags::empty(),
            host: HostInternal::None,
            port: None,
        }
    }

    fn len(&self) -> u32 {
        self.serialization.len() as u32
    }

    fn set_end(&mut self, component: usize) {
        self.ends[component] = self.len();
    }

    fn push_str(&mut self, s: &str) {
        self.serialization.push_str(s);
    }

    /// Fails with `ParseError::Overflow` if the built serialization has grown
    /// past what a `u32` end-offset can address; every `ends[..]` entry is a
    /// byte offset into `serialization` truncated to `u32` by `set_end`.
    fn finish(self) -> Result<Url, ParseError> {
        if self.serialization.len() > u32::MAX as usize {
            return Err(ParseError::Overflow);
        }
        Ok(Url {
            serialization: self.serialization,
            ends: self.ends,
            flags: self.flags,
            host: self.host,
            port: self.port,
        })
    }
}

/// <https://url.spec.whatwg.org/#concept-basic-url-parser>
pub(crate) fn parse(input: &str, base: Option<&Url>) -> Result<Url, ParseError> {
    let (filtered, _had_violation) = strip_invalid_url_units(input);
    let input = filtered.as_str();

    if let Some((scheme, rest)) = parse_scheme(input) {
        if scheme == "file" {
            return parse_file(rest, base, scheme);
        }
        if is_special_scheme(&scheme) {
            if let Some(base) = base {
                if base.scheme() == scheme && !rest.starts_with("//") {
                    return parse_relative(rest, base, base.is_special());
                }
            }
            return parse_special_absolute(rest, scheme);
        }
        return parse_non_special_absolute(rest, scheme);
    }

    // No-scheme state.
    let base = base.ok_or(ParseError::MissingSchemeNonRelativeUrl)?;
    if input.starts_with('#') {
        return build_from_base_with_fragment(base, &input[1..]);
    }
    if base.has_opaque_path() {
        return Err(ParseError::MissingSchemeNonRelativeUrl);
    }
    if base.scheme() == "file" {
        parse_file(input, Some(base), "file".to_owned())
    } else {
        parse_relative(input, base, base.is_special())
    }
}

fn parse_scheme(input: &str) -> Option<(String, &str)> {
    let bytes = input.as_bytes();
    if bytes.is_empty() || !is_ascii_alpha(bytes[0]) {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'+' | b'-' | b'.' => i += 1,
            b':' => {
                return Some((input[..i].to_ascii_lowercase(), &input[i + 1..]));
            }
            _ => return None,
        }
    }
    None
}

/// Authority + path + query + fragment, for a special (non-file) scheme.
fn parse_special_absolute(rest: &str, scheme: String) -> Result<Url, ParseError> {
    let mut b = UrlBuilder::new();
    b.push_str(&scheme);
    b.set_end(SCHEME);
    b.push_str("://");
    b.set_end(SCHEME_SEP);
    b.flags.insert(Flags::SCHEME | Flags::PATH);

    if !rest.starts_with("//") {
        return Err(ParseError::SpecialSchemeMissingFollowingSolidus);
    }
    let after_slashes = skip_slashes(rest);
    write_authority(&mut b, after_slashes, true)?;
    write_path_and_rest(&mut b, remainder_after_authority(after_slashes, true), true, &scheme)
}

fn parse_non_special_absolute(rest: &str, scheme: String) -> Result<Url, ParseError> {
    let mut b = UrlBuilder::new();
    b.push_str(&scheme);
    b.set_end(SCHEME);

    if rest.starts_with("//") {
        b.push_str("://");
        b.set_end(SCHEME_SEP);
        let after_slashes = &rest[2..];
        write_authority(&mut b, after_slashes, false)?;
        write_path_and_rest(&mut b, remainder_after_authority(after_slashes, false), false, &scheme)
    } else if rest.starts_with('/') {
        // Path-or-authority state, single slash: no authority, but the path
        // still has segment structure (it is not opaque).
        b.push_str(":");
        b.set_end(SCHEME_SEP);
        b.set_end(USERNAME);
        b.set_end(PASSWORD);
        b.set_end(crate::HOST_START);
        b.set_end(HOST);
        b.set_end(PORT);
        write_path_and_rest(&mut b, rest, false, &scheme)
    } else {
        // Path-or-authority state collapses to an opaque path for
        // non-special schemes with no authority and no leading slash.
        b.push_str(":");
        b.set_end(SCHEME_SEP);
        b.set_end(USERNAME);
        b.set_end(PASSWORD);
        b.set_end(HOST);
        b.set_end(PORT);
        b.set_end(PATH_PREFIX);
        b.flags.insert(Flags::OPAQUE_PATH);
        let (path_part, query, fragment) = split_query_fragment(rest);
        b.push_str(&utf8_percent_encode(path_part, CONTROLS).to_string());
        b.set_end(PATH);
        write_query_and_fragment(&mut b, query, fragment, false);
        b.finish()
    }
}

/// Everything after the authority has been consumed by `write_authority`;
/// recompute the textual remainder so the path/query/fragment writer can
/// work from it without threading an explicit cursor position through.
fn remainder_after_authority(after_slashes: &str, _is_special: bool) -> &str {
    let end = authority_end(after_slashes);
    &after_slashes[end..]
}

fn authority_end(input: &str) -> usize {
    input
        .find(['/', '?', '#'])
        .unwrap_or(input.len())
}

fn skip_slashes(input: &str) -> &str {
    input.trim_start_matches(['/', '\\'])
}

fn write_authority(b: &mut UrlBuilder, input: &str, is_special: bool) -> Result<(), ParseError> {
    let authority_len = authority_end(input);
    let authority = &input[..authority_len];

    let (userinfo, host_port) = match authority.rfind('@') {
        Some(at) => (Some(&authority[..at]), &authority[at + 1..]),
        None => (None, authority),
    };

    if let Some(userinfo) = userinfo {
        if userinfo.is_empty() && host_port.is_empty() {
            return Err(ParseError::HostMissing);
        }
        // More than one `@` in the authority (e.g. `a@b@example.com`) is only
        // unambiguous because the rightmost one wins; the standard still
        // calls this out as a validation error.
        if userinfo.contains('@') {
            return Err(ParseError::InvalidCredentials);
        }
        let (username, password) = match userinfo.find(':') {
            Some(colon) => (&userinfo[..colon], Some(&userinfo[colon + 1..])),
            None => (userinfo, None),
        };
        b.push_str(&utf8_percent_encode(username, USERINFO).to_string());
        b.set_end(USERNAME);
        if let Some(password) = password {
            b.push_str(":");
            b.push_str(&utf8_percent_encode(password, USERINFO).to_string());
        }
        b.set_end(PASSWORD);
        b.flags.insert(Flags::USERNAME);
        if password.is_some() {
            b.flags.insert(Flags::PASSWORD);
        }
        b.push_str("@");
    } else {
        b.set_end(USERNAME);
        b.set_end(PASSWORD);
    }

    let (host_str, port_str) = split_host_port(host_port, is_special)?;

    if host_str.is_empty() && is_special {
        return Err(ParseError::HostMissing);
    }

    let host = parse_host(host_str, is_special)?;
    write_host(b, &host);

    if let Some(port_str) = port_str {
        let port = parse_port(port_str)?;
        let effective = match (port, default_port(&b.serialization[..b.ends[SCHEME] as usize])) {
            (Some(p), Some(d)) if p == d => None,
            (p, _) => p,
        };
        if let Some(p) = effective {
            b.push_str(":");
            b.push_str(&p.to_string());
            b.flags.insert(Flags::PORT);
        }
        b.port = effective;
    }
    b.set_end(PORT);

    Ok(())
}

fn write_host(b: &mut UrlBuilder, host: &Host<String>) {
    b.set_end(crate::HOST_START);
    match host {
        Host::Empty => {
            b.host = HostInternal::None;
        }
        Host::Domain(s) => {
            b.push_str(s);
            b.host = HostInternal::Domain;
            b.flags.insert(Flags::HOST);
        }
        Host::Opaque(s) => {
            b.push_str(s);
            b.host = HostInternal::Opaque;
            b.flags.insert(Flags::HOST);
        }
        Host::Ipv4(addr) => {
            b.push_str(&addr.to_string());
            b.host = HostInternal::Ipv4(*addr);
            b.flags.insert(Flags::HOST);
        }
        Host::Ipv6(addr) => {
            b.push_str("[");
            b.push_str(&addr.to_string());
            b.push_str("]");
            b.host = HostInternal::Ipv6(*addr);
            b.flags.insert(Flags::HOST);
        }
    }
    b.set_end(HOST);
}

fn split_host_port(input: &str, is_special: bool) -> Result<(&str, Option<&str>), ParseError> {
    if input.starts_with('[') {
        let end = input.find(']').ok_or(ParseError::Ipv6Unclosed)? + 1;
        let (host, rest) = input.split_at(end);
        return match rest.strip_prefix(':') {
            Some(port) => Ok((host, Some(port))),
            None if rest.is_empty() => Ok((host, None)),
            None => Err(ParseError::InvalidUrlUnit),
        };
    }
    match input.rfind(':') {
        Some(colon) => Ok((&input[..colon], Some(&input[colon + 1..]))),
        None => {
            let _ = is_special;
            Ok((input, None))
        }
    }
}

fn parse_port(input: &str) -> Result<Option<u16>, ParseError> {
    if input.is_empty() {
        return Ok(None);
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::PortInvalid);
    }
    input
        .parse::<u32>()
        .map_err(|_| ParseError::PortOutOfRange)
        .and_then(|p| {
            if p > 65535 {
                Err(ParseError::PortOutOfRange)
            } else {
                Ok(Some(p as u16))
            }
        })
}

fn split_query_fragment(input: &str) -> (&str, Option<&str>, Option<&str>) {
    let (before_fragment, fragment) = match input.find('#') {
        Some(i) => (&input[..i], Some(&input[i + 1..])),
        None => (input, None),
    };
    let (path, query) = match before_fragment.find('?') {
        Some(i) => (&before_fragment[..i], Some(&before_fragment[i + 1..])),
        None => (before_fragment, None),
    };
    (path, query, fragment)
}

fn write_path_and_rest(
    b: &mut UrlBuilder,
    rest: &str,
    is_special: bool,
    scheme: &str,
) -> Result<Url, ParseError> {
    let (path, query, fragment) = split_query_fragment(rest);
    let has_host = !matches!(b.host, HostInternal::None);
    let prefix = has_host && !path.starts_with('/') && !path.is_empty();
    if prefix {
        b.push_str("/.");
    }
    b.set_end(PATH_PREFIX);
    write_path_segments(b, path, is_special);
    b.set_end(PATH);
    write_query_and_fragment(b, query, fragment, is_special);
    let _ = scheme;
    b.finish()
}

fn write_path_segments(b: &mut UrlBuilder, path: &str, is_special: bool) {
    if path.is_empty() {
        return;
    }
    let mut segments: Vec<String> = Vec::new();
    let start_index = if path.starts_with('/') { 1 } else { 0 };
    let raw_segments: Vec<&str> = path.split('/').skip(start_index).collect();
    let last_index = raw_segments.len() - 1;
    for (i, raw) in raw_segments.into_iter().enumerate() {
        if is_single_dot_segment(raw) {
            // A dot segment at end-of-input with no trailing separator still
            // yields a final empty segment, as if the separator were there.
            if i == last_index {
                segments.push(String::new());
            }
            continue;
        }
        if is_double_dot_segment(raw) {
            segments.pop();
            if i == last_index {
                segments.push(String::new());
            }
            continue;
        }
        segments.push(encode_path_segment(raw, is_special));
    }
    for seg in &segments {
        b.push_str("/");
        b.push_str(seg);
    }
    if segments.is_empty() {
        // Every segment normalized away (e.g. a lone ".."); the root slash remains.
        b.push_str("/");
    }
}

/// <https://url.spec.whatwg.org/#single-dot-path-segment>
fn is_single_dot_segment(seg: &str) -> bool {
    seg == "." || seg.eq_ignore_ascii_case("%2e")
}

/// <https://url.spec.whatwg.org/#double-dot-path-segment>
fn is_double_dot_segment(seg: &str) -> bool {
    seg == ".."
        || seg.eq_ignore_ascii_case(".%2e")
        || seg.eq_ignore_ascii_case("%2e.")
        || seg.eq_ignore_ascii_case("%2e%2e")
}

fn encode_path_segment(seg: &str, is_special: bool) -> String {
    let _ = is_special;
    utf8_percent_encode(seg, PATH_SET).to_string()
}

fn write_query_and_fragment(b: &mut UrlBuilder, query: Option<&str>, fragment: Option<&str>, is_special: bool) {
    if let Some(query) = query {
        b.push_str("?");
        let set: &AsciiSet = if is_special { SPECIAL_QUERY } else { QUERY_SET };
        b.push_str(&utf8_percent_encode(query, set).to_string());
        b.flags.insert(Flags::QUERY);
    }
    b.set_end(QUERY);
    if let Some(fragment) = fragment {
        b.push_str("#");
        b.push_str(&percent_encode(fragment.as_bytes(), crate::FRAGMENT_SET).to_string());
        b.flags.insert(Flags::FRAGMENT);
    }
    b.set_end(FRAGMENT);
}

fn build_from_base_with_fragment(base: &Url, fragment: &str) -> Result<Url, ParseError> {
    let mut href = String::with_capacity(base.as_str().len() + fragment.len() + 1);
    href.push_str(base.as_str().split('#').next().unwrap_or(""));
    href.push('#');
    href.push_str(fragment);
    parse(&href, None).or_else(|_| parse(base.as_str(), None))
}

/// Resolve a relative reference (no scheme) against `base`.
fn parse_relative(rest: &str, base: &Url, is_special: bool) -> Result<Url, ParseError> {
    let scheme = base.scheme().to_owned();
    if rest.is_empty() {
        return Url::parse(base.as_str());
    }
    let first = rest.as_bytes()[0];
    if first == b'/' || first == b'\\' {
        if rest.len() > 1 && matches!(rest.as_bytes()[1], b'/' | b'\\') {
            if is_special {
                return parse_special_absolute(&rest[2..], scheme);
            }
            return parse_non_special_absolute(&format!("//{}", &rest[2..]), scheme);
        }
        // Relative-slash state: keep base authority, replace the path.
        return rebuild_with_base_authority(base, &scheme, rest, is_special);
    }
    if first == b'?' {
        let mut href = without_query_and_fragment(base.as_str());
        href.push_str(rest);
        return Url::parse(&href);
    }
    if first == b'#' {
        return build_from_base_with_fragment(base, &rest[1..]);
    }
    // Relative path state: merge with base path (drop its last segment).
    let merged_path = merge_paths(base.path(), rest);
    rebuild_with_base_authority(base, &scheme, &merged_path, is_special)
}

fn without_query_and_fragment(href: &str) -> String {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    href[..end].to_owned()
}

fn merge_paths(base_path: &str, rest: &str) -> String {
    let mut merged = String::new();
    if let Some(last_slash) = base_path.rfind('/') {
        merged.push_str(&base_path[..=last_slash]);
    } else {
        merged.push('/');
    }
    merged.push_str(rest);
    merged
}

fn rebuild_with_base_authority(
    base: &Url,
    scheme: &str,
    path_query_fragment: &str,
    is_special: bool,
) -> Result<Url, ParseError> {
    let mut href = String::new();
    href.push_str(scheme);
    href.push(':');
    // A null host never gets a `//` marker: the WHATWG serializer only
    // emits it when the URL actually carries an authority.
    if let Some(host) = base.host() {
        href.push_str("//");
        if !base.username().is_empty() || base.password().is_some() {
            href.push_str(base.username());
            if let Some(p) = base.password() {
                href.push(':');
                href.push_str(p);
            }
            href.push('@');
        }
        href.push_str(&host.to_string());
        if let Some(port) = base.port() {
            href.push(':');
            href.push_str(&port.to_string());
        }
    }
    href.push_str(path_query_fragment);
    let _ = is_special;
    parse(&href, None)
}

/// <https://url.spec.whatwg.org/#file-state> and its sub-states, covering
/// the Windows drive-letter quirk and the `localhost` host normalization.
fn parse_file(rest: &str, base: Option<&Url>, scheme: String) -> Result<Url, ParseError> {
    let bytes = rest.as_bytes();
    let has_authority =
        bytes.len() >= 2 && matches!(bytes[0], b'/' | b'\\') && matches!(bytes[1], b'/' | b'\\');

    if has_authority {
        // File host state: the `//`-or-`\\`-prefixed text names an authority,
        // parsed as a domain/IPv4/IPv6 host exactly like other special schemes.
        // Only the two marker slashes are consumed — any further slash is
        // path content (an empty host followed by that path), not more
        // authority to skip over.
        let after_slashes = &rest[2..];
        if starts_with_windows_drive_letter(after_slashes) {
            return build_file_url("", after_slashes, scheme);
        }
        let end = authority_end(after_slashes);
        return build_file_url(&after_slashes[..end], &after_slashes[end..], scheme);
    }

    // File (slash-or-path) state: no authority marker, so whatever follows is
    // path content, never host content. A single leading slash (or none at
    // all) only ever inherits a host by inheriting it from a file-scheme base.
    let path_rest = rest.trim_start_matches(['/', '\\']);

    if starts_with_windows_drive_letter(path_rest) {
        return build_file_url("", path_rest, scheme);
    }

    if let Some(base) = base {
        if base.scheme() == "file" {
            if path_rest.is_empty() {
                return Url::parse(base.as_str());
            }
            if path_rest.as_bytes()[0] == b'?' {
                let host = base.host_str().unwrap_or("").to_owned();
                let (_, query, fragment) = split_query_fragment(path_rest);
                let combined = join_path_query_fragment(base.path(), query, fragment);
                return build_file_url(&host, &combined, scheme);
            }
            if path_rest.as_bytes()[0] == b'#' {
                return build_from_base_with_fragment(base, &path_rest[1..]);
            }
            let merged_path = merge_paths(base.path(), path_rest);
            let host = base.host_str().unwrap_or("").to_owned();
            return build_file_url(&host, &merged_path, scheme);
        }
    }

    // No usable file-scheme base (none given, or its scheme isn't "file"):
    // the path is resolved against an implicit empty root, with an empty host.
    let merged_path = merge_paths("/", path_rest);
    build_file_url("", &merged_path, scheme)
}

fn join_path_query_fragment(path: &str, query: Option<&str>, fragment: Option<&str>) -> String {
    let mut s = path.to_owned();
    if let Some(query) = query {
        s.push('?');
        s.push_str(query);
    }
    if let Some(fragment) = fragment {
        s.push('#');
        s.push_str(fragment);
    }
    s
}

/// Builds a `file:` URL's record directly (no recursive reparse): parses
/// `host` as a file host (domain/IPv4/IPv6, `localhost` normalized away) and
/// writes the path/query/fragment the same way the absolute-URL writers do.
fn build_file_url(host: &str, path_query_fragment: &str, scheme: String) -> Result<Url, ParseError> {
    let host = if host.eq_ignore_ascii_case("localhost") { "" } else { host };

    let mut b = UrlBuilder::new();
    b.push_str(&scheme);
    b.set_end(SCHEME);
    b.push_str("://");
    b.set_end(SCHEME_SEP);
    b.flags.insert(Flags::SCHEME | Flags::PATH);
    b.set_end(USERNAME);
    b.set_end(PASSWORD);

    // Unlike other special schemes, `file:` tolerates an empty host (the
    // generic host parser's `host_missing` failure is for authority/host
    // states other than file host state).
    let host_value = if host.is_empty() {
        Host::Empty
    } else {
        parse_host(host, true)?
    };
    write_host(&mut b, &host_value);
    b.set_end(PORT);

    let (path_part, query, fragment) = split_query_fragment(path_query_fragment);
    let normalized_path = normalize_file_path(path_part);
    b.set_end(PATH_PREFIX);
    write_path_segments(&mut b, &normalized_path, true);
    b.set_end(PATH);
    write_query_and_fragment(&mut b, query, fragment, true);
    b.finish()
}

/// Ensures a leading `/` and applies the `X|` → `X:` Windows drive-letter quirk
/// to the first segment.
fn normalize_file_path(path: &str) -> String {
    let with_slash = if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{}", path)
    };
    let body = &with_slash[1..];
    if starts_with_windows_drive_letter(body) && body.as_bytes()[1] == b'|' {
        let mut fixed = String::with_capacity(with_slash.len());
        fixed.push('/');
        fixed.push(body.as_bytes()[0] as char);
        fixed.push(':');
        fixed.push_str(&body[2..]);
        fixed
    } else {
        with_slash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scheme_lowercases_and_splits() {
        assert_eq!(parse_scheme("HTTP://x"), Some(("http".to_owned(), "//x")));
        assert_eq!(parse_scheme("not a scheme"), None);
    }

    #[test]
    fn port_parsing_rejects_overflow() {
        assert!(matches!(parse_port("65536"), Err(ParseError::PortOutOfRange)));
        assert_eq!(parse_port("80").unwrap(), Some(80));
        assert_eq!(parse_port("").unwrap(), None);
    }

    #[test]
    fn default_port_known_for_special_schemes() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("ftp"), Some(21));
        assert_eq!(default_port("gopher"), None);
    }

    #[test]
    fn userinfo_separator_is_present_in_serialization() {
        let url = parse("http://user:pw@example.com/", None).unwrap();
        assert_eq!(url.as_str(), "http://user:pw@example.com/");
        let url = parse("http://user@example.com/", None).unwrap();
        assert_eq!(url.as_str(), "http://user@example.com/");
    }

    #[test]
    fn non_special_single_slash_path_is_not_opaque() {
        let url = parse("a:/b/../c", None).unwrap();
        assert!(!url.has_opaque_path());
        assert_eq!(url.path(), "/c");
        assert_eq!(url.as_str(), "a:/c");
    }

    #[test]
    fn non_special_no_leading_slash_path_is_opaque() {
        let url = parse("mailto:bob@example.com", None).unwrap();
        assert!(url.has_opaque_path());
        assert_eq!(url.path(), "bob@example.com");
    }

    #[test]
    fn relative_resolution_against_hostless_base_keeps_no_authority_marker() {
        let base = parse("a:/b/c", None).unwrap();
        let url = parse("d", Some(&base)).unwrap();
        assert!(!url.has_host());
        assert_eq!(url.as_str(), "a:/b/d");

        let url = parse("/x/y", Some(&base)).unwrap();
        assert!(!url.has_host());
        assert_eq!(url.as_str(), "a:/x/y");
    }

    #[test]
    fn special_scheme_without_following_solidus_is_rejected() {
        let result = parse("http:example.com", None);
        assert!(matches!(
            result,
            Err(ParseError::SpecialSchemeMissingFollowingSolidus)
        ));
    }

    #[test]
    fn authority_with_multiple_at_signs_is_rejected() {
        let result = parse("http://user@host@example.com/", None);
        assert!(matches!(result, Err(ParseError::InvalidCredentials)));
    }
}
