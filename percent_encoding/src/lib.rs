// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URLs use special characters to indicate the parts of the request.
//! For example, a `?` indicates the end of a path and the start of a query string.
//! In order for that character to exist inside a path, it needs to be encoded differently.
//!
//! Percent encoding replaces reserved characters with the `%` escape character
//! followed by a byte value as two hexadecimal digits.
//! For example, an ASCII space character is replaced with `%20`.
//!
//! When encoding, the set of characters that can (and should) be left alone
//! depends on the context: the query string of an `http:` URL is not quoted
//! the same way as a `file:` path, for example. This is represented by the
//! [`AsciiSet`] parameter taken by [`percent_encode`] and [`utf8_percent_encode`].
//!
//! This library does not know WHAT should be percent-encoded in which situation
//! and only provides the mechanism. The sets used by the URL parser live in the
//! `url` crate.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

use alloc::borrow::{Cow, ToOwned};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::slice;
use core::str;

/// A set of ASCII characters in the form of a bitmap over the 128 `u8` values
/// that have the high bit unset, stating which of them are **not** part of the set.
///
/// This is used with a "do not percent-encode" polarity so that `NonAsciiSet`
/// together with bytes above 0x7F (always encoded) forms the "`code_point_set`"
/// described by the WHATWG URL Standard: everything *outside* the set is
/// replaced by `%HH`.
///
/// Parameters are 32-bit chunks, least significant byte first.
#[derive(Debug)]
pub struct AsciiSet {
    mask: [u32; 4],
}

const fn bucket_idx(byte: u8) -> usize {
    (byte >> 5) as usize
}

const fn bit(byte: u8) -> u32 {
    1 << ((byte as u32) & 0b1_1111)
}

impl AsciiSet {
    /// Called with UTF-8 bytes rather than code points.
    /// Not used for non-ASCII bytes.
    const fn contains(&self, byte: u8) -> bool {
        if byte >= 0x80 {
            return true;
        }
        let idx = bucket_idx(byte);
        (self.mask[idx] & bit(byte)) != 0
    }

    /// Whether this byte should be percent-encoded in the output.
    #[inline]
    pub const fn should_percent_encode(&self, byte: u8) -> bool {
        self.contains(byte)
    }

    /// Add a character to the set.
    pub const fn add(&self, byte: u8) -> Self {
        let idx = bucket_idx(byte);
        let mut mask = self.mask;
        mask[idx] |= bit(byte);
        AsciiSet { mask }
    }

    /// Remove a character from the set.
    pub const fn remove(&self, byte: u8) -> Self {
        let idx = bucket_idx(byte);
        let mut mask = self.mask;
        mask[idx] &= !bit(byte);
        AsciiSet { mask }
    }
}

/// The set of 0x00 to 0x1F (C0 controls), and 0x7F (DEL).
///
/// Every standard set is built on top of this baseline by adding the
/// characters reserved for a particular URL component.
pub const CONTROLS: &AsciiSet = &AsciiSet { mask: [!0, 0, 0, 1 << 31] };

macro_rules! static_assert {
    ($what:expr) => {
        const _: [(); 0 - (!($what) as usize)] = [];
    };
}
static_assert!(CONTROLS.contains(0x1F));
static_assert!(!CONTROLS.contains(0x20));
static_assert!(CONTROLS.contains(0x7F));

/// The [fragment percent-encode set].
///
/// [fragment percent-encode set]: https://url.spec.whatwg.org/#fragment-percent-encode-set
pub const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The [query percent-encode set].
///
/// [query percent-encode set]: https://url.spec.whatwg.org/#query-percent-encode-set
pub const QUERY: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');

/// The [special-query percent-encode set].
///
/// [special-query percent-encode set]: https://url.spec.whatwg.org/#special-query-percent-encode-set
pub const SPECIAL_QUERY: &AsciiSet = &QUERY.add(b'\'');

/// The [path percent-encode set].
///
/// [path percent-encode set]: https://url.spec.whatwg.org/#path-percent-encode-set
pub const PATH: &AsciiSet = &QUERY.add(b'?').add(b'`').add(b'{').add(b'}');

/// The [userinfo percent-encode set].
///
/// [userinfo percent-encode set]: https://url.spec.whatwg.org/#userinfo-percent-encode-set
pub const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// The [component percent-encode set].
///
/// [component percent-encode set]: https://url.spec.whatwg.org/#component-percent-encode-set
pub const COMPONENT: &AsciiSet = &USERINFO.add(b'$').add(b'%').add(b'&').add(b'+').add(b',');

/// The [`application/x-www-form-urlencoded` percent-encode set], used by `form_urlencoded`
/// for names and values that must be escaped with `%HH` rather than with the `+`/literal
/// split that the form codec otherwise applies.
///
/// [`application/x-www-form-urlencoded` percent-encode set]: https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
pub const FORM_URLENCODED: &AsciiSet = &COMPONENT
    .add(b'!')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'~');

/// The encode set used for `NonSpecial` path segments (non-special-scheme opaque paths
/// and raw-path handling), laxer than [`PATH`] since such paths have no segment structure
/// to protect.
pub const RAW_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Used by [`Url::to_file_path`][crate docs]-style helpers that need a conservative,
/// filesystem-friendly encode set outside the wire format proper.
pub const POSIX_PATH: &AsciiSet = &PATH.add(b'\\');

/// Everything that is not an ASCII letter or digit.
///
/// A useful baseline for callers (such as `form_urlencoded`) that percent-encode
/// almost everything and only carve out a small literal set.
pub const NON_ALPHANUMERIC: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'-')
    .add(b'.')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'_')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

/// Percent-encode the given bytes with the given [`AsciiSet`].
///
/// Non-ASCII bytes and bytes in the set are encoded.
///
/// The return type:
///
/// * Implements `Iterator<Item = &str>` and therefore has a `.collect::<String>()` method,
/// * Implements `Display` and therefore has a `.to_string()` method,
/// * Otherwise can be `.collect::<Vec<_>>()`'d into an individual percent-encoded string slices.
#[inline]
pub fn percent_encode<'a>(input: &'a [u8], ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    PercentEncode { bytes: input, ascii_set }
}

/// Percent-encode the UTF-8 encoding of the given string with the given [`AsciiSet`].
///
/// See [`percent_encode`] regarding the return type.
#[inline]
pub fn utf8_percent_encode<'a>(input: &'a str, ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    percent_encode(input.as_bytes(), ascii_set)
}

/// The return type of [`percent_encode`] and [`utf8_percent_encode`].
#[derive(Clone)]
pub struct PercentEncode<'a> {
    bytes: &'a [u8],
    ascii_set: &'static AsciiSet,
}

impl<'a> Iterator for PercentEncode<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.bytes.is_empty() {
            return None;
        }
        let mut i = 0;
        while i < self.bytes.len() && !self.ascii_set.should_percent_encode(self.bytes[i]) {
            i += 1;
        }
        if i > 0 {
            let (literal, remaining) = self.bytes.split_at(i);
            self.bytes = remaining;
            // The loop above guarantees these bytes are all ASCII, hence valid UTF-8.
            return Some(unsafe { str::from_utf8_unchecked(literal) });
        }
        let (&first_byte, remaining) = self.bytes.split_first().unwrap();
        self.bytes = remaining;
        Some(percent_encode_byte(first_byte))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.bytes.is_empty() {
            (0, Some(0))
        } else {
            (1, Some(self.bytes.len()))
        }
    }
}

impl<'a> fmt::Display for PercentEncode<'a> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.clone().try_for_each(|s| formatter.write_str(s))
    }
}

#[cfg(feature = "alloc")]
impl<'a> From<PercentEncode<'a>> for Cow<'a, str> {
    fn from(mut iter: PercentEncode<'a>) -> Self {
        match iter.next() {
            None => "".into(),
            Some(first) => match iter.next() {
                None => first.into(),
                Some(second) => {
                    let mut string = first.to_owned();
                    string.push_str(second);
                    string.extend(iter);
                    string.into()
                }
            },
        }
    }
}

/// Return the two-digit uppercase hexadecimal percent-encoding of a byte, as a static string slice.
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

pub fn percent_encode_byte(byte: u8) -> &'static str {
    // A lookup table avoids recomputing `%XX` for every byte; `str::from_utf8_unchecked`
    // is sound because every entry is three ASCII bytes.
    const TABLE: [[u8; 3]; 256] = {
        let mut table = [[0u8; 3]; 256];
        let mut i = 0;
        while i < 256 {
            table[i] = [b'%', HEX_DIGITS[i >> 4], HEX_DIGITS[i & 0xf]];
            i += 1;
        }
        table
    };
    unsafe { str::from_utf8_unchecked(&TABLE[byte as usize]) }
}

/// Convert two ASCII hex-digit bytes into a numeric value `0..=255`, if valid.
#[inline]
fn hex_pair_to_byte(a: u8, b: u8) -> Option<u8> {
    let hi = (a as char).to_digit(16)?;
    let lo = (b as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Percent-decode the given bytes.
///
/// Any `%XY` with two hexadecimal digits is decoded to the byte `0xXY`. An
/// unmatched `%` (not followed by two hex digits) is kept as a literal `%`.
///
/// See [`PercentDecode::decode_utf8`] for a method that both decodes and
/// repairs the resulting bytes into well-formed UTF-8.
#[inline]
pub fn percent_decode(input: &[u8]) -> PercentDecode<'_> {
    PercentDecode { bytes: input.iter() }
}

/// The return type of [`percent_decode`].
#[derive(Clone, Debug)]
pub struct PercentDecode<'a> {
    bytes: slice::Iter<'a, u8>,
}

impl<'a> Iterator for PercentDecode<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.bytes.next().map(|&byte| {
            if byte == b'%' {
                let mut cloned_iter = self.bytes.clone();
                if let (Some(&first), Some(&second)) = (cloned_iter.next(), cloned_iter.next()) {
                    if let Some(decoded) = hex_pair_to_byte(first, second) {
                        self.bytes = cloned_iter;
                        return decoded;
                    }
                }
            }
            byte
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.bytes.size_hint();
        (0, upper)
    }
}

impl<'a> PercentDecode<'a> {
    /// If the percent-decoded bytes are not valid UTF-8, invalid sequences
    /// (and the maximal subpart thereof, per the WHATWG Encoding Standard)
    /// are replaced with U+FFFD, the replacement character.
    pub fn decode_utf8_lossy(self) -> Cow<'a, str> {
        decode_utf8_lossy(self.collect_into_cow())
    }

    /// Decode the result of percent-decoding as UTF-8, failing if it is not valid UTF-8.
    pub fn decode_utf8(self) -> Result<Cow<'a, str>, str::Utf8Error> {
        match self.collect_into_cow() {
            Cow::Borrowed(bytes) => match str::from_utf8(bytes) {
                Ok(s) => Ok(Cow::Borrowed(s)),
                Err(e) => Err(e),
            },
            Cow::Owned(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Ok(Cow::Owned(s)),
                Err(e) => Err(e.utf8_error()),
            },
        }
    }

    fn collect_into_cow(self) -> Cow<'a, [u8]> {
        let bytes = self.bytes.as_slice();
        if !bytes.contains(&b'%') {
            return Cow::Borrowed(bytes);
        }
        Cow::Owned(self.collect())
    }
}

/// Replace invalid UTF-8 sequences in `input` with U+FFFD, as the WHATWG
/// Encoding Standard's UTF-8 decoder does. Used by the percent-decoding
/// path and by the host parser's "percent-decode and UTF-8 repair" step.
pub fn decode_utf8_lossy(input: Cow<'_, [u8]>) -> Cow<'_, str> {
    match input {
        Cow::Borrowed(bytes) => match str::from_utf8(bytes) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => Cow::Owned(String::from_utf8_lossy(bytes).into_owned()),
        },
        Cow::Owned(bytes) => match String::from_utf8_lossy(&bytes) {
            // If lossy decoding produced no change, we can reuse `bytes`.
            Cow::Borrowed(utf8) if utf8.len() == bytes.len() => {
                Cow::Owned(unsafe { String::from_utf8_unchecked(bytes) })
            }
            cow => Cow::Owned(cow.into_owned()),
        },
    }
}

/// Encode arbitrary (possibly malformed) UTF-16 code units as a percent-encoded
/// UTF-8 string per [`AsciiSet`] `set`, repairing lone surrogates to U+FFFD first.
///
/// This is the "UTF-16 transcoder + percent-encode" pairing described for
/// inputs that originate as `char16_t`/`wchar_t` strings.
pub fn percent_encode_utf16(input: &[u16], ascii_set: &'static AsciiSet) -> String {
    let mut decoded = String::with_capacity(input.len());
    for c in char::decode_utf16(input.iter().copied()) {
        decoded.push(c.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    utf8_percent_encode(&decoded, ascii_set).collect()
}

use core::char;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn encode_then_decode_ascii_is_identity() {
        let s = "hello, world! <>";
        let encoded: String = utf8_percent_encode(s, COMPONENT).collect();
        let decoded = percent_decode(encoded.as_bytes()).decode_utf8().unwrap();
        assert_eq!(decoded, s);
    }

    #[test]
    fn non_ascii_is_always_percent_encoded() {
        let encoded = utf8_percent_encode("déjà", CONTROLS).to_string();
        assert_eq!(encoded, "d%C3%A9j%C3%A0");
    }

    #[test]
    fn unmatched_percent_is_literal() {
        let decoded = percent_decode(b"100%").decode_utf8().unwrap();
        assert_eq!(decoded, "100%");
        let decoded = percent_decode(b"100%2").decode_utf8().unwrap();
        assert_eq!(decoded, "100%2");
    }

    #[test]
    fn invalid_utf8_after_decode_is_repaired() {
        // %FF is not a valid standalone UTF-8 lead byte.
        let decoded = percent_decode(b"%FF").decode_utf8_lossy();
        assert_eq!(decoded, "\u{FFFD}");
    }

    #[test]
    fn component_set_is_stricter_than_path() {
        assert!(COMPONENT.should_percent_encode(b'%'));
        assert!(!PATH.should_percent_encode(b'%'));
    }
}
