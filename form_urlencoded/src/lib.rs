// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for the [`application/x-www-form-urlencoded`] syntax,
//! as used by HTML forms and by the `search` component of a URL.
//!
//! [`application/x-www-form-urlencoded`]: https://url.spec.whatwg.org/#application/x-www-form-urlencoded

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use percent_encoding::{percent_decode, percent_encode_byte, AsciiSet, NON_ALPHANUMERIC};

/// The [application/x-www-form-urlencoded percent-encode set] used when
/// serializing names and values that `byte_serialize` cannot leave literal.
///
/// Letters, digits, and `*-._` are kept literal; space becomes `+`; everything
/// else is percent-encoded.
///
/// [application/x-www-form-urlencoded percent-encode set]: https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
const FORM_URLENCODED_ENCODE_SET: &AsciiSet = NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs.
///
/// Use [`parse(input.as_bytes())`](parse) to parse a `&str` input.
///
/// The names and values are percent-decoded, with `+` decoded to space, and
/// then repaired as UTF-8 (invalid sequences become U+FFFD).
#[inline]
pub fn parse(input: &[u8]) -> Parse<'_> {
    Parse { input }
}

/// The return type of [`parse`].
#[derive(Copy, Clone)]
pub struct Parse<'a> {
    input: &'a [u8],
}

impl<'a> Iterator for Parse<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                return None;
            }
            let (piece, rest) = split_once(self.input, b'&');
            self.input = rest;
            if piece.is_empty() {
                continue;
            }
            let (name, value) = match piece.iter().position(|&b| b == b'=') {
                Some(position) => (&piece[..position], &piece[position + 1..]),
                None => (piece, &piece[..0]),
            };
            return Some((decode(name), decode(value)));
        }
    }
}

impl<'a> Parse<'a> {
    /// Borrow the remaining, still-encoded input.
    pub fn into_owned(self) -> ParseIntoOwned<'a> {
        ParseIntoOwned { inner: self }
    }
}

/// Like [`Parse`], but items are `(String, String)` pairs instead of `Cow`.
pub struct ParseIntoOwned<'a> {
    inner: Parse<'a>,
}

impl<'a> Iterator for ParseIntoOwned<'a> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
    }
}

fn split_once(input: &[u8], separator: u8) -> (&[u8], &[u8]) {
    match input.iter().position(|&b| b == separator) {
        Some(position) => (&input[..position], &input[position + 1..]),
        None => (input, &input[..0]),
    }
}

fn decode(input: &[u8]) -> Cow<'_, str> {
    match replace_plus(input) {
        Cow::Borrowed(b) => percent_decode(b).decode_utf8_lossy(),
        Cow::Owned(b) => Cow::Owned(percent_decode(&b).decode_utf8_lossy().into_owned()),
    }
}

/// Replace `+` with ` ` before percent-decoding, as required for form data
/// (but not for the general percent-encoding codec).
fn replace_plus(input: &[u8]) -> Cow<'_, [u8]> {
    if input.contains(&b'+') {
        Cow::Owned(
            input
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    }
}

/// The [`application/x-www-form-urlencoded` serializer].
///
/// [`application/x-www-form-urlencoded` serializer]: https://url.spec.whatwg.org/#concept-urlencoded-serializer
pub struct Serializer<'a, T: Target> {
    target: Option<T>,
    start_position: usize,
    encoding: Cow<'a, str>,
}

/// A [`Serializer`] writes into this `Target` implementation.
pub trait Target {
    /// The type returned by `Serializer::finish`.
    type Finished;

    /// Append `s` to this string-like target.
    fn as_mut_string(&mut self) -> &mut String;

    /// Consume this target. Returns the corresponding value for `Serializer::finish`.
    fn finish(self) -> Self::Finished;
}

impl Target for String {
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
    fn finish(self) -> Self {
        self
    }
    type Finished = Self;
}

impl<'a> Target for &'a mut String {
    fn as_mut_string(&mut self) -> &mut String {
        &mut **self
    }
    fn finish(self) -> Self {
        self
    }
    type Finished = Self;
}

impl<'a, T: Target> Serializer<'a, T> {
    /// Create a new `Serializer` that will write into the given target.
    ///
    /// Pre-existing data in the target is preserved and an `&` separator is
    /// inserted if new pairs are appended and the target is non-empty.
    pub fn new(target: T) -> Self {
        Self::for_suffix(target, 0)
    }

    /// Create a new `Serializer` that will write into the given target, all
    /// of whose content after `start_position` is assumed to already be in
    /// `application/x-www-form-urlencoded` syntax.
    pub fn for_suffix(mut target: T, start_position: usize) -> Self {
        {
            let string = target.as_mut_string();
            match string.get(..start_position) {
                Some(_) => {}
                None => panic!("invalid length {} for {:?}", start_position, string),
            }
        }
        Serializer { target: Some(target), start_position, encoding: Cow::Borrowed("utf-8") }
    }

    /// Remove any existing name/value pairs.
    pub fn clear(&mut self) -> &mut Self {
        let start_position = self.start_position;
        self.target_mut().truncate(start_position);
        self
    }

    /// Serialize and append a name/value pair.
    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.start_pair();
        append_pair(
            self.target.as_mut().unwrap().as_mut_string(),
            name,
            value,
        );
        self
    }

    /// Serialize and append a name of a name/value pair, with no value.
    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        self.start_pair();
        append_key_only(self.target.as_mut().unwrap().as_mut_string(), name);
        self
    }

    /// Serialize and append a number of name/value pairs.
    pub fn extend_pairs<I, K, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for pair in iter {
            let &(ref k, ref v) = pair.borrow();
            self.start_pair();
            append_pair(
                self.target.as_mut().unwrap().as_mut_string(),
                k.as_ref(),
                v.as_ref(),
            );
        }
        self
    }

    /// Finish serializing and return the target.
    pub fn finish(&mut self) -> T::Finished {
        self.target.take().unwrap().finish()
    }

    fn start_pair(&mut self) {
        let separator_needed = self.target_mut().len() > self.start_position;
        if separator_needed {
            self.target_mut().push('&');
        }
    }

    fn target_mut(&mut self) -> &mut String {
        self.target.as_mut().unwrap().as_mut_string()
    }
}

fn append_pair(string: &mut String, name: &str, value: &str) {
    append_key_only(string, name);
    string.push('=');
    byte_serialize_into(value, string);
}

fn append_key_only(string: &mut String, name: &str) {
    byte_serialize_into(name, string);
}

fn byte_serialize_into(input: &str, out: &mut String) {
    for &byte in input.as_bytes() {
        if byte == b' ' {
            out.push('+');
        } else if FORM_URLENCODED_ENCODE_SET.should_percent_encode(byte) {
            out.push_str(percent_encode_byte(byte));
        } else {
            out.push(byte as char);
        }
    }
}

/// Percent-encode the given bytes in the `application/x-www-form-urlencoded` syntax,
/// space to `+`, then return an iterator of `&str` slices.
pub fn byte_serialize(input: &[u8]) -> ByteSerialize<'_> {
    ByteSerialize { bytes: input }
}

/// The return type of [`byte_serialize`].
pub struct ByteSerialize<'a> {
    bytes: &'a [u8],
}

impl<'a> Iterator for ByteSerialize<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.bytes.is_empty() {
            return None;
        }
        if self.bytes[0] == b' ' {
            self.bytes = &self.bytes[1..];
            return Some("+");
        }
        if !FORM_URLENCODED_ENCODE_SET.should_percent_encode(self.bytes[0]) {
            let mut i = 1;
            while i < self.bytes.len()
                && self.bytes[i] != b' '
                && !FORM_URLENCODED_ENCODE_SET.should_percent_encode(self.bytes[i])
            {
                i += 1;
            }
            let (literal, rest) = self.bytes.split_at(i);
            self.bytes = rest;
            return Some(unsafe { core::str::from_utf8_unchecked(literal) });
        }
        let (&first, rest) = self.bytes.split_first().unwrap();
        self.bytes = rest;
        Some(percent_encode_byte(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parses_a_series_of_pairs() {
        let pairs: alloc::vec::Vec<_> = parse(b"a=1&b=2&a=3").into_owned().collect();
        assert_eq!(
            pairs,
            alloc::vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn plus_decodes_to_space() {
        let pairs: alloc::vec::Vec<_> = parse(b"q=hello+world").into_owned().collect();
        assert_eq!(pairs, alloc::vec![("q".to_string(), "hello world".to_string())]);
    }

    #[test]
    fn missing_equals_yields_empty_value() {
        let pairs: alloc::vec::Vec<_> = parse(b"flag").into_owned().collect();
        assert_eq!(pairs, alloc::vec![("flag".to_string(), "".to_string())]);
    }

    #[test]
    fn serializer_round_trips() {
        let mut target = String::new();
        Serializer::new(&mut target)
            .append_pair("a", "1")
            .append_pair("b", "hello world")
            .finish();
        assert_eq!(target, "a=1&b=hello+world");
        let pairs: alloc::vec::Vec<_> = parse(target.as_bytes()).into_owned().collect();
        assert_eq!(
            pairs,
            alloc::vec![("a".to_string(), "1".to_string()), ("b".to_string(), "hello world".to_string())]
        );
    }

    #[test]
    fn serializer_appends_after_existing_suffix() {
        let mut target = "existing=1".to_string();
        let start = target.len();
        Serializer::for_suffix(&mut target, start).append_pair("new", "2");
        assert_eq!(target, "existing=1&new=2");
    }
}
