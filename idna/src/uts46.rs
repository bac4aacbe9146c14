// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/)

use self::Mapping::*;
use crate::punycode;
use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

include!("uts46_mapping_table.rs");

const PUNYCODE_PREFIX: &str = "xn--";

#[derive(Debug)]
struct StringTableSlice {
    // Store these as separate fields so the structure will have an
    // alignment of 1 and thus pack better into the Mapping enum, below.
    byte_start_lo: u8,
    byte_start_hi: u8,
    byte_len: u8,
}

fn decode_slice(slice: &StringTableSlice) -> &'static str {
    let lo = slice.byte_start_lo as usize;
    let hi = slice.byte_start_hi as usize;
    let start = (hi << 8) | lo;
    let len = slice.byte_len as usize;
    &STRING_TABLE[start..(start + len)]
}

#[repr(u8)]
#[derive(Debug)]
enum Mapping {
    Valid,
    Ignored,
    Mapped(StringTableSlice),
    Deviation(StringTableSlice),
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped(StringTableSlice),
}

struct Range {
    from: char,
    to: char,
}

fn find_char(codepoint: char) -> &'static Mapping {
    let r = TABLE.binary_search_by(|range| {
        if codepoint > range.to {
            Less
        } else if codepoint < range.from {
            Greater
        } else {
            Equal
        }
    });
    match r {
        Ok(i) => {
            const SINGLE_MARKER: u16 = 1 << 15;

            let x = INDEX_TABLE[i];
            let single = (x & SINGLE_MARKER) != 0;
            let offset = !SINGLE_MARKER & x;

            if single {
                &MAPPING_TABLE[offset as usize]
            } else {
                &MAPPING_TABLE[(offset + (codepoint as u16 - TABLE[i].from as u16)) as usize]
            }
        }
        Err(_) => fallback_mapping(codepoint),
    }
}

/// The compiled-in [`TABLE`] only lists ASCII and a curated set of
/// non-ASCII ranges relevant to IDNA (see `uts46_mapping_table.rs`). Any
/// code point the table does not cover falls through here: controls and
/// other formatting characters are disallowed, everything else is
/// considered valid as-is. This is coarser than the full Unicode IDNA
/// mapping table (see the module-level note in `uts46_mapping_table.rs`
/// for why), but it keeps the algorithm total over all of `char`.
fn fallback_mapping(codepoint: char) -> &'static Mapping {
    if codepoint.is_control() {
        &Mapping::Disallowed
    } else {
        &Mapping::Valid
    }
}

fn map_char(codepoint: char, config: Config, output: &mut String, errors: &mut Errors) {
    match *find_char(codepoint) {
        Mapping::Valid => output.push(codepoint),
        Mapping::Ignored => {}
        Mapping::Mapped(ref slice) => output.push_str(decode_slice(slice)),
        Mapping::Deviation(ref slice) => {
            if config.transitional_processing {
                output.push_str(decode_slice(slice))
            } else {
                output.push(codepoint)
            }
        }
        Mapping::Disallowed => {
            errors.push(Error::DisallowedCharacter);
            output.push(codepoint);
        }
        Mapping::DisallowedStd3Valid => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedByStd3AsciiRules);
            }
            output.push(codepoint)
        }
        Mapping::DisallowedStd3Mapped(ref slice) => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedMappedInStd3);
            }
            output.push_str(decode_slice(slice))
        }
    }
}

/// <https://www.unicode.org/reports/tr46/#Canonical_Combining_Class_Virama>
///
/// A curated set of the Virama code points (or, for Sinhala/Tibetan, the
/// functional equivalent) from the scripts that use ZWJ/ZWNJ for
/// orthographic conjuncts. Used by [`passes_joiners`].
const VIRAMA: &[char] = &[
    '\u{094D}', // DEVANAGARI SIGN VIRAMA
    '\u{09CD}', // BENGALI SIGN VIRAMA
    '\u{0A4D}', // GURMUKHI SIGN VIRAMA
    '\u{0ACD}', // GUJARATI SIGN VIRAMA
    '\u{0B4D}', // ORIYA SIGN VIRAMA
    '\u{0BCD}', // TAMIL SIGN VIRAMA
    '\u{0C4D}', // TELUGU SIGN VIRAMA
    '\u{0CCD}', // KANNADA SIGN VIRAMA
    '\u{0D4D}', // MALAYALAM SIGN VIRAMA
    '\u{0DCA}', // SINHALA SIGN AL-LAKUNA
    '\u{0F84}', // TIBETAN MARK HALANTA
    '\u{1039}', // MYANMAR SIGN VIRAMA
    '\u{17D2}', // KHMER SIGN COENG
];

/// A curated set of Arabic-script letters with Joining_Type Dual_Joining or
/// Right_Joining, used by the ZWNJ context rule in [`passes_joiners`]. Not
/// the full Unicode Joining_Type table (same caveat as [`fallback_mapping`]),
/// but covers the Arabic block, the dominant real-world case for this rule.
fn has_joining_type_ld_or_r(c: char) -> bool {
    matches!(c, '\u{0620}'..='\u{063F}' | '\u{0641}'..='\u{064A}' | '\u{066E}'..='\u{06D3}' | '\u{06D5}'..='\u{06FC}')
}

/// <https://www.unicode.org/reports/tr46/#ContextJ>, a curated approximation
/// of RFC 5892 Appendix A for ZWJ (U+200D) and ZWNJ (U+200C): legal only
/// directly after a Virama, or (ZWNJ only) between two runs of
/// joining-type letters within the same label.
fn passes_joiners(label: &str) -> bool {
    let chars: Vec<char> = label.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c != '\u{200C}' && c != '\u{200D}' {
            continue;
        }
        if i > 0 && VIRAMA.contains(&chars[i - 1]) {
            continue;
        }
        if c == '\u{200D}' {
            return false;
        }
        let before = chars[..i]
            .iter()
            .rev()
            .find(|c| !matches!(c, '\u{200C}' | '\u{200D}'));
        let after = chars[i + 1..]
            .iter()
            .find(|c| !matches!(c, '\u{200C}' | '\u{200D}'));
        match (before, after) {
            (Some(&b), Some(&a)) if has_joining_type_ld_or_r(b) && has_joining_type_ld_or_r(a) => {}
            _ => return false,
        }
    }
    true
}

// http://tools.ietf.org/html/rfc5893#section-2
fn passes_bidi(label: &str, is_bidi_domain: bool) -> bool {
    // Rule 0: Bidi Rules apply to Bidi Domain Names: a name with at least one RTL label.  A label
    // is RTL if it contains at least one character of bidi class R, AL or AN.
    if !is_bidi_domain {
        return true;
    }

    let mut chars = label.chars();
    let first_char_class = match chars.next() {
        Some(c) => bidi_class(c),
        None => return true, // empty string
    };

    match first_char_class {
        // LTR label
        BidiClass::L => {
            // Rule 5
            for c in chars.by_ref() {
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

            // Rule 6: must end in L or EN followed by 0 or more NSM.
            let mut rev_chars = label.chars().rev();
            let mut last_non_nsm = rev_chars.next();
            while let Some(c) = last_non_nsm {
                if bidi_class(c) == BidiClass::NSM {
                    last_non_nsm = rev_chars.next();
                    continue;
                }
                break;
            }
            match last_non_nsm {
                Some(c) if bidi_class(c) == BidiClass::L || bidi_class(c) == BidiClass::EN => {}
                Some(_) => return false,
                _ => {}
            }
        }

        // RTL label
        BidiClass::R | BidiClass::AL => {
            let mut found_en = false;
            let mut found_an = false;

            // Rule 2
            for c in chars {
                let char_class = bidi_class(c);
                if char_class == BidiClass::EN {
                    found_en = true;
                } else if char_class == BidiClass::AN {
                    found_an = true;
                }

                if !matches!(
                    char_class,
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
            // Rule 3: must end in L, EN, AN, R or AL followed by 0 or more NSM.
            let mut rev_chars = label.chars().rev();
            let mut last = rev_chars.next();
            while let Some(c) = last {
                if bidi_class(c) == BidiClass::NSM {
                    last = rev_chars.next();
                    continue;
                }
                break;
            }
            match last {
                Some(c)
                    if matches!(
                        bidi_class(c),
                        BidiClass::R | BidiClass::AL | BidiClass::EN | BidiClass::AN
                    ) => {}
                _ => return false,
            }

            // Rule 4: a label cannot contain both EN and AN.
            if found_an && found_en {
                return false;
            }
        }

        // Rule 1: should start with L, R or AL.
        _ => return false,
    }

    true
}

fn is_bidi_domain(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// Check the validity criteria for the given label.
///
/// V1 (NFC) and V8 (Bidi) are checked inside `processing()` to prevent doing duplicate work.
///
/// <http://www.unicode.org/reports/tr46/#Validity_Criteria>
fn is_valid(label: &str, config: Config) -> bool {
    let first_char = match label.chars().next() {
        None => return true, // Empty string, pass
        Some(c) => c,
    };

    // V2/V3: CheckHyphens — neither begin nor end with U+002D HYPHEN-MINUS,
    // nor carry it at both of positions 3-4 (the ACE `--` marker position).
    if config.check_hyphens {
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
        let bytes = label.as_bytes();
        if bytes.len() >= 4 && bytes[2] == b'-' && bytes[3] == b'-' {
            return false;
        }
    }

    // V4: not contain a U+002E FULL STOP.
    //
    // Here, label can't contain '.' since the input is from .split('.').

    // V5: not begin with a GC=Mark.
    if is_combining_mark(first_char) {
        return false;
    }

    // V6: Check against Mapping Table.
    if label.chars().any(|c| match *find_char(c) {
        Mapping::Valid => false,
        Mapping::Deviation(_) => config.transitional_processing,
        Mapping::DisallowedStd3Valid => config.use_std3_ascii_rules,
        _ => true,
    }) {
        return false;
    }

    // V7: ContextJ rules.
    if config.check_joiners && !passes_joiners(label) {
        return false;
    }

    // V8: Bidi rules are checked inside `processing()`.
    true
}

/// <http://www.unicode.org/reports/tr46/#Processing>
fn processing(domain: &str, config: Config, errors: &mut Errors) -> String {
    // Weed out the simple cases: only allow all lowercase ASCII characters and digits where none
    // of the labels start with PUNYCODE_PREFIX and labels don't start or end with hyphen.
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
    if simple {
        return domain.to_owned();
    }

    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        map_char(c, config, &mut mapped, errors)
    }
    let mut normalized = String::with_capacity(mapped.len());
    normalized.extend(mapped.nfc());

    let mut validated = String::new();
    let (mut first, mut valid, mut has_bidi_labels) = (true, true, false);
    for label in normalized.split('.') {
        if !first {
            validated.push('.');
        }
        first = false;
        if label.starts_with(PUNYCODE_PREFIX) {
            match punycode::decode_to_string(&label[PUNYCODE_PREFIX.len()..]) {
                Some(decoded_label) => {
                    if !has_bidi_labels {
                        has_bidi_labels |= is_bidi_domain(&decoded_label);
                    }

                    let label_config = config.transitional_processing(false);
                    if decoded_label.nfc().ne(decoded_label.chars())
                        || !is_valid(&decoded_label, label_config)
                    {
                        valid = false;
                    }
                    validated.push_str(&decoded_label)
                }
                None => {
                    has_bidi_labels = true;
                    errors.push(Error::PunycodeError);
                }
            }
        } else {
            if !has_bidi_labels {
                has_bidi_labels |= is_bidi_domain(label);
            }

            // `normalized` is already NFC so we can skip that check here.
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

/// Options controlling [`Config::to_ascii`] / [`Config::to_unicode`]: the
/// flag set named in the IDNA processing algorithm (`UseSTD3ASCIIRules`,
/// `Transitional_Processing`, `VerifyDnsLength`, `CheckHyphens`, `CheckBidi`,
/// `CheckJoiners`).
#[derive(Clone, Copy)]
pub struct Config {
    use_std3_ascii_rules: bool,
    transitional_processing: bool,
    verify_dns_length: bool,
    check_hyphens: bool,
    check_bidi: bool,
    check_joiners: bool,
}

/// The defaults are those of <https://url.spec.whatwg.org/#idna>.
impl Default for Config {
    fn default() -> Self {
        Config {
            use_std3_ascii_rules: false,
            transitional_processing: false,
            check_hyphens: false,
            check_bidi: true,
            check_joiners: true,
            // Only use for to_ascii, not to_unicode.
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
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
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

    /// <http://www.unicode.org/reports/tr46/#ToASCII>
    pub fn to_ascii(self, domain: &str) -> Result<String, Errors> {
        let mut errors = Errors::default();
        let mut result = String::new();
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
                    Some(x) => {
                        result.push_str(PUNYCODE_PREFIX);
                        result.push_str(&x);
                    }
                    None => errors.push(Error::PunycodeError),
                }
            }
        }

        if self.verify_dns_length && !verify_dns_length(&result) {
            errors.push(Error::TooShortForDns);
        }

        if errors.is_empty() {
            Ok(result)
        } else {
            Err(errors)
        }
    }

    /// <http://www.unicode.org/reports/tr46/#ToUnicode>
    pub fn to_unicode(self, domain: &str) -> (String, Result<(), Errors>) {
        let mut errors = Errors::default();
        let domain = processing(domain, self, &mut errors);
        let result = if errors.is_empty() { Ok(()) } else { Err(errors) };
        (domain, result)
    }
}

pub(crate) fn verify_dns_length(result: &str) -> bool {
    let domain = result.strip_suffix('.').unwrap_or(result);
    if domain.is_empty() || domain.split('.').any(|label| label.is_empty()) {
        return false;
    }
    if domain.len() > 253 || domain.split('.').any(|label| label.len() > 63) {
        return false;
    }
    true
}

#[allow(clippy::enum_variant_names)]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Error {
    PunycodeError,

    // https://unicode.org/reports/tr46/#Validity_Criteria
    ValidityCriteria,
    DisallowedByStd3AsciiRules,
    DisallowedMappedInStd3,
    DisallowedCharacter,
    TooLongForDns,
    TooShortForDns,
}
impl Error {
    fn as_str(&self) -> &str {
        match self {
            Error::PunycodeError => "punycode error",
            Error::ValidityCriteria => "failed UTS #46 validity criteria",
            Error::DisallowedByStd3AsciiRules => "disallowed ASCII character",
            Error::DisallowedMappedInStd3 => "disallowed mapped ASCII character",
            Error::DisallowedCharacter => "disallowed non-ASCII character",
            Error::TooLongForDns => "too long for DNS",
            Error::TooShortForDns => "too short for DNS",
        }
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors recorded during UTS #46 processing.
///
/// Opaque beyond "at least one error occurred"; `Display` lists the
/// individual validation-error names for diagnostics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Errors(Vec<Error>);

impl Errors {
    fn push(&mut self, e: Error) {
        self.0.push(e);
    }
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Errors {}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(err.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fast_path_lowercases_and_keeps_structure() {
        let result = Config::default().to_ascii("EXAMPLE.COM").unwrap();
        assert_eq!(result, "example.com");
    }

    #[test]
    fn deviation_sharp_s_is_mapped_transitionally() {
        let transitional = Config::default().transitional_processing(true);
        let result = transitional.to_ascii("stra\u{00DF}e.de").unwrap();
        assert_eq!(result, "strasse.de");
    }

    #[test]
    fn punycode_label_round_trips_through_to_unicode() {
        let ascii = Config::default().to_ascii("bücher.de").unwrap();
        assert_eq!(ascii, "xn--bcher-kva.de");
        let (unicode, result) = Config::default().to_unicode(&ascii);
        assert!(result.is_ok());
        assert_eq!(unicode, "bücher.de");
    }

    #[test]
    fn verify_dns_length_rejects_too_long_label() {
        let long_label = "a".repeat(64);
        let domain = format!("{long_label}.com", long_label = long_label);
        let result = Config::default().verify_dns_length(true).to_ascii(&domain);
        assert!(result.is_err());
    }

    #[test]
    fn leading_hyphen_is_rejected_when_checking_hyphens() {
        assert!(Config::default()
            .check_hyphens(true)
            .to_ascii("-a.com")
            .is_err());
    }
}
