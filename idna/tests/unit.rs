use idna::uts46::Config;

/// https://github.com/servo/rust-url/issues/373
#[test]
fn punycode_prefix_with_length_check() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        Config::default()
            .use_std3_ascii_rules(true)
            .verify_dns_length(true)
            .to_ascii(domain)
    }

    assert!(to_ascii("xn--").is_err());
    assert!(to_ascii("xn---").is_err());
    assert!(to_ascii("xn--.").is_err());
    assert!(to_ascii("xn--...").is_err());
    assert!(to_ascii(".xn--").is_err());
    assert!(to_ascii("...xn--").is_err());
    assert!(to_ascii("xn--.xn--").is_err());
    assert!(to_ascii("xn--.example.org").is_err());
}

/// https://github.com/servo/rust-url/issues/373
#[test]
fn punycode_prefix_without_length_check() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        Config::default().use_std3_ascii_rules(true).to_ascii(domain)
    }

    assert_eq!(to_ascii("xn--").unwrap(), "");
    assert!(to_ascii("xn---").is_err());
    assert_eq!(to_ascii("xn--.").unwrap(), ".");
    assert_eq!(to_ascii("xn--...").unwrap(), "...");
    assert_eq!(to_ascii(".xn--").unwrap(), ".");
    assert_eq!(to_ascii("...xn--").unwrap(), "...");
    assert_eq!(to_ascii("xn--.xn--").unwrap(), ".");
    assert_eq!(to_ascii("xn--.example.org").unwrap(), ".example.org");
}

#[test]
fn leading_combining_mark_is_rejected() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        Config::default().use_std3_ascii_rules(true).to_ascii(domain)
    }

    // U+0301 COMBINING ACUTE ACCENT cannot start a label (V5).
    assert!(to_ascii("\u{0301}a").is_err());
    assert!(to_ascii("a.\u{0301}b").is_err());
}

#[test]
fn bidi_rule_rejects_digit_leading_label_in_rtl_domain() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        Config::default().use_std3_ascii_rules(true).to_ascii(domain)
    }

    assert_eq!(to_ascii("abc").unwrap(), "abc");
    assert_eq!(to_ascii("123").unwrap(), "123");

    // \u{05D0} is HEBREW LETTER ALEF, making the domain a bidi domain; a
    // label starting with a digit is then invalid per RFC 5893 rule 1.
    assert!(to_ascii("0a.\u{05D0}").is_err());
}
