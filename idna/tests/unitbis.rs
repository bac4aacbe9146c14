#[test]
fn domain_to_ascii_matches_domain_to_ascii_cow() {
    let owned = idna::domain_to_ascii("Example.Com").unwrap();
    let cow = idna::domain_to_ascii_cow("Example.Com", false).unwrap();
    assert_eq!(owned, cow.into_owned());
    assert_eq!(owned, "example.com");
}

#[test]
fn domain_to_ascii_cow_borrows_when_input_is_already_normalized() {
    let cow = idna::domain_to_ascii_cow("example.com", false).unwrap();
    assert!(matches!(cow, std::borrow::Cow::Borrowed(_)));
}

#[test]
fn domain_to_ascii_strict_rejects_position_three_four_hyphens() {
    // "aa--b" has hyphens at the position reserved for the ACE prefix marker.
    assert!(idna::domain_to_ascii_strict("aa--b.com").is_err());
    assert!(idna::domain_to_ascii("aa--b.com").is_ok());
}

#[test]
fn domain_to_unicode_reports_errors_without_losing_output() {
    let (result, status) = idna::domain_to_unicode("\u{0301}a.com");
    assert!(status.is_err());
    // Even on error, the lossily-processed string is still returned so a
    // caller can show it to a user (but must not use it on the wire).
    assert!(result.contains("a.com"));
}

#[test]
fn unicode_version_is_reported() {
    let (major, _minor, _micro) = idna::unicode_version();
    assert!(major > 0);
}
