use idna::uts46::Config;

#[test]
fn ascii_domain_is_lowercased() {
    assert_eq!(Config::default().to_ascii("EXAMPLE.COM").unwrap(), "example.com");
}

#[test]
fn unicode_label_round_trips() {
    let ascii = Config::default().to_ascii("bücher.de").unwrap();
    assert_eq!(ascii, "xn--bcher-kva.de");
    let (unicode, result) = Config::default().to_unicode(&ascii);
    assert!(result.is_ok());
    assert_eq!(unicode, "bücher.de");
}

#[test]
fn deviation_character_is_transitional_only_when_requested() {
    let transitional = Config::default().transitional_processing(true);
    assert_eq!(transitional.to_ascii("straße.de").unwrap(), "strasse.de");

    let non_transitional = Config::default().transitional_processing(false);
    let ascii = non_transitional.to_ascii("straße.de").unwrap();
    assert_ne!(ascii, "strasse.de");
    let (unicode, result) = non_transitional.to_unicode(&ascii);
    assert!(result.is_ok());
    assert_eq!(unicode, "straße.de");
}

#[test]
fn empty_labels_are_preserved() {
    assert_eq!(Config::default().to_ascii("a..b").unwrap(), "a..b");
}

#[test]
fn leading_hyphen_allowed_unless_check_hyphens() {
    assert!(Config::default().to_ascii("-a.com").is_ok());
    assert!(Config::default()
        .check_hyphens(true)
        .to_ascii("-a.com")
        .is_err());
}

#[test]
fn verify_dns_length_catches_oversized_label() {
    let label = "a".repeat(64);
    let domain = format!("{label}.com");
    assert!(Config::default()
        .verify_dns_length(true)
        .to_ascii(&domain)
        .is_err());
    assert!(Config::default()
        .verify_dns_length(false)
        .to_ascii(&domain)
        .is_ok());
}
