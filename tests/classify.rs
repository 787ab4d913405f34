use cfbl::classify::{DEVELOPED, EMERGING, members, tier_of};
use cfbl::models::Tier;

#[test]
fn every_listed_code_gets_its_tier() {
    for code in DEVELOPED {
        assert_eq!(tier_of(code), Some(Tier::Developed), "{code}");
    }
    for code in EMERGING {
        assert_eq!(tier_of(code), Some(Tier::Emerging), "{code}");
    }
}

#[test]
fn unknown_codes_are_unclassified() {
    for code in ["US", "GB", "CN", "BN", "ID", "BG", "ZZ", ""] {
        assert_eq!(tier_of(code), None, "{code}");
    }
}

#[test]
fn lookup_is_case_sensitive_like_the_dataset() {
    assert_eq!(tier_of("de"), None);
    assert_eq!(tier_of("DE"), Some(Tier::Developed));
}

#[test]
fn membership_lists_have_eighteen_codes_each() {
    assert_eq!(members(Tier::Developed).len(), 18);
    assert_eq!(members(Tier::Emerging).len(), 18);
}
