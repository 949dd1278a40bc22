use proptest::prelude::*;

use roster_core::errors::RosterError;
use roster_core::{Jid, ToBareJid};

#[test]
fn parses_full_jid() {
    let jid = Jid::parse("user@example.com/phone").unwrap();
    assert_eq!(jid.local(), Some("user"));
    assert_eq!(jid.domain(), "example.com");
    assert_eq!(jid.resource(), Some("phone"));
    assert!(!jid.is_bare());
}

#[test]
fn parses_domain_only_jid() {
    let jid = Jid::parse("component.example.com").unwrap();
    assert_eq!(jid.local(), None);
    assert_eq!(jid.domain(), "component.example.com");
    assert!(jid.is_bare());
}

#[test]
fn resource_may_contain_separators() {
    let jid = Jid::parse("a@b/c/d@e").unwrap();
    assert_eq!(jid.resource(), Some("c/d@e"));
    assert_eq!(jid.to_string(), "a@b/c/d@e");
}

#[test]
fn bare_drops_resource() {
    let jid = Jid::parse("user@example.com/resource").unwrap();
    assert_eq!(jid.bare().to_string(), "user@example.com");
    assert!(jid.bare().is_bare());
}

#[test]
fn with_resource_rebinds() {
    let jid = Jid::parse("user@example.com/a").unwrap();
    let other = jid.with_resource("b").unwrap();
    assert_eq!(other.to_string(), "user@example.com/b");
    assert!(jid.with_resource("").is_err());
    let spaced = jid.with_resource("My Phone").unwrap();
    assert_eq!(spaced.resource(), Some("My Phone"));
}

#[test]
fn resource_may_contain_whitespace() {
    let jid = Jid::parse("user@example.com/My Phone").unwrap();
    assert_eq!(jid.resource(), Some("My Phone"));
    assert_eq!(jid.bare().to_string(), "user@example.com");
    assert_eq!(jid.to_string(), "user@example.com/My Phone");
}

#[test]
fn rejects_malformed_input() {
    for bad in ["", "@example.com", "user@", "user@example.com/", "/res", "a b@c", "a@exa mple.com/r", "a@b@c"] {
        let err = Jid::parse(bad).unwrap_err();
        assert!(
            matches!(err, RosterError::InvalidIdentity { .. }),
            "{bad:?} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn invalid_identity_error_carries_input() {
    let err = Jid::parse("user@").unwrap_err();
    assert!(err.to_string().contains("user@"));
}

#[test]
fn to_bare_jid_agrees_across_input_types() {
    let from_str = "user@example.com/r1".to_bare_jid().unwrap();
    let from_string = String::from("user@example.com/r2").to_bare_jid().unwrap();
    let from_jid = Jid::parse("user@example.com").unwrap().to_bare_jid().unwrap();
    assert_eq!(from_str, from_string);
    assert_eq!(from_str, from_jid);
}

#[test]
fn serde_uses_string_form() {
    let jid = Jid::parse("user@example.com/desk").unwrap();
    let json = serde_json::to_string(&jid).unwrap();
    assert_eq!(json, "\"user@example.com/desk\"");
    let back: Jid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, jid);
    assert!(serde_json::from_str::<Jid>("\"@nope\"").is_err());
}

proptest! {
    #[test]
    fn prop_bare_form_ignores_resource(
        local in "[a-z0-9._-]{1,16}",
        domain in "[a-z0-9-]{1,16}\\.[a-z]{2,6}",
        r1 in "[A-Za-z0-9]{1,12}",
        r2 in "[A-Za-z0-9]{1,12}",
    ) {
        let a = format!("{local}@{domain}/{r1}").to_bare_jid().unwrap();
        let b = format!("{local}@{domain}/{r2}").to_bare_jid().unwrap();
        let bare = format!("{local}@{domain}").to_bare_jid().unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &bare);
        prop_assert_eq!(a.to_string(), format!("{local}@{domain}"));
    }

    #[test]
    fn prop_display_parse_is_stable(
        local in "[a-z0-9]{1,10}",
        domain in "[a-z]{1,10}\\.org",
        resource in proptest::option::of("[a-z0-9]{1,8}"),
    ) {
        let text = match &resource {
            Some(r) => format!("{local}@{domain}/{r}"),
            None => format!("{local}@{domain}"),
        };
        let jid = Jid::parse(&text).unwrap();
        prop_assert_eq!(jid.to_string(), text);
    }
}
