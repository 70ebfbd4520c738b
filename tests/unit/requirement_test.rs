//! Unit tests for declarative permission requirements.

use opsdeck::permissions::{CapabilitySet, Requirement};

#[test]
fn test_requirement_round_trips_through_json() {
    let requirement = Requirement::all_of(vec![
        Requirement::any_of(vec![
            Requirement::role("admin"),
            Requirement::role("operator"),
        ]),
        Requirement::permission("users:read"),
    ]);

    let encoded = serde_json::to_string(&requirement).expect("serialize");
    let decoded: Requirement = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, requirement);
}

#[test]
fn test_route_table_style_declaration() {
    // Requirements declared as data, the way a route table ships them.
    let declared = r#"{"any_of":[{"role":"admin"},{"permission":"audit:read"}]}"#;
    let requirement: Requirement = serde_json::from_str(declared).expect("deserialize");

    let mut caps = CapabilitySet::new();
    assert!(!requirement.allows(&caps));

    caps.grant_permission("audit:read");
    assert!(requirement.allows(&caps));
}
