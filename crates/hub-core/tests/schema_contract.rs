//! JSON Schema contract for the entities printed by `hub` in JSON mode.

use chrono::Utc;
use hub_core::Account;
use hub_core::catalogue::seed_projects;
use hub_core::entities::{ChatMessage, Project};
use schemars::schema_for;

fn required_fields(schema: &serde_json::Value) -> Vec<String> {
    schema["required"]
        .as_array()
        .expect("schema should list required fields")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[test]
fn account_schema_requires_identity_fields() {
    let schema = serde_json::to_value(schema_for!(Account)).unwrap();
    let required = required_fields(&schema);
    for field in ["id", "name", "email", "role", "email_verified"] {
        assert!(required.contains(&field.to_string()), "missing {field}");
    }
    assert!(!required.contains(&"avatar".to_string()));
}

#[test]
fn project_json_matches_schema_properties() {
    let schema = serde_json::to_value(schema_for!(Project)).unwrap();
    let properties = schema["properties"].as_object().expect("properties");

    let project = seed_projects(Utc::now()).remove(0);
    let value = serde_json::to_value(&project).unwrap();
    for key in value.as_object().unwrap().keys() {
        assert!(properties.contains_key(key), "{key} not in schema");
    }
}

#[test]
fn chat_message_error_flag_defaults_to_false() {
    let json = r#"{"role":"model","text":"hi","timestamp":"2026-01-01T00:00:00Z"}"#;
    let message: ChatMessage = serde_json::from_str(json).unwrap();
    assert!(!message.is_error);
}
