//! Terraform state parser.
//!
//! Reads tfstate v4 documents and flattens every managed resource instance
//! into a [`Resource`] record for the graph pipeline.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StateError;
use crate::resource::Resource;

pub const SUPPORTED_STATE_VERSION: u64 = 4;

/// Attribute keys containing any of these fragments are redacted.
pub const SENSITIVE_ATTR_PATTERNS: &[&str] = &[
    "password",
    "secret",
    "private_key",
    "access_key",
    "secret_key",
    "token",
    "api_key",
    "auth",
    "credential",
];

pub const REDACTED: &str = "[REDACTED]";

/// Output of the extractor: resources in document order plus non-fatal issues.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub resources: Vec<Resource>,
    pub warnings: Vec<String>,
}

impl Extraction {
    fn warn(&mut self, message: String) {
        tracing::warn!(%message, "state extraction warning");
        self.warnings.push(message);
    }
}

#[derive(Debug, Deserialize)]
struct StateResource {
    #[serde(default)]
    mode: Option<String>,
    #[serde(rename = "type")]
    type_: String,
    name: String,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    instances: Vec<StateInstance>,
}

#[derive(Debug, Deserialize)]
struct StateInstance {
    #[serde(default)]
    index_key: Option<Value>,
    #[serde(default)]
    attributes: Option<Value>,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// Parses raw state text. Fails only when the text is not a JSON object.
pub fn parse_state(text: &str) -> Result<Extraction, StateError> {
    let document: Value = serde_json::from_str(text)?;
    if !document.is_object() {
        return Err(StateError::NotAnObject);
    }
    Ok(extract_resources(&document))
}

pub fn extract_resources(document: &Value) -> Extraction {
    let mut extraction = Extraction::default();

    match document.get("version").and_then(Value::as_u64) {
        Some(SUPPORTED_STATE_VERSION) => {}
        Some(other) => {
            extraction.warn(format!(
                "unsupported state version {other}; parsing best-effort"
            ));
        }
        None => extraction.warn("state version missing; parsing best-effort".to_string()),
    }

    let entries: &[Value] = match document.get("resources") {
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            extraction.warn("`resources` is not an array; no resources extracted".to_string());
            &[]
        }
        None => &[],
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped_data = 0usize;

    for (position, entry) in entries.iter().enumerate() {
        let state_resource: StateResource = match serde_json::from_value(entry.clone()) {
            Ok(r) => r,
            Err(e) => {
                extraction.warn(format!("skipping resource entry {position}: {e}"));
                continue;
            }
        };

        if state_resource.mode.as_deref() == Some("data") {
            skipped_data += 1;
            continue;
        }

        let base_address = match state_resource.module.as_deref() {
            Some(module) if !module.is_empty() => {
                format!("{}.{}.{}", module, state_resource.type_, state_resource.name)
            }
            _ => format!("{}.{}", state_resource.type_, state_resource.name),
        };

        if state_resource.instances.is_empty() {
            extraction.warn(format!("{base_address} has no instances"));
            continue;
        }

        for instance in &state_resource.instances {
            let suffix = index_suffix(instance.index_key.as_ref());
            let id = format!("{base_address}{suffix}");

            if !seen.insert(id.clone()) {
                extraction.warn(format!("duplicate resource address {id}; keeping the first"));
                continue;
            }

            let mut attributes = match &instance.attributes {
                Some(Value::Object(map)) => map.clone(),
                _ => {
                    extraction.warn(format!("{id} has no attributes object"));
                    serde_json::Map::new()
                }
            };
            redact_sensitive(&mut attributes);

            let tags = extract_tags(&attributes);
            let display_name = tags
                .get("Name")
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("{}{}", state_resource.name, suffix));

            extraction.resources.push(Resource {
                id,
                resource_type: state_resource.type_.clone(),
                name: state_resource.name.clone(),
                display_name,
                attributes,
                dependencies: instance.dependencies.clone(),
                tags,
            });
        }
    }

    tracing::debug!(
        resources = extraction.resources.len(),
        data_sources_skipped = skipped_data,
        warnings = extraction.warnings.len(),
        "state extracted"
    );

    extraction
}

fn index_suffix(key: Option<&Value>) -> String {
    match key {
        Some(Value::Number(n)) => format!("[{n}]"),
        Some(Value::String(s)) => format!("[\"{s}\"]"),
        _ => String::new(),
    }
}

/// Tags come from `tags`, falling back to `tags_all`; values are stringified.
pub fn extract_tags(attributes: &serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    let raw = attributes
        .get("tags")
        .filter(|v| !v.is_null())
        .or_else(|| attributes.get("tags_all"));

    match raw {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_ATTR_PATTERNS.iter().any(|p| lower.contains(p))
}

fn redact_sensitive(attributes: &mut serde_json::Map<String, Value>) {
    for (key, value) in attributes.iter_mut() {
        if key != "id" && !value.is_null() && is_sensitive_key(key) {
            *value = Value::String(REDACTED.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(resources: Value) -> Value {
        serde_json::json!({
            "version": 4,
            "terraform_version": "1.7.5",
            "serial": 3,
            "lineage": "5b1d2f0e",
            "outputs": {},
            "resources": resources
        })
    }

    #[test]
    fn test_extracts_managed_resources_in_order() {
        let doc = state(serde_json::json!([
            {
                "mode": "managed",
                "type": "aws_vpc",
                "name": "main",
                "provider": "provider[\"registry.terraform.io/hashicorp/aws\"]",
                "instances": [{
                    "schema_version": 1,
                    "attributes": { "id": "vpc-001", "cidr_block": "10.0.0.0/16" },
                    "sensitive_attributes": []
                }]
            },
            {
                "mode": "managed",
                "type": "aws_subnet",
                "name": "public",
                "instances": [{
                    "attributes": { "id": "subnet-001", "vpc_id": "vpc-001" },
                    "dependencies": ["aws_vpc.main"]
                }]
            }
        ]));

        let extraction = extract_resources(&doc);

        assert!(extraction.warnings.is_empty());
        assert_eq!(extraction.resources.len(), 2);
        assert_eq!(extraction.resources[0].id, "aws_vpc.main");
        assert_eq!(extraction.resources[0].resource_type, "aws_vpc");
        assert_eq!(extraction.resources[1].id, "aws_subnet.public");
        assert_eq!(extraction.resources[1].dependencies, vec!["aws_vpc.main"]);
    }

    #[test]
    fn test_skips_data_sources() {
        let doc = state(serde_json::json!([
            {
                "mode": "data",
                "type": "aws_ami",
                "name": "ubuntu",
                "instances": [{ "attributes": { "id": "ami-123" } }]
            }
        ]));

        let extraction = extract_resources(&doc);
        assert!(extraction.resources.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_indexed_and_module_addresses() {
        let doc = state(serde_json::json!([
            {
                "module": "module.network",
                "mode": "managed",
                "type": "aws_subnet",
                "name": "private",
                "instances": [
                    { "index_key": 0, "attributes": { "id": "subnet-a" } },
                    { "index_key": 1, "attributes": { "id": "subnet-b" } }
                ]
            },
            {
                "mode": "managed",
                "type": "aws_instance",
                "name": "web",
                "instances": [
                    { "index_key": "blue", "attributes": { "id": "i-1" } }
                ]
            }
        ]));

        let ids: Vec<String> = extract_resources(&doc)
            .resources
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(
            ids,
            vec![
                "module.network.aws_subnet.private[0]",
                "module.network.aws_subnet.private[1]",
                "aws_instance.web[\"blue\"]",
            ]
        );
    }

    #[test]
    fn test_display_name_prefers_name_tag() {
        let doc = state(serde_json::json!([
            {
                "mode": "managed",
                "type": "aws_instance",
                "name": "web",
                "instances": [{
                    "attributes": { "id": "i-1", "tags": { "Name": "web-server", "Env": "prod" } }
                }]
            },
            {
                "mode": "managed",
                "type": "aws_instance",
                "name": "worker",
                "instances": [{ "index_key": 2, "attributes": { "id": "i-2", "tags": null } }]
            }
        ]));

        let extraction = extract_resources(&doc);
        assert_eq!(extraction.resources[0].display_name, "web-server");
        assert_eq!(extraction.resources[0].tags.get("Env").map(String::as_str), Some("prod"));
        assert_eq!(extraction.resources[1].display_name, "worker[2]");
    }

    #[test]
    fn test_tags_fall_back_to_tags_all_and_stringify() {
        let attrs = serde_json::json!({
            "tags": null,
            "tags_all": { "Owner": "ops", "Cost": 12, "Critical": true }
        });
        let tags = extract_tags(attrs.as_object().unwrap());
        assert_eq!(tags.get("Owner").map(String::as_str), Some("ops"));
        assert_eq!(tags.get("Cost").map(String::as_str), Some("12"));
        assert_eq!(tags.get("Critical").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_sensitive_attributes_are_redacted() {
        let doc = state(serde_json::json!([
            {
                "mode": "managed",
                "type": "aws_db_instance",
                "name": "db",
                "instances": [{
                    "attributes": {
                        "id": "db-1",
                        "password": "hunter2",
                        "master_user_secret": [{ "secret_arn": "arn:x" }],
                        "engine": "postgres",
                        "kms_key_id": null
                    }
                }]
            }
        ]));

        let resource = &extract_resources(&doc).resources[0];
        assert_eq!(resource.attributes["password"], REDACTED);
        assert_eq!(resource.attributes["master_user_secret"], REDACTED);
        assert_eq!(resource.attributes["engine"], "postgres");
        assert_eq!(resource.attributes["id"], "db-1");
        assert!(resource.attributes["kms_key_id"].is_null());
        assert!(!serde_json::to_string(resource).unwrap().contains("hunter2"));
    }

    #[test]
    fn test_is_sensitive_key_case_insensitive() {
        assert!(is_sensitive_key("Password"));
        assert!(is_sensitive_key("AWS_SECRET_KEY"));
        assert!(is_sensitive_key("auth_token"));
        assert!(!is_sensitive_key("vpc_id"));
        assert!(!is_sensitive_key("subnet_ids"));
    }

    #[test]
    fn test_duplicate_addresses_keep_first() {
        let entry = serde_json::json!({
            "mode": "managed",
            "type": "aws_eip",
            "name": "nat",
            "instances": [{ "attributes": { "id": "eip-1" } }]
        });
        let mut second = entry.clone();
        second["instances"][0]["attributes"]["id"] = serde_json::json!("eip-2");

        let extraction = extract_resources(&state(serde_json::json!([entry, second])));

        assert_eq!(extraction.resources.len(), 1);
        assert_eq!(extraction.resources[0].provider_id(), Some("eip-1"));
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.warnings[0].contains("duplicate resource address aws_eip.nat"));
    }

    #[test]
    fn test_irregular_entries_become_warnings() {
        let doc = state(serde_json::json!([
            { "mode": "managed", "name": "no_type" },
            { "mode": "managed", "type": "aws_vpc", "name": "empty", "instances": [] },
            { "mode": "managed", "type": "aws_vpc", "name": "bare", "instances": [{}] }
        ]));

        let extraction = extract_resources(&doc);

        assert_eq!(extraction.resources.len(), 1);
        assert_eq!(extraction.resources[0].id, "aws_vpc.bare");
        assert!(extraction.resources[0].attributes.is_empty());
        assert_eq!(extraction.warnings.len(), 3);
        assert!(extraction.warnings[0].starts_with("skipping resource entry 0"));
        assert!(extraction.warnings[1].contains("aws_vpc.empty has no instances"));
        assert!(extraction.warnings[2].contains("aws_vpc.bare has no attributes object"));
    }

    #[test]
    fn test_version_warning() {
        let extraction = extract_resources(&serde_json::json!({ "version": 3, "resources": [] }));
        assert_eq!(
            extraction.warnings,
            vec!["unsupported state version 3; parsing best-effort"]
        );
    }

    #[test]
    fn test_parse_state_rejects_non_object() {
        assert!(matches!(parse_state("[1, 2]"), Err(StateError::NotAnObject)));
        assert!(matches!(parse_state("not json"), Err(StateError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_state_empty_document() {
        let extraction = parse_state(r#"{"version": 4}"#).unwrap();
        assert!(extraction.resources.is_empty());
        assert!(extraction.warnings.is_empty());
    }
}
