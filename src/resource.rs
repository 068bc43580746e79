use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One infrastructure object extracted from a state document.
///
/// Immutable once the extractor hands it over; the graph pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Terraform address, e.g. `aws_vpc.main`.
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Resource {
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Non-empty string value of an attribute, if it is one.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// The provider-assigned id, found under the `id` attribute.
    pub fn provider_id(&self) -> Option<&str> {
        self.attribute_str("id")
    }
}
