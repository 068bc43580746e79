use std::collections::{HashMap, HashSet};

use crate::resource::Resource;

/// Maps provider-native ids (`vpc-0abc`) and Terraform addresses
/// (`aws_vpc.main`) onto Terraform addresses of known resources.
///
/// Instance addresses (`aws_s3_bucket.logs[0]`) are also reachable through
/// their unkeyed resource address, which is how Terraform records
/// `dependencies`. The first instance in input order answers for it.
#[derive(Debug, Default)]
pub struct IdResolver<'a> {
    by_provider_id: HashMap<&'a str, &'a str>,
    addresses: HashSet<&'a str>,
    by_base_address: HashMap<String, &'a str>,
}

impl<'a> IdResolver<'a> {
    pub fn new(resources: &'a [Resource]) -> Self {
        let mut by_provider_id = HashMap::new();
        let mut addresses = HashSet::new();
        let mut by_base_address = HashMap::new();

        for resource in resources {
            if let Some(provider_id) = resource.provider_id() {
                // Later resources win on a shared provider id.
                by_provider_id.insert(provider_id, resource.id.as_str());
            }
            addresses.insert(resource.id.as_str());
            if let Some(base) = base_address(&resource.id) {
                by_base_address.entry(base).or_insert(resource.id.as_str());
            }
        }

        Self {
            by_provider_id,
            addresses,
            by_base_address,
        }
    }

    pub fn resolve(&self, value: &str) -> Option<&'a str> {
        if let Some(address) = self.by_provider_id.get(value) {
            return Some(*address);
        }
        if let Some(address) = self.addresses.get(value) {
            return Some(*address);
        }
        self.by_base_address.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.by_provider_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_provider_id.is_empty()
    }
}

/// Strips every instance key from an address, so
/// `module.app[0].aws_s3_bucket.logs["a"]` becomes `module.app.aws_s3_bucket.logs`.
/// Returns `None` when the address carries no keys.
fn base_address(address: &str) -> Option<String> {
    if !address.contains('[') {
        return None;
    }

    let mut base = String::with_capacity(address.len());
    let mut in_key = false;
    let mut in_string = false;
    let mut escaped = false;
    for c in address.chars() {
        if !in_key {
            if c == '[' {
                in_key = true;
            } else {
                base.push(c);
            }
            continue;
        }
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            ']' if !in_string => in_key = false,
            _ => {}
        }
    }
    Some(base)
}
