//! Schema descriptors and the static catalog that maps endpoints to them

use std::collections::{BTreeMap, HashMap, HashSet};

/// Expected field names for one endpoint, compared case-insensitively.
///
/// Order is the configured order with case-insensitive duplicates dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    fields: Vec<String>,
}

impl SchemaDescriptor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let fields = fields
            .into_iter()
            .map(Into::into)
            .filter(|f: &String| seen.insert(f.to_lowercase()))
            .collect();
        Self { fields }
    }

    /// Field names as configured
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Case-folded field names
    pub fn folded(&self) -> impl Iterator<Item = (String, &str)> {
        self.fields.iter().map(|f| (f.to_lowercase(), f.as_str()))
    }
}

/// Endpoint name -> descriptor. Built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    descriptors: HashMap<String, SchemaDescriptor>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `schemas` section of the configuration file
    pub fn from_config(schemas: &BTreeMap<String, Vec<String>>) -> Self {
        let mut catalog = Self::new();
        for (endpoint, fields) in schemas {
            catalog.insert(endpoint, SchemaDescriptor::new(fields.iter().cloned()));
        }
        catalog
    }

    pub fn insert(&mut self, endpoint: &str, descriptor: SchemaDescriptor) {
        self.descriptors.insert(endpoint.to_lowercase(), descriptor);
    }

    /// Look up by endpoint name, ignoring case
    pub fn get(&self, endpoint: &str) -> Option<&SchemaDescriptor> {
        self.descriptors.get(&endpoint.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
