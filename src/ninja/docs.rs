// Tag-sorted view of the NinjaRMM OpenAPI document.
// Rebuilt in full from the raw snapshot on every call, never incrementally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

use super::client::Verb;

/// Top-level tag declaration from the OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One operation as declared under an OpenAPI path item.
#[derive(Debug, Clone, Deserialize)]
struct Operation {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "operationId")]
    operation_id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Vec<Value>,
    #[serde(rename = "requestBody", default)]
    request_body: Map<String, Value>,
    #[serde(default)]
    responses: Map<String, Value>,
}

/// Documentation recorded for one operation in the sorted index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDocs {
    pub path: String,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Value>,
    pub request_body: Map<String, Value>,
    pub responses: Map<String, Value>,
}

/// All operations grouped under one tag, keyed by verb then operation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDocs {
    pub description: String,
    pub methods: IndexMap<String, IndexMap<String, OperationDocs>>,
}

/// The API documentation re-indexed by lowercased tag name.
///
/// Lookup example:
/// `docs.paths["system"].methods["get"]["getOrganizations"].path`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortedDocs {
    pub openapi_version: String,
    pub info: Value,
    pub security: Value,
    pub tags: Vec<Tag>,
    pub paths: IndexMap<String, TagDocs>,
    pub components: Value,
}

impl SortedDocs {
    /// Build the index from a raw OpenAPI document.
    ///
    /// Every tag referenced by an operation must have a top-level declaration;
    /// an undeclared reference fails the whole build. Path item keys that are
    /// not HTTP verbs (e.g. a shared `parameters` list) are skipped.
    pub fn from_document(document: &Value) -> Result<Self> {
        let tags_section = document
            .get("tags")
            .ok_or_else(|| Error::DocIndex("document has no tags section".to_string()))?;
        let tags: Vec<Tag> = serde_json::from_value(tags_section.clone())
            .map_err(|e| Error::DocIndex(format!("malformed tags section: {e}")))?;

        let path_items = document
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::DocIndex("document has no paths section".to_string()))?;

        let mut paths: IndexMap<String, TagDocs> = tags
            .iter()
            .map(|tag| {
                (
                    tag.name.to_lowercase(),
                    TagDocs {
                        description: tag.description.clone(),
                        methods: IndexMap::new(),
                    },
                )
            })
            .collect();

        for (path, item) in path_items {
            let Some(item) = item.as_object() else {
                continue;
            };

            for (key, details) in item {
                let Some(verb) = Verb::parse(key) else {
                    continue;
                };

                let operation: Operation =
                    serde_json::from_value(details.clone()).map_err(|e| {
                        Error::DocIndex(format!("malformed operation {key} {path}: {e}"))
                    })?;

                for tag in &operation.tags {
                    let tag_docs = paths.get_mut(&tag.to_lowercase()).ok_or_else(|| {
                        Error::DocIndex(format!(
                            "operation {} references undeclared tag {:?}",
                            operation.operation_id, tag
                        ))
                    })?;

                    tag_docs
                        .methods
                        .entry(verb.as_str().to_string())
                        .or_default()
                        .insert(
                            operation.operation_id.clone(),
                            OperationDocs {
                                path: path.clone(),
                                summary: operation.summary.clone(),
                                description: operation.description.clone(),
                                parameters: operation.parameters.clone(),
                                request_body: operation.request_body.clone(),
                                responses: operation.responses.clone(),
                            },
                        );
                }
            }
        }

        Ok(Self {
            openapi_version: document
                .get("openapi")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            info: document.get("info").cloned().unwrap_or_else(|| json!({})),
            security: document
                .get("security")
                .cloned()
                .unwrap_or_else(|| json!([])),
            tags,
            paths,
            components: document
                .get("components")
                .cloned()
                .unwrap_or_else(|| json!({})),
        })
    }

    /// Look up one operation by tag, verb, and operation id.
    pub fn operation(&self, tag: &str, verb: Verb, operation_id: &str) -> Option<&OperationDocs> {
        self.paths
            .get(&tag.to_lowercase())?
            .methods
            .get(verb.as_str())?
            .get(operation_id)
    }
}
