//! Route manifest records: the flat build-time input to the tree builder.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A single route as emitted by the build step.
///
/// Records are immutable once the manifest exists. `parent_id` of `None`
/// marks a root-level route; `module` references the code module the
/// loader collaborator resolves at navigation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// Unique id within the manifest.
    pub id: String,
    /// Path segment pattern, if the route contributes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Id of the parent record; absent for root routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Whether this is an index route.
    #[serde(default)]
    pub index: bool,
    /// Whether URL matching for this route is case sensitive.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Whether the route declares a data loader.
    #[serde(default)]
    pub has_loader: bool,
    /// Whether the route declares a submission action.
    #[serde(default)]
    pub has_action: bool,
    /// Whether the route renders its own catch boundary.
    #[serde(default)]
    pub has_catch_boundary: bool,
    /// Whether the route renders its own error boundary.
    #[serde(default)]
    pub has_error_boundary: bool,
    /// Module reference resolved by the module loader.
    pub module: String,
    /// Asset imports bundled with the module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
}

impl RouteRecord {
    /// Creates a minimal record: no path, root level, no handlers.
    pub fn new(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
            parent_id: None,
            index: false,
            case_sensitive: false,
            has_loader: false,
            has_action: false,
            has_catch_boundary: false,
            has_error_boundary: false,
            module: module.into(),
            imports: Vec::new(),
        }
    }

    /// Sets the path segment pattern.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the parent record id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Marks this record as an index route.
    pub fn with_index(mut self) -> Self {
        self.index = true;
        self
    }

    /// Declares a data loader on this route.
    pub fn with_loader(mut self) -> Self {
        self.has_loader = true;
        self
    }

    /// Declares a submission action on this route.
    pub fn with_action(mut self) -> Self {
        self.has_action = true;
        self
    }

    /// Declares a catch boundary on this route.
    pub fn with_catch_boundary(mut self) -> Self {
        self.has_catch_boundary = true;
        self
    }

    /// Declares an error boundary on this route.
    pub fn with_error_boundary(mut self) -> Self {
        self.has_error_boundary = true;
        self
    }
}

/// Errors produced while validating a manifest.
#[derive(Debug, Error, PartialEq)]
pub enum ManifestError {
    /// Two records share an id. Rejected outright instead of letting a
    /// later record silently overwrite an earlier one.
    #[error("duplicate route id `{0}` in manifest")]
    DuplicateId(String),

    /// A record references a parent id that no record carries.
    #[error("route `{id}` references unknown parent `{parent_id}`")]
    UnknownParent { id: String, parent_id: String },

    /// A record's ancestor chain loops back on itself.
    #[error("route `{0}` is part of a parent id cycle")]
    ParentCycle(String),
}

/// Flat, ordered mapping of route id → route record.
///
/// Iteration order is the order the build step emitted the records; the
/// tree builder relies on it, so the manifest preserves it exactly.
/// Deserializes from the JSON array the build step writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RouteRecord>", into = "Vec<RouteRecord>")]
pub struct RouteManifest {
    records: Vec<RouteRecord>,
}

impl RouteManifest {
    /// Validates and wraps the records emitted by the build step.
    ///
    /// Rejects duplicate ids, references to unknown parents, and cycles
    /// in the parent relation; anything accepted here forms a forest.
    pub fn from_records(records: Vec<RouteRecord>) -> Result<Self, ManifestError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(ManifestError::DuplicateId(record.id.clone()));
            }
        }
        for record in &records {
            if let Some(parent_id) = &record.parent_id {
                if !seen.contains(parent_id.as_str()) {
                    return Err(ManifestError::UnknownParent {
                        id: record.id.clone(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
        }

        let manifest = Self { records };
        manifest.check_cycles()?;
        Ok(manifest)
    }

    /// Walks each record's ancestor chain; more hops than records means a
    /// loop.
    fn check_cycles(&self) -> Result<(), ManifestError> {
        for record in &self.records {
            let mut hops = 0usize;
            let mut current = record;
            while let Some(parent_id) = &current.parent_id {
                hops += 1;
                if hops > self.records.len() {
                    return Err(ManifestError::ParentCycle(record.id.clone()));
                }
                match self.get(parent_id) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// All records in manifest order.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&RouteRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose `parent_id` equals `parent`, in manifest order.
    pub fn children_of<'a>(
        &'a self,
        parent: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RouteRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.parent_id.as_deref() == parent)
    }
}

impl TryFrom<Vec<RouteRecord>> for RouteManifest {
    type Error = ManifestError;

    fn try_from(records: Vec<RouteRecord>) -> Result<Self, Self::Error> {
        Self::from_records(records)
    }
}

impl From<RouteManifest> for Vec<RouteRecord> {
    fn from(manifest: RouteManifest) -> Self {
        manifest.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_rejected() {
        let result = RouteManifest::from_records(vec![
            RouteRecord::new("routes/a", "routes/a.js"),
            RouteRecord::new("routes/a", "routes/a2.js"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ManifestError::DuplicateId("routes/a".to_string())
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let result = RouteManifest::from_records(vec![
            RouteRecord::new("routes/child", "routes/child.js").with_parent("routes/missing"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ManifestError::UnknownParent {
                id: "routes/child".to_string(),
                parent_id: "routes/missing".to_string(),
            }
        );
    }

    #[test]
    fn test_parent_cycle_rejected() {
        let result = RouteManifest::from_records(vec![
            RouteRecord::new("routes/a", "routes/a.js").with_parent("routes/b"),
            RouteRecord::new("routes/b", "routes/b.js").with_parent("routes/a"),
        ]);
        assert!(matches!(result, Err(ManifestError::ParentCycle(_))));
    }

    #[test]
    fn test_children_of_preserves_manifest_order() {
        let manifest = RouteManifest::from_records(vec![
            RouteRecord::new("routes/root", "routes/root.js"),
            RouteRecord::new("routes/b", "routes/b.js").with_parent("routes/root"),
            RouteRecord::new("routes/a", "routes/a.js").with_parent("routes/root"),
        ])
        .unwrap();

        let ids: Vec<&str> = manifest
            .children_of(Some("routes/root"))
            .map(|record| record.id.as_str())
            .collect();
        assert_eq!(ids, vec!["routes/b", "routes/a"]);
    }

    #[test]
    fn test_manifest_deserializes_from_json_array() {
        let manifest: RouteManifest = serde_json::from_str(
            r#"[
                {"id": "root", "module": "root.js", "hasLoader": true},
                {"id": "routes/index", "module": "routes/index.js",
                 "parentId": "root", "index": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 2);
        assert!(manifest.get("root").unwrap().has_loader);
        assert!(manifest.get("routes/index").unwrap().index);
        assert_eq!(
            manifest.get("routes/index").unwrap().parent_id.as_deref(),
            Some("root")
        );
    }

    #[test]
    fn test_manifest_rejects_duplicate_ids_in_json() {
        let result: Result<RouteManifest, _> = serde_json::from_str(
            r#"[
                {"id": "root", "module": "root.js"},
                {"id": "root", "module": "root2.js"}
            ]"#,
        );
        assert!(result.is_err());
    }
}
