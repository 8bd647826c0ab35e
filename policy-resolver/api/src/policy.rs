use crate::ObjectMeta;

/// A policy attachment resource of an arbitrary CRD.
///
/// The resolver never interprets a policy's configuration; the spec is kept
/// as an opaque JSON value. The fetch collaborator extracts the target ref
/// from wherever the CRD carries it and surfaces group and kind alongside.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub group: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub target_ref: NamespacedTargetRef,
    #[serde(default)]
    pub spec: serde_json::Value,
}

/// References the single resource a policy attaches to.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespacedTargetRef {
    pub group: Option<String>,
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl NamespacedTargetRef {
    /// Returns the target ref kind, qualified by its group, if necessary.
    pub fn canonical_kind(&self) -> String {
        match self.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{}.{}", self.kind, group),
            _ => self.kind.to_string(),
        }
    }
}
