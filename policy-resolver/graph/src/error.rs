use crate::resource_id::{PolicyCrdId, ResourceId};
use thiserror::Error;

/// A non-fatal problem recorded on the node it was observed on.
///
/// The builder and resolver append these instead of failing the build, so a
/// consumer querying a degraded node still receives whatever was resolved.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResourceError {
    /// A named target does not exist in the snapshot.
    #[error("unresolved reference to {reference}")]
    UnresolvedReference { reference: ResourceId },

    /// A cross-namespace reference lacking a matching ReferenceGrant.
    #[error("reference to {reference} not permitted by any ReferenceGrant")]
    ReferenceNotPermitted { reference: ResourceId },

    /// Two snapshot entries resolved to the same ID; the later one is ignored.
    #[error("duplicate resource {id} in snapshot")]
    DuplicateResource { id: ResourceId },

    /// A policy whose target could not be resolved to exactly one node.
    #[error("invalid policy target: {reason}")]
    InvalidPolicyTarget { reason: String },

    /// Multiple direct policies of one CRD at the same level; all are
    /// excluded from the effective set for that CRD.
    #[error("conflicting {} policies at the same level: {}", .crd, fmt_ids(.policies))]
    PolicyConflict {
        crd: PolicyCrdId,
        policies: Vec<ResourceId>,
    },
}

fn fmt_ids(ids: &[ResourceId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fatal, build-aborting conditions. Anything else degrades per node.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A resource without a name cannot be identified at all.
    #[error("{kind} resource has no name")]
    MissingName { kind: String },
}
