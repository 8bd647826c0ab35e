//! Cross-namespace reference validation against ReferenceGrants.

use crate::{
    node::ReferenceGrantNode,
    resource_id::{GrantId, ResourceId},
};
use gateway_policy_resolver_api::reference_grant::{ReferenceGrantFrom, ReferenceGrantTo};
use std::collections::BTreeMap;

/// The source side of a cross-namespace reference.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReferenceSource<'a> {
    pub group: &'a str,
    pub kind: &'a str,
    pub namespace: &'a str,
}

/// Returns the grants in the target's namespace that permit the reference.
///
/// Pure over the grant registry: the graph builder and the policy resolver
/// both consult this and get identical answers for identical inputs. An
/// empty result means the reference is not permitted.
pub(crate) fn matching_grants(
    grants: &BTreeMap<GrantId, ReferenceGrantNode>,
    source: ReferenceSource<'_>,
    target: &ResourceId,
) -> Vec<GrantId> {
    grants
        .values()
        .filter(|node| {
            node.id.0.namespace == target.namespace
                && node
                    .reference_grant
                    .spec
                    .from
                    .iter()
                    .any(|from| from_matches(from, source))
                && node
                    .reference_grant
                    .spec
                    .to
                    .iter()
                    .any(|to| to_matches(to, target))
        })
        .map(|node| node.id.clone())
        .collect()
}

fn from_matches(from: &ReferenceGrantFrom, source: ReferenceSource<'_>) -> bool {
    group_matches(&from.group, source.group)
        && (from.kind == "*" || from.kind.eq_ignore_ascii_case(source.kind))
        && from.namespace == source.namespace
}

fn to_matches(to: &ReferenceGrantTo, target: &ResourceId) -> bool {
    group_matches(&to.group, &target.group)
        && to.kind.eq_ignore_ascii_case(&target.kind)
        && to.name.as_deref().map_or(true, |name| name == target.name)
}

fn group_matches(grant_group: &str, group: &str) -> bool {
    // "core" and the empty string both name the core API group.
    let canonical = |g: &str| {
        if g.eq_ignore_ascii_case("core") {
            String::new()
        } else {
            g.to_ascii_lowercase()
        }
    };
    canonical(grant_group) == canonical(group)
}
