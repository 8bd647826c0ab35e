//! Effective-policy resolution.
//!
//! For every node that can carry policy, walks the hierarchy from most
//! general to most specific (class, namespace, gateway, route, backend) and
//! computes the merged policy set per CRD. A policy at a more specific level
//! replaces a more general instance of the same CRD wholesale; policy specs
//! are opaque to the resolver, so fields are never merged. Routes and
//! backends are resolved once per enclosing gateway context.

use crate::{
    error::ResourceError,
    graph::ResourceGraph,
    node::EffectivePolicies,
    resource_id::{BackendId, GatewayId, PolicyCrdId, PolicyId, ResourceId, RouteId},
};
use ahash::AHashMap as HashMap;
use gateway_policy_resolver_api as api;
use std::collections::{BTreeMap, BTreeSet};

/// Policies directly attached to one node, grouped per CRD before conflict
/// screening.
type DirectPolicies = BTreeMap<PolicyCrdId, Vec<(PolicyId, api::Policy)>>;

/// One hierarchy level's contribution to a merge: per CRD, the surviving
/// instance.
type Level = BTreeMap<PolicyCrdId, (PolicyId, api::Policy)>;

pub(crate) fn resolve(graph: &mut ResourceGraph) {
    let direct = index_direct(graph);
    let levels = collapse_levels(graph, &direct);

    resolve_classes(graph, &levels);
    resolve_namespaces(graph, &levels);
    resolve_gateways(graph, &levels);
    resolve_http_routes(graph, &levels);
    resolve_backends(graph, &levels);
}

/// Groups every resolved policy under its target's ID.
fn index_direct(graph: &ResourceGraph) -> HashMap<ResourceId, DirectPolicies> {
    let mut index: HashMap<ResourceId, DirectPolicies> = HashMap::default();
    for node in graph.policies.values() {
        if let Some(target) = &node.target {
            index
                .entry(target.resource_id().clone())
                .or_default()
                .entry(node.crd.clone())
                .or_default()
                .push((node.id.clone(), node.policy.clone()));
        }
    }
    index
}

/// Collapses each policy-bearing node's direct set to at most one instance
/// per CRD, recording a conflict on the node when a CRD appears more than
/// once at that level. Conflicted CRDs contribute nothing.
fn collapse_levels(
    graph: &mut ResourceGraph,
    direct: &HashMap<ResourceId, DirectPolicies>,
) -> HashMap<ResourceId, Level> {
    let bearing: Vec<ResourceId> = graph
        .gateway_classes
        .keys()
        .map(|id| id.0.clone())
        .chain(graph.namespaces.keys().map(|id| id.0.clone()))
        .chain(graph.gateways.keys().map(|id| id.0.clone()))
        .chain(graph.http_routes.keys().map(|id| id.0.clone()))
        .chain(graph.backends.keys().map(|id| id.0.clone()))
        .collect();

    let mut levels = HashMap::default();
    for rid in bearing {
        let mut level = Level::new();
        if let Some(direct) = direct.get(&rid) {
            for (crd, instances) in direct {
                match instances.as_slice() {
                    [] => {}
                    [(id, policy)] => {
                        level.insert(crd.clone(), (id.clone(), policy.clone()));
                    }
                    conflicting => {
                        tracing::warn!(node = %rid, %crd, "conflicting policies at one level");
                        let policies =
                            conflicting.iter().map(|(id, _)| id.0.clone()).collect();
                        if let Some(errors) = graph.node_errors_mut(&rid) {
                            errors.push(ResourceError::PolicyConflict {
                                crd: crd.clone(),
                                policies,
                            });
                        }
                    }
                }
            }
        }
        levels.insert(rid, level);
    }
    levels
}

/// Later levels override earlier ones per CRD, whole instance at a time.
fn merge(layers: &[Option<&Level>]) -> Level {
    let mut merged = Level::new();
    for layer in layers.iter().flatten() {
        for (crd, instance) in layer.iter() {
            merged.insert(crd.clone(), instance.clone());
        }
    }
    merged
}

fn to_effective(level: &Level) -> EffectivePolicies {
    level
        .iter()
        .map(|(crd, (_, policy))| (crd.clone(), policy.clone()))
        .collect()
}

fn inherited_ids(level: &Level, own: &BTreeSet<PolicyId>) -> BTreeSet<PolicyId> {
    level
        .values()
        .filter(|(id, _)| !own.contains(id))
        .map(|(id, _)| id.clone())
        .collect()
}

fn resolve_classes(graph: &mut ResourceGraph, levels: &HashMap<ResourceId, Level>) {
    for (id, node) in graph.gateway_classes.iter_mut() {
        if let Some(level) = levels.get(&id.0) {
            node.effective_policies = to_effective(level);
        }
    }
}

fn resolve_namespaces(graph: &mut ResourceGraph, levels: &HashMap<ResourceId, Level>) {
    for (id, node) in graph.namespaces.iter_mut() {
        if let Some(level) = levels.get(&id.0) {
            node.effective_policies = to_effective(level);
        }
    }
}

fn resolve_gateways(graph: &mut ResourceGraph, levels: &HashMap<ResourceId, Level>) {
    let ids: Vec<GatewayId> = graph.gateways.keys().cloned().collect();
    for id in ids {
        let Some(node) = graph.gateways.get(&id) else {
            continue;
        };
        let class_rid = node.gateway_class.as_ref().map(|c| c.0.clone());
        let ns_rid = node.namespace.0.clone();

        let merged = merge(&[
            class_rid.as_ref().and_then(|rid| levels.get(rid)),
            levels.get(&ns_rid),
            levels.get(&id.0),
        ]);

        if let Some(gw) = graph.gateways.get_mut(&id) {
            gw.inherited_policies = inherited_ids(&merged, &gw.policies);
            gw.effective_policies = to_effective(&merged);
        }
    }
}

fn resolve_http_routes(graph: &mut ResourceGraph, levels: &HashMap<ResourceId, Level>) {
    let ids: Vec<RouteId> = graph.http_routes.keys().cloned().collect();
    for id in ids {
        let Some(node) = graph.http_routes.get(&id) else {
            continue;
        };
        let ns_rid = node.namespace.0.clone();
        let gateways: Vec<GatewayId> = node.gateways.iter().cloned().collect();

        let mut per_context: BTreeMap<GatewayId, Level> = BTreeMap::new();
        for gw_id in gateways {
            let class_rid = graph
                .gateways
                .get(&gw_id)
                .and_then(|gw| gw.gateway_class.as_ref())
                .map(|c| c.0.clone());
            let merged = merge(&[
                class_rid.as_ref().and_then(|rid| levels.get(rid)),
                levels.get(&ns_rid),
                levels.get(&gw_id.0),
                levels.get(&id.0),
            ]);
            per_context.insert(gw_id, merged);
        }

        if let Some(route) = graph.http_routes.get_mut(&id) {
            route.inherited_policies = per_context
                .values()
                .flat_map(|merged| inherited_ids(merged, &route.policies))
                .collect();
            route.effective_policies = per_context
                .iter()
                .map(|(gw_id, merged)| (gw_id.clone(), to_effective(merged)))
                .collect();
        }
    }
}

fn resolve_backends(graph: &mut ResourceGraph, levels: &HashMap<ResourceId, Level>) {
    let ids: Vec<BackendId> = graph.backends.keys().cloned().collect();
    for id in ids {
        let Some(node) = graph.backends.get(&id) else {
            continue;
        };
        let ns_rid = node.namespace.0.clone();
        let routes: Vec<RouteId> = node.http_routes.iter().cloned().collect();

        // Group the referencing routes by the gateways that expose them; each
        // gateway is one resolution context for this backend.
        let mut contexts: BTreeMap<GatewayId, Vec<RouteId>> = BTreeMap::new();
        for route_id in &routes {
            if let Some(route) = graph.http_routes.get(route_id) {
                for gw_id in &route.gateways {
                    contexts
                        .entry(gw_id.clone())
                        .or_default()
                        .push(route_id.clone());
                }
            }
        }

        let mut conflicts: BTreeMap<PolicyCrdId, BTreeSet<ResourceId>> = BTreeMap::new();
        let mut per_context: BTreeMap<GatewayId, Level> = BTreeMap::new();
        for (gw_id, route_ids) in &contexts {
            // Routes sit at one level: two routes reaching this backend with
            // different instances of one CRD is a same-level conflict.
            let mut route_layer = Level::new();
            let mut excluded: BTreeSet<PolicyCrdId> = BTreeSet::new();
            for route_id in route_ids {
                if let Some(level) = levels.get(&route_id.0) {
                    for (crd, instance) in level {
                        match route_layer.get(crd) {
                            Some((existing, _)) if *existing != instance.0 => {
                                conflicts
                                    .entry(crd.clone())
                                    .or_default()
                                    .extend([existing.0.clone(), instance.0 .0.clone()]);
                                excluded.insert(crd.clone());
                            }
                            _ => {
                                route_layer.insert(crd.clone(), instance.clone());
                            }
                        }
                    }
                }
            }
            for crd in &excluded {
                route_layer.remove(crd);
            }

            let class_rid = graph
                .gateways
                .get(gw_id)
                .and_then(|gw| gw.gateway_class.as_ref())
                .map(|c| c.0.clone());
            let merged = merge(&[
                class_rid.as_ref().and_then(|rid| levels.get(rid)),
                levels.get(&ns_rid),
                levels.get(&gw_id.0),
                Some(&route_layer),
                levels.get(&id.0),
            ]);
            per_context.insert(gw_id.clone(), merged);
        }

        if let Some(backend) = graph.backends.get_mut(&id) {
            backend.inherited_policies = per_context
                .values()
                .flat_map(|merged| inherited_ids(merged, &backend.policies))
                .collect();
            backend.effective_policies = per_context
                .iter()
                .map(|(gw_id, merged)| (gw_id.clone(), to_effective(merged)))
                .collect();
            for (crd, policies) in conflicts {
                tracing::warn!(backend = %id, %crd, "conflicting route-level policies");
                backend.errors.push(ResourceError::PolicyConflict {
                    crd,
                    policies: policies.into_iter().collect(),
                });
            }
        }
    }
}
