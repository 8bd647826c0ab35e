//! Builds the linked resource graph from one snapshot and exposes the
//! read-only query surface.

use crate::{
    error::{BuildError, ResourceError},
    node::{
        BackendNode, EffectivePolicies, GatewayClassNode, GatewayNode, HttpRouteNode,
        NamespaceNode, PolicyNode, PolicyTarget, ReferenceGrantNode,
    },
    policy,
    reference_grant::{self, ReferenceSource},
    resource_id::{
        BackendId, GatewayClassId, GatewayId, GrantId, NamespaceId, PolicyCrdId, PolicyId,
        ResourceId, RouteId, NAMESPACE_DEFAULT,
    },
};
use anyhow::Result;
use gateway_policy_resolver_api::{self as api, backend::SERVICE_IMPORT_GROUP, GATEWAY_API_GROUP};
use std::collections::{btree_map::Entry, BTreeMap};

/// One fetched snapshot of every resource kind the resolver understands.
///
/// Lists may arrive in any order; the builder never mutates the snapshot.
#[derive(Clone, Debug, Default)]
pub struct ClusterSnapshot {
    pub gateway_classes: Vec<api::GatewayClass>,
    pub namespaces: Vec<api::Namespace>,
    pub gateways: Vec<api::Gateway>,
    pub http_routes: Vec<api::HttpRoute>,
    pub backends: Vec<api::Backend>,
    pub reference_grants: Vec<api::ReferenceGrant>,
    pub policies: Vec<api::Policy>,
}

/// The fully linked, immutable resource graph.
///
/// Registries are ordered maps so that two builds from the same snapshot
/// produce identical graphs, including error ordering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceGraph {
    pub(crate) gateway_classes: BTreeMap<GatewayClassId, GatewayClassNode>,
    pub(crate) namespaces: BTreeMap<NamespaceId, NamespaceNode>,
    pub(crate) gateways: BTreeMap<GatewayId, GatewayNode>,
    pub(crate) http_routes: BTreeMap<RouteId, HttpRouteNode>,
    pub(crate) backends: BTreeMap<BackendId, BackendNode>,
    pub(crate) reference_grants: BTreeMap<GrantId, ReferenceGrantNode>,
    pub(crate) policies: BTreeMap<PolicyId, PolicyNode>,
}

/// A borrowed node of any kind, as returned by [`ResourceGraph::lookup`].
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    GatewayClass(&'a GatewayClassNode),
    Namespace(&'a NamespaceNode),
    Gateway(&'a GatewayNode),
    HttpRoute(&'a HttpRouteNode),
    Backend(&'a BackendNode),
    ReferenceGrant(&'a ReferenceGrantNode),
    Policy(&'a PolicyNode),
}

// === impl ResourceGraph ===

impl ResourceGraph {
    /// Builds a fresh graph from one snapshot: one node per resource, linked
    /// by resolving named references, then annotated with effective policies.
    ///
    /// Reference problems degrade the affected node; only a resource without
    /// a name aborts the build.
    pub fn build(snapshot: &ClusterSnapshot) -> Result<Self, BuildError> {
        let mut graph = Self::default();
        graph.insert_nodes(snapshot)?;
        graph.link_gateways();
        graph.link_http_routes();
        graph.link_policies();
        policy::resolve(&mut graph);
        Ok(graph)
    }

    // --- node construction ---

    fn insert_nodes(&mut self, snapshot: &ClusterSnapshot) -> Result<(), BuildError> {
        for gc in &snapshot.gateway_classes {
            let name = require_name("GatewayClass", &gc.metadata)?;
            let id = GatewayClassId::new(name);
            match self.gateway_classes.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(GatewayClassNode::new(id, gc.clone()));
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate GatewayClass in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        for ns in &snapshot.namespaces {
            let name = require_name("Namespace", &ns.metadata)?;
            let id = NamespaceId::new(name);
            match self.namespaces.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(NamespaceNode::new(id, ns.clone()));
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate Namespace in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        for gw in &snapshot.gateways {
            let name = require_name("Gateway", &gw.metadata)?;
            let namespace = namespace_of(&gw.metadata);
            let ns_id = self.ensure_namespace(namespace);
            let id = GatewayId::new(namespace, name);
            match self.gateways.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(GatewayNode::new(id.clone(), ns_id.clone(), gw.clone()));
                    if let Some(ns) = self.namespaces.get_mut(&ns_id) {
                        ns.gateways.insert(id);
                    }
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate Gateway in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        for route in &snapshot.http_routes {
            let name = require_name("HTTPRoute", &route.metadata)?;
            let namespace = namespace_of(&route.metadata);
            let ns_id = self.ensure_namespace(namespace);
            let id = RouteId::new(namespace, name);
            match self.http_routes.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(HttpRouteNode::new(id.clone(), ns_id.clone(), route.clone()));
                    if let Some(ns) = self.namespaces.get_mut(&ns_id) {
                        ns.http_routes.insert(id);
                    }
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate HTTPRoute in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        for backend in &snapshot.backends {
            let name = require_name(backend.kind(), backend.metadata())?;
            let namespace = namespace_of(backend.metadata());
            let ns_id = self.ensure_namespace(namespace);
            let id = BackendId::new(backend.group(), backend.kind(), namespace, name);
            match self.backends.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(BackendNode::new(id.clone(), ns_id.clone(), backend.clone()));
                    if let Some(ns) = self.namespaces.get_mut(&ns_id) {
                        ns.backends.insert(id);
                    }
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate backend in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        for grant in &snapshot.reference_grants {
            let name = require_name("ReferenceGrant", &grant.metadata)?;
            let namespace = namespace_of(&grant.metadata);
            self.ensure_namespace(namespace);
            let id = GrantId::new(namespace, name);
            if let Entry::Vacant(entry) = self.reference_grants.entry(id.clone()) {
                entry.insert(ReferenceGrantNode::new(id, grant.clone()));
            } else {
                // Grants carry no error list; a duplicate is simply dropped.
                tracing::warn!(%id, "duplicate ReferenceGrant in snapshot");
            }
        }

        for policy in &snapshot.policies {
            let name = require_name(&policy.kind, &policy.metadata)?;
            let namespace = namespace_of(&policy.metadata);
            self.ensure_namespace(namespace);
            let id = PolicyId::new(&policy.group, &policy.kind, namespace, name);
            let crd = PolicyCrdId::new(&policy.group, &policy.kind);
            match self.policies.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(PolicyNode::new(id, crd, policy.clone()));
                }
                Entry::Occupied(mut entry) => {
                    tracing::warn!(%id, "duplicate policy in snapshot");
                    entry
                        .get_mut()
                        .errors
                        .push(ResourceError::DuplicateResource { id: id.0 });
                }
            }
        }

        Ok(())
    }

    /// Returns the namespace node for `name`, synthesizing one if the
    /// snapshot did not list it explicitly.
    fn ensure_namespace(&mut self, name: &str) -> NamespaceId {
        let id = NamespaceId::new(name);
        self.namespaces.entry(id.clone()).or_insert_with(|| {
            NamespaceNode::new(
                id.clone(),
                api::Namespace {
                    metadata: api::ObjectMeta::named(name),
                },
            )
        });
        id
    }

    // --- linking passes ---

    fn link_gateways(&mut self) {
        let ids: Vec<GatewayId> = self.gateways.keys().cloned().collect();
        for id in ids {
            let Some(node) = self.gateways.get(&id) else {
                continue;
            };
            let class_id = GatewayClassId::new(&node.gateway.spec.gateway_class_name);
            if let Some(class) = self.gateway_classes.get_mut(&class_id) {
                class.gateways.insert(id.clone());
                if let Some(gw) = self.gateways.get_mut(&id) {
                    gw.gateway_class = Some(class_id.clone());
                }
                tracing::debug!(gateway = %id, class = %class_id, "linked gateway to class");
            } else {
                tracing::warn!(gateway = %id, class = %class_id, "unresolved gateway class");
                if let Some(gw) = self.gateways.get_mut(&id) {
                    gw.errors.push(ResourceError::UnresolvedReference {
                        reference: class_id.0,
                    });
                }
            }
        }
    }

    fn link_http_routes(&mut self) {
        let ids: Vec<RouteId> = self.http_routes.keys().cloned().collect();
        for id in ids {
            let Some(node) = self.http_routes.get(&id) else {
                continue;
            };
            let route_ns = node.namespace.0.name.clone();
            let parents = node
                .http_route
                .spec
                .inner
                .parent_refs
                .clone()
                .unwrap_or_default();
            let backend_refs: Vec<api::httproute::BackendObjectReference> = node
                .http_route
                .spec
                .rules
                .iter()
                .flat_map(|rule| rule.backend_refs.clone().unwrap_or_default())
                .collect();

            for parent in &parents {
                match parent_gateway_id(parent, &route_ns) {
                    Ok(gw_id) => {
                        if self.gateways.contains_key(&gw_id) {
                            if let Some(route) = self.http_routes.get_mut(&id) {
                                route.gateways.insert(gw_id.clone());
                            }
                            if let Some(gw) = self.gateways.get_mut(&gw_id) {
                                gw.http_routes.insert(id.clone());
                            }
                            tracing::debug!(route = %id, gateway = %gw_id, "attached route");
                        } else {
                            tracing::warn!(route = %id, gateway = %gw_id, "unresolved parent gateway");
                            if let Some(route) = self.http_routes.get_mut(&id) {
                                route.errors.push(ResourceError::UnresolvedReference {
                                    reference: gw_id.0,
                                });
                            }
                        }
                    }
                    Err(reference) => {
                        tracing::warn!(route = %id, %reference, "unsupported parent kind");
                        if let Some(route) = self.http_routes.get_mut(&id) {
                            route
                                .errors
                                .push(ResourceError::UnresolvedReference { reference });
                        }
                    }
                }
            }

            for backend_ref in &backend_refs {
                let backend_id = backend_id_for_ref(backend_ref, &route_ns);

                let mut grant_ids = Vec::new();
                if backend_id.0.namespace != route_ns {
                    grant_ids = reference_grant::matching_grants(
                        &self.reference_grants,
                        ReferenceSource {
                            group: GATEWAY_API_GROUP,
                            kind: "HTTPRoute",
                            namespace: &route_ns,
                        },
                        &backend_id.0,
                    );
                    if grant_ids.is_empty() {
                        tracing::warn!(route = %id, backend = %backend_id, "backend reference not permitted");
                        if let Some(route) = self.http_routes.get_mut(&id) {
                            route.errors.push(ResourceError::ReferenceNotPermitted {
                                reference: backend_id.0.clone(),
                            });
                        }
                        continue;
                    }
                }

                if self.backends.contains_key(&backend_id) {
                    if let Some(route) = self.http_routes.get_mut(&id) {
                        route.backends.insert(backend_id.clone());
                    }
                    if let Some(backend) = self.backends.get_mut(&backend_id) {
                        backend.http_routes.insert(id.clone());
                        backend.reference_grants.extend(grant_ids.iter().cloned());
                    }
                    for grant_id in &grant_ids {
                        if let Some(grant) = self.reference_grants.get_mut(grant_id) {
                            grant.backends.insert(backend_id.clone());
                        }
                    }
                    tracing::debug!(route = %id, backend = %backend_id, "linked backend");
                } else {
                    tracing::warn!(route = %id, backend = %backend_id, "unresolved backend");
                    if let Some(route) = self.http_routes.get_mut(&id) {
                        route.errors.push(ResourceError::UnresolvedReference {
                            reference: backend_id.0.clone(),
                        });
                    }
                }
            }
        }
    }

    fn link_policies(&mut self) {
        let ids: Vec<PolicyId> = self.policies.keys().cloned().collect();
        for id in ids {
            let Some(node) = self.policies.get(&id) else {
                continue;
            };
            let policy_ns = id.0.namespace.clone();
            let source_group = node.policy.group.clone();
            let source_kind = node.policy.kind.clone();
            let target_ref = node.policy.target_ref.clone();

            let target = match classify_policy_target(&target_ref, &policy_ns) {
                Ok(target) => target,
                Err(error) => {
                    tracing::warn!(policy = %id, %error, "invalid policy target");
                    if let Some(policy) = self.policies.get_mut(&id) {
                        policy.errors.push(ResourceError::InvalidPolicyTarget {
                            reason: error.to_string(),
                        });
                    }
                    continue;
                }
            };

            // Policies attaching across namespaces are subject to the same
            // grant check as structural references.
            let target_rid = target.resource_id().clone();
            if !target_rid.namespace.is_empty() && target_rid.namespace != policy_ns {
                let grants = reference_grant::matching_grants(
                    &self.reference_grants,
                    ReferenceSource {
                        group: &source_group,
                        kind: &source_kind,
                        namespace: &policy_ns,
                    },
                    &target_rid,
                );
                if grants.is_empty() {
                    tracing::warn!(policy = %id, target_id = %target_rid, "policy target not permitted");
                    if let Some(policy) = self.policies.get_mut(&id) {
                        policy.errors.push(ResourceError::ReferenceNotPermitted {
                            reference: target_rid,
                        });
                    }
                    continue;
                }
            }

            if !self.attach_policy(&id, &target) {
                tracing::warn!(policy = %id, target_id = %target_rid, "policy target does not exist");
                if let Some(policy) = self.policies.get_mut(&id) {
                    policy.errors.push(ResourceError::InvalidPolicyTarget {
                        reason: format!("target {} does not exist", target_rid),
                    });
                }
                continue;
            }

            tracing::debug!(policy = %id, target_id = %target_rid, "attached policy");
            if let Some(policy) = self.policies.get_mut(&id) {
                policy.target = Some(target);
            }
        }
    }

    /// Records `id` as directly attached to `target`. Returns false when the
    /// target node does not exist.
    fn attach_policy(&mut self, id: &PolicyId, target: &PolicyTarget) -> bool {
        match target {
            PolicyTarget::GatewayClass(t) => {
                if let Some(node) = self.gateway_classes.get_mut(t) {
                    node.policies.insert(id.clone());
                    return true;
                }
            }
            PolicyTarget::Namespace(t) => {
                if let Some(node) = self.namespaces.get_mut(t) {
                    node.policies.insert(id.clone());
                    return true;
                }
            }
            PolicyTarget::Gateway(t) => {
                if let Some(node) = self.gateways.get_mut(t) {
                    node.policies.insert(id.clone());
                    return true;
                }
            }
            PolicyTarget::HttpRoute(t) => {
                if let Some(node) = self.http_routes.get_mut(t) {
                    node.policies.insert(id.clone());
                    return true;
                }
            }
            PolicyTarget::Backend(t) => {
                if let Some(node) = self.backends.get_mut(t) {
                    node.policies.insert(id.clone());
                    return true;
                }
            }
        }
        false
    }

    // --- query surface ---

    pub fn gateway_class(&self, id: &GatewayClassId) -> Option<&GatewayClassNode> {
        self.gateway_classes.get(id)
    }

    pub fn namespace(&self, id: &NamespaceId) -> Option<&NamespaceNode> {
        self.namespaces.get(id)
    }

    pub fn gateway(&self, id: &GatewayId) -> Option<&GatewayNode> {
        self.gateways.get(id)
    }

    pub fn http_route(&self, id: &RouteId) -> Option<&HttpRouteNode> {
        self.http_routes.get(id)
    }

    pub fn backend(&self, id: &BackendId) -> Option<&BackendNode> {
        self.backends.get(id)
    }

    pub fn reference_grant(&self, id: &GrantId) -> Option<&ReferenceGrantNode> {
        self.reference_grants.get(id)
    }

    pub fn policy(&self, id: &PolicyId) -> Option<&PolicyNode> {
        self.policies.get(id)
    }

    /// Finds a node by kind, namespace and name. The kind may be given bare
    /// (`Service`) or qualified by its group (`RateLimit.policy.example.com`)
    /// to disambiguate backend and policy kinds.
    pub fn lookup(&self, kind: &str, namespace: Option<&str>, name: &str) -> Option<NodeRef<'_>> {
        let (kind, group) = match kind.split_once('.') {
            Some((kind, group)) => (kind, Some(group)),
            None => (kind, None),
        };
        let group_is = |expected: &str| group.map_or(true, |g| g.eq_ignore_ascii_case(expected));
        let ns = namespace.unwrap_or("");

        match kind.to_ascii_lowercase().as_str() {
            "gatewayclass" if group_is(GATEWAY_API_GROUP) => self
                .gateway_classes
                .get(&GatewayClassId::new(name))
                .map(NodeRef::GatewayClass),
            "namespace" if group_is("") => self
                .namespaces
                .get(&NamespaceId::new(name))
                .map(NodeRef::Namespace),
            "gateway" if group_is(GATEWAY_API_GROUP) => self
                .gateways
                .get(&GatewayId::new(ns, name))
                .map(NodeRef::Gateway),
            "httproute" if group_is(GATEWAY_API_GROUP) => self
                .http_routes
                .get(&RouteId::new(ns, name))
                .map(NodeRef::HttpRoute),
            "referencegrant" if group_is(GATEWAY_API_GROUP) => self
                .reference_grants
                .get(&GrantId::new(ns, name))
                .map(NodeRef::ReferenceGrant),
            other => {
                let ns = if ns.is_empty() { NAMESPACE_DEFAULT } else { ns };
                let matches = |id: &ResourceId| {
                    id.kind == other
                        && group.map_or(true, |g| g.eq_ignore_ascii_case(&id.group))
                        && id.namespace == ns
                        && id.name == name
                };
                self.backends
                    .values()
                    .find(|b| matches(&b.id.0))
                    .map(NodeRef::Backend)
                    .or_else(|| {
                        self.policies
                            .values()
                            .find(|p| matches(&p.id.0))
                            .map(NodeRef::Policy)
                    })
            }
        }
    }

    /// The effective, merged policy set of a target, keyed by policy CRD.
    ///
    /// Routes and backends resolve per enclosing gateway, so they require a
    /// `context`; single-context nodes ignore it.
    pub fn effective_policies(
        &self,
        target: &ResourceId,
        context: Option<&GatewayId>,
    ) -> Option<&EffectivePolicies> {
        if let Some(node) = self.gateway_classes.get(&GatewayClassId(target.clone())) {
            return Some(&node.effective_policies);
        }
        if let Some(node) = self.namespaces.get(&NamespaceId(target.clone())) {
            return Some(&node.effective_policies);
        }
        if let Some(node) = self.gateways.get(&GatewayId(target.clone())) {
            return Some(&node.effective_policies);
        }
        if let Some(node) = self.http_routes.get(&RouteId(target.clone())) {
            return node.effective_policies.get(context?);
        }
        if let Some(node) = self.backends.get(&BackendId(target.clone())) {
            return node.effective_policies.get(context?);
        }
        None
    }

    /// The ordered errors recorded on a node; empty for unknown IDs.
    pub fn errors(&self, target: &ResourceId) -> &[ResourceError] {
        self.node_errors(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a cross-namespace reference from the given source to `target`
    /// is authorized by some ReferenceGrant.
    pub fn reference_permitted(
        &self,
        source_group: &str,
        source_kind: &str,
        source_namespace: &str,
        target: &ResourceId,
    ) -> bool {
        !reference_grant::matching_grants(
            &self.reference_grants,
            ReferenceSource {
                group: source_group,
                kind: source_kind,
                namespace: source_namespace,
            },
            target,
        )
        .is_empty()
    }

    fn node_errors(&self, target: &ResourceId) -> Option<&Vec<ResourceError>> {
        if let Some(node) = self.gateway_classes.get(&GatewayClassId(target.clone())) {
            return Some(&node.errors);
        }
        if let Some(node) = self.namespaces.get(&NamespaceId(target.clone())) {
            return Some(&node.errors);
        }
        if let Some(node) = self.gateways.get(&GatewayId(target.clone())) {
            return Some(&node.errors);
        }
        if let Some(node) = self.http_routes.get(&RouteId(target.clone())) {
            return Some(&node.errors);
        }
        if let Some(node) = self.backends.get(&BackendId(target.clone())) {
            return Some(&node.errors);
        }
        if let Some(node) = self.policies.get(&PolicyId(target.clone())) {
            return Some(&node.errors);
        }
        None
    }

    pub(crate) fn node_errors_mut(&mut self, target: &ResourceId) -> Option<&mut Vec<ResourceError>> {
        if let Some(node) = self.gateway_classes.get_mut(&GatewayClassId(target.clone())) {
            return Some(&mut node.errors);
        }
        if let Some(node) = self.namespaces.get_mut(&NamespaceId(target.clone())) {
            return Some(&mut node.errors);
        }
        if let Some(node) = self.gateways.get_mut(&GatewayId(target.clone())) {
            return Some(&mut node.errors);
        }
        if let Some(node) = self.http_routes.get_mut(&RouteId(target.clone())) {
            return Some(&mut node.errors);
        }
        if let Some(node) = self.backends.get_mut(&BackendId(target.clone())) {
            return Some(&mut node.errors);
        }
        if let Some(node) = self.policies.get_mut(&PolicyId(target.clone())) {
            return Some(&mut node.errors);
        }
        None
    }
}

// === helpers ===

fn require_name<'m>(kind: &str, meta: &'m api::ObjectMeta) -> Result<&'m str, BuildError> {
    match meta.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(BuildError::MissingName {
            kind: kind.to_string(),
        }),
    }
}

fn namespace_of(meta: &api::ObjectMeta) -> &str {
    meta.namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(NAMESPACE_DEFAULT)
}

/// Resolves a parent ref to a gateway ID. Group and kind default to the
/// Gateway API `Gateway` kind; other kinds are not attachable in this model
/// and yield the raw reference ID for error reporting.
fn parent_gateway_id(
    parent: &api::httproute::ParentReference,
    local_ns: &str,
) -> Result<GatewayId, ResourceId> {
    let group = parent.group.as_deref().unwrap_or(GATEWAY_API_GROUP);
    let kind = parent.kind.as_deref().unwrap_or("Gateway");
    let namespace = parent
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(local_ns);

    if group.eq_ignore_ascii_case(GATEWAY_API_GROUP) && kind.eq_ignore_ascii_case("Gateway") {
        Ok(GatewayId::new(namespace, &parent.name))
    } else {
        Err(ResourceId::namespaced(group, kind, namespace, &parent.name))
    }
}

/// Resolves a backend ref to a backend ID. Group defaults to the core API
/// group and kind to `Service`; the namespace defaults to the route's.
fn backend_id_for_ref(
    backend_ref: &api::httproute::BackendObjectReference,
    local_ns: &str,
) -> BackendId {
    let group = backend_ref.group.as_deref().unwrap_or("");
    let kind = backend_ref.kind.as_deref().unwrap_or("Service");
    let namespace = backend_ref
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(local_ns);
    BackendId::new(group, kind, namespace, &backend_ref.name)
}

fn classify_policy_target(
    target: &api::NamespacedTargetRef,
    local_ns: &str,
) -> Result<PolicyTarget> {
    let group = target.group.as_deref().unwrap_or("");
    let namespace = target
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(local_ns);

    if group.eq_ignore_ascii_case(GATEWAY_API_GROUP) {
        if target.kind.eq_ignore_ascii_case("GatewayClass") {
            return Ok(PolicyTarget::GatewayClass(GatewayClassId::new(&target.name)));
        }
        if target.kind.eq_ignore_ascii_case("Gateway") {
            return Ok(PolicyTarget::Gateway(GatewayId::new(namespace, &target.name)));
        }
        if target.kind.eq_ignore_ascii_case("HTTPRoute") {
            return Ok(PolicyTarget::HttpRoute(RouteId::new(namespace, &target.name)));
        }
    } else if group.is_empty() || group.eq_ignore_ascii_case("core") {
        if target.kind.eq_ignore_ascii_case("Namespace") {
            return Ok(PolicyTarget::Namespace(NamespaceId::new(&target.name)));
        }
        if target.kind.eq_ignore_ascii_case("Service") {
            return Ok(PolicyTarget::Backend(BackendId::service(namespace, &target.name)));
        }
    } else if group.eq_ignore_ascii_case(SERVICE_IMPORT_GROUP)
        && target.kind.eq_ignore_ascii_case("ServiceImport")
    {
        return Ok(PolicyTarget::Backend(BackendId::service_import(
            namespace,
            &target.name,
        )));
    }

    anyhow::bail!("unsupported policy target: {}", target.canonical_kind())
}
