//! One node type per resource kind, modeling relationships and dependencies.
//!
//! Nodes own the raw resource for their own kind and hold non-owning,
//! ID-keyed link sets into the graph's central registries. Storing IDs
//! instead of references keeps the cyclic parent/child relationships free of
//! ownership cycles and makes two builds of the same snapshot directly
//! comparable.

use crate::{
    error::ResourceError,
    resource_id::{
        BackendId, GatewayClassId, GatewayId, GrantId, NamespaceId, PolicyCrdId, PolicyId,
        ResourceId, RouteId,
    },
};
use gateway_policy_resolver_api as api;
use std::collections::{BTreeMap, BTreeSet};

/// The policies in effect for a node, resolved per policy CRD.
pub type EffectivePolicies = BTreeMap<PolicyCrdId, api::Policy>;

/// Models the relationships and dependencies of a GatewayClass resource.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayClassNode {
    pub id: GatewayClassId,
    pub gateway_class: api::GatewayClass,

    /// Gateways configured to use this GatewayClass.
    pub gateways: BTreeSet<GatewayId>,
    /// Policies directly attached to this GatewayClass.
    pub policies: BTreeSet<PolicyId>,
    pub effective_policies: EffectivePolicies,
    pub errors: Vec<ResourceError>,
}

/// Models the relationships and dependencies of a Namespace.
///
/// Membership sets track which resources live in the namespace; the
/// namespace does not own them.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceNode {
    pub id: NamespaceId,
    pub namespace: api::Namespace,

    pub gateways: BTreeSet<GatewayId>,
    pub http_routes: BTreeSet<RouteId>,
    pub backends: BTreeSet<BackendId>,
    /// Policies directly attached to this Namespace.
    pub policies: BTreeSet<PolicyId>,
    pub effective_policies: EffectivePolicies,
    pub errors: Vec<ResourceError>,
}

/// Models the relationships and dependencies of a Gateway resource.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayNode {
    pub id: GatewayId,
    pub gateway: api::Gateway,

    /// The GatewayClass this Gateway selects, when it resolved.
    pub gateway_class: Option<GatewayClassId>,
    pub namespace: NamespaceId,
    /// HTTPRoutes attached to this Gateway.
    pub http_routes: BTreeSet<RouteId>,
    /// Policies directly attached to this Gateway.
    pub policies: BTreeSet<PolicyId>,
    /// Policies this Gateway inherits from more general levels.
    pub inherited_policies: BTreeSet<PolicyId>,
    pub effective_policies: EffectivePolicies,
    pub errors: Vec<ResourceError>,
}

/// Models the relationships and dependencies of an HTTPRoute resource.
///
/// A route may be exposed through several gateways with different inherited
/// policy sets, so its effective policies are kept per gateway context.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRouteNode {
    pub id: RouteId,
    pub http_route: api::HttpRoute,

    pub namespace: NamespaceId,
    /// Gateways this route is attached to.
    pub gateways: BTreeSet<GatewayId>,
    /// Backends this route targets.
    pub backends: BTreeSet<BackendId>,
    pub policies: BTreeSet<PolicyId>,
    pub inherited_policies: BTreeSet<PolicyId>,
    pub effective_policies: BTreeMap<GatewayId, EffectivePolicies>,
    pub errors: Vec<ResourceError>,
}

/// Models the relationships and dependencies of a backend, the ultimate
/// destination for traffic directed by routes.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendNode {
    pub id: BackendId,
    pub backend: api::Backend,

    pub namespace: NamespaceId,
    /// Routes referencing this backend as a target.
    pub http_routes: BTreeSet<RouteId>,
    /// ReferenceGrants exposing this backend across namespaces.
    pub reference_grants: BTreeSet<GrantId>,
    pub policies: BTreeSet<PolicyId>,
    pub inherited_policies: BTreeSet<PolicyId>,
    pub effective_policies: BTreeMap<GatewayId, EffectivePolicies>,
    pub errors: Vec<ResourceError>,
}

/// Models a ReferenceGrant and the backends it exposes.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceGrantNode {
    pub id: GrantId,
    pub reference_grant: api::ReferenceGrant,

    pub backends: BTreeSet<BackendId>,
}

/// Models a policy instance and its single attachment target.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyNode {
    pub id: PolicyId,
    pub policy: api::Policy,
    pub crd: PolicyCrdId,

    /// The resolved attachment target. `None` when the target was invalid or
    /// not permitted; such policies take no part in inheritance.
    pub target: Option<PolicyTarget>,
    pub errors: Vec<ResourceError>,
}

/// The one resource a policy attaches to. The enum makes the
/// exactly-one-target invariant structural.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PolicyTarget {
    GatewayClass(GatewayClassId),
    Namespace(NamespaceId),
    Gateway(GatewayId),
    HttpRoute(RouteId),
    Backend(BackendId),
}

// === impl GatewayClassNode ===

impl GatewayClassNode {
    pub(crate) fn new(id: GatewayClassId, gateway_class: api::GatewayClass) -> Self {
        Self {
            id,
            gateway_class,
            gateways: BTreeSet::new(),
            policies: BTreeSet::new(),
            effective_policies: EffectivePolicies::new(),
            errors: Vec::new(),
        }
    }
}

// === impl NamespaceNode ===

impl NamespaceNode {
    pub(crate) fn new(id: NamespaceId, namespace: api::Namespace) -> Self {
        Self {
            id,
            namespace,
            gateways: BTreeSet::new(),
            http_routes: BTreeSet::new(),
            backends: BTreeSet::new(),
            policies: BTreeSet::new(),
            effective_policies: EffectivePolicies::new(),
            errors: Vec::new(),
        }
    }
}

// === impl GatewayNode ===

impl GatewayNode {
    pub(crate) fn new(id: GatewayId, namespace: NamespaceId, gateway: api::Gateway) -> Self {
        Self {
            id,
            gateway,
            gateway_class: None,
            namespace,
            http_routes: BTreeSet::new(),
            policies: BTreeSet::new(),
            inherited_policies: BTreeSet::new(),
            effective_policies: EffectivePolicies::new(),
            errors: Vec::new(),
        }
    }
}

// === impl HttpRouteNode ===

impl HttpRouteNode {
    pub(crate) fn new(id: RouteId, namespace: NamespaceId, http_route: api::HttpRoute) -> Self {
        Self {
            id,
            http_route,
            namespace,
            gateways: BTreeSet::new(),
            backends: BTreeSet::new(),
            policies: BTreeSet::new(),
            inherited_policies: BTreeSet::new(),
            effective_policies: BTreeMap::new(),
            errors: Vec::new(),
        }
    }
}

// === impl BackendNode ===

impl BackendNode {
    pub(crate) fn new(id: BackendId, namespace: NamespaceId, backend: api::Backend) -> Self {
        Self {
            id,
            backend,
            namespace,
            http_routes: BTreeSet::new(),
            reference_grants: BTreeSet::new(),
            policies: BTreeSet::new(),
            inherited_policies: BTreeSet::new(),
            effective_policies: BTreeMap::new(),
            errors: Vec::new(),
        }
    }
}

// === impl ReferenceGrantNode ===

impl ReferenceGrantNode {
    pub(crate) fn new(id: GrantId, reference_grant: api::ReferenceGrant) -> Self {
        Self {
            id,
            reference_grant,
            backends: BTreeSet::new(),
        }
    }
}

// === impl PolicyNode ===

impl PolicyNode {
    pub(crate) fn new(id: PolicyId, crd: PolicyCrdId, policy: api::Policy) -> Self {
        Self {
            id,
            policy,
            crd,
            target: None,
            errors: Vec::new(),
        }
    }
}

// === impl PolicyTarget ===

impl PolicyTarget {
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Self::GatewayClass(id) => &id.0,
            Self::Namespace(id) => &id.0,
            Self::Gateway(id) => &id.0,
            Self::HttpRoute(id) => &id.0,
            Self::Backend(id) => &id.0,
        }
    }
}
