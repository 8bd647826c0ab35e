//! Gateway API resource graph and policy resolver.
//!
//! One snapshot of loosely coupled resources is linked into a relationship
//! graph and annotated with the policies in effect for every resource:
//!
//! ```text
//! [ GatewayClass ] <- [ Gateway ] <- [ HTTPRoute ] -> [ Backend ]
//!                          |               |               |
//!                     [ Namespace ]   [ Namespace ]   [ Namespace ]
//! ```
//!
//! - Gateways select a `GatewayClass` by name.
//! - `HTTPRoute`s attach to gateways via parent refs and target backends via
//!   backend refs; a backend ref crossing namespaces must be authorized by a
//!   `ReferenceGrant` in the backend's namespace, or the edge is omitted.
//! - Policies of arbitrary CRDs attach to exactly one resource and are
//!   inherited down the class, namespace, gateway, route, backend hierarchy;
//!   a more specific policy of the same CRD overrides a more general one
//!   wholesale.
//!
//! Reference problems never abort the build: each node carries an ordered
//! error list, so consumers can render degraded rather than missing results.
//! The finished graph is immutable; rebuilding from a new snapshot produces
//! an independent graph that is published with a single pointer swap.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod graph;
mod node;
mod policy;
mod reference_grant;
mod resource_id;


pub use self::{
    error::{BuildError, ResourceError},
    graph::{ClusterSnapshot, NodeRef, ResourceGraph},
    node::{
        BackendNode, EffectivePolicies, GatewayClassNode, GatewayNode, HttpRouteNode,
        NamespaceNode, PolicyNode, PolicyTarget, ReferenceGrantNode,
    },
    resource_id::{
        BackendId, GatewayClassId, GatewayId, GrantId, NamespaceId, PolicyCrdId, PolicyId,
        ResourceId, RouteId, NAMESPACE_DEFAULT,
    },
};

use parking_lot::RwLock;
use std::sync::Arc;

/// Shares the most recently published graph between concurrent readers.
///
/// Each rebuild constructs an entirely new [`ResourceGraph`]; publishing it
/// is one pointer swap, so readers holding a previously obtained snapshot
/// are never invalidated mid-read.
#[derive(Clone, Debug)]
pub struct SharedGraph(Arc<RwLock<Arc<ResourceGraph>>>);

impl SharedGraph {
    pub fn new(graph: ResourceGraph) -> Self {
        Self(Arc::new(RwLock::new(Arc::new(graph))))
    }

    /// The graph most recently published.
    pub fn current(&self) -> Arc<ResourceGraph> {
        self.0.read().clone()
    }

    /// Atomically replaces the published graph.
    pub fn publish(&self, graph: ResourceGraph) {
        *self.0.write() = Arc::new(graph);
    }
}
