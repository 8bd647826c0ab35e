//! Resource type definitions consumed by the policy resolver.
//!
//! These mirror the wire shapes of the Gateway API resources the resolver
//! understands, narrowed to the fields that participate in reference
//! resolution and policy attachment. Fetching and status reporting are
//! handled by external collaborators; this crate only describes the data
//! they exchange with the resolver.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod gateway;
pub mod httproute;
pub mod policy;
pub mod reference_grant;

pub use self::{
    backend::{Backend, Service, ServiceImport},
    gateway::{Gateway, GatewayClass},
    httproute::HttpRoute,
    policy::{NamespacedTargetRef, Policy},
    reference_grant::ReferenceGrant,
};

/// The API group of the Gateway API resources.
pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// The subset of Kubernetes object metadata the resolver consumes.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

/// A Namespace resource. Namespaces that are only referenced by other
/// resources, without appearing in the snapshot, are synthesized by the graph
/// builder from this type.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

// === impl ObjectMeta ===

impl ObjectMeta {
    /// Metadata for a cluster-scoped resource.
    pub fn named(name: impl ToString) -> Self {
        Self {
            name: Some(name.to_string()),
            namespace: None,
        }
    }

    /// Metadata for a namespaced resource.
    pub fn namespaced(namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
        }
    }
}
