use gateway_policy_resolver_api::{backend::SERVICE_IMPORT_GROUP, GATEWAY_API_GROUP};
use std::fmt;

/// The namespace assumed when a namespaced resource or reference omits one.
pub const NAMESPACE_DEFAULT: &str = "default";

/// Uniquely identifies a resource across every kind the graph tracks.
///
/// Group and kind are case-normalized at construction so IDs computed from
/// differently cased manifests compare equal, and the display form includes
/// the kind so two resources of different kinds sharing a name never collide.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ResourceId {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn namespaced(group: &str, kind: &str, namespace: &str, name: &str) -> Self {
        let namespace = if namespace.is_empty() {
            NAMESPACE_DEFAULT
        } else {
            namespace
        };
        Self {
            group: group.to_ascii_lowercase(),
            kind: kind.to_ascii_lowercase(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn cluster_scoped(group: &str, kind: &str, name: &str) -> Self {
        Self {
            group: group.to_ascii_lowercase(),
            kind: kind.to_ascii_lowercase(),
            namespace: String::new(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.group, self.kind, self.namespace, self.name
        )
    }
}

macro_rules! kind_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(pub ResourceId);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

kind_id! {
    /// Identifies a GatewayClass.
    GatewayClassId
}
kind_id! {
    /// Identifies a Namespace.
    NamespaceId
}
kind_id! {
    /// Identifies a Gateway.
    GatewayId
}
kind_id! {
    /// Identifies an HTTPRoute.
    RouteId
}
kind_id! {
    /// Identifies a Backend of any underlying kind.
    BackendId
}
kind_id! {
    /// Identifies a ReferenceGrant.
    GrantId
}
kind_id! {
    /// Identifies a policy instance.
    PolicyId
}

impl GatewayClassId {
    pub fn new(name: &str) -> Self {
        Self(ResourceId::cluster_scoped(
            GATEWAY_API_GROUP,
            "GatewayClass",
            name,
        ))
    }
}

impl NamespaceId {
    pub fn new(name: &str) -> Self {
        let name = if name.is_empty() {
            NAMESPACE_DEFAULT
        } else {
            name
        };
        Self(ResourceId::cluster_scoped("", "Namespace", name))
    }
}

impl GatewayId {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self(ResourceId::namespaced(
            GATEWAY_API_GROUP,
            "Gateway",
            namespace,
            name,
        ))
    }
}

impl RouteId {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self(ResourceId::namespaced(
            GATEWAY_API_GROUP,
            "HTTPRoute",
            namespace,
            name,
        ))
    }
}

impl BackendId {
    pub fn new(group: &str, kind: &str, namespace: &str, name: &str) -> Self {
        Self(ResourceId::namespaced(group, kind, namespace, name))
    }

    /// An ID for a backend backed by a core Service.
    pub fn service(namespace: &str, name: &str) -> Self {
        Self::new("", "Service", namespace, name)
    }

    /// An ID for a backend backed by a multi-cluster ServiceImport.
    pub fn service_import(namespace: &str, name: &str) -> Self {
        Self::new(SERVICE_IMPORT_GROUP, "ServiceImport", namespace, name)
    }
}

impl GrantId {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self(ResourceId::namespaced(
            GATEWAY_API_GROUP,
            "ReferenceGrant",
            namespace,
            name,
        ))
    }
}

impl PolicyId {
    pub fn new(group: &str, kind: &str, namespace: &str, name: &str) -> Self {
        Self(ResourceId::namespaced(group, kind, namespace, name))
    }
}

/// Identifies a policy *type* rather than a policy instance: the CRD's group
/// and kind. Effective-policy maps are keyed by this, giving each policy type
/// exactly one override slot per target.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PolicyCrdId {
    pub group: String,
    pub kind: String,
}

impl PolicyCrdId {
    pub fn new(group: &str, kind: &str) -> Self {
        Self {
            group: group.to_ascii_lowercase(),
            kind: kind.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for PolicyCrdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            self.kind.fmt(f)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_deterministic_and_case_normalized() {
        let a = ResourceId::namespaced("Gateway.Networking.K8S.io", "HTTPRoute", "apps", "web");
        let b = ResourceId::namespaced("gateway.networking.k8s.io", "httproute", "apps", "web");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn kinds_sharing_a_name_never_collide() {
        let gateway = GatewayId::new("apps", "web");
        let route = RouteId::new("apps", "web");
        let service = BackendId::service("apps", "web");
        assert_ne!(gateway.0, route.0);
        assert_ne!(route.0, service.0);
        assert_ne!(gateway.to_string(), route.to_string());
        assert_ne!(route.to_string(), service.to_string());
    }

    #[test]
    fn empty_namespace_defaults() {
        let id = ResourceId::namespaced("", "Service", "", "web");
        assert_eq!(id.namespace, NAMESPACE_DEFAULT);
        assert_eq!(NamespaceId::new("").0.name, NAMESPACE_DEFAULT);
    }

    #[test]
    fn cluster_scoped_ids_omit_namespace() {
        let id = GatewayClassId::new("internal");
        assert_eq!(id.0.namespace, "");
        assert_eq!(
            id.to_string(),
            "gateway.networking.k8s.io|gatewayclass||internal"
        );
    }

    #[test]
    fn crd_id_display_is_group_qualified() {
        assert_eq!(
            PolicyCrdId::new("policy.example.com", "RateLimit").to_string(),
            "ratelimit.policy.example.com"
        );
        assert_eq!(PolicyCrdId::new("", "RateLimit").to_string(), "ratelimit");
    }
}
