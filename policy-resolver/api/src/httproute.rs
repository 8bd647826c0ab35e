use crate::ObjectMeta;

/// A routing rule set attached to one or more Gateways, directing traffic to
/// one or more backends.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HttpRoute {
    pub metadata: ObjectMeta,
    pub spec: HttpRouteSpec,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteSpec {
    #[serde(flatten)]
    pub inner: CommonRouteSpec,
    #[serde(default)]
    pub rules: Vec<HttpRouteRule>,
}

/// The parts of a route spec shared by every route kind.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRouteSpec {
    pub parent_refs: Option<Vec<ParentReference>>,
}

/// References a parent this route wants to attach to.
///
/// Group and kind default to the Gateway API `Gateway` kind; the namespace
/// defaults to the route's own namespace.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub namespace: Option<String>,
    pub name: String,
    pub section_name: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteRule {
    pub backend_refs: Option<Vec<BackendObjectReference>>,
}

/// References a backend serving as a traffic target.
///
/// Group defaults to the core API group and kind to `Service`; the namespace
/// defaults to the route's own namespace.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendObjectReference {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub port: Option<u16>,
    pub weight: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_route_manifest() {
        let route: HttpRoute = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "web", "namespace": "apps" },
            "spec": {
                "parentRefs": [
                    { "name": "ingress" },
                    { "kind": "Gateway", "namespace": "edge", "name": "shared" },
                ],
                "rules": [
                    {
                        "backendRefs": [
                            { "name": "web-svc", "port": 8080 },
                            { "kind": "ServiceImport", "group": "multicluster.x-k8s.io", "name": "global-svc" },
                        ],
                    },
                ],
            },
        }))
        .expect("manifest must parse");

        let parents = route.spec.inner.parent_refs.as_ref().expect("parents");
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].name, "ingress");
        assert_eq!(parents[0].namespace, None);
        assert_eq!(parents[1].namespace.as_deref(), Some("edge"));

        let backends = route.spec.rules[0].backend_refs.as_ref().expect("backends");
        assert_eq!(backends[0].name, "web-svc");
        assert_eq!(backends[0].kind, None);
        assert_eq!(backends[1].kind.as_deref(), Some("ServiceImport"));
    }
}
