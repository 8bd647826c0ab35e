use crate::ObjectMeta;

/// The API group of multi-cluster `ServiceImport` backends.
pub const SERVICE_IMPORT_GROUP: &str = "multicluster.x-k8s.io";

/// A Service backend.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Service {
    pub metadata: ObjectMeta,
}

/// A multi-cluster ServiceImport backend.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ServiceImport {
    pub metadata: ObjectMeta,
}

/// The closed set of resource kinds that may terminate traffic.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind")]
pub enum Backend {
    Service(Service),
    ServiceImport(ServiceImport),
}

// === impl Backend ===

impl Backend {
    pub fn group(&self) -> &str {
        match self {
            Self::Service(_) => "",
            Self::ServiceImport(_) => SERVICE_IMPORT_GROUP,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Service(_) => "Service",
            Self::ServiceImport(_) => "ServiceImport",
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Service(svc) => &svc.metadata,
            Self::ServiceImport(imp) => &imp.metadata,
        }
    }
}
