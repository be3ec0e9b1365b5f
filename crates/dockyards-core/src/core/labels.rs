// crates/dockyards-core/src/core/labels.rs
// ============================================================================
// Module: Dockyards Well-Known Names
// Description: Label keys, finalizers, and reserved object names.
// Purpose: Keep selector and bootstrap vocabulary in one place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Well-known label keys used for selection and indexing, finalizer markers,
//! and reserved object names in the global namespace.

/// Label carrying the owning cluster name.
pub const LABEL_CLUSTER_NAME: &str = "dockyards.io/cluster-name";
/// Label carrying the owning node pool name.
pub const LABEL_NODE_POOL_NAME: &str = "dockyards.io/node-pool-name";
/// Label carrying the owning organization name.
pub const LABEL_ORGANIZATION_NAME: &str = "dockyards.io/organization-name";
/// Label marking the default release.
pub const LABEL_DEFAULT_RELEASE: &str = "dockyards.io/default-release";
/// Label marking the default cluster template.
pub const LABEL_DEFAULT_CLUSTER_TEMPLATE: &str = "dockyards.io/default-cluster-template";

/// Finalizer placed on objects reconciled by dockyards controllers.
pub const FINALIZER_DOCKYARDS: &str = "dockyards.io/finalizer";

/// Feature name enabling public sign-up.
pub const FEATURE_USER_SIGN_UP: &str = "user-sign-up";
/// Secret holding the access-token signing seed.
pub const SECRET_JWT_ACCESS: &str = "dockyards-jwt-access";
/// Secret holding the refresh-token signing seed.
pub const SECRET_JWT_REFRESH: &str = "dockyards-jwt-refresh";

/// Resource key for CPU.
pub const RESOURCE_CPU: &str = "cpu";
/// Resource key for memory.
pub const RESOURCE_MEMORY: &str = "memory";
/// Resource key for storage.
pub const RESOURCE_STORAGE: &str = "storage";
