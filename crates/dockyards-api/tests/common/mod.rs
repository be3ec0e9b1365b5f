// crates/dockyards-api/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: In-process API harness and object seeding helpers.
// Purpose: Drive the real router against an in-memory store.
// Dependencies: dockyards-api, dockyards-core, dockyards-config, tower
// ============================================================================

//! ## Overview
//! [`Harness`] wires an [`ApiServer`] over an [`InMemoryObjectStore`], seeds
//! users, organizations, clusters, node pools, nodes, and catalog objects
//! straight into the store, and sends requests through the router with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    reason = "Test fixtures fail fast on setup errors."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use dockyards_api::ApiServer;
use dockyards_api::ApiState;
use dockyards_api::NoopAuditSink;
use dockyards_api::TokenKind;
use dockyards_config::DockyardsConfig;
use dockyards_core::CONDITION_READY;
use dockyards_core::Client;
use dockyards_core::Cluster;
use dockyards_core::ClusterSpec;
use dockyards_core::ClusterStatus;
use dockyards_core::ClusterTemplate;
use dockyards_core::ClusterTemplateSpec;
use dockyards_core::Condition;
use dockyards_core::FEATURE_USER_SIGN_UP;
use dockyards_core::FINALIZER_DOCKYARDS;
use dockyards_core::Feature;
use dockyards_core::FeatureSpec;
use dockyards_core::InMemoryObjectStore;
use dockyards_core::Invitation;
use dockyards_core::InvitationSpec;
use dockyards_core::LABEL_CLUSTER_NAME;
use dockyards_core::LABEL_DEFAULT_CLUSTER_TEMPLATE;
use dockyards_core::LABEL_DEFAULT_RELEASE;
use dockyards_core::LABEL_NODE_POOL_NAME;
use dockyards_core::LABEL_ORGANIZATION_NAME;
use dockyards_core::MemberReference;
use dockyards_core::Namespace;
use dockyards_core::NamespaceSpec;
use dockyards_core::Node;
use dockyards_core::NodePool;
use dockyards_core::NodePoolSpec;
use dockyards_core::NodeSpec;
use dockyards_core::NodeStatus;
use dockyards_core::ObjectMeta;
use dockyards_core::Organization;
use dockyards_core::OrganizationSpec;
use dockyards_core::OrganizationStatus;
use dockyards_core::Release;
use dockyards_core::ReleaseSpec;
use dockyards_core::ReleaseStatus;
use dockyards_core::Role;
use dockyards_core::Timestamp;
use dockyards_core::User;
use dockyards_core::UserSpec;
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Password given to every seeded user.
pub const PASSWORD: &str = "password";

/// bcrypt cost used in tests.
const TEST_BCRYPT_COST: u32 = 4;

// ============================================================================
// SECTION: Harness
// ============================================================================

/// API server over a fresh in-memory store.
pub struct Harness {
    /// Server under test.
    pub server: ApiServer,
}

impl Harness {
    /// Boots a server with the default configuration and a cheap bcrypt cost.
    pub async fn new() -> Self {
        let mut config = DockyardsConfig::default();
        config.auth.bcrypt_cost = TEST_BCRYPT_COST;
        let server = ApiServer::with_store(
            config,
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(NoopAuditSink),
        )
        .await
        .unwrap();
        Self {
            server,
        }
    }

    /// Shared handler state.
    pub fn state(&self) -> &ApiState {
        self.server.state()
    }

    /// Store client.
    pub fn client(&self) -> &Client {
        &self.state().client
    }

    /// Global namespace name.
    pub fn global_namespace(&self) -> String {
        self.state().global_namespace().to_string()
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    /// Sends a request and returns the status and JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&body).unwrap())
            }
            None => Body::empty(),
        };
        let response = self.server.router().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    /// `GET` with a bearer token.
    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// `POST` with a bearer token.
    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    /// `PATCH` with a bearer token.
    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    /// `DELETE` with a bearer token.
    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    // ------------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------------

    /// Access token for `user`.
    pub fn access_token(&self, user: &User) -> String {
        self.state().tokens.mint(TokenKind::Access, user.name()).unwrap()
    }

    /// Refresh token for `user`.
    pub fn refresh_token(&self, user: &User) -> String {
        self.state().tokens.mint(TokenKind::Refresh, user.name()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------------

    /// Enables public sign-up.
    pub async fn enable_sign_up(&self) {
        let feature = Feature::new(
            ObjectMeta::namespaced(self.global_namespace(), FEATURE_USER_SIGN_UP),
            FeatureSpec::default(),
        );
        self.client().create(&feature).await.unwrap();
    }

    /// Creates a user named `name` with [`PASSWORD`].
    pub async fn user(&self, name: &str, email: &str) -> User {
        let hash = bcrypt::hash(PASSWORD, TEST_BCRYPT_COST).unwrap();
        let user = User::new(ObjectMeta::named(name), UserSpec {
            email: email.to_string(),
            password: hash,
            display_name: None,
            provider_id: None,
        });
        self.client().create(&user).await.unwrap()
    }

    /// Creates an organization with a tenant namespace and the given members.
    pub async fn organization(&self, name: &str, members: &[(&User, Role)]) -> Organization {
        let namespace = Namespace::new(
            ObjectMeta {
                generate_name: Some("org-".to_string()),
                ..ObjectMeta::default()
            },
            NamespaceSpec::default(),
        );
        let namespace = self.client().create(&namespace).await.unwrap();
        let member_refs = members
            .iter()
            .map(|(user, role)| MemberReference {
                name: user.name().to_string(),
                uid: user.uid().to_string(),
                role: *role,
            })
            .collect();
        let organization = Organization {
            metadata: ObjectMeta::named(name).with_finalizer(FINALIZER_DOCKYARDS),
            spec: OrganizationSpec {
                display_name: None,
                member_refs,
                namespace_ref: namespace.name().to_string(),
            },
            status: OrganizationStatus::default(),
        };
        self.client().create(&organization).await.unwrap()
    }

    /// Creates a cluster in the organization namespace.
    pub async fn cluster(&self, organization: &Organization, name: &str) -> Cluster {
        let cluster = Cluster {
            metadata: ObjectMeta::namespaced(&organization.spec.namespace_ref, name)
                .with_owner(organization.owner_reference())
                .with_finalizer(FINALIZER_DOCKYARDS),
            spec: ClusterSpec {
                version: Some("v1.30.0".to_string()),
            },
            status: ClusterStatus::default(),
        };
        self.client().create(&cluster).await.unwrap()
    }

    /// Creates a node pool stored as `<cluster>-<requested>`.
    pub async fn node_pool(&self, cluster: &Cluster, requested: &str, spec: NodePoolSpec) -> NodePool {
        let namespace = cluster.namespace().unwrap();
        let pool = NodePool::new(
            ObjectMeta::namespaced(namespace, format!("{}-{requested}", cluster.name()))
                .with_label(LABEL_CLUSTER_NAME, cluster.name())
                .with_owner(cluster.owner_reference())
                .with_finalizer(FINALIZER_DOCKYARDS),
            spec,
        );
        self.client().create(&pool).await.unwrap()
    }

    /// Creates a node of `pool` with an optional Ready condition reason.
    pub async fn node(&self, pool: &NodePool, cluster: &Cluster, name: &str, ready: Option<&str>) -> Node {
        let namespace = pool.namespace().unwrap();
        let conditions = ready
            .map(|reason| {
                vec![Condition {
                    condition_type: CONDITION_READY.to_string(),
                    status: "True".to_string(),
                    reason: reason.to_string(),
                    message: String::new(),
                    last_transition_time: Timestamp::now(),
                }]
            })
            .unwrap_or_default();
        let node = Node {
            metadata: ObjectMeta::namespaced(namespace, name)
                .with_label(LABEL_CLUSTER_NAME, cluster.name())
                .with_label(LABEL_NODE_POOL_NAME, pool.name())
                .with_owner(pool.owner_reference()),
            spec: NodeSpec::default(),
            status: NodeStatus {
                conditions,
            },
        };
        self.client().create(&node).await.unwrap()
    }

    /// Creates an invitation in the organization namespace.
    pub async fn invitation(
        &self,
        organization: &Organization,
        name: &str,
        email: &str,
        role: Role,
        duration: Option<&str>,
    ) -> Invitation {
        let invitation = Invitation::new(
            ObjectMeta::namespaced(&organization.spec.namespace_ref, name)
                .with_owner(organization.owner_reference())
                .with_label(LABEL_ORGANIZATION_NAME, organization.name())
                .with_finalizer(FINALIZER_DOCKYARDS),
            InvitationSpec {
                email: email.to_string(),
                role,
                duration: duration.map(str::to_string),
            },
        );
        self.client().create(&invitation).await.unwrap()
    }

    /// Creates a cluster template in the global namespace.
    pub async fn cluster_template(&self, name: &str, spec: ClusterTemplateSpec, default: bool) -> ClusterTemplate {
        let mut metadata = ObjectMeta::namespaced(self.global_namespace(), name);
        if default {
            metadata = metadata.with_label(LABEL_DEFAULT_CLUSTER_TEMPLATE, "true");
        }
        self.client().create(&ClusterTemplate::new(metadata, spec)).await.unwrap()
    }

    /// Creates a release in the global namespace with a latest version.
    pub async fn release(&self, name: &str, latest: &str, default: bool) -> Release {
        let mut metadata = ObjectMeta::namespaced(self.global_namespace(), name);
        if default {
            metadata = metadata.with_label(LABEL_DEFAULT_RELEASE, "true");
        }
        let release = Release {
            metadata,
            spec: ReleaseSpec {
                ranges: vec![">=1.29".to_string()],
                release_type: "kubernetes".to_string(),
            },
            status: ReleaseStatus {
                latest_version: Some(latest.to_string()),
                versions: vec![latest.to_string()],
            },
        };
        self.client().create(&release).await.unwrap()
    }

    /// Re-reads an organization.
    pub async fn reload_organization(&self, name: &str) -> Organization {
        self.client().get::<OrganizationSpec>(None, name).await.unwrap().unwrap()
    }
}

// ============================================================================
// SECTION: Tenants
// ============================================================================

/// Organization with one member per role plus an outsider.
pub struct Tenant {
    /// SuperUser member.
    pub super_user: User,
    /// User member.
    pub user: User,
    /// Reader member.
    pub reader: User,
    /// Member of a different organization only.
    pub outsider: User,
    /// The organization.
    pub organization: Organization,
    /// The outsider's organization.
    pub other_organization: Organization,
}

impl Tenant {
    /// Seeds the tenant fixture as organization `acme`.
    pub async fn seed(harness: &Harness) -> Self {
        let super_user = harness.user("root", "root@dockyards.dev").await;
        let user = harness.user("worker", "worker@dockyards.dev").await;
        let reader = harness.user("viewer", "viewer@dockyards.dev").await;
        let outsider = harness.user("stranger", "stranger@dockyards.dev").await;
        let organization = harness
            .organization("acme", &[(&super_user, Role::SuperUser), (&user, Role::User), (&reader, Role::Reader)])
            .await;
        let other_organization = harness.organization("globex", &[(&outsider, Role::SuperUser)]).await;
        Self {
            super_user,
            user,
            reader,
            outsider,
            organization,
            other_organization,
        }
    }

    /// Namespace of the tenant organization.
    pub fn namespace(&self) -> &str {
        &self.organization.spec.namespace_ref
    }
}
