// crates/dockyards-core/src/core/mod.rs
// ============================================================================
// Module: Dockyards Core Types
// Description: Canonical object model for the Dockyards control plane.
// Purpose: Provide stable, serializable types for stored objects.
// Dependencies: kube_quantity, rand, serde, time
// ============================================================================

//! ## Overview
//! Core types define object metadata, the typed object envelope, resource
//! kinds, membership roles, quantities, and timestamps. These types are the
//! canonical source of truth for the API's projected views.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod labels;
pub mod meta;
pub mod names;
pub mod object;
pub mod quantity;
pub mod resources;
pub mod role;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use labels::*;
pub use meta::CONDITION_READY;
pub use meta::Condition;
pub use meta::LifecycleState;
pub use meta::ObjectMeta;
pub use meta::OwnerReference;
pub use meta::find_condition;
pub use names::GENERATED_SUFFIX_LENGTH;
pub use names::MAX_DNS_LABEL_LENGTH;
pub use names::generate_name;
pub use names::is_dns_label;
pub use object::EmptyStatus;
pub use object::Object;
pub use object::ObjectDecodeError;
pub use object::ObjectKey;
pub use object::RawObject;
pub use object::ResourceSpec;
pub use quantity::Quantity;
pub use quantity::QuantityError;
pub use resources::*;
pub use role::ALL_ROLES;
pub use role::Role;
pub use role::UnknownRole;
pub use time::Timestamp;
