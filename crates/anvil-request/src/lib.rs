//! Request-interface scaffolding for Anvil.
//!
//! Generates and maintains the client-facing request interface mirroring an
//! entity's service surface: the [`RequestMetadataProvider`] resolves the
//! annotated request declaration, composes the exclusion policy from the
//! request and its companion proxy, translates the member set for the client
//! side, rewrites the service-binding annotation, and persists the derived
//! declaration through the artifact writer. Notifications arriving at the
//! class level are resolved to the concrete affected request first.

mod exclusions;
mod metadata;
mod provider;
mod vocabulary;

pub use metadata::{
    is_request_id, request_class_id, request_id, request_module_of, request_type_of,
    RequestMetadata, REQUEST_METADATA_CLASS,
};
pub use provider::RequestMetadataProvider;
pub use vocabulary::{
    instance_receiver, legacy_request_context, receiver, remote_proxy, remote_request,
    request_context, service_binding_annotations, service_facade, GENERATED_WARNING,
};
