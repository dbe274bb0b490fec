//! Type and annotation vocabulary of the request scaffolding.

use anvil_model::JavaType;

/// Marks a request interface and names its target entity (`value`); carries
/// the explicit method exclusions (`exclude`) and the proxy-inheritance
/// suppression flags (`ignoreProxyExclusions`, `ignoreProxyReadOnly`).
pub fn remote_request() -> JavaType {
    JavaType::new("io.anvil.scaffold.RemoteRequest")
}

/// Marks the client proxy of an entity (`value`), with excluded (`exclude`)
/// and read-only (`readOnly`) properties.
pub fn remote_proxy() -> JavaType {
    JavaType::new("io.anvil.scaffold.RemoteProxy")
}

/// Marks a service layer and lists the domain types it fronts
/// (`domainTypes`).
pub fn service_facade() -> JavaType {
    JavaType::new("io.anvil.scaffold.ServiceFacade")
}

/// The canonical base every generated request interface extends.
pub fn request_context() -> JavaType {
    JavaType::new("io.anvil.request.RequestContext")
}

/// Pre-rename location of the base interface; still honored when present so
/// older projects keep compiling.
pub fn legacy_request_context() -> JavaType {
    JavaType::new("io.anvil.request.client.RequestContext")
}

/// Return-type wrapper for static service calls.
pub fn receiver() -> JavaType {
    JavaType::new("io.anvil.request.Receiver")
}

/// Return-type wrapper for instance calls, parameterized by the proxy.
pub fn instance_receiver() -> JavaType {
    JavaType::new("io.anvil.request.InstanceReceiver")
}

/// The service-binding annotations a request interface may carry, in
/// precedence order. The first one present is rewritten to point at the
/// resolved service implementation.
pub fn service_binding_annotations() -> [JavaType; 2] {
    [
        JavaType::new("io.anvil.request.ServiceName"),
        JavaType::new("io.anvil.request.Service"),
    ]
}

/// Header marker embedded in every generated file; tooling greps for it to
/// recognize managed artifacts.
pub const GENERATED_WARNING: &str =
    "WARNING: DO NOT EDIT THIS FILE. THIS FILE IS MANAGED BY THE ANVIL SHELL.";
