use std::collections::BTreeSet;

use anvil_model::{JavaSymbol, TypeDetails};

use crate::vocabulary::{remote_proxy, remote_request};

/// Composes the full method exclusion set for a request interface.
///
/// Layers, in order:
/// 1. the request annotation's explicit `exclude` names;
/// 2. unless suppressed via `ignoreProxyExclusions`, the getter/setter pair
///    and the raw name of every proxy-excluded property;
/// 3. unless suppressed via `ignoreProxyReadOnly`, the setter of every
///    proxy-read-only property;
/// 4. every method declared on the proxy itself, gated by a flag read off
///    the *proxy* under the request annotation's `ignoreProxyReadOnly`
///    attribute name, defaulting on (see DESIGN.md).
pub(crate) fn method_exclusions(
    request: &TypeDetails,
    proxy: Option<&TypeDetails>,
) -> BTreeSet<String> {
    let request_annotation = request.annotation_of_type(&remote_request());
    let mut exclusions: Vec<String> = request_annotation
        .map(|annotation| annotation.string_list_attribute("exclude"))
        .unwrap_or_default();

    if let Some(proxy) = proxy {
        let proxy_annotation = proxy.annotation_of_type(&remote_proxy());

        let ignore_proxy_exclusions = request_annotation
            .map(|annotation| annotation.bool_attribute("ignoreProxyExclusions", false))
            .unwrap_or(false);
        if !ignore_proxy_exclusions {
            let excluded_properties = proxy_annotation
                .map(|annotation| annotation.string_list_attribute("exclude"))
                .unwrap_or_default();
            for property in &excluded_properties {
                let property = JavaSymbol::new(property.clone());
                exclusions.push(property.setter().to_string());
                exclusions.push(property.getter().to_string());
            }
            exclusions.extend(excluded_properties);
        }

        let ignore_proxy_read_only = request_annotation
            .map(|annotation| annotation.bool_attribute("ignoreProxyReadOnly", false))
            .unwrap_or(false);
        if !ignore_proxy_read_only {
            let read_only_properties = proxy_annotation
                .map(|annotation| annotation.string_list_attribute("readOnly"))
                .unwrap_or_default();
            for property in read_only_properties {
                exclusions.push(JavaSymbol::new(property).setter().to_string());
            }
        }

        let exclude_proxy_declared = proxy
            .annotation_of_type(&remote_request())
            .map(|annotation| annotation.bool_attribute("ignoreProxyReadOnly", true))
            .unwrap_or(true);
        if exclude_proxy_declared {
            for method in &proxy.declared_methods {
                exclusions.push(method.name.to_string());
            }
        }
    }

    exclusions.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use anvil_core::ModuleName;
    use anvil_metadata::MetadataId;
    use anvil_model::physical;
    use anvil_model::{AnnotationMetadata, AnnotationValue, JavaType, MethodMetadata, TypeDetails};

    fn declaration(fqn: &str) -> TypeDetails {
        let ty = JavaType::new(fqn);
        TypeDetails::new(
            physical::create_identifier(&ModuleName::root(), &ty),
            ty,
        )
    }

    fn string_list(values: &[&str]) -> AnnotationValue {
        AnnotationValue::List(
            values
                .iter()
                .map(|v| AnnotationValue::Str((*v).to_string()))
                .collect(),
        )
    }

    fn request_with(attributes: &[(&str, AnnotationValue)]) -> TypeDetails {
        let mut details = declaration("com.example.InvoiceRequest");
        let mut annotation = AnnotationMetadata::new(remote_request())
            .with_attribute("value", AnnotationValue::Str("com.example.Invoice".into()));
        for (name, value) in attributes {
            annotation.set_attribute(*name, value.clone());
        }
        details.annotations.push(annotation);
        details
    }

    fn proxy_with(attributes: &[(&str, AnnotationValue)]) -> TypeDetails {
        let mut details = declaration("com.example.InvoiceProxy");
        let mut annotation = AnnotationMetadata::new(remote_proxy())
            .with_attribute("value", AnnotationValue::Str("com.example.Invoice".into()));
        for (name, value) in attributes {
            annotation.set_attribute(*name, value.clone());
        }
        details.annotations.push(annotation);
        details
    }

    #[test]
    fn composes_request_and_proxy_exclusions() {
        let request = request_with(&[("exclude", string_list(&["foo"]))]);
        let proxy = proxy_with(&[
            ("exclude", string_list(&["bar"])),
            ("readOnly", string_list(&["baz"])),
        ]);

        let exclusions = method_exclusions(&request, Some(&proxy));
        let expected: BTreeSet<String> = ["foo", "setBar", "getBar", "bar", "setBaz"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(exclusions, expected);
    }

    #[test]
    fn suppression_flags_drop_proxy_layers() {
        let request = request_with(&[
            ("exclude", string_list(&["foo"])),
            ("ignoreProxyExclusions", AnnotationValue::Bool(true)),
            ("ignoreProxyReadOnly", AnnotationValue::Bool(true)),
        ]);
        let proxy = proxy_with(&[
            ("exclude", string_list(&["bar"])),
            ("readOnly", string_list(&["baz"])),
        ]);

        let exclusions = method_exclusions(&request, Some(&proxy));
        let expected: BTreeSet<String> = ["foo".to_string()].into_iter().collect();
        assert_eq!(exclusions, expected);
    }

    #[test]
    fn proxy_declared_methods_are_excluded_by_default() {
        let request = request_with(&[]);
        let mut proxy = proxy_with(&[]);
        proxy.declared_methods.push(MethodMetadata::abstract_declaration(
            MetadataId::instance("type", "?com.example.InvoiceProxy").unwrap(),
            "getVersion".into(),
            JavaType::new("java.lang.Integer"),
            Vec::new(),
            Vec::new(),
        ));

        let exclusions = method_exclusions(&request, Some(&proxy));
        assert!(exclusions.contains("getVersion"));

        // The gate is read from the proxy under the request annotation's
        // attribute name; a request-annotation on the proxy with the flag
        // lowered keeps proxy-declared methods callable.
        proxy.annotations.push(
            AnnotationMetadata::new(remote_request())
                .with_attribute("ignoreProxyReadOnly", AnnotationValue::Bool(false)),
        );
        let exclusions = method_exclusions(&request, Some(&proxy));
        assert!(!exclusions.contains("getVersion"));
    }

    #[test]
    fn no_proxy_means_request_exclusions_only() {
        let request = request_with(&[("exclude", string_list(&["foo", "bar"]))]);
        let exclusions = method_exclusions(&request, None);
        let expected: BTreeSet<String> =
            ["foo".to_string(), "bar".to_string()].into_iter().collect();
        assert_eq!(exclusions, expected);
    }
}
