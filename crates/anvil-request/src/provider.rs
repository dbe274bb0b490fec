use std::sync::Arc;

use anvil_metadata::{
    downcast_item, HashTrackingNotifier, MetadataEngine, MetadataError, MetadataId, MetadataItem,
    MetadataProvider,
};
use anvil_model::physical;
use anvil_model::{
    AnnotationMetadata, AnnotationValue, ArtifactWriter, JavaType, MethodMetadata, TypeDetails,
    TypeLocationService, TypeTranslationService,
};
use anvil_project::{project_id, ProjectMetadata};

use crate::exclusions::method_exclusions;
use crate::metadata::{
    is_request_id, request_class_id, request_id, RequestMetadata, REQUEST_METADATA_CLASS,
};
use crate::vocabulary::{
    instance_receiver, legacy_request_context, receiver, remote_proxy, remote_request,
    request_context, service_binding_annotations, service_facade, GENERATED_WARNING,
};

/// Computes and maintains request metadata.
///
/// Owns the `request` metadata class: resolves the governing request
/// declaration, mirrors its target entity's service surface into abstract
/// client-side declarations, and persists the result. Any missing link while
/// computing — unknown module, unresolvable entity, abstract target — makes
/// the node absent rather than failing.
pub struct RequestMetadataProvider {
    types: Arc<dyn TypeLocationService>,
    translator: Arc<dyn TypeTranslationService>,
    writer: Arc<dyn ArtifactWriter>,
    notifier: HashTrackingNotifier,
}

impl RequestMetadataProvider {
    pub fn new(
        types: Arc<dyn TypeLocationService>,
        translator: Arc<dyn TypeTranslationService>,
        writer: Arc<dyn ArtifactWriter>,
    ) -> Self {
        Self {
            types,
            translator,
            writer,
            notifier: HashTrackingNotifier::new(),
        }
    }

    /// Registers the standing class-level edge: any physical type change may
    /// concern some request interface.
    pub fn activate(&self, engine: &MetadataEngine) -> Result<(), MetadataError> {
        engine.register_dependency(&physical::class_level_id(), &request_class_id())
    }

    pub fn deactivate(&self, engine: &MetadataEngine) {
        engine.deregister_dependency(&physical::class_level_id(), &request_class_id());
    }

    /// The request interface declaration governing `id`.
    fn governor(&self, id: &MetadataId) -> Option<TypeDetails> {
        let (module, ty) = physical::decode_qualified(id, REQUEST_METADATA_CLASS).ok()?;
        self.types
            .type_details_by_id(&physical::create_identifier(&module, &ty))
    }

    /// The entity a request declaration targets, via its request annotation.
    fn entity_from_request(&self, request: &TypeDetails) -> Option<TypeDetails> {
        let annotation = request.annotation_of_type(&remote_request())?;
        let target = type_attribute(annotation, "value")?;
        self.types.type_details(&target)
    }

    /// The companion proxy of a request: the proxy-annotated declaration
    /// pointing at the same entity.
    fn proxy_from_request(&self, request: &TypeDetails) -> Option<TypeDetails> {
        let entity = self.entity_from_request(request)?;
        self.types
            .types_with_annotation(&remote_proxy())
            .into_iter()
            .find(|candidate| {
                candidate
                    .annotation_of_type(&remote_proxy())
                    .and_then(|annotation| type_attribute(annotation, "value"))
                    .is_some_and(|target| target == entity.name)
            })
    }

    /// The declaration the request's service binding currently points at,
    /// falling back to the entity itself when unresolved.
    fn service_from_request(
        &self,
        request: &TypeDetails,
        entity: &TypeDetails,
    ) -> Option<TypeDetails> {
        request
            .first_annotation(&service_binding_annotations())
            .and_then(|binding| type_attribute(binding, "value"))
            .and_then(|target| self.types.type_details(&target))
            .or_else(|| Some(entity.clone()))
    }

    /// One mirrored member: translated parameter types, return type wrapped
    /// in the receiver appropriate for instance vs. static dispatch.
    fn request_method(
        &self,
        request: &TypeDetails,
        entity: &TypeDetails,
        proxy: Option<&TypeDetails>,
        service: Option<&TypeDetails>,
        method: &MethodMetadata,
        translated_return: JavaType,
    ) -> Option<MethodMetadata> {
        let proxy = proxy?;
        let service = service?;

        // The proxy must itself map back to a resolvable entity.
        let proxy_target = proxy
            .annotation_of_type(&remote_proxy())
            .and_then(|annotation| type_attribute(annotation, "value"))?;
        self.types.type_details(&proxy_target)?;

        let return_type = if entity.name == service.name && !method.is_static {
            JavaType::parameterized(
                instance_receiver().fully_qualified_name(),
                vec![proxy.name.clone(), translated_return],
            )
        } else {
            JavaType::parameterized(receiver().fully_qualified_name(), vec![translated_return])
        };

        let mut parameter_types = Vec::with_capacity(method.parameter_types.len());
        for parameter in &method.parameter_types {
            parameter_types.push(self.translator.translate(parameter, &entity.name)?);
        }

        Some(MethodMetadata::abstract_declaration(
            request.declared_by.clone(),
            method.name.clone(),
            return_type,
            parameter_types,
            method.parameter_names.clone(),
        ))
    }

    /// Assembles and persists the derived declaration, returning the written
    /// artifact's identifier.
    fn update_request(
        &self,
        request: &TypeDetails,
        entity: &TypeDetails,
        methods: Vec<MethodMetadata>,
        project: &ProjectMetadata,
    ) -> String {
        let mut builder = request.to_builder();

        if !builder.extends_types().contains(&legacy_request_context())
            && !builder.extends_types().contains(&request_context())
        {
            builder.add_extends(request_context());
        }

        if let Some(binding) = request.first_annotation(&service_binding_annotations()) {
            let mut binding = binding.clone();
            binding.set_attribute(
                "value",
                AnnotationValue::Str(entity.name.fully_qualified_name().to_string()),
            );
            binding.remove_attribute("locator");

            for service in self.types.types_with_annotation(&service_facade()) {
                let Some(facade) = service.annotation_of_type(&service_facade()) else {
                    continue;
                };
                for domain_type in facade.class_list_attribute("domainTypes") {
                    if domain_type != entity.name {
                        continue;
                    }
                    binding.set_attribute(
                        "value",
                        AnnotationValue::Str(service.name.fully_qualified_name().to_string()),
                    );
                    if let Some(package) = project.top_level_package() {
                        binding.set_attribute(
                            "locator",
                            AnnotationValue::Str(format!("{package}.server.locator.ServiceLocator")),
                        );
                    }
                }
            }
            builder.replace_annotation(binding);
        }

        builder.set_declared_methods(methods);
        self.writer.write(&builder.build(), GENERATED_WARNING)
    }

    /// The request metadata identifier for a request declaration, derived
    /// from its physical identifier's module.
    fn request_identifier_for(&self, request: &TypeDetails) -> Option<MetadataId> {
        let module = physical::module_of(&request.declared_by).ok()?;
        Some(request_id(&module, &request.name))
    }
}

impl MetadataProvider for RequestMetadataProvider {
    fn provides_class(&self) -> &str {
        REQUEST_METADATA_CLASS
    }

    fn get(
        &self,
        engine: &MetadataEngine,
        id: &MetadataId,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        if !is_request_id(id) {
            return Err(MetadataError::ProtocolViolation {
                id: id.clone(),
                message: "unexpected metadata request for the request metadata provider"
                    .to_string(),
            });
        }

        let (module, _) = physical::decode_qualified(id, REQUEST_METADATA_CLASS)?;
        let Some(project_item) = engine.get(&project_id(&module))? else {
            return Ok(None);
        };
        let Some(project) = downcast_item::<ProjectMetadata>(&project_item) else {
            return Ok(None);
        };

        let Some(request) = self.governor(id) else {
            return Ok(None);
        };
        let Some(request_annotation) = request.annotation_of_type(&remote_request()) else {
            return Ok(None);
        };
        let Some(target_name) = type_attribute(request_annotation, "value") else {
            return Ok(None);
        };
        let Some(entity) = self.types.type_details(&target_name) else {
            return Ok(None);
        };
        if entity.is_abstract {
            return Ok(None);
        }

        // Re-declare this node's upstream edges from scratch: only the links
        // discovered by the current computation survive.
        engine.deregister_dependencies(id);
        engine.register_dependency(&request.declared_by, id)?;
        engine.register_dependency(&entity.declared_by, id)?;

        let proxy = self.proxy_from_request(&request);
        let service = self.service_from_request(&request, &entity);
        let exclusions = method_exclusions(&request, proxy.as_ref());

        let mut methods = Vec::new();
        for method in &entity.declared_methods {
            if !method.is_public || exclusions.contains(method.name.as_str()) {
                continue;
            }
            let Some(translated_return) = self.translator.translate(&method.return_type, &entity.name)
            else {
                continue;
            };
            let Some(mirrored) = self.request_method(
                &request,
                &entity,
                proxy.as_ref(),
                service.as_ref(),
                method,
                translated_return,
            ) else {
                continue;
            };
            methods.push(mirrored);
        }

        let artifact = self.update_request(&request, &entity, methods, project);
        tracing::debug!(%id, artifact = %artifact, "request interface written");

        let item = Arc::new(RequestMetadata::new(id.clone(), artifact));
        self.notifier.notify_if_changed(engine, item.as_ref())?;
        Ok(Some(item))
    }

    fn notify(
        &self,
        engine: &MetadataEngine,
        upstream: &MetadataId,
        downstream: &MetadataId,
    ) -> Result<(), MetadataError> {
        let mut target = downstream.clone();

        if target.is_class_level() {
            if upstream.metadata_class() != physical::TYPE_METADATA_CLASS {
                return Err(MetadataError::ProtocolViolation {
                    id: upstream.clone(),
                    message: format!(
                        "class-level notifications are only expected from `{}` identifiers",
                        physical::TYPE_METADATA_CLASS
                    ),
                });
            }
            let Some(changed) = self.types.type_details_by_id(upstream) else {
                return Ok(());
            };

            let mut resolved: Option<MetadataId> = None;

            // A changed service layer retargets to the request of any entity
            // it fronts.
            if !changed.layer_entities.is_empty() {
                for request in self.types.types_with_annotation(&remote_request()) {
                    let Some(entity) = self.entity_from_request(&request) else {
                        continue;
                    };
                    if changed.layer_entities.contains(&entity.name) {
                        resolved = self.request_identifier_for(&request);
                        break;
                    }
                }
            }

            if resolved.is_none() {
                if changed.annotation_of_type(&remote_request()).is_none() {
                    // The changed type may be the one a request's service
                    // binding points at.
                    for candidate in self.types.types_with_annotation(&remote_request()) {
                        let Some(binding) = candidate.first_annotation(&service_binding_annotations())
                        else {
                            continue;
                        };
                        let Some(bound) = type_attribute(binding, "value") else {
                            continue;
                        };
                        if bound.fully_qualified_name() == changed.name.fully_qualified_name() {
                            resolved = self.request_identifier_for(&candidate);
                            if resolved.is_some() {
                                break;
                            }
                        }
                    }
                    if resolved.is_none() {
                        // Nothing downstream cares about this type.
                        return Ok(());
                    }
                } else {
                    // The changed type is itself a request interface.
                    let module = physical::module_of(upstream)?;
                    let ty = physical::type_of(upstream)?;
                    resolved = Some(request_id(&module, &ty));
                }
            }

            let Some(resolved) = resolved else {
                return Ok(());
            };
            target = resolved;

            // A directly registered edge will deliver this change on its own;
            // triggering here as well would recompute the node twice.
            if engine.downstream_of(upstream).contains(&target) {
                tracing::trace!(%upstream, downstream = %target, "edge already registered; skipping");
                return Ok(());
            }
        }

        if target.metadata_class() != REQUEST_METADATA_CLASS {
            return Err(MetadataError::ProtocolViolation {
                id: target,
                message: "unexpected downstream notification for the request metadata provider"
                    .to_string(),
            });
        }

        engine.get_with(&target, true)?;
        Ok(())
    }
}

/// Reads an annotation attribute holding a type, accepting both class
/// literals and string names.
fn type_attribute(annotation: &AnnotationMetadata, name: &str) -> Option<JavaType> {
    match annotation.attribute(name)? {
        AnnotationValue::Class(ty) => Some(ty.clone()),
        AnnotationValue::Str(fqn) if !fqn.is_empty() => Some(JavaType::new(fqn.clone())),
        _ => None,
    }
}
