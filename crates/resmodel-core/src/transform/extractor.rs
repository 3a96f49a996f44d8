use indexmap::IndexMap;

use crate::error::{ResolveError, ResourceError};
use crate::ir::{
    HttpMethod, IrOperation, IrResource, IrResponse, OperationType, ResourceId, ResourceModel,
    SegmentType,
};
use crate::parse::media_type::{MediaType, is_json};
use crate::parse::operation::Operation;
use crate::parse::ref_resolve::RefLookup;
use crate::parse::body::ResponseOrRef;
use crate::parse::spec::OpenApiSpec;

use super::heuristics::Heuristics;
use super::models::Models;
use super::name_normalizer::{clean_model_name, clean_name};
use super::operation_namer::OperationNamer;
use super::path_parser::{find_resource_name, parse_path};
use super::registry::ResourceIds;
use super::services::ServiceScope;

const COLLECTION_PREFIX: &str = "collection of ";

/// Everything extraction reads for one (service, API version) scope.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub scope: ServiceScope<'a>,
    pub api_version: &'a str,
    pub spec: &'a OpenApiSpec,
    pub ids: &'a ResourceIds,
    pub models: &'a Models,
    pub heuristics: &'a Heuristics,
}

/// Group every tag-matching (path, operation) pair of the scope into named
/// resources.
///
/// Paths are visited in sorted order and methods in a fixed order, and the
/// per-resource merge rules do not depend on which path created a resource,
/// so the result is independent of the document's path order. Categories are
/// only those known from a single path; see
/// [`super::category_resolver::resolve_categories`] for the second pass.
pub fn extract_resources(ctx: &ExtractContext<'_>) -> ResourceModel {
    let mut model = ResourceModel::new(ctx.scope.service, ctx.api_version);
    let lookup = RefLookup::new(ctx.spec);
    let namer = OperationNamer::new(ctx.scope.service, ctx.heuristics);

    let mut paths: Vec<&String> = ctx.spec.paths.keys().collect();
    paths.sort();

    for path in paths {
        let item = &ctx.spec.paths[path.as_str()];
        let operations: Vec<(HttpMethod, &Operation)> = item
            .operations()
            .into_iter()
            .filter(|(_, op)| ctx.scope.matches(&op.tags))
            .collect();
        if operations.is_empty() {
            log::debug!("skipping {path}: no operation tagged for {:?}", ctx.scope.service);
            continue;
        }

        let tags = operations.iter().flat_map(|(_, op)| op.tags.iter().cloned());
        let parsed = parse_path(path, tags, ctx.heuristics);
        let Some(last_type) = parsed.last_segment_type() else {
            log::debug!("skipping {path}: empty path");
            continue;
        };
        if last_type.is_action() {
            log::debug!("skipping {path}: ends in a {last_type} segment");
            continue;
        }
        let Some(resource_name) = find_resource_name(&parsed, ctx.heuristics) else {
            log::debug!("skipping {path}: no resource name can be derived");
            continue;
        };

        let placement = place(ctx, path, &parsed, &resource_name, last_type);

        let resource = model
            .resources
            .entry(resource_name.clone())
            .or_insert_with(|| {
                log::info!(
                    "found new resource {:?} for service {:?} in API version {:?}",
                    resource_name,
                    ctx.scope.service,
                    ctx.api_version
                );
                IrResource::new(&resource_name, clean_name(ctx.scope.service), ctx.api_version)
            });
        merge_category(resource, &placement.category);
        merge_id(resource, placement.id);
        resource.paths.push(parsed);

        for (method, operation) in operations {
            let (op, errors) = build_operation(
                ctx,
                &lookup,
                &namer,
                &resource_name,
                last_type,
                method,
                operation,
                placement.uri_suffix.clone(),
            );
            for error in errors {
                let error = ResourceError::new(&resource_name, error).with_operation(&op.name);
                log::warn!("{error}");
                model.errors.push(error);
            }
            resource.operations.push(op);
        }
    }

    model
}

/// Where one path sits relative to the registry.
struct Placement {
    category: String,
    id: Option<ResourceId>,
    uri_suffix: Option<String>,
}

fn place(
    ctx: &ExtractContext<'_>,
    path: &str,
    parsed: &ResourceId,
    resource_name: &str,
    last_type: SegmentType,
) -> Placement {
    // Collections and items group under their own name.
    let mut category = match last_type {
        SegmentType::Label | SegmentType::UserValue => resource_name.to_string(),
        _ => String::new(),
    };

    let matched = ctx.ids.match_id_or_parent(parsed);
    let Some(id) = matched.id else {
        return Placement {
            category,
            id: None,
            uri_suffix: Some(path.to_string()),
        };
    };

    let remainder = matched.remainder.filter(|r| !r.is_empty());
    if let Some(remainder) = &remainder {
        // Only a single trailing segment clearly belongs to the parent; longer
        // remainders wait for the category pass.
        if category.is_empty() && remainder.len() == 1 {
            category = find_resource_name(id, ctx.heuristics).unwrap_or_default();
        }
    }

    Placement {
        category,
        id: Some(id.clone()),
        uri_suffix: remainder.map(|r| r.id()),
    }
}

/// A resource that groups under its own name keeps that; otherwise the first
/// non-empty category seen is adopted.
fn merge_category(resource: &mut IrResource, category: &str) {
    if category.is_empty() || resource.category == resource.name {
        return;
    }
    if category == resource.name || resource.category.is_empty() {
        resource.category = category.to_string();
    }
}

/// Keep the most specific ID over all paths; equal lengths prefer the smaller
/// canonical string.
fn merge_id(resource: &mut IrResource, candidate: Option<ResourceId>) {
    let Some(candidate) = candidate else {
        return;
    };
    let replace = match &resource.id {
        None => true,
        Some(current) => {
            candidate.len() > current.len()
                || (candidate.len() == current.len() && candidate.id() < current.id())
        }
    };
    if replace {
        resource.id = Some(candidate);
    }
}

#[allow(clippy::too_many_arguments)]
fn build_operation<'a>(
    ctx: &ExtractContext<'a>,
    lookup: &RefLookup<'a>,
    namer: &OperationNamer<'_>,
    resource_name: &str,
    last_type: SegmentType,
    method: HttpMethod,
    operation: &'a Operation,
    uri_suffix: Option<String>,
) -> (IrOperation, Vec<ResolveError>) {
    let mut errors = Vec::new();

    let responses: Vec<IrResponse> = operation
        .responses
        .iter()
        .map(|(status, response)| build_response(ctx, lookup, status, response, &mut errors))
        .collect();

    let mut operation_type = OperationType::from_method(method);
    if responses.iter().any(|r| r.collection && r.is_success()) {
        operation_type = OperationType::List;
    }

    let request_model = request_model(ctx, lookup, operation, &mut errors);
    let name = namer.name(operation_type, method, resource_name, Some(last_type));

    let op = IrOperation {
        name,
        operation_type,
        method,
        uri_suffix,
        request_model,
        responses,
        tags: operation.tags.clone(),
    };
    (op, errors)
}

fn build_response<'a>(
    ctx: &ExtractContext<'a>,
    lookup: &RefLookup<'a>,
    status: &str,
    response: &'a ResponseOrRef,
    errors: &mut Vec<ResolveError>,
) -> IrResponse {
    let mut out = IrResponse {
        status: parse_status(status),
        ..Default::default()
    };

    let resolved = match lookup.response(response) {
        Ok(r) => r,
        Err(e) => {
            errors.push(e);
            return out;
        }
    };
    let Some((content_type, media)) = pick_content(&resolved.content) else {
        return out;
    };
    out.content_type = Some(content_type.to_string());

    let Some(schema) = &media.schema else {
        return out;
    };
    let title = match lookup.schema_title(schema) {
        Ok(Some(t)) => t,
        Ok(None) => return out,
        Err(e) => {
            errors.push(e);
            return out;
        }
    };

    let mut element = title.as_str();
    if let Some(head) = element.get(..COLLECTION_PREFIX.len()) {
        if head.eq_ignore_ascii_case(COLLECTION_PREFIX) {
            element = &element[COLLECTION_PREFIX.len()..];
            out.collection = true;
        }
    }
    if element != "string" {
        let model_name = clean_model_name(element, ctx.heuristics);
        if ctx.models.found(&model_name) {
            out.model_name = Some(model_name);
        }
    }
    out
}

/// JSON content if there is any, else the first content type listed.
fn pick_content(content: &IndexMap<String, MediaType>) -> Option<(&str, &MediaType)> {
    content
        .iter()
        .find(|(ct, _)| is_json(ct))
        .or_else(|| content.first())
        .map(|(ct, media)| (ct.as_str(), media))
}

/// Model of the first JSON request body whose schema title is a known model.
fn request_model<'a>(
    ctx: &ExtractContext<'a>,
    lookup: &RefLookup<'a>,
    operation: &'a Operation,
    errors: &mut Vec<ResolveError>,
) -> Option<String> {
    let body = operation.request_body.as_ref()?;
    let body = match lookup.request_body(body) {
        Ok(b) => b,
        Err(e) => {
            errors.push(e);
            return None;
        }
    };

    for (content_type, media) in &body.content {
        if !is_json(content_type) {
            continue;
        }
        let Some(schema) = &media.schema else {
            continue;
        };
        match lookup.schema_title(schema) {
            Ok(Some(title)) => {
                let model_name = clean_model_name(&title, ctx.heuristics);
                if ctx.models.found(&model_name) {
                    return Some(model_name);
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    None
}

/// Numeric status of a response key. `X` wildcards are zero-filled
/// (`2XX` → 200); anything else unparsable, such as `default`, is 0.
pub fn parse_status(token: &str) -> u16 {
    token.trim().replace(['X', 'x'], "0").parse().unwrap_or(0)
}
