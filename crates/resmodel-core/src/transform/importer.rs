use std::collections::BTreeMap;

use crate::config::ImporterConfig;
use crate::ir::ResourceModel;
use crate::parse::spec::OpenApiSpec;

use super::category_resolver::{CategorySweep, resolve_categories};
use super::extractor::{ExtractContext, extract_resources};
use super::heuristics::Heuristics;
use super::models::Models;
use super::registry::build_resource_ids;
use super::services::{ServiceIndex, discover_services, select_services};

/// Options controlling an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub heuristics: Heuristics,
    pub category_sweep: CategorySweep,
    /// Services to import; empty selects all of them.
    pub services: Vec<String>,
}

impl ImportOptions {
    pub fn from_config(config: &ImporterConfig) -> Self {
        Self {
            heuristics: Heuristics::from_config(&config.naming),
            category_sweep: config.categories.sweep,
            services: config.services.clone(),
        }
    }
}

/// Extract one scope against an already built registry, then backfill
/// categories. The registry is only read.
pub fn resolve_scope(ctx: &ExtractContext<'_>, sweep: CategorySweep) -> ResourceModel {
    let mut model = extract_resources(ctx);
    let backfilled = resolve_categories(&mut model.resources, sweep);
    log::info!(
        "resolved {} resources ({} operations) for service {:?}, {} categories backfilled",
        model.resources.len(),
        model.operation_count(),
        model.service,
        backfilled
    );
    model
}

/// Resolve the resource model of one service.
///
/// Models and the resource ID registry are built first; extraction only runs
/// once the registry is complete.
pub fn import_service(spec: &OpenApiSpec, service: &str, options: &ImportOptions) -> ResourceModel {
    let heuristics = &options.heuristics;
    let index = ServiceIndex::from_spec(spec);
    let scope = index.scope(service);

    let models = Models::from_spec(spec, heuristics);
    let ids = build_resource_ids(&scope, spec, heuristics);
    log::debug!(
        "service {service:?}: {} models, {} resource IDs",
        models.len(),
        ids.len()
    );

    let ctx = ExtractContext {
        scope,
        api_version: &spec.info.version,
        spec,
        ids: &ids,
        models: &models,
        heuristics,
    };
    resolve_scope(&ctx, options.category_sweep)
}

/// Resolve every selected service, keyed by service name.
pub fn import_spec(spec: &OpenApiSpec, options: &ImportOptions) -> BTreeMap<String, ResourceModel> {
    let index = ServiceIndex::from_spec(spec);
    let discovered = discover_services(spec, &index);
    let selected = select_services(discovered.keys(), &options.services);
    if selected.is_empty() {
        log::warn!("no services selected from {} discovered", discovered.len());
    }

    selected
        .into_iter()
        .map(|service| {
            log::info!("importing service {service:?} in API version {:?}", spec.info.version);
            let model = import_service(spec, &service, options);
            (service, model)
        })
        .collect()
}
