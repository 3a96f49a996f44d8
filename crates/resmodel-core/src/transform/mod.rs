pub mod category_resolver;
pub mod extractor;
pub mod heuristics;
pub mod importer;
pub mod lookup;
pub mod models;
pub mod name_normalizer;
pub mod operation_namer;
pub mod path_parser;
pub mod registry;
pub mod segment_classifier;
pub mod services;

pub use category_resolver::{CategorySweep, resolve_categories};
pub use extractor::{ExtractContext, extract_resources, parse_status};
pub use heuristics::{EnglishInflector, Heuristics, Inflector, VerbSet};
pub use importer::{ImportOptions, import_service, import_spec, resolve_scope};
pub use lookup::{IdFieldMapping, map_id_segments, read_model_mappings};
pub use models::Models;
pub use registry::{IdMatch, ResourceIds, build_resource_ids};
pub use services::{ServiceIndex, ServiceScope, discover_services, select_services};
