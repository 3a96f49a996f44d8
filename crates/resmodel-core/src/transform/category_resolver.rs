use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::{IrResource, ResourceId};

/// How many backfill sweeps the category pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySweep {
    /// One sweep; a resource only inherits from ancestors categorized before
    /// the pass started.
    Single,
    /// Sweep until nothing changes, so grandparent categories propagate
    /// down a chain of uncategorized resources.
    #[default]
    FixedPoint,
}

/// Backfill empty categories from ancestor resources.
///
/// For each uncategorized resource and each of its paths, the path is cut
/// back to the nearest Label before its terminal segment; the first other
/// categorized resource (in name order) owning a path with that signature
/// donates its category. Within a sweep every resource reads the categories
/// as they were when the sweep began, so the outcome does not depend on
/// resource order.
///
/// Returns the number of resources that gained a category.
pub fn resolve_categories(resources: &mut BTreeMap<String, IrResource>, sweep: CategorySweep) -> usize {
    let mut assigned = 0;
    loop {
        let updates = sweep_once(resources);
        if updates.is_empty() {
            break;
        }
        assigned += updates.len();
        for (name, category) in updates {
            log::debug!("resource {name:?} inherits category {category:?}");
            if let Some(resource) = resources.get_mut(&name) {
                resource.category = category;
            }
        }
        if sweep == CategorySweep::Single {
            break;
        }
    }
    assigned
}

fn sweep_once(resources: &BTreeMap<String, IrResource>) -> Vec<(String, String)> {
    let mut updates = Vec::new();
    for resource in resources.values().filter(|r| !r.has_category()) {
        let inherited = resource
            .paths
            .iter()
            .filter_map(ResourceId::parent_label_path)
            .find_map(|signature| donor_category(resources, &resource.name, &signature));
        if let Some(category) = inherited {
            updates.push((resource.name.clone(), category.to_string()));
        }
    }
    updates
}

fn donor_category<'r>(
    resources: &'r BTreeMap<String, IrResource>,
    exclude: &str,
    signature: &ResourceId,
) -> Option<&'r str> {
    resources
        .values()
        .filter(|r| r.name != exclude && r.has_category())
        .find(|r| r.paths.iter().any(|p| same_signature(p, signature)))
        .map(|r| r.category.as_str())
}

/// Segment-wise equality with placeholder names ignored.
fn same_signature(a: &ResourceId, b: &ResourceId) -> bool {
    a.len() == b.len()
        && a
            .segments
            .iter()
            .zip(&b.segments)
            .all(|(x, y)| x.is_compatible(y))
}
