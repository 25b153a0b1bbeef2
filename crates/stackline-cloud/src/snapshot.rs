//! Rebuilding snapshots from service records.

use stackline_core::apitype::ApiResource;
use stackline_core::resource::{PropertyMap, ResourceState};
use stackline_core::{Manifest, Snapshot};

/// Build a snapshot from a stack's resource records, preserving their order.
///
/// The service does not report dependency edges yet, so every rebuilt
/// resource has an empty dependency list, even when the record carries one.
/// The manifest is the empty default for the same reason.
pub fn build_snapshot(records: Vec<ApiResource>) -> Snapshot {
    let resources = records.into_iter().map(resource_state).collect();
    Snapshot::new(Manifest::default(), resources)
}

fn resource_state(record: ApiResource) -> ResourceState {
    ResourceState {
        type_: record.type_,
        urn: record.urn,
        custom: record.custom,
        delete: false,
        id: record.id,
        inputs: PropertyMap::from_json(record.inputs),
        outputs: PropertyMap::from_json(record.outputs),
        parent: record.parent,
        protect: record.protect,
        dependencies: Vec::new(),
    }
}
