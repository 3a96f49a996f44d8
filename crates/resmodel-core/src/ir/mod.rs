pub mod operations;
pub mod resource_id;
pub mod segment;
pub mod types;

pub use operations::*;
pub use resource_id::ResourceId;
pub use segment::{Segment, SegmentType};
pub use types::{IrResource, ResourceModel};
