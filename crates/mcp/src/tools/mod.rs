pub mod studies;
mod registry;

pub use registry::{
    json_schema_integer, json_schema_object, json_schema_string, with_default, Tool, ToolRegistry,
};
pub use studies::{GetStudyTool, ListStudiesTool, SpecificFieldsInStudyTool};

use ctgov_core::CtGovClient;
use std::sync::Arc;

/// Registry with every registry query tool, sharing one client.
pub fn default_registry(client: Arc<CtGovClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ListStudiesTool::new(client.clone())));
    registry.register(Arc::new(GetStudyTool::new(client.clone())));
    registry.register(Arc::new(SpecificFieldsInStudyTool::new(client)));
    registry
}
