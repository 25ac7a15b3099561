pub mod central_panel;
pub mod tools_panel;

pub use central_panel::CanvasSurface;
pub use tools_panel::{ToolPanel, ToolTab};
