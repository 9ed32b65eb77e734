//! Presentation helpers shared by the CLI output paths

pub mod project;
pub mod pvc;
pub mod quantity;
pub mod routes;
pub mod table;
pub mod triggers;

pub use project::{ProjectDetails, project_details};
pub use pvc::{
    CapacityDonut, PvcDetails, PvcMetrics, PvcRow, PvcStatusOverride, capacity_donut, pvc_details,
    pvc_row, pvc_status,
};
pub use quantity::{QuantityError, convert_to_base_value, humanize_binary_bytes};
pub use routes::{Breadcrumb, OperandRoute, breadcrumb_trail, create_path};
pub use table::{TableOptions, format_age, render_pvc_table, render_related_table};
pub use triggers::{
    event_listener_template_names, event_listeners_for_template, trigger_template_pipeline_name,
};
