//! CLI command handling

mod config;
mod logging;
pub mod output;
mod project;
mod related;
mod storage;
mod version;

pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use project::{ProjectArgs, handle_project, render_project_card};
pub use related::{RelatedArgs, Snapshot, collect_snapshot, handle_related, render_related};
pub use storage::{PvcArgs, PvcsArgs, handle_pvc, handle_pvcs, render_pvc_details};
pub use version::display_version;
