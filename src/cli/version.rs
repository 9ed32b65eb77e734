//! Version command handler

/// Version banner printed by `operand-view version`
pub fn version_text() -> String {
    format!(
        "operand-view {}\n  {}\n  License: {}\n",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_LICENSE"),
    )
}

pub fn display_version() {
    print!("{}", version_text());
}
