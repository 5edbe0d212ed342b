//! # Module Forge Application (Binary)
//!
//! Main executable entry point.

fn main() -> anyhow::Result<()> {
    module_forge_app::main()
}
