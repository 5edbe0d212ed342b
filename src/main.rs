// Main entry point that forwards to the module-forge-app binary
fn main() {
    // Exit with the same code as the app
    std::process::exit(match module_forge_app::main() {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            1
        }
    });
}
