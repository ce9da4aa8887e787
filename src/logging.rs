use anyhow::Result;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Initialize terminal logging at `level`, with HTTP and GUI internals
/// filtered out.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("winit")
        .add_filter_ignore_str("eframe")
        .add_filter_ignore_str("egui_glow")
        .build();

    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
