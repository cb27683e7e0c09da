use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let native_options = eframe::NativeOptions::default();
    let _ = eframe::run_native(
        "Block Studio",
        native_options,
        Box::new(|_cc| Box::new(blockstudio_ui::ui::create_app())),
    );
    Ok(())
}
