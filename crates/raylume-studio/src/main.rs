mod studio;

use anyhow::Result;

use raylume_engine::device::GpuInit;
use raylume_engine::logging::{init_logging, LoggingConfig};
use raylume_engine::render::TracerConfig;
use raylume_engine::scene::Scene;
use raylume_engine::window::{Runtime, RuntimeConfig};

use studio::Studio;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = TracerConfig::from_env();
    if let Some(dir) = &config.shader_dir {
        log::info!("tracer source: {}", dir.display());
    }

    log::info!("controls: WASD move, Space/Shift rise/sink, right-drag look");
    log::info!("          F5 recompile tracer, R reload scene, F1 overlay, Esc quit");

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        Studio::new(config, Scene::demo()),
    )
}
