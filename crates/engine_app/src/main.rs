//! # engine_app
//!
//! Runs the component registry inside a fixed-timestep frame loop.
//!
//! ## Startup Sequence
//!
//! 1. Read the frame configuration (`ENGINE_TICK_RATE`, `ENGINE_MAX_FRAMES`).
//! 2. Register every known component type and start the registry.
//! 3. Spawn a handful of demo components.
//! 4. Run the frame loop, then shut the registry down.

mod config;
mod frame;

use anyhow::Result;
use components::{Health, Name, Position, Velocity};
use engine_component::ComponentId;
use engine_system::{Registry, RegistryConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::FrameConfig;
use frame::FrameLoop;

fn spawn_demo(registry: &mut Registry) -> Result<Vec<ComponentId>> {
    let ids = vec![
        registry.add(Name::new("Player"))?,
        registry.add(Position::new(0.0, 1.0, 0.0))?,
        registry.add(Velocity::new(1.0, 0.0, 0.0).with_damping(0.1))?,
        registry.add(Health::full(100.0).with_regen(5.0))?,
        registry.add(Velocity::new(0.0, 0.0, -3.0))?,
    ];

    // Parked until something turns it back on.
    registry.set_enabled(ids[4], false)?;
    Ok(ids)
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    info!("engine host starting");

    let config = FrameConfig::from_env()?;
    let mut registry = Registry::builder()
        .with_config(RegistryConfig::new().with_tick_rate(config.tick_rate))
        .include(components::register)
        .start()?;

    let ids = spawn_demo(&mut registry)?;
    info!(components = ids.len(), "spawned demo components");

    let mut frame_loop = FrameLoop::new(config, registry);
    frame_loop.run();

    for id in ids {
        let record = frame_loop.registry().snapshot(id)?;
        info!(%id, enabled = record.enabled, bytes = record.data.len(), "final state");
    }

    frame_loop.shutdown();
    info!("engine host shut down");
    Ok(())
}
