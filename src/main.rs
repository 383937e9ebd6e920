use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use log::{error, info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod config;
mod core;
mod engine;
mod game;

use config::StageConfig;
use engine::assets::AssetLoader;
use engine::game_loop::FrameClock;
use engine::input::InputManager;
use engine::renderer::Renderer;
use game::stage::Stage;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Sprite Stage...");

    let loader = AssetLoader::new(config::asset_root());
    info!("Asset root: {:?}", loader.base_path());
    let stage_config = StageConfig::load(&loader)?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sprite Stage")
            .with_inner_size(winit::dpi::LogicalSize::new(640, 480))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))
        .context("Failed to initialize renderer")?;
    let size = window.inner_size();
    let mut stage = Stage::load(
        &mut renderer,
        &loader,
        &stage_config,
        (size.width, size.height),
    )?;
    info!(
        "Stage ready with {} characters at scale {}",
        stage.roster().count(),
        stage.viewport().scale()
    );
    if let Some(active) = stage.roster().active() {
        info!("Active character: {}", active.name);
    }

    let mut input = InputManager::new();
    let mut clock = FrameClock::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!(
                        "Close requested after {} frames ({:.1} FPS), shutting down...",
                        clock.ticks(),
                        clock.fps()
                    );
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);
                }
                WindowEvent::Touch(touch) => {
                    let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                    input.process_touch(touch.id, touch.phase, location, stage.controls());
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.process_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.process_mouse_button(state, button, stage.controls());
                }
                WindowEvent::Focused(false) => {
                    input.reset_all();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    renderer.resize(physical_size);
                    stage.resize(physical_size.width, physical_size.height);
                }
                WindowEvent::RedrawRequested => {
                    clock.begin_frame();
                    stage.update(input.snapshot(), input.take_switch_requests());
                    let frame = stage.compose(renderer.texture_manager(), |action| {
                        input.is_pressed(action)
                    });

                    match renderer.render(&frame.layers()) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            warn!("Surface lost, reconfiguring");
                            renderer.resize(renderer.size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("GPU out of memory, exiting");
                            elwt.exit();
                        }
                        Err(e) => warn!("Dropped frame: {:?}", e),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
