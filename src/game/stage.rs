// Stage: background, characters and on-screen controls on a scaled canvas

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;

use super::characters::{CharacterBundle, CharacterRoster, SpriteSheets, TickContext};
use crate::config::{CharacterEntry, StageConfig};
use crate::engine::assets::AssetLoader;
use crate::engine::input::{Action, InputSnapshot, TouchControls};
use crate::engine::renderer::{
    RenderLayer, Renderer, Sprite, SpriteBatch, TextureHandle, TextureManager,
};
use crate::engine::viewport::{CanvasRect, ViewportConfig};

/// Geometry for one rendered frame
pub struct StageFrame {
    /// Background and characters, positioned relative to the canvas
    pub stage: SpriteBatch,
    /// On-screen controls in window coordinates
    pub overlay: SpriteBatch,
    /// Canvas area in window pixels; `None` when the canvas is off-screen
    pub scissor: Option<(u32, u32, u32, u32)>,
}

impl StageFrame {
    /// Draw order: stage first, then the controls on top
    pub fn layers(&self) -> Vec<RenderLayer<'_>> {
        match self.scissor {
            Some(scissor) => vec![
                RenderLayer {
                    batch: &self.stage,
                    scissor: Some(scissor),
                },
                RenderLayer {
                    batch: &self.overlay,
                    scissor: Some(scissor),
                },
            ],
            None => Vec::new(),
        }
    }
}

pub struct Stage {
    viewport: ViewportConfig,
    window_size: (u32, u32),
    roster: CharacterRoster,
    controls: TouchControls,
    background: TextureHandle,
    white: TextureHandle,
    character_scale: f32,
}

impl Stage {
    /// Load every asset the stage needs and spawn the configured characters
    pub fn load(
        renderer: &mut Renderer,
        loader: &AssetLoader,
        config: &StageConfig,
        window_size: (u32, u32),
    ) -> Result<Self> {
        let viewport = ViewportConfig::new(config.aspect, window_size.0, window_size.1);
        info!(
            "Viewport {:?} at scale {}",
            viewport.logical_size(),
            viewport.scale()
        );

        let background_image = loader
            .load_image(&config.background)
            .with_context(|| format!("Failed to load background '{}'", config.background))?;
        let background = renderer.upload_image(&background_image, &config.background);
        let white = renderer.white_texture();

        let mut roster = CharacterRoster::new();
        for entry in &config.characters {
            let bundle = CharacterBundle::load(loader, &entry.name, config.locomotion)
                .with_context(|| format!("Failed to load character '{}'", entry.name))?;

            let sheets = SpriteSheets {
                idle: renderer.upload_image(&bundle.images.idle, &sheet_label(entry, "idle")),
                wind_up: bundle
                    .images
                    .wind_up
                    .as_ref()
                    .map(|img| renderer.upload_image(img, &sheet_label(entry, "move_state"))),
                moving: renderer.upload_image(&bundle.images.moving, &sheet_label(entry, "move")),
            };

            let position = spawn_position(
                &viewport,
                config,
                entry.spawn_x,
                bundle.data.idle.frame_height,
            );
            roster.spawn_character(
                &bundle.name,
                bundle.data,
                sheets,
                config.locomotion,
                position,
            );
        }

        let controls = TouchControls::layout(
            viewport.canvas_rect(window_size.0, window_size.1),
            viewport.scale(),
        );

        Ok(Self {
            viewport,
            window_size,
            roster,
            controls,
            background,
            white,
            character_scale: config.character_scale,
        })
    }

    /// Values every character needs for this tick
    pub fn tick_context(&self) -> TickContext {
        tick_context(&self.viewport, self.character_scale)
    }

    /// Apply pending switch presses, then advance every character one tick
    pub fn update(&mut self, input: InputSnapshot, switch_requests: u32) {
        for _ in 0..switch_requests {
            self.roster.switch_active();
        }
        let ctx = self.tick_context();
        self.roster.update(input, &ctx);
    }

    /// Recompute the scale for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        let current = rescale_on_resize(&mut self.viewport, &mut self.roster, width, height);
        self.window_size = (width, height);
        self.controls = TouchControls::layout(self.canvas_rect(), current);
    }

    /// Build the sprite batches for the current state
    pub fn compose(
        &self,
        textures: &TextureManager,
        is_pressed: impl Fn(Action) -> bool,
    ) -> StageFrame {
        let canvas = self.canvas_rect();
        let texture_size = |handle: TextureHandle| textures.size(handle);

        let mut stage = SpriteBatch::new(Vec2::new(canvas.x, canvas.y));
        stage.extend(
            std::iter::once(background_sprite(&self.viewport, self.background))
                .chain(self.roster.sprites(&self.tick_context())),
            texture_size,
        );

        let mut overlay = SpriteBatch::new(Vec2::ZERO);
        overlay.extend(self.controls.sprites(self.white, is_pressed), texture_size);

        StageFrame {
            stage,
            overlay,
            scissor: canvas.scissor(self.window_size.0, self.window_size.1),
        }
    }

    fn canvas_rect(&self) -> CanvasRect {
        self.viewport
            .canvas_rect(self.window_size.0, self.window_size.1)
    }

    pub fn controls(&self) -> &TouchControls {
        &self.controls
    }

    pub fn roster(&self) -> &CharacterRoster {
        &self.roster
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }
}

fn sheet_label(entry: &CharacterEntry, sheet: &str) -> String {
    format!("{}/{}", entry.name, sheet)
}

fn tick_context(viewport: &ViewportConfig, character_scale: f32) -> TickContext {
    TickContext {
        scale: viewport.scale() as f32,
        character_scale,
        surface_width: viewport.canvas_size().0 as f32,
    }
}

/// Resize the viewport and keep every character at the same logical
/// placement by multiplying positions by `new / old` scale. Returns the new
/// scale.
fn rescale_on_resize(
    viewport: &mut ViewportConfig,
    roster: &mut CharacterRoster,
    width: u32,
    height: u32,
) -> u32 {
    let previous = viewport.resize(width, height);
    let current = viewport.scale();
    if previous != current {
        roster.rescale(current as f32 / previous as f32);
        info!("Stage scale changed {} -> {}", previous, current);
    }
    current
}

/// Background source region `(0, 0, logical size)` stretched over the canvas
fn background_sprite(viewport: &ViewportConfig, texture: TextureHandle) -> Sprite {
    let (lw, lh) = viewport.logical_size();
    let (cw, ch) = viewport.canvas_size();
    Sprite::new(Vec2::ZERO, Vec2::new(cw as f32, ch as f32), texture).with_source(0, 0, lw, lh)
}

/// Initial top-left of a character: feet `y_offset` logical pixels above the
/// canvas bottom
fn spawn_position(
    viewport: &ViewportConfig,
    config: &StageConfig,
    spawn_x: f32,
    frame_height: u32,
) -> Vec2 {
    let scale = viewport.scale() as f32;
    let canvas_height = viewport.logical_size().1 as f32 * scale;
    let sprite_height = frame_height as f32 * scale * config.character_scale;

    Vec2::new(
        spawn_x * scale,
        canvas_height - sprite_height - config.y_offset * scale,
    )
}
