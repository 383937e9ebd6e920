// Engine modules: renderer, input, assets, viewport

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod viewport;
