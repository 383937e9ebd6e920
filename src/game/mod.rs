// Game modules: characters and the stage that composes them

pub mod characters;
pub mod stage;
