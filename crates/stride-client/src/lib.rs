pub mod assets;
pub mod bindings;
pub mod cli;
pub mod engine;
pub mod harness;
pub mod scene;
pub mod world;

pub use engine::Engine;
pub use harness::{Harness, InputScript};
