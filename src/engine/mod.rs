// Engine module - simulation, animation and rendering for the aquarium

pub mod animation;
pub mod aquarium;
pub mod camera;
pub mod components;
pub mod config;
pub mod debug_overlay;
pub mod error;
pub mod input;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod skin;
pub mod subdivide;
pub mod systems;
pub mod transform;

// Re-export commonly used items
pub use aquarium::{Aquarium, FrameSignals};
pub use camera::TankCamera;
pub use components::*;
pub use config::AquariumConfig;
pub use debug_overlay::{DebugStats, FrameTimer};
pub use input::InputState;
pub use renderer::Renderer;
pub use scene::DrawList;
