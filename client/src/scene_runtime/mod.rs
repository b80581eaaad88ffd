pub mod components;
pub mod pipeline;
pub mod registration;
pub mod state;
pub mod systems;
