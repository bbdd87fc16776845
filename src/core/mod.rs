//! Shared scene-space helpers

pub mod space;

pub use space::km_to_scene;
