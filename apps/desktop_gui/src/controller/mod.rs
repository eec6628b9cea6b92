//! Controller layer: backend events and command dispatch for the GUI.

pub mod events;
pub mod orchestration;
