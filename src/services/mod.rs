// Service module exports

pub mod agenda;
pub mod api;
pub mod grid;
pub mod render;
pub mod settings;
