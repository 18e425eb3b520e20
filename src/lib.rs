// Salon Agenda Library
// Agenda grid model, query state and scheduling API client

pub mod models;
pub mod services;
pub mod utils;
