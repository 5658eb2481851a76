// Module exports for models

pub mod draft;
pub mod event;
pub mod grid;
pub mod settings;
pub mod someday;
pub mod week;
