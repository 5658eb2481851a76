// Service module exports

pub mod draft;
pub mod grid;
pub mod navigation;
pub mod normalize;
pub mod replay;
pub mod settings;
pub mod shortcuts;
pub mod someday;
pub mod store;
