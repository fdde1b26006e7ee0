// trackline_core/src/lib.rs

pub mod config;
pub mod drive;
pub mod error;
pub mod ground;
pub mod input;
pub mod orientation;
pub mod prelude;
pub mod state;
pub mod terrain;
pub mod types;
pub mod vehicle;
