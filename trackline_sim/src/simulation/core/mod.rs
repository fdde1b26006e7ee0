// trackline_sim/src/simulation/core/mod.rs

pub mod app_state;
pub mod error;
pub mod prng;
pub mod simulation_setup;
pub mod transforms;
