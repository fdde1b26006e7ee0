// trackline_sim/src/simulation/plugins/mod.rs

pub mod script;
pub mod telemetry;
pub mod track;
pub mod vehicle;
