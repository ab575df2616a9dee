//! Raywalk - a first-person controller over static geometry using raycast probes

pub mod core;
pub mod math;
pub mod world;
pub mod controller;
