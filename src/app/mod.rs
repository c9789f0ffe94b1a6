// Application layer: assembles the front desk from configuration.

pub mod wiring;

pub use wiring::build_front_desk;
