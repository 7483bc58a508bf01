mod gate_factory;

pub use gate_factory::{DefaultGate, GateFactory};
