//! Core data types shared across the debate engine.

pub mod message;

pub use message::TurnMessage;
