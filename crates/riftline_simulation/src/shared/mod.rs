//! Shared domain: cross-cutting helpers
//!
//! - ground: планарная геометрия (XZ ground plane, yaw углы)

pub mod ground;

pub use ground::*;
