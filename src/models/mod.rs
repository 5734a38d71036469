//! Reference configuration-space models

pub mod box_world;
pub mod planar_arm;

pub use box_world::*;
pub use planar_arm::*;
