//! Terrain walker application: a camera walking a procedural world under a
//! day/night cycle and weather, composited into RGBA frames.

pub mod clock;
pub mod frame;
pub mod platform;
pub mod presentation;
pub mod session;
pub mod walker;
pub mod weather;
