//! Google Maps 連携

pub mod bindings;
pub mod loader;
pub mod surface;

pub use loader::ensure_maps;
pub use surface::{compute_route, GoogleMapSurface, SurfaceEvent};
