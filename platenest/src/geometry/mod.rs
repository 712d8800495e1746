/// Directed circular intervals on the 0-360° circle
mod angle_range;

/// Set of traits representing various geometric properties & operations
pub mod geo_traits;

/// Set of geometric primitives - atomic building blocks for the geometry module
pub mod primitives;

/// Fixed-point accuracy scaling and staircase (Manhattan) quantization
pub mod quantize;

/// Removal of near-collinear vertices within a tolerance
pub mod simplification;

#[doc(inline)]
pub use angle_range::AngleRange;
