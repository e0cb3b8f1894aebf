//! Owned image buffers and alignment helpers.
//!
//! All buffers are dense, row-major, origin top-left:
//!
//! - [`GrayImageU8`]: single-channel 8-bit, used for masks and luma planes.
//! - [`RgbImageU8`]: interleaved 3-channel 8-bit.
//! - [`ImageF32`]: single-channel float plane for gradient work.
//!
//! Fusion steps require all participants on a common pixel grid; the
//! [`resize`] helper performs that alignment with center-aligned bilinear
//! interpolation. The binary mask output is never resampled; its grid is
//! set by the prior.

pub mod f32;
pub mod io;
pub mod resize;
pub mod rgb;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::resize::resize_bilinear_rgb;
pub use self::rgb::RgbImageU8;
pub use self::u8::GrayImageU8;
