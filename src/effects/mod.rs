//! Per-effect pixel transforms.
//!
//! Every effect mutates a [`PixelBuffer`](crate::foundation::core::PixelBuffer) in place and
//! tolerates any non-empty size. Channel writes saturate into `[0, 255]` with ties rounded to
//! even. Effects that read pre-mutation values take one function-local snapshot; the rest read
//! the live buffer, so later pixels may observe earlier writes.

pub mod blocks;
pub mod channel;
pub mod grade;
pub mod noise;
pub mod scanlines;
pub mod spatial;

pub use blocks::{DATAMOSH_BLOCK, datamosh, glitch_blocks, pixelate};
pub use channel::{chromatic_aberration, color_shift, rgb_split};
pub use grade::{ColorGrade, color_grade};
pub use noise::noise;
pub use scanlines::scanlines;
pub use spatial::{displacement, vhs_distortion};
