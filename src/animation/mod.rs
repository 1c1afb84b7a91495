//! Smooth transitions between successive vote tallies.

pub mod driver;
pub mod easing;
pub mod interpolator;

pub use driver::AnimationDriver;
pub use interpolator::{DisplayedOption, DisplayedStats, FrameState, Interpolator};
