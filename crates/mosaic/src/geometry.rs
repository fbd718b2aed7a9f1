//! Geometry probing.
//!
//! The types here are the only place the engine reads raw measurement data:
//! the position assigned by the external packing step and the content size
//! an item currently reports. Everything else (row segmentation, height
//! equalization) goes through [`Measurable`] and the probe functions below.

/// A resolved position, in pixels, relative to the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub left: f32,
    pub top: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { left: 0.0, top: 0.0 };

    /// Create a new point.
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// A size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// A zero-size value.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Anything the layout passes can measure and resize.
///
/// The effective height of an item is its height override when one is set,
/// otherwise its natural content height. Clearing the override is how the
/// row segmenter gets back to an unconstrained measurement.
pub trait Measurable {
    /// Position assigned by the external packing step.
    fn position(&self) -> Point;

    /// Natural (unconstrained) content size.
    fn natural_size(&self) -> Size;

    /// The explicit height override, if any.
    fn height_override(&self) -> Option<f32>;

    /// Set or clear the explicit height override.
    fn set_height_override(&mut self, height: Option<f32>);
}

impl<T: Measurable + ?Sized> Measurable for &mut T {
    fn position(&self) -> Point {
        (**self).position()
    }

    fn natural_size(&self) -> Size {
        (**self).natural_size()
    }

    fn height_override(&self) -> Option<f32> {
        (**self).height_override()
    }

    fn set_height_override(&mut self, height: Option<f32>) {
        (**self).set_height_override(height);
    }
}

/// The item's left coordinate rounded to the nearest whole pixel.
///
/// Row segmentation compares these, so sub-pixel jitter from the packing
/// step never produces a spurious row break.
#[inline]
pub fn rounded_left<M: Measurable + ?Sized>(item: &M) -> i64 {
    item.position().left.round() as i64
}

/// The height the item currently reports: its override if set, otherwise
/// its natural content height.
#[inline]
pub fn content_height<M: Measurable + ?Sized>(item: &M) -> f32 {
    item.height_override()
        .unwrap_or_else(|| item.natural_size().height)
}
