//! Row-major depth map.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A per-pixel scalar depth field.
///
/// Values are stored row-major with the origin at the top-left, so the
/// sample for pixel `(x, y)` lives at index `y * width + x`. A map produced
/// by the depth heuristic holds normalized values in `[0, 1]`; the type
/// itself does not enforce that range.
///
/// Depth maps are derived data: they are recomputed for every pipeline run
/// and never persisted.
///
/// # Example
///
/// ```
/// use relief_types::DepthMap;
///
/// let mut depth = DepthMap::new(4, 3);
/// assert_eq!(depth.width(), 4);
/// assert_eq!(depth.height(), 3);
/// assert_eq!(depth.len(), 12);
///
/// depth.set(2, 1, 0.75);
/// assert_eq!(depth.value(2, 1), 0.75);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthMap {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl DepthMap {
    /// Create a zero-filled depth map with the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    /// Create a depth map from raw row-major samples.
    ///
    /// Returns `None` if the buffer length does not equal `width * height`.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_types::DepthMap;
    ///
    /// let depth = DepthMap::from_raw(2, 2, vec![0.0, 0.25, 0.5, 1.0]);
    /// assert!(depth.is_some());
    ///
    /// let mismatched = DepthMap::from_raw(2, 2, vec![0.0; 3]);
    /// assert!(mismatched.is_none());
    /// ```
    #[must_use]
    pub fn from_raw(width: u32, height: u32, values: Vec<f64>) -> Option<Self> {
        if values.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    /// Width in samples.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the map holds no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    #[must_use]
    pub fn value(&self, x: u32, y: u32) -> f64 {
        assert!(x < self.width && y < self.height, "sample out of bounds");
        self.values[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.values[(y as usize) * (self.width as usize) + (x as usize)])
        } else {
            None
        }
    }

    /// Set the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        assert!(x < self.width && y < self.height, "sample out of bounds");
        self.values[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// Minimum and maximum sample, or `None` for an empty map.
    ///
    /// Non-finite samples participate via IEEE comparison semantics, so a
    /// map holding NaN may report NaN bounds; the depth heuristic never
    /// produces such maps.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }

    /// Row-major view of all samples.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Mutable row-major view of all samples.
    ///
    /// The slice cannot change length, so `len == width * height` holds.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consume the map and return the row-major sample buffer.
    #[inline]
    #[must_use]
    pub fn into_raw(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled() {
        let depth = DepthMap::new(3, 2);
        assert_eq!(depth.len(), 6);
        assert!(depth.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn row_major_indexing() {
        let depth = DepthMap::from_raw(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(depth.value(0, 0), 0.0);
        assert_eq!(depth.value(2, 0), 2.0);
        assert_eq!(depth.value(0, 1), 3.0);
        assert_eq!(depth.value(2, 1), 5.0);
    }

    #[test]
    fn from_raw_rejects_mismatched_length() {
        assert!(DepthMap::from_raw(2, 2, vec![0.0; 5]).is_none());
        assert!(DepthMap::from_raw(2, 2, vec![0.0; 4]).is_some());
    }

    #[test]
    fn get_out_of_bounds() {
        let depth = DepthMap::new(2, 2);
        assert_eq!(depth.get(1, 1), Some(0.0));
        assert_eq!(depth.get(2, 1), None);
        assert_eq!(depth.get(1, 2), None);
    }

    #[test]
    fn min_max() {
        let depth = DepthMap::from_raw(2, 2, vec![0.5, -1.0, 3.0, 0.0]).unwrap();
        assert_eq!(depth.min_max(), Some((-1.0, 3.0)));
    }

    #[test]
    fn min_max_empty() {
        let depth = DepthMap::new(0, 0);
        assert!(depth.is_empty());
        assert_eq!(depth.min_max(), None);
    }

    #[test]
    fn set_then_value() {
        let mut depth = DepthMap::new(4, 4);
        depth.set(3, 2, 0.25);
        assert_eq!(depth.value(3, 2), 0.25);
        assert_eq!(depth.value(2, 3), 0.0);
    }
}
