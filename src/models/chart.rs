//! Chart decoding models

/// One value-axis marker: a pixel position paired with its labeled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub value: f64,
}

/// Pixel-to-value mapping derived from the rendered axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Data value represented by one pixel of bar height.
    pub factor: f64,
    /// Pixel y of the zero line, read from the category-axis transform.
    pub baseline: f64,
}

impl Calibration {
    /// Factor used when the axis offers fewer than two usable ticks or a
    /// degenerate layout.
    pub const DEFAULT_FACTOR: f64 = 0.5;
    /// Baseline used when the category-axis transform is unreadable.
    pub const DEFAULT_BASELINE: f64 = 290.0;
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT_FACTOR,
            baseline: Self::DEFAULT_BASELINE,
        }
    }
}

/// One decoded bar. Height is baseline minus the bar's rendered y offset,
/// in pixels; it stays signed here so anomalies remain observable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub height: f64,
}

/// One bar decoded from an accessibility label that already embeds both
/// the period and the count.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBar {
    pub label: String,
    pub value: i64,
}
