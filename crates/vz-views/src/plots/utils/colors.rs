//! Color utilities for plots

use plotters::style::RGBColor;

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> RGBColor {
    const PALETTE: &[RGBColor] = &[
        RGBColor(70, 130, 180),  // Steel blue
        RGBColor(250, 150, 100), // Orange
        RGBColor(90, 180, 90),   // Green
        RGBColor(220, 90, 140),  // Pink
        RGBColor(150, 100, 250), // Purple
        RGBColor(200, 180, 60),  // Mustard
        RGBColor(60, 170, 190),  // Teal
        RGBColor(210, 80, 80),   // Red
    ];
    PALETTE[index % PALETTE.len()]
}

/// Fill used for histogram bars
pub const HISTOGRAM_FILL: RGBColor = RGBColor(0, 128, 128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(categorical_color(0), categorical_color(8));
        assert_ne!(categorical_color(0), categorical_color(1));
    }
}
