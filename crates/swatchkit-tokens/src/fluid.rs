//! Fluid value interpolation between two viewport widths.
//!
//! Token bounds and viewport widths are authored in pixels and emitted in
//! `rem` (16px root). The preferred value is the straight line through
//! `(vp_min, val_min)` and `(vp_max, val_max)`, written as
//! `intercept + slope * 100vw`.

/// Pixels per `rem`.
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// Ratio used to derive a missing bound when neither the file nor the item sets one.
pub const DEFAULT_FLUID_RATIO: f64 = 1.125;

/// Decimal places kept when a missing bound is derived from a ratio.
const DERIVED_PRECISION: u32 = 2;

/// Decimal places kept for every number written into a `clamp()` expression.
const OUTPUT_PRECISION: u32 = 4;

/// Resolved lower and upper values of a fluid token, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidBounds {
    pub min: f64,
    pub max: f64,
}

/// The two reference viewport widths, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRange {
    pub min: f64,
    pub max: f64,
}

/// Errors raised by the interpolator.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FluidError {
    #[error("viewport min and max are both {0}px; fluid interpolation needs two distinct widths")]
    DegenerateViewports(f64),

    #[error("viewport range {min}..{max} is not a finite pair of numbers")]
    NonFiniteViewports { min: f64, max: f64 },

    #[error("fluid bounds {min}..{max} are not finite numbers")]
    NonFiniteBounds { min: f64, max: f64 },

    #[error("fluid ratio {0} must be a positive finite number")]
    InvalidRatio(f64),
}

impl FluidBounds {
    /// Resolve bounds from an item that may carry only one of `min`/`max`.
    ///
    /// The missing side is `max / ratio` or `min * ratio`, rounded to two
    /// decimals. Returns `Ok(None)` when neither bound is present. The ratio
    /// is only checked when a bound has to be derived from it.
    pub fn derive(
        min: Option<f64>,
        max: Option<f64>,
        ratio: f64,
    ) -> Result<Option<Self>, FluidError> {
        let checked = || {
            if ratio.is_finite() && ratio > 0.0 {
                Ok(ratio)
            } else {
                Err(FluidError::InvalidRatio(ratio))
            }
        };

        Ok(match (min, max) {
            (Some(min), Some(max)) => Some(Self { min, max }),
            (None, Some(max)) => Some(Self {
                min: round_to(max / checked()?, DERIVED_PRECISION),
                max,
            }),
            (Some(min), None) => Some(Self {
                min,
                max: round_to(min * checked()?, DERIVED_PRECISION),
            }),
            (None, None) => None,
        })
    }
}

/// Build the CSS expression for a fluid value.
///
/// Equal bounds collapse to a single `rem` value. Otherwise the result is
/// `clamp(lower, intercept + slope, upper)` where `lower`/`upper` are the
/// smaller/larger bound regardless of authoring order.
pub fn clamp(bounds: FluidBounds, viewports: ViewportRange) -> Result<String, FluidError> {
    check_viewports(viewports)?;
    if !bounds.min.is_finite() || !bounds.max.is_finite() {
        return Err(FluidError::NonFiniteBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }

    let min_size = bounds.min / ROOT_FONT_SIZE;
    let max_size = bounds.max / ROOT_FONT_SIZE;

    if min_size == max_size {
        return Ok(format!("{}rem", format_number(min_size)));
    }

    let min_vp = viewports.min / ROOT_FONT_SIZE;
    let max_vp = viewports.max / ROOT_FONT_SIZE;

    let slope = (max_size - min_size) / (max_vp - min_vp);
    let intercept = min_size - min_vp * slope;

    let lower = min_size.min(max_size);
    let upper = min_size.max(max_size);

    Ok(format!(
        "clamp({}rem, {}rem + {}vw, {}rem)",
        format_number(lower),
        format_number(intercept),
        format_number(slope * 100.0),
        format_number(upper),
    ))
}

/// Check that a viewport range can carry an interpolation at all.
pub fn check_viewports(viewports: ViewportRange) -> Result<(), FluidError> {
    if !viewports.min.is_finite() || !viewports.max.is_finite() {
        return Err(FluidError::NonFiniteViewports {
            min: viewports.min,
            max: viewports.max,
        });
    }
    if viewports.min == viewports.max {
        return Err(FluidError::DegenerateViewports(viewports.min));
    }
    Ok(())
}

/// Round to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a number for CSS output: four decimals at most, no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, OUTPUT_PRECISION);
    let text = format!("{:.*}", OUTPUT_PRECISION as usize, rounded);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORTS: ViewportRange = ViewportRange {
        min: 320.0,
        max: 1240.0,
    };

    #[test]
    fn interpolates_between_viewports() {
        let css = clamp(FluidBounds { min: 16.0, max: 20.0 }, VIEWPORTS).unwrap();
        assert_eq!(css, "clamp(1rem, 0.913rem + 0.4348vw, 1.25rem)");
    }

    #[test]
    fn orders_bounds_defensively() {
        let forward = clamp(FluidBounds { min: 16.0, max: 24.0 }, VIEWPORTS).unwrap();
        let reversed = clamp(FluidBounds { min: 24.0, max: 16.0 }, VIEWPORTS).unwrap();

        assert!(forward.starts_with("clamp(1rem,"));
        assert!(forward.ends_with(", 1.5rem)"));
        assert!(reversed.starts_with("clamp(1rem,"));
        assert!(reversed.ends_with(", 1.5rem)"));
    }

    #[test]
    fn equal_bounds_collapse_to_static_value() {
        let css = clamp(FluidBounds { min: 24.0, max: 24.0 }, VIEWPORTS).unwrap();
        assert_eq!(css, "1.5rem");
    }

    #[test]
    fn rejects_degenerate_viewports() {
        let err = clamp(
            FluidBounds { min: 16.0, max: 20.0 },
            ViewportRange {
                min: 800.0,
                max: 800.0,
            },
        )
        .unwrap_err();

        assert_eq!(err, FluidError::DegenerateViewports(800.0));
    }

    #[test]
    fn rejects_non_finite_input() {
        let nan_vp = ViewportRange {
            min: f64::NAN,
            max: 1240.0,
        };
        assert!(matches!(
            clamp(FluidBounds { min: 1.0, max: 2.0 }, nan_vp),
            Err(FluidError::NonFiniteViewports { .. })
        ));
        assert!(matches!(
            clamp(
                FluidBounds {
                    min: f64::INFINITY,
                    max: 2.0
                },
                VIEWPORTS
            ),
            Err(FluidError::NonFiniteBounds { .. })
        ));
    }

    #[test]
    fn derives_missing_min_from_ratio() {
        let bounds = FluidBounds::derive(None, Some(48.0), DEFAULT_FLUID_RATIO)
            .unwrap()
            .unwrap();
        assert_eq!(bounds.min, 42.67);
        assert_eq!(bounds.max, 48.0);
    }

    #[test]
    fn derives_missing_max_from_ratio() {
        let bounds = FluidBounds::derive(Some(16.0), None, 1.25).unwrap().unwrap();
        assert_eq!(bounds, FluidBounds { min: 16.0, max: 20.0 });
    }

    #[test]
    fn derive_needs_at_least_one_bound() {
        assert_eq!(FluidBounds::derive(None, None, DEFAULT_FLUID_RATIO), Ok(None));
    }

    #[test]
    fn derive_rejects_unusable_ratios() {
        assert_eq!(
            FluidBounds::derive(None, Some(16.0), 0.0),
            Err(FluidError::InvalidRatio(0.0))
        );
        assert_eq!(
            FluidBounds::derive(Some(16.0), None, -1.5),
            Err(FluidError::InvalidRatio(-1.5))
        );
        assert!(FluidBounds::derive(Some(16.0), None, f64::NAN).is_err());
        // Both bounds given: the ratio is never used.
        assert_eq!(
            FluidBounds::derive(Some(8.0), Some(12.0), 0.0),
            Ok(Some(FluidBounds { min: 8.0, max: 12.0 }))
        );
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.913043), "0.913");
        assert_eq!(format_number(2.666875), "2.6669");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(-0.5), "-0.5");
    }
}
