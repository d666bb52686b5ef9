//! Coordinate conversion helpers for landmark providers.

use crate::{Error, Result};

/// Convert a normalised x coordinate to a pixel column.
///
/// Pose estimators usually report x in `[0, 1]` relative to the frame width.
/// The result is truncated to a whole pixel. With `mirror` set the frame is
/// treated as horizontally flipped, as for a selfie-view camera.
///
/// # Errors
///
/// Returns an error if `normalized` is not finite or `frame_width` is 0.
#[allow(clippy::cast_possible_truncation)]
pub fn normalized_to_pixel(normalized: f64, frame_width: u32, mirror: bool) -> Result<f64> {
    if !normalized.is_finite() {
        return Err(Error::InvalidInput(format!(
            "Normalized coordinate {normalized} is not finite"
        )));
    }
    if frame_width == 0 {
        return Err(Error::InvalidInput("Frame width must be greater than 0".to_string()));
    }

    let x = if mirror { 1.0 - normalized } else { normalized };
    Ok((x * f64::from(frame_width)).trunc())
}
