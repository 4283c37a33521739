//! Mean red, green, and blue intensity over an image.

use serde::Serialize;

use crate::error::ClassifyError;
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelMeans {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Average of each colour channel, 0–255.
///
/// Accepts any raster with at least three channels; samples beyond the
/// third (alpha) are ignored.
pub fn channel_means(raster: &Raster) -> Result<ChannelMeans, ClassifyError> {
    if raster.channels() < 3 {
        return Err(ClassifyError::InvalidImageFormat { channels: raster.channels() });
    }
    if raster.is_empty() {
        return Err(ClassifyError::EmptyImage);
    }

    let mut sums = [0u64; 3];
    for px in raster.rgb_pixels() {
        for (sum, v) in sums.iter_mut().zip(px) {
            *sum += u64::from(v);
        }
    }
    let n = raster.pixel_count() as f64;

    Ok(ChannelMeans {
        red: sums[0] as f64 / n,
        green: sums[1] as f64 / n,
        blue: sums[2] as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn means_of_two_pixels() {
        let r = Raster::from_rgb(2, 1, &[[0, 100, 255], [10, 200, 0]]).unwrap();
        let m = channel_means(&r).unwrap();
        assert_relative_eq!(m.red, 5.0);
        assert_relative_eq!(m.green, 150.0);
        assert_relative_eq!(m.blue, 127.5);
    }

    #[test]
    fn alpha_is_ignored() {
        let r = Raster::new(vec![10, 20, 30, 0, 30, 40, 50, 255], 1, 2, 4).unwrap();
        let m = channel_means(&r).unwrap();
        assert_relative_eq!(m.red, 20.0);
        assert_relative_eq!(m.green, 30.0);
        assert_relative_eq!(m.blue, 40.0);
    }

    #[test]
    fn grayscale_and_empty_are_rejected() {
        let gray = Raster::new(vec![1, 2], 2, 1, 1).unwrap();
        assert_eq!(channel_means(&gray), Err(ClassifyError::InvalidImageFormat { channels: 1 }));
        let empty = Raster::new(Vec::new(), 0, 0, 3).unwrap();
        assert_eq!(channel_means(&empty), Err(ClassifyError::EmptyImage));
    }
}
