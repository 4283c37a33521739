//! Pixel-based land-cover classification.
//!
//! Every pixel is converted to HSV and tested against each category range;
//! a category's share is the fraction of all pixels inside its range, in
//! percent. Shares are independent: overlapping ranges mean they need not
//! sum to 100, and pixels outside every range are simply not counted.
//!
//! With the `threading` feature, rows are counted in parallel and merged.
//! The result is identical to the serial path.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::category::CategoryTable;
use crate::error::ClassifyError;
use crate::hsv::rgb_to_hsv;
use crate::raster::Raster;

/// Percentage of pixels falling in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverShare {
    pub name: String,
    /// In [0, 100].
    pub percent: f64,
}

/// Per-category shares in category-table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    pub shares: Vec<CoverShare>,
}

impl Classification {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.shares.iter().find(|s| s.name == name).map(|s| s.percent)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoverShare> {
        self.shares.iter()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Serialised as a JSON object keyed by category name, preserving order.
impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shares.len()))?;
        for share in &self.shares {
            map.serialize_entry(&share.name, &share.percent)?;
        }
        map.end()
    }
}

/// Classifier bound to one category table.
#[derive(Debug, Clone, Default)]
pub struct LandCoverClassifier {
    table: CategoryTable,
}

impl LandCoverClassifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn classify(&self, raster: &Raster) -> Result<Classification, ClassifyError> {
        classify(raster, &self.table)
    }
}

/// Classify `raster` against `table`.
///
/// Fails with [`ClassifyError::InvalidImageFormat`] unless the raster has
/// exactly three channels, and with [`ClassifyError::EmptyImage`] when it
/// has no pixels. No partial result is ever returned.
pub fn classify(raster: &Raster, table: &CategoryTable) -> Result<Classification, ClassifyError> {
    if raster.channels() != 3 {
        return Err(ClassifyError::InvalidImageFormat { channels: raster.channels() });
    }
    if raster.is_empty() {
        return Err(ClassifyError::EmptyImage);
    }

    let counts = count_matches(raster, table);
    let total = raster.pixel_count() as f64;

    let shares = table
        .iter()
        .zip(counts)
        .map(|(cat, n)| CoverShare {
            name: cat.name.clone(),
            percent: n as f64 / total * 100.0,
        })
        .collect();

    Ok(Classification { shares })
}

/// Add the matches of every RGB pixel in `data` to `counts`.
fn count_into(data: &[u8], table: &CategoryTable, counts: &mut [usize]) {
    for px in data.chunks_exact(3) {
        let hsv = rgb_to_hsv([px[0], px[1], px[2]]);
        for (count, cat) in counts.iter_mut().zip(table) {
            if cat.range.contains(hsv) {
                *count += 1;
            }
        }
    }
}

#[cfg(not(feature = "threading"))]
fn count_matches(raster: &Raster, table: &CategoryTable) -> Vec<usize> {
    let mut counts = vec![0usize; table.len()];
    count_into(raster.data(), table, &mut counts);
    counts
}

#[cfg(feature = "threading")]
fn count_matches(raster: &Raster, table: &CategoryTable) -> Vec<usize> {
    use rayon::prelude::*;

    let n = table.len();
    raster
        .data()
        .par_chunks(raster.width() * 3)
        .map(|row| {
            let mut counts = vec![0usize; n];
            count_into(row, table, &mut counts);
            counts
        })
        .reduce(
            || vec![0usize; n],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}
