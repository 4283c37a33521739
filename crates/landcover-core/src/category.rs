//! Named HSV ranges used to label pixels.
//!
//! The stock table is [`CategoryTable::land_cover`]. Ranges overlap on
//! purpose (hue 15–25 is both dry vegetation and bare soil), so a pixel may
//! count toward more than one category.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::hsv::{Hsv, HUE_MAX};

/// Inclusive per-channel bounds in (H, S, V).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        hsv.h >= self.lower[0]
            && hsv.h <= self.upper[0]
            && hsv.s >= self.lower[1]
            && hsv.s <= self.upper[1]
            && hsv.v >= self.lower[2]
            && hsv.v <= self.upper[2]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(flatten)]
    pub range: HsvRange,
}

impl Category {
    pub fn new(name: impl Into<String>, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { name: name.into(), range: HsvRange::new(lower, upper) }
    }
}

/// Ordered, immutable set of categories handed to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategoryTable {
    categories: Vec<Category>,
}

pub const HEALTHY_VEGETATION: &str = "Healthy Vegetation";
pub const DRY_VEGETATION: &str = "Dry Vegetation";
pub const BARE_SOIL: &str = "Bare Soil/Ground";

impl CategoryTable {
    /// Validate and wrap a list of categories.
    pub fn new(categories: Vec<Category>) -> Result<Self, TableError> {
        if categories.is_empty() {
            return Err(TableError::Empty);
        }
        let mut seen = HashSet::new();
        for cat in &categories {
            if !seen.insert(cat.name.as_str()) {
                return Err(TableError::DuplicateName(cat.name.clone()));
            }
            for channel in 0..3 {
                if cat.range.lower[channel] > cat.range.upper[channel] {
                    return Err(TableError::InvertedBounds { name: cat.name.clone(), channel });
                }
            }
            if cat.range.upper[0] > HUE_MAX {
                return Err(TableError::HueOutOfRange { name: cat.name.clone(), hue: cat.range.upper[0] });
            }
        }
        Ok(Self { categories })
    }

    /// Healthy vegetation, dry vegetation, and bare soil thresholds.
    pub fn land_cover() -> Self {
        Self {
            categories: vec![
                Category::new(HEALTHY_VEGETATION, [35, 40, 40], [85, 255, 255]),
                Category::new(DRY_VEGETATION, [15, 30, 30], [35, 255, 200]),
                Category::new(BARE_SOIL, [8, 50, 20], [25, 255, 200]),
            ],
        }
    }

    /// Parse a JSON array of `{"name", "lower", "upper"}` objects.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::land_cover()
    }
}

impl TryFrom<Vec<Category>> for CategoryTable {
    type Error = TableError;

    fn try_from(categories: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(categories)
    }
}

impl From<CategoryTable> for Vec<Category> {
    fn from(table: CategoryTable) -> Self {
        table.categories
    }
}

impl<'a> IntoIterator for &'a CategoryTable {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
