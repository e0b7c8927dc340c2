//! Garment categories
//!
//! The catalog uses a fixed enumeration. Categories worn on the body are cropped
//! from pose keypoints; carried objects (bags, bottles) come from the object detector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Footwear,
    Outerwear,
    Bags,
    Bottles,
    Accessories,
    Swimwear,
}

/// Default target set for "shop the look", in result order.
pub const LOOK_CATEGORIES: [Category; 5] = [
    Category::Tops,
    Category::Bottoms,
    Category::Footwear,
    Category::Outerwear,
    Category::Accessories,
];

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Tops,
        Category::Bottoms,
        Category::Footwear,
        Category::Outerwear,
        Category::Bags,
        Category::Bottles,
        Category::Accessories,
        Category::Swimwear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Footwear => "footwear",
            Category::Outerwear => "outerwear",
            Category::Bags => "bags",
            Category::Bottles => "bottles",
            Category::Accessories => "accessories",
            Category::Swimwear => "swimwear",
        }
    }

    /// Categories located with the object detector instead of the pose skeleton
    pub fn is_object(&self) -> bool {
        matches!(self, Category::Bags | Category::Bottles)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "tops" | "top" => Ok(Category::Tops),
            "bottoms" | "bottom" => Ok(Category::Bottoms),
            "footwear" | "shoes" => Ok(Category::Footwear),
            "outerwear" | "jackets" => Ok(Category::Outerwear),
            "bags" | "bag" | "purse" => Ok(Category::Bags),
            "bottles" | "bottle" => Ok(Category::Bottles),
            "accessories" => Ok(Category::Accessories),
            "swimwear" => Ok(Category::Swimwear),
            _ => Err(crate::Error::InvalidFilter(format!("unknown category '{}'", s))),
        }
    }
}
