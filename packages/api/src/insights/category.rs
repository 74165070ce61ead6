//! Category buckets derived from the catalog's product class taxonomy.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Footwear,
    Apparel,
    Accessories,
    Other,
}

const CLASS_TABLE: &[(&str, Category)] = &[
    ("footwear", Category::Footwear),
    ("shoes", Category::Footwear),
    ("running shoes", Category::Footwear),
    ("sneakers", Category::Footwear),
    ("boots", Category::Footwear),
    ("sandals", Category::Footwear),
    ("slides", Category::Footwear),
    ("cleats", Category::Footwear),
    ("apparel", Category::Apparel),
    ("t-shirts", Category::Apparel),
    ("tops", Category::Apparel),
    ("shirts", Category::Apparel),
    ("hoodies", Category::Apparel),
    ("sweatshirts", Category::Apparel),
    ("jackets", Category::Apparel),
    ("pants", Category::Apparel),
    ("shorts", Category::Apparel),
    ("tights", Category::Apparel),
    ("bras", Category::Apparel),
    ("accessories", Category::Accessories),
    ("socks", Category::Accessories),
    ("hats", Category::Accessories),
    ("bags", Category::Accessories),
    ("backpacks", Category::Accessories),
    ("sunglasses", Category::Accessories),
    ("watches", Category::Accessories),
    ("insoles", Category::Accessories),
    ("laces", Category::Accessories),
    ("water bottles", Category::Accessories),
];

impl Category {
    /// Classifies a catalog product class. Unknown or missing classes are `Other`.
    pub fn classify(product_class: Option<&str>) -> Self {
        let Some(class) = product_class else {
            return Category::Other;
        };
        let class = class.trim().to_lowercase();
        CLASS_TABLE
            .iter()
            .find(|(name, _)| *name == class)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Other)
    }

    /// Product classes belonging to this bucket, in the lowercase form used
    /// for SQL matching.
    pub fn classes(self) -> Vec<&'static str> {
        CLASS_TABLE
            .iter()
            .filter(|(_, category)| *category == self)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Parses the `category` query parameter. `Ok(None)` means no filter.
    pub fn parse_filter(value: &str) -> Result<Option<Self>, String> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Ok(None),
            "footwear" => Ok(Some(Category::Footwear)),
            "apparel" => Ok(Some(Category::Apparel)),
            "accessories" => Ok(Some(Category::Accessories)),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}
