//! Product attributes addressable by queries and filters

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::product::Product;

/// A numeric product attribute that constraints can bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericAttribute {
    Price,
    Discount,
    Memory,
    Storage,
    ScreenSize,
    Weight,
    Rating,
    Reviews,
}

impl NumericAttribute {
    /// Value of this attribute on `product`, in canonical units.
    ///
    /// Price, discount, rating and review count are always present; specs
    /// may be absent.
    pub fn value_of(&self, product: &Product) -> Option<f64> {
        match self {
            NumericAttribute::Price => Some(product.price.selling as f64),
            NumericAttribute::Discount => Some(product.discount_percent()),
            NumericAttribute::Memory => product.numeric.memory_gb,
            NumericAttribute::Storage => product.numeric.storage_gb,
            NumericAttribute::ScreenSize => product.numeric.screen_inches,
            NumericAttribute::Weight => product.numeric.weight_kg,
            NumericAttribute::Rating => Some(product.rating),
            NumericAttribute::Reviews => Some(product.review_count as f64),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericAttribute::Price => "price",
            NumericAttribute::Discount => "discount",
            NumericAttribute::Memory => "memory",
            NumericAttribute::Storage => "storage",
            NumericAttribute::ScreenSize => "screen size",
            NumericAttribute::Weight => "weight",
            NumericAttribute::Rating => "rating",
            NumericAttribute::Reviews => "reviews",
        }
    }

    /// Unit suffix used when rendering values of this attribute
    pub fn unit(&self) -> &'static str {
        match self {
            NumericAttribute::Memory | NumericAttribute::Storage => "GB",
            NumericAttribute::ScreenSize => "in",
            NumericAttribute::Weight => "kg",
            NumericAttribute::Discount => "%",
            _ => "",
        }
    }

    /// Resolve a caller-supplied attribute name (filter panels, config)
    pub fn from_name(name: &str) -> Option<Self> {
        let attr = match name.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "price" | "selling price" | "cost" => NumericAttribute::Price,
            "discount" | "discount percent" => NumericAttribute::Discount,
            "memory" | "ram" => NumericAttribute::Memory,
            "storage" | "ssd" | "disk" => NumericAttribute::Storage,
            "screen" | "screen size" | "screensize" | "display" => NumericAttribute::ScreenSize,
            "weight" => NumericAttribute::Weight,
            "rating" | "stars" => NumericAttribute::Rating,
            "reviews" | "review count" | "reviewcount" => NumericAttribute::Reviews,
            _ => return None,
        };
        Some(attr)
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A textual product spec that qualitative hints can express preferences on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAttribute {
    Processor,
    Graphics,
    OperatingSystem,
    Color,
    Resolution,
}

impl TextAttribute {
    pub fn value_of<'a>(&self, product: &'a Product) -> Option<&'a str> {
        let text = &product.text;
        match self {
            TextAttribute::Processor => text.processor.as_deref(),
            TextAttribute::Graphics => text.graphics.as_deref(),
            TextAttribute::OperatingSystem => text.operating_system.as_deref(),
            TextAttribute::Color => text.color.as_deref(),
            TextAttribute::Resolution => text.resolution.as_deref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextAttribute::Processor => "processor",
            TextAttribute::Graphics => "graphics",
            TextAttribute::OperatingSystem => "operating system",
            TextAttribute::Color => "color",
            TextAttribute::Resolution => "resolution",
        }
    }
}

impl fmt::Display for TextAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of_always_present_fields() {
        let p = Product::new("p", "Thing", "Misc", 500);
        assert_eq!(NumericAttribute::Price.value_of(&p), Some(500.0));
        assert_eq!(NumericAttribute::Discount.value_of(&p), Some(0.0));
        assert_eq!(NumericAttribute::Memory.value_of(&p), None);
        assert_eq!(TextAttribute::Graphics.value_of(&p), None);
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(NumericAttribute::from_name("RAM"), Some(NumericAttribute::Memory));
        assert_eq!(
            NumericAttribute::from_name("screen_size"),
            Some(NumericAttribute::ScreenSize)
        );
        assert_eq!(NumericAttribute::from_name("colour"), None);
    }
}
