//! Reference data: product names, tank names and prices.
//!
//! Calculations never consult reference data. Display code does, and a
//! missing entry resolves to a placeholder label instead of an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::code::{Code, CurrencyCode};

/// Label shown for a product that has no master-data entry.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Label shown for a tank that has no master-data entry.
pub const UNKNOWN_TANK: &str = "—";

/// Source of unit prices by product.
pub trait PriceList {
    /// Unit price for a product, if known.
    fn price_for(&self, product_id: &str) -> Option<Decimal>;
}

impl<S: std::hash::BuildHasher> PriceList for HashMap<String, Decimal, S> {
    fn price_for(&self, product_id: &str) -> Option<Decimal> {
        self.get(product_id).copied()
    }
}

impl<S: std::hash::BuildHasher> PriceList for HashMap<Code, Decimal, S> {
    fn price_for(&self, product_id: &str) -> Option<Decimal> {
        self.get(product_id).copied()
    }
}

/// A product entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: Code,
    /// Display name.
    pub name: String,
    /// Unit selling price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Currency the price is quoted in, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

/// A tank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    /// Tank identifier.
    pub id: Code,
    /// Display name.
    pub name: String,
    /// Product normally stored in this tank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Code>,
}

/// Products and tanks known to the station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterData {
    /// Product entries.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Tank entries.
    #[serde(default)]
    pub tanks: Vec<Tank>,
}

impl MasterData {
    /// Create empty master data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product.
    #[must_use]
    pub fn with_product(
        mut self,
        id: impl Into<Code>,
        name: impl Into<String>,
        price: Option<Decimal>,
    ) -> Self {
        self.products.push(Product {
            id: id.into(),
            name: name.into(),
            price,
            currency: None,
        });
        self
    }

    /// Add a product priced in a stated currency.
    #[must_use]
    pub fn with_priced_product(
        mut self,
        id: impl Into<Code>,
        name: impl Into<String>,
        price: Decimal,
        currency: impl Into<CurrencyCode>,
    ) -> Self {
        self.products.push(Product {
            id: id.into(),
            name: name.into(),
            price: Some(price),
            currency: Some(currency.into()),
        });
        self
    }

    /// Add a tank.
    #[must_use]
    pub fn with_tank(mut self, id: impl Into<Code>, name: impl Into<String>) -> Self {
        self.tanks.push(Tank {
            id: id.into(),
            name: name.into(),
            product_id: None,
        });
        self
    }

    /// Look up a product.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a tank.
    #[must_use]
    pub fn tank(&self, id: &str) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id == id)
    }

    /// Product name, or [`UNKNOWN_PRODUCT`].
    #[must_use]
    pub fn product_label(&self, id: &str) -> &str {
        self.product(id).map_or(UNKNOWN_PRODUCT, |p| p.name.as_str())
    }

    /// Tank name, or [`UNKNOWN_TANK`].
    #[must_use]
    pub fn tank_label(&self, id: &str) -> &str {
        self.tank(id).map_or(UNKNOWN_TANK, |t| t.name.as_str())
    }
}

impl PriceList for MasterData {
    fn price_for(&self, product_id: &str) -> Option<Decimal> {
        self.product(product_id).and_then(|p| p.price)
    }
}
