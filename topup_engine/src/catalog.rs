//! The product catalog and promotion table.
//!
//! Both are static: they are built (or loaded from a JSON file) once at startup and never change while the server is
//! running. The JSON representation is `{ "games": [...], "promos": [...] }`, which is also what the catalog endpoint
//! returns.
use std::{collections::HashSet, path::Path};

use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use topup_common::Rupiah;

use crate::db_types::{Package, Product, PromotionCode};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read the catalog file. {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse the catalog file. {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid catalog. {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "games")]
    products: Vec<Product>,
    promos: Vec<PromotionCode>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>, promos: Vec<PromotionCode>) -> Result<Self, CatalogError> {
        let catalog = Self { products, promos };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file. The file is validated: product ids and slugs must be unique, package ids must be
    /// unique within their product, prices may not be negative and promotion percentages must be at most 100.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let catalog: Catalog = serde_json::from_str(&data)?;
        catalog.validate()?;
        info!(
            "🗂️ Loaded {} products and {} promotions from {}",
            catalog.products.len(),
            catalog.promos.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &self.products {
            if !ids.insert(product.id.as_str()) {
                return Err(CatalogError::Invalid(format!("Duplicate product id: {}", product.id)));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::Invalid(format!("Duplicate product slug: {}", product.slug)));
            }
            let mut package_ids = HashSet::new();
            for package in &product.packages {
                if !package_ids.insert(package.id.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "Duplicate package id {} in product {}",
                        package.id, product.id
                    )));
                }
                if package.price < Rupiah::default() {
                    return Err(CatalogError::Invalid(format!("Package {} has a negative price", package.id)));
                }
            }
        }
        let mut codes = HashSet::new();
        for promo in &self.promos {
            if !codes.insert(promo.code.as_str()) {
                return Err(CatalogError::Invalid(format!("Duplicate promotion code: {}", promo.code)));
            }
            if promo.percentage > 100 {
                return Err(CatalogError::Invalid(format!(
                    "Promotion {} has a percentage of {}",
                    promo.code, promo.percentage
                )));
            }
        }
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn promotions(&self) -> &[PromotionCode] {
        &self.promos
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Resolves a product/package pair. Returns `None` if either does not exist.
    pub fn resolve(&self, product_id: &str, package_id: &str) -> Option<(&Product, &Package)> {
        let product = self.product(product_id)?;
        let package = product.package(package_id)?;
        Some((product, package))
    }

    /// Promotion codes are matched exactly.
    pub fn promotion(&self, code: &str) -> Option<&PromotionCode> {
        self.promos.iter().find(|p| p.code == code)
    }

    /// The catalog the store ships with.
    pub fn builtin() -> Self {
        let products = vec![
            product(
                ("valo", "valorant", "Valorant", "Tactical Shooter"),
                "https://images.unsplash.com/photo-1542751371-adc38448a05e?auto=format&fit=crop&w=1200&q=80",
                (15_000, 20, 4.8, 3_450),
                "Top up VP instan untuk skin bundle, battle pass, dan event terbatas Valorant.",
                &[("vp-300", "300 VP", 45_000), ("vp-625", "625 VP", 90_000), ("vp-1650", "1.650 VP", 225_000)],
            ),
            product(
                ("pubgm", "pubg-mobile", "PUBG Mobile", "Battle Royale"),
                "https://images.unsplash.com/photo-1511512578047-dfb367046420?auto=format&fit=crop&w=1200&q=80",
                (12_000, 15, 4.9, 5_220),
                "UC PUBG Mobile murah, proses otomatis dan cocok untuk top up cepat.",
                &[("uc-60", "60 UC", 14_000), ("uc-325", "325 UC", 71_000), ("uc-660", "660 UC", 141_000)],
            ),
            product(
                ("mlbb", "mobile-legends", "Mobile Legends", "MOBA"),
                "https://images.unsplash.com/photo-1550745165-9bc0b252726f?auto=format&fit=crop&w=1200&q=80",
                (8_000, 30, 4.7, 10_440),
                "Diamond MLBB resmi, cocok buat draw skin, starlight, dan event mingguan.",
                &[("dm-86", "86 Diamond", 18_000), ("dm-172", "172 Diamond", 36_000), ("dm-706", "706 Diamond", 145_000)],
            ),
            product(
                ("ff", "free-fire", "Free Fire", "Battle Royale"),
                "https://images.unsplash.com/photo-1560253023-3ec5d502959f?auto=format&fit=crop&w=1200&q=80",
                (5_000, 10, 4.6, 7_830),
                "Diamond Free Fire instant dengan banyak pilihan nominal favorit.",
                &[("ff-70", "70 Diamond", 9_500), ("ff-355", "355 Diamond", 45_000), ("ff-720", "720 Diamond", 90_000)],
            ),
        ];
        let promos = vec![
            PromotionCode {
                code: "WELCOME10".into(),
                label: "Diskon 10% pembelian pertama".into(),
                percentage: 10,
            },
            PromotionCode { code: "GAMENIGHT15".into(), label: "Diskon 15% jam 20:00-23:00".into(), percentage: 15 },
        ];
        Self { products, promos }
    }
}

fn product(
    (id, slug, title, genre): (&str, &str, &str, &str),
    image: &str,
    (price_from, discount, rating, sold): (i64, u8, f64, u64),
    description: &str,
    packages: &[(&str, &str, i64)],
) -> Product {
    Product {
        id: id.into(),
        slug: slug.into(),
        title: title.into(),
        genre: genre.into(),
        image: image.into(),
        price_from: Rupiah::from(price_from),
        discount,
        rating,
        sold,
        description: description.into(),
        packages: packages
            .iter()
            .map(|&(id, name, price)| Package { id: id.into(), name: name.into(), price: Rupiah::from(price) })
            .collect(),
    }
}
