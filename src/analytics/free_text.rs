//! # Free-Text Ordering Summary
//!
//! Compares order items bought as free text against items ordered from the
//! material catalog.

use serde::Serialize;

use crate::constants::round_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FreeTextStatus {
    FreeTextDominant,
    CatalogDominant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeTextSummary {
    pub total_items: u64,
    pub free_text_items: u64,
    pub catalog_items: u64,
    pub free_text_rate: f64,
    pub status: FreeTextStatus,
    pub message: String,
}

impl FreeTextSummary {
    pub fn from_counts(free_text_items: u64, catalog_items: u64) -> Self {
        let total_items = free_text_items + catalog_items;
        let free_text_rate = if total_items == 0 {
            0.0
        } else {
            round_percent(free_text_items as f64 * 100.0 / total_items as f64)
        };

        let (status, message) = if free_text_items > catalog_items {
            (
                FreeTextStatus::FreeTextDominant,
                format!(
                    "{free_text_items} order items used free text, more than the {catalog_items} ordered from the catalog."
                ),
            )
        } else {
            (
                FreeTextStatus::CatalogDominant,
                format!(
                    "{catalog_items} order items were ordered from the catalog; {free_text_items} used free text."
                ),
            )
        };

        Self {
            total_items,
            free_text_items,
            catalog_items,
            free_text_rate,
            status,
            message,
        }
    }
}
