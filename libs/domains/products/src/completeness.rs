//! In-memory half of the listing filter.
//!
//! The query already guarantees every SKU of at least one variant has a price
//! table. Here a variant survives only when all of its SKUs share the exact
//! same, non-empty set of price tables.

use crate::models::{ProductDetails, SkuDetails, VariantDetails};

/// Drops inconsistent variants, then products left without variants.
pub fn retain_complete_variants(products: Vec<ProductDetails>) -> Vec<ProductDetails> {
    products
        .into_iter()
        .filter_map(|mut product| {
            product.variants.retain(has_uniform_price_tables);
            (!product.variants.is_empty()).then_some(product)
        })
        .collect()
}

/// True when the variant has SKUs and they all carry the same non-empty set
/// of price table ids.
pub fn has_uniform_price_tables(variant: &VariantDetails) -> bool {
    let mut id_sets = variant.skus.iter().map(SkuDetails::price_table_ids);

    let Some(first) = id_sets.next() else {
        return false;
    };

    !first.is_empty() && id_sets.all(|ids| ids == first)
}
