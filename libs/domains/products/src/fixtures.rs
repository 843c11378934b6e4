//! Builders for product graphs used across unit tests.

use chrono::Utc;

use crate::models::{
    PriceTable, PriceTableLink, Product, ProductDetails, ProductType, ProductWithVariants, Sku,
    SkuDetails, Variant, VariantDetails,
};

pub fn product(id: i32) -> Product {
    let now = Utc::now();
    Product {
        id,
        name: format!("Product {}", id),
        reference: format!("REF-{}", id),
        product_type: ProductType::Nacional,
        gender: None,
        prompt_delivery: false,
        company_id: 1,
        brand_id: 1,
        category_id: 1,
        subcategory_id: None,
        description: None,
        erp_id: None,
        deadline_id: None,
        composition_data: None,
        technical_information: None,
        open_grid: None,
        ipi: None,
        is_discontinued: None,
        is_launch: None,
        is_visible: None,
        colection: None,
        st: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn sku(id: i32) -> Sku {
    Sku {
        id,
        size: "M".to_string(),
        stock: 1,
        price: 10.0,
        code: format!("SKU-{}", id),
        min_quantity: 1,
        multiple_quantity: 1,
        erp_id: None,
        cest: None,
        ncm: None,
        height: None,
        length: None,
        weight: None,
        width: None,
        variant_id: 1,
    }
}

pub fn sku_details(id: i32, price_tables: &[i32]) -> SkuDetails {
    SkuDetails {
        sku: sku(id),
        price_tables_skus: price_tables
            .iter()
            .map(|&price_table_id| PriceTableLink {
                sku_id: id,
                price_table_id,
                price_tables: PriceTable {
                    id: price_table_id,
                    name: format!("Table {}", price_table_id),
                },
            })
            .collect(),
    }
}

pub fn variant(id: i32) -> Variant {
    Variant {
        id,
        name: format!("Variant {}", id),
        hex_code: None,
        product_id: 1,
    }
}

pub fn variant_details(id: i32, skus: Vec<SkuDetails>) -> VariantDetails {
    VariantDetails {
        variant: variant(id),
        skus,
    }
}

pub fn product_details(id: i32, variants: Vec<VariantDetails>) -> ProductDetails {
    ProductDetails {
        product: product(id),
        brands: None,
        categories: None,
        subcategories: None,
        variants,
    }
}

pub fn product_with_variants(id: i32) -> ProductWithVariants {
    ProductWithVariants {
        product: product(id),
        variants: Vec::new(),
    }
}
