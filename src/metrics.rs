// src/metrics.rs
//
// Chart-ready aggregates derived from the raw product list. Pure and total:
// any input slice, including an empty one, produces a value.

use crate::models::Product;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStock {
    pub category: String,
    pub stock: u64,
    /// Share of total stock, rounded to one decimal place; 0.0 when the
    /// total is zero.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandStock {
    pub brand: String,
    pub stock: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryMetrics {
    pub total_products: usize,
    pub total_stock: u64,
    pub categories: Vec<String>,
    pub avg_stock_per_product: f64,
    pub stock_by_category: Vec<CategoryStock>,
    pub stock_by_brand: Vec<BrandStock>,
}

const UNCATEGORIZED: &str = "Uncategorized";

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn derive_metrics(products: &[Product]) -> InventoryMetrics {
    let total_products = products.len();
    let total_stock: u64 = products.iter().map(|p| p.quantity.unwrap_or(0)).sum();

    // Categories in first-seen order; products without one share a bucket.
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        let category = product.category.as_deref().unwrap_or(UNCATEGORIZED);
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }

    let stock_by_category: Vec<CategoryStock> = categories
        .iter()
        .map(|category| {
            let stock: u64 = products
                .iter()
                .filter(|p| p.category.as_deref().unwrap_or(UNCATEGORIZED) == category)
                .map(|p| p.quantity.unwrap_or(0))
                .sum();
            let percentage = if total_stock > 0 {
                round1(stock as f64 / total_stock as f64 * 100.0)
            } else {
                0.0
            };
            CategoryStock {
                category: category.clone(),
                stock,
                percentage,
            }
        })
        .collect();

    // Brands in first-seen order, then a stable descending sort so ties keep
    // that order.
    let mut stock_by_brand: Vec<BrandStock> = Vec::new();
    for product in products {
        let stock = product.quantity.unwrap_or(0);
        match stock_by_brand.iter_mut().find(|b| b.brand == product.brand) {
            Some(entry) => entry.stock += stock,
            None => stock_by_brand.push(BrandStock {
                brand: product.brand.clone(),
                stock,
            }),
        }
    }
    stock_by_brand.sort_by(|a, b| b.stock.cmp(&a.stock));

    let avg_stock_per_product = if total_products > 0 {
        round1(total_stock as f64 / total_products as f64)
    } else {
        0.0
    };

    InventoryMetrics {
        total_products,
        total_stock,
        categories,
        avg_stock_per_product,
        stock_by_category,
        stock_by_brand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, brand: &str, category: Option<&str>, quantity: Option<u64>) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            brand: brand.to_string(),
            price: 0.0,
            quantity,
            specifications: Default::default(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_inventory_gives_zero_metrics() {
        let metrics = derive_metrics(&[]);
        assert_eq!(metrics.total_products, 0);
        assert_eq!(metrics.total_stock, 0);
        assert!(metrics.categories.is_empty());
        assert!(metrics.stock_by_category.is_empty());
        assert!(metrics.stock_by_brand.is_empty());
        assert_eq!(metrics.avg_stock_per_product, 0.0);
    }

    #[test]
    fn test_totals_and_categories_first_seen_order() {
        let products = [
            product("A", "Lenovo", Some("Laptops"), Some(5)),
            product("B", "Dell", Some("Monitors"), Some(3)),
            product("C", "HP", Some("Laptops"), Some(2)),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(metrics.total_products, 3);
        assert_eq!(metrics.total_stock, 10);
        assert_eq!(metrics.categories, vec!["Laptops", "Monitors"]);
        assert_eq!(metrics.avg_stock_per_product, 3.3);
    }

    #[test]
    fn test_missing_quantity_contributes_zero() {
        let products = [
            product("A", "Lenovo", Some("Laptops"), None),
            product("B", "Dell", Some("Laptops"), Some(4)),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(metrics.total_stock, 4);
        assert_eq!(metrics.stock_by_category[0].stock, 4);
    }

    #[test]
    fn test_category_percentages_sum_to_one_hundred() {
        let products = [
            product("A", "X", Some("Laptops"), Some(1)),
            product("B", "X", Some("Monitors"), Some(1)),
            product("C", "X", Some("Mice"), Some(1)),
        ];
        let metrics = derive_metrics(&products);
        let sum: f64 = metrics.stock_by_category.iter().map(|c| c.percentage).sum();
        let tolerance = 0.1 * metrics.stock_by_category.len() as f64;
        assert!(
            (sum - 100.0).abs() <= tolerance,
            "percentages summed to {}",
            sum
        );
    }

    #[test]
    fn test_percentages_zero_without_stock() {
        let products = [
            product("A", "X", Some("Laptops"), Some(0)),
            product("B", "X", Some("Monitors"), None),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(metrics.total_stock, 0);
        assert!(metrics.stock_by_category.iter().all(|c| c.percentage == 0.0));
    }

    #[test]
    fn test_stock_by_brand_sorted_descending() {
        let products = [
            product("A1", "A", None, Some(5)),
            product("B1", "B", None, Some(9)),
            product("A2", "A", None, Some(2)),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(
            metrics.stock_by_brand,
            vec![
                BrandStock {
                    brand: "B".to_string(),
                    stock: 9
                },
                BrandStock {
                    brand: "A".to_string(),
                    stock: 7
                },
            ]
        );
    }

    #[test]
    fn test_brand_ties_keep_first_seen_order() {
        let products = [
            product("Z1", "Zed", None, Some(4)),
            product("Y1", "Why", None, Some(4)),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(metrics.stock_by_brand[0].brand, "Zed");
        assert_eq!(metrics.stock_by_brand[1].brand, "Why");
    }

    #[test]
    fn test_uncategorized_products_share_a_bucket() {
        let products = [
            product("A", "X", None, Some(2)),
            product("B", "X", None, Some(3)),
        ];
        let metrics = derive_metrics(&products);
        assert_eq!(metrics.categories, vec!["Uncategorized"]);
        assert_eq!(metrics.stock_by_category[0].stock, 5);
    }
}
