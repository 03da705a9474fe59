//! # Catalog
//!
//! The read-only list of produce a vendor can order. The demo build ships a
//! fixed set of four items.

use crate::money::Money;
use crate::types::Product;

/// A static product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps an arbitrary product list.
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// The demo catalog: onions, potatoes, tomatoes and leafy greens.
    pub fn demo() -> Self {
        Catalog::new(vec![
            product("1", "प्याज", 25, "kg", "onions.jpg", "vegetables"),
            product("2", "आलू", 18, "kg", "potatoes.jpg", "vegetables"),
            product("3", "टमाटर", 30, "kg", "tomatoes.jpg", "vegetables"),
            product("4", "हरी सब्जी", 15, "bundle", "leafy-vegetables.jpg", "leafy"),
        ])
    }

    /// All products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    /// Products in one category.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn product(id: &str, name: &str, rupees: i64, unit: &str, image: &str, category: &str) -> Product {
    Product {
        product_id: id.to_string(),
        name: name.to_string(),
        price: Money::from_rupees(rupees),
        unit: unit.to_string(),
        image_ref: image.to_string(),
        category: category.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.len(), 4);

        let onion = catalog.get("1").unwrap();
        assert_eq!(onion.name, "प्याज");
        assert_eq!(onion.price, Money::from_rupees(25));
        assert_eq!(onion.unit, "kg");

        assert!(catalog.get("99").is_none());
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.by_category("vegetables").count(), 3);
        assert_eq!(catalog.by_category("leafy").count(), 1);
        assert_eq!(catalog.by_category("fruit").count(), 0);
    }
}
