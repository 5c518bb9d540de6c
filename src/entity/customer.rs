use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::product::Product;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub products: Vec<Arc<Product>>,
}

impl Customer {
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.products
            .iter()
            .map(Arc::as_ref)
            .find(|product| product.id == product_id)
    }
}
