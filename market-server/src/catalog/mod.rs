//! Product catalog
//!
//! In-memory product list supplied at startup, either from the built-in seed
//! or a JSON file. Read-only from the cart engine's perspective; sellers can
//! append their own listings.

use std::path::Path;

use parking_lot::RwLock;
use shared::models::{Category, Identity, Product, ProductCreate};
use shared::util;
use shared::{AppError, AppResult};

/// Product catalog with interior mutability for seller additions
#[derive(Debug)]
pub struct Catalog {
    products: RwLock<Vec<Product>>,
}

impl Catalog {
    /// Create a catalog from an explicit product list
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Create a catalog from the built-in seed data
    pub fn seeded() -> Self {
        Self::with_products(seed_products())
    }

    /// Load a catalog from a JSON file (a serialized `Vec<Product>`)
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read(path.as_ref())
            .map_err(|e| AppError::internal(format!("Failed to read catalog file: {}", e)))?;
        let products: Vec<Product> = serde_json::from_slice(&raw)
            .map_err(|e| AppError::internal(format!("Failed to parse catalog file: {}", e)))?;
        tracing::info!(count = products.len(), "Catalog loaded from file");
        Ok(Self::with_products(products))
    }

    /// All products
    pub fn all(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    /// Look up a product by id
    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    /// Filter by category and/or a case-insensitive term matched against
    /// name, description, and seller name
    pub fn search(&self, term: Option<&str>, category: Option<Category>) -> Vec<Product> {
        let term = term.map(str::to_lowercase);
        self.products
            .read()
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| {
                term.as_deref().is_none_or(|t| {
                    p.name.to_lowercase().contains(t)
                        || p.description.to_lowercase().contains(t)
                        || p.seller_name.to_lowercase().contains(t)
                })
            })
            .cloned()
            .collect()
    }

    /// Products listed by a given seller
    pub fn for_seller(&self, seller_id: &str) -> Vec<Product> {
        self.products
            .read()
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect()
    }

    /// Append a seller's listing
    pub fn add(&self, seller: &Identity, create: ProductCreate) -> AppResult<Product> {
        if create.price < 0.0 {
            return Err(AppError::validation("Price must be non-negative"));
        }

        let product = Product {
            id: util::new_id("product"),
            name: create.name,
            description: create.description,
            price: create.price,
            image: create.image,
            category: create.category,
            seller_id: seller.id.clone(),
            seller_name: seller.name.clone(),
            stock: create.stock,
            unit: create.unit,
        };

        self.products.write().push(product.clone());
        tracing::info!(product_id = %product.id, seller_id = %seller.id, "Product added");
        Ok(product)
    }
}

/// Built-in seed catalog
///
/// Mirrors the demo storefront's inventory: two sellers, a mix of vegetables
/// and fruit.
pub fn seed_products() -> Vec<Product> {
    let entries: [(&str, &str, &str, f64, Category, &str, &str, u32, &str); 8] = [
        (
            "1",
            "Organic Tomatoes",
            "Fresh, locally grown organic tomatoes. Perfect for salads and cooking.",
            2.99,
            Category::Vegetable,
            "farmer-1",
            "Green Valley Farm",
            50,
            "lb",
        ),
        (
            "2",
            "Fresh Spinach",
            "Nutrient-rich spinach leaves, perfect for salads and cooking.",
            3.49,
            Category::Vegetable,
            "farmer-1",
            "Green Valley Farm",
            30,
            "bunch",
        ),
        (
            "3",
            "Sweet Corn",
            "Hand-picked sweet corn, perfect for grilling or boiling.",
            0.99,
            Category::Vegetable,
            "farmer-2",
            "Sunrise Acres",
            100,
            "ear",
        ),
        (
            "4",
            "Organic Apples",
            "Crisp and sweet organic apples. Great for snacking or baking.",
            1.49,
            Category::Fruit,
            "farmer-2",
            "Sunrise Acres",
            75,
            "lb",
        ),
        (
            "5",
            "Fresh Strawberries",
            "Sweet and juicy strawberries, freshly picked from our fields.",
            4.99,
            Category::Fruit,
            "farmer-1",
            "Green Valley Farm",
            40,
            "pint",
        ),
        (
            "6",
            "Red Bell Peppers",
            "Crisp, sweet red bell peppers. Great for salads or roasting.",
            1.99,
            Category::Vegetable,
            "farmer-1",
            "Green Valley Farm",
            35,
            "each",
        ),
        (
            "7",
            "Organic Blueberries",
            "Plump, sweet organic blueberries. Perfect for snacking or baking.",
            5.99,
            Category::Fruit,
            "farmer-2",
            "Sunrise Acres",
            25,
            "pint",
        ),
        (
            "8",
            "Fresh Carrots",
            "Sweet and crunchy carrots. Great for snacking or cooking.",
            1.79,
            Category::Vegetable,
            "farmer-2",
            "Sunrise Acres",
            60,
            "bunch",
        ),
    ];

    entries
        .into_iter()
        .map(
            |(id, name, description, price, category, seller_id, seller_name, stock, unit)| {
                Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    price,
                    image: format!("/images/products/{}.jpg", id),
                    category,
                    seller_id: seller_id.to_string(),
                    seller_name: seller_name.to_string(),
                    stock,
                    unit: unit.to_string(),
                }
            },
        )
        .collect()
}
