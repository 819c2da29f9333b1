use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub category_id: u32,
    pub description: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub title: String,
    pub image: String,
}

/// `{ "data": [...], "msg": "..." }` wrapper used by the categories resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub msg: String,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn sample() -> Self {
        let product = |id: u32, title: &str, price: f64, category_id: u32, description: &str| Product {
            id,
            title: title.to_string(),
            price,
            category_id,
            description: description.to_string(),
            image: format!("https://cdn.example.com/products/{id}.png?w=400&h=400"),
        };
        let category = |id: u32, title: &str| Category {
            id,
            title: title.to_string(),
            image: format!("https://cdn.example.com/categories/{id}.png"),
        };
        Self {
            products: vec![
                product(1, "Desk Lamp", 24.5, 1, "Warm white LED / dimmable"),
                product(2, "Linen Throw", 39.0, 2, "Hand-woven, 130x170 cm"),
                product(3, "Ceramic Mug", 12.0, 2, "Holds 350 ml"),
                product(4, "Wall Clock", 48.75, 1, "Silent sweep movement"),
                product(5, "Plant Pot", 18.0, 3, "Drainage hole & saucer"),
            ],
            categories: vec![
                category(1, "Featured"),
                category(2, "Popular"),
                category(3, "Garden"),
            ],
        }
    }
}

pub type Db = Arc<Catalog>;

pub fn app() -> Router {
    app_with(Catalog::sample())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/products", get(list_products))
        .route("/products/category/{id}", get(list_products_in_category))
        .route("/categories", get(list_categories))
        .with_state(db)
}

/// Router that answers every request with `status` and a short text body.
///
/// Codes outside the valid HTTP range fall back to 500.
pub fn failing_app(status: u16) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Router::new().fallback(move || async move {
        (status, status.canonical_reason().unwrap_or("error").to_string())
    })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Product>> {
    debug!(count = db.products.len(), "listing products");
    Json(db.products.clone())
}

async fn list_products_in_category(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Json<Vec<Product>> {
    let products: Vec<Product> = db
        .products
        .iter()
        .filter(|p| p.category_id == id)
        .cloned()
        .collect();
    debug!(category = id, count = products.len(), "listing products in category");
    Json(products)
}

async fn list_categories(State(db): State<Db>) -> Json<Envelope<Category>> {
    Json(Envelope {
        data: db.categories.clone(),
        msg: "Categories fetched successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_to_camel_case() {
        let product = Catalog::sample().products[0].clone();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["categoryId"], 1);
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn envelope_wraps_data_and_msg() {
        let envelope = Envelope {
            data: vec![1, 2],
            msg: "ok".to_string(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["msg"], "ok");
    }

    #[test]
    fn sample_catalog_has_featured_and_popular_items() {
        let catalog = Catalog::sample();
        assert!(catalog.products.iter().any(|p| p.category_id == 1));
        assert!(catalog.products.iter().any(|p| p.category_id == 2));
    }
}
