//! Catalog DTOs for the storefront API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift. Listing endpoints are accepted either
//! as a bare JSON array or wrapped in a `{ "data": [...], "msg": "..." }`
//! envelope, and both shapes land in the same domain list type.

use serde::{Deserialize, Serialize};

/// A single product as served by the listing resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub category_id: u32,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub image: String,
}

/// Raw listing body: bare array or `data`/`msg` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Envelope {
        data: Vec<T>,
        #[serde(default)]
        msg: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    /// Items in response order, plus the server message if one was sent.
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            Listing::Envelope { data, msg } => (data, msg),
            Listing::Bare(items) => (items, None),
        }
    }
}

pub type ProductListResponse = Listing<Product>;
pub type CategoriesListResponse = Listing<Category>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub msg: Option<String>,
}

impl From<ProductListResponse> for ProductList {
    fn from(response: ProductListResponse) -> Self {
        let (products, msg) = response.into_parts();
        Self { products, msg }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    pub categories: Vec<Category>,
    pub msg: Option<String>,
}

impl CategoryList {
    pub fn titles(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.title.clone()).collect()
    }
}

impl From<CategoriesListResponse> for CategoryList {
    fn from(response: CategoriesListResponse) -> Self {
        let (categories, msg) = response.into_parts();
        Self { categories, msg }
    }
}
