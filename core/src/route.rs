//! Navigation route table.
//!
//! Routes render to string paths the way the host router transmits them:
//! the product-details argument is an `EncodedToken` with one layer of
//! percent-escaping applied on top. `parse` strips exactly that one layer
//! before handing the token to the codec.

use crate::codec::{self, ProductRoute};
use crate::error::DecodeError;

const PRODUCT_DETAILS_PREFIX: &str = "product_details/";

#[derive(Debug, Clone, PartialEq)]
pub enum NavRoute {
    Home,
    Cart,
    Profile,
    Notifications,
    ProductDetails(ProductRoute),
}

impl NavRoute {
    pub fn to_path(&self) -> String {
        match self {
            NavRoute::Home => "home".to_string(),
            NavRoute::Cart => "cart".to_string(),
            NavRoute::Profile => "profile".to_string(),
            NavRoute::Notifications => "notifications".to_string(),
            NavRoute::ProductDetails(product) => {
                let token = codec::encode(product);
                format!(
                    "{PRODUCT_DETAILS_PREFIX}{}",
                    urlencoding::encode(token.as_str())
                )
            }
        }
    }

    pub fn parse(path: &str) -> Result<Self, DecodeError> {
        match path {
            "home" => Ok(NavRoute::Home),
            "cart" => Ok(NavRoute::Cart),
            "profile" => Ok(NavRoute::Profile),
            "notifications" => Ok(NavRoute::Notifications),
            _ => {
                let arg = path
                    .strip_prefix(PRODUCT_DETAILS_PREFIX)
                    .ok_or_else(|| DecodeError::UnknownRoute(path.to_string()))?;
                let token =
                    urlencoding::decode(arg).map_err(|source| DecodeError::Argument { source })?;
                Ok(NavRoute::ProductDetails(codec::decode(&token)?))
            }
        }
    }
}
