//! Product catalog schemas.

use serde::{Deserialize, Serialize};

use tradepost_core::{Price, ProductId};

use super::{Validate, ValidationError, patch_field, require_text, require_text_opt};

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    /// Unique product name.
    pub prod_name: String,
    /// Original (list) price.
    pub prod_og_price: Price,
    /// Discounted price; copied onto orders that omit `ord_price`.
    pub prod_new_price: Price,
    pub prod_desc: String,
    /// Full-size image URLs in display order.
    pub prod_image: Vec<String>,
    /// Thumbnail URLs in display order.
    pub prod_thumb_img: Vec<String>,
}

/// Body of `POST /create_product/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub prod_name: String,
    pub prod_og_price: Price,
    pub prod_new_price: Price,
    #[serde(default)]
    pub prod_desc: String,
    #[serde(default)]
    pub prod_image: Vec<String>,
    #[serde(default)]
    pub prod_thumb_img: Vec<String>,
}

impl Validate for ProductCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("prod_name", &self.prod_name)?;
        validate_urls("prod_image", &self.prod_image)?;
        validate_urls("prod_thumb_img", &self.prod_thumb_img)
    }
}

/// Body of `PUT /update_product/{prod_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub prod_name: Option<String>,
    pub prod_og_price: Option<Price>,
    pub prod_new_price: Option<Price>,
    pub prod_desc: Option<String>,
    pub prod_image: Option<Vec<String>>,
    pub prod_thumb_img: Option<Vec<String>>,
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text_opt("prod_name", self.prod_name.as_ref())?;
        if let Some(images) = &self.prod_image {
            validate_urls("prod_image", images)?;
        }
        if let Some(thumbs) = &self.prod_thumb_img {
            validate_urls("prod_thumb_img", thumbs)?;
        }
        Ok(())
    }
}

impl ProductUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prod_name.is_none()
            && self.prod_og_price.is_none()
            && self.prod_new_price.is_none()
            && self.prod_desc.is_none()
            && self.prod_image.is_none()
            && self.prod_thumb_img.is_none()
    }

    pub fn apply(self, product: &mut Product) {
        patch_field(&mut product.prod_name, self.prod_name);
        patch_field(&mut product.prod_og_price, self.prod_og_price);
        patch_field(&mut product.prod_new_price, self.prod_new_price);
        patch_field(&mut product.prod_desc, self.prod_desc);
        patch_field(&mut product.prod_image, self.prod_image);
        patch_field(&mut product.prod_thumb_img, self.prod_thumb_img);
    }
}

fn validate_urls(field: &'static str, urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ValidationError::new(field, "image URLs must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_create_defaults_optional_fields() {
        let body: ProductCreate = serde_json::from_str(
            r#"{"prod_name":"Mug","prod_og_price":12.5,"prod_new_price":9.99}"#,
        )
        .unwrap();
        assert!(body.validate().is_ok());
        assert_eq!(body.prod_new_price.amount(), Decimal::new(999, 2));
        assert!(body.prod_image.is_empty());
        assert_eq!(body.prod_desc, "");
    }

    #[test]
    fn test_negative_price_fails_to_parse() {
        let body = serde_json::from_str::<ProductCreate>(
            r#"{"prod_name":"Mug","prod_og_price":-1,"prod_new_price":1}"#,
        );
        assert!(body.is_err());
    }

    #[test]
    fn test_blank_image_url_is_rejected() {
        let update = ProductUpdate {
            prod_image: Some(vec!["https://cdn/x.png".to_owned(), " ".to_owned()]),
            ..ProductUpdate::default()
        };
        assert_eq!(update.validate().unwrap_err().field, "prod_image");
    }

    #[test]
    fn test_image_order_is_preserved() {
        let mut product = Product {
            id: ProductId::new(1),
            prod_name: "Mug".to_owned(),
            prod_og_price: Price::ZERO,
            prod_new_price: Price::ZERO,
            prod_desc: String::new(),
            prod_image: vec![],
            prod_thumb_img: vec![],
        };
        let update: ProductUpdate =
            serde_json::from_str(r#"{"prod_image":["b.png","a.png"]}"#).unwrap();
        update.apply(&mut product);
        assert_eq!(product.prod_image, vec!["b.png", "a.png"]);
        assert_eq!(product.prod_name, "Mug");
    }
}
