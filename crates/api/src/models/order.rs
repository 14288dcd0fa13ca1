//! Order schemas.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use tradepost_core::{OrderId, OrganizationId, Price, ProductId, UserId};

use super::{Validate, ValidationError, patch_field};

/// One product bought by a user on behalf of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub prod_id: ProductId,
    pub org_id: OrganizationId,
    pub user_id: UserId,
    pub ord_date: DateTime<Utc>,
    /// Price paid, snapshotted at order time.
    pub ord_price: Price,
}

/// Body of `POST /create_order/`.
///
/// `ord_date` defaults to the current time and `ord_price` to the product's
/// discounted price.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub prod_id: ProductId,
    pub org_id: OrganizationId,
    pub user_id: UserId,
    #[serde(default, alias = "org_date")]
    pub ord_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ord_price: Option<Price>,
}

/// Clock skew tolerated between a client and the server for `ord_date`.
pub const MAX_ORDER_DATE_SKEW_MINUTES: i64 = 5;

/// An order cannot be placed in the future.
fn validate_ord_date(ord_date: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
    let latest = Utc::now() + TimeDelta::minutes(MAX_ORDER_DATE_SKEW_MINUTES);
    match ord_date {
        Some(date) if date > latest => {
            Err(ValidationError::new("ord_date", "must not be in the future"))
        }
        _ => Ok(()),
    }
}

impl Validate for OrderCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_ord_date(self.ord_date)
    }
}

/// Body of `PUT /update_order/{order_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub prod_id: Option<ProductId>,
    pub org_id: Option<OrganizationId>,
    pub user_id: Option<UserId>,
    #[serde(alias = "org_date")]
    pub ord_date: Option<DateTime<Utc>>,
    pub ord_price: Option<Price>,
}

impl Validate for OrderUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_ord_date(self.ord_date)
    }
}

impl OrderUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prod_id.is_none()
            && self.org_id.is_none()
            && self.user_id.is_none()
            && self.ord_date.is_none()
            && self.ord_price.is_none()
    }

    pub fn apply(self, order: &mut Order) {
        patch_field(&mut order.prod_id, self.prod_id);
        patch_field(&mut order.org_id, self.org_id);
        patch_field(&mut order.user_id, self.user_id);
        patch_field(&mut order.ord_date, self.ord_date);
        patch_field(&mut order.ord_price, self.ord_price);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_without_date_or_price() {
        let body: OrderCreate =
            serde_json::from_str(r#"{"prod_id":1,"org_id":2,"user_id":3}"#).unwrap();
        assert!(body.ord_date.is_none());
        assert!(body.ord_price.is_none());
    }

    #[test]
    fn test_legacy_date_field_name_is_accepted() {
        let body: OrderCreate = serde_json::from_str(
            r#"{"prod_id":1,"org_id":2,"user_id":3,"org_date":"2024-05-01T10:00:00Z","ord_price":4.5}"#,
        )
        .unwrap();
        assert_eq!(
            body.ord_date.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_order_serializes_price_as_number() {
        let order = Order {
            id: OrderId::new(9),
            prod_id: ProductId::new(1),
            org_id: OrganizationId::new(2),
            user_id: UserId::new(3),
            ord_date: DateTime::from_timestamp(0, 0).unwrap(),
            ord_price: Price::ZERO,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 9);
        assert!(json["ord_price"].is_number());
    }

    #[test]
    fn test_future_order_date_is_rejected() {
        let tomorrow = Utc::now() + TimeDelta::days(1);
        let create = OrderCreate {
            prod_id: ProductId::new(1),
            org_id: OrganizationId::new(2),
            user_id: UserId::new(3),
            ord_date: Some(tomorrow),
            ord_price: None,
        };
        let err = create.validate().unwrap_err();
        assert_eq!(err.to_string(), "ord_date: must not be in the future");

        let update = OrderUpdate {
            ord_date: Some(tomorrow),
            ..OrderUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_past_and_missing_order_dates_pass() {
        let past = OrderUpdate {
            ord_date: DateTime::from_timestamp(1_714_557_600, 0),
            ..OrderUpdate::default()
        };
        assert!(past.validate().is_ok());
        assert!(OrderUpdate::default().validate().is_ok());

        // Within the tolerated skew
        let now = OrderUpdate {
            ord_date: Some(Utc::now() + TimeDelta::minutes(1)),
            ..OrderUpdate::default()
        };
        assert!(now.validate().is_ok());
    }
}
