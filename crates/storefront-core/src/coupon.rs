use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("coupon code is required")]
    MissingCode,

    #[error("discount must be between 0 and 100 percent, got {0}")]
    InvalidDiscount(Decimal),

    #[error("minimum amount {min} exceeds maximum amount {max}")]
    InvertedBounds { min: Decimal, max: Decimal },

    #[error("usage limit must be at least 1")]
    ZeroUsageLimit,

    #[error("coupon {0} has expired")]
    Expired(String),

    #[error("coupon {0} has reached its usage limit")]
    UsageExhausted(String),

    #[error("order total must be at least {min}")]
    BelowMinimum { min: Decimal },

    #[error("coupon {0} is not available for this account")]
    UserNotEligible(String),

    #[error("coupon {0} does not apply to any item in the cart")]
    NoEligibleProduct(String),
}

/// A percentage discount code managed from the admin back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    /// Percentage off the order subtotal.
    pub discount: Decimal,
    /// Smallest subtotal the coupon applies to.
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    /// Cap on the discount amount.
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    pub expiry: DateTime<Utc>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    /// Restricts the coupon to these user ids; empty means everyone.
    #[serde(default)]
    pub applicable_users: Vec<String>,
    /// Restricts the coupon to these product ids; empty means every product.
    #[serde(default)]
    pub applicable_products: Vec<String>,
}

impl Coupon {
    /// Admin form validation, run before create or update.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), CouponError> {
        if self.code.trim().is_empty() {
            return Err(CouponError::MissingCode);
        }
        if self.discount <= Decimal::ZERO || self.discount > Decimal::ONE_HUNDRED {
            return Err(CouponError::InvalidDiscount(self.discount));
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(CouponError::InvertedBounds { min, max });
            }
        }
        if self.usage_limit == Some(0) {
            return Err(CouponError::ZeroUsageLimit);
        }
        if self.expiry <= now {
            return Err(CouponError::Expired(self.code.clone()));
        }
        Ok(())
    }

    /// Checks whether the coupon can be applied to a cart.
    ///
    /// # Errors
    ///
    /// Returns the first reason the coupon does not apply.
    pub fn check_applicable(
        &self,
        user_id: Option<&str>,
        subtotal: Decimal,
        product_ids: &[&str],
        now: DateTime<Utc>,
    ) -> Result<(), CouponError> {
        if self.expiry <= now {
            return Err(CouponError::Expired(self.code.clone()));
        }
        if self
            .usage_limit
            .is_some_and(|limit| self.used_count >= limit)
        {
            return Err(CouponError::UsageExhausted(self.code.clone()));
        }
        if let Some(min) = self.min_amount {
            if subtotal < min {
                return Err(CouponError::BelowMinimum { min });
            }
        }
        if !self.applicable_users.is_empty()
            && !user_id.is_some_and(|id| self.applicable_users.iter().any(|u| u == id))
        {
            return Err(CouponError::UserNotEligible(self.code.clone()));
        }
        if !self.applicable_products.is_empty()
            && !product_ids
                .iter()
                .any(|p| self.applicable_products.iter().any(|a| a == *p))
        {
            return Err(CouponError::NoEligibleProduct(self.code.clone()));
        }
        Ok(())
    }

    /// Discount for `subtotal`, capped at `max_amount` and rounded to cents.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let raw = subtotal * self.discount / Decimal::ONE_HUNDRED;
        let capped = match self.max_amount {
            Some(max) => raw.min(max),
            None => raw,
        };
        capped.round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn make_coupon() -> Coupon {
        Coupon {
            id: None,
            code: "SPRING10".to_string(),
            discount: Decimal::from(10),
            min_amount: Some(Decimal::from(50)),
            max_amount: Some(Decimal::from(30)),
            expiry: Utc::now() + Duration::days(7),
            usage_limit: Some(100),
            used_count: 0,
            applicable_users: vec![],
            applicable_products: vec![],
        }
    }

    #[test]
    fn valid_coupon_passes_validation() {
        assert_eq!(make_coupon().validate(Utc::now()), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_code() {
        let mut c = make_coupon();
        c.code = "  ".to_string();
        assert_eq!(c.validate(Utc::now()), Err(CouponError::MissingCode));
    }

    #[test]
    fn validate_rejects_discount_out_of_range() {
        let mut c = make_coupon();
        c.discount = Decimal::from(150);
        assert!(matches!(
            c.validate(Utc::now()),
            Err(CouponError::InvalidDiscount(_))
        ));
        c.discount = Decimal::ZERO;
        assert!(matches!(
            c.validate(Utc::now()),
            Err(CouponError::InvalidDiscount(_))
        ));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let mut c = make_coupon();
        c.min_amount = Some(Decimal::from(60));
        assert!(matches!(
            c.validate(Utc::now()),
            Err(CouponError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_usage_limit_and_past_expiry() {
        let mut c = make_coupon();
        c.usage_limit = Some(0);
        assert_eq!(c.validate(Utc::now()), Err(CouponError::ZeroUsageLimit));

        let mut c = make_coupon();
        c.expiry = Utc::now() - Duration::days(1);
        assert!(matches!(c.validate(Utc::now()), Err(CouponError::Expired(_))));
    }

    #[test]
    fn check_applicable_enforces_minimum_and_usage() {
        let mut c = make_coupon();
        let now = Utc::now();
        assert_eq!(
            c.check_applicable(None, Decimal::from(40), &["p1"], now),
            Err(CouponError::BelowMinimum {
                min: Decimal::from(50)
            })
        );
        assert_eq!(c.check_applicable(None, Decimal::from(80), &["p1"], now), Ok(()));

        c.used_count = 100;
        assert!(matches!(
            c.check_applicable(None, Decimal::from(80), &["p1"], now),
            Err(CouponError::UsageExhausted(_))
        ));
    }

    #[test]
    fn check_applicable_restricts_users_and_products() {
        let mut c = make_coupon();
        let now = Utc::now();
        c.applicable_users = vec!["u1".to_string()];
        assert!(matches!(
            c.check_applicable(None, Decimal::from(80), &["p1"], now),
            Err(CouponError::UserNotEligible(_))
        ));
        assert!(matches!(
            c.check_applicable(Some("u2"), Decimal::from(80), &["p1"], now),
            Err(CouponError::UserNotEligible(_))
        ));

        c.applicable_products = vec!["p2".to_string()];
        assert!(matches!(
            c.check_applicable(Some("u1"), Decimal::from(80), &["p1"], now),
            Err(CouponError::NoEligibleProduct(_))
        ));
        assert_eq!(
            c.check_applicable(Some("u1"), Decimal::from(80), &["p1", "p2"], now),
            Ok(())
        );
    }

    #[test]
    fn discount_is_capped_by_max_amount() {
        let c = make_coupon();
        assert_eq!(c.discount_for(Decimal::from(100)), Decimal::from(10));
        assert_eq!(c.discount_for(Decimal::from(1000)), Decimal::from(30));
    }

    #[test]
    fn discount_rounds_to_cents() {
        let mut c = make_coupon();
        c.max_amount = None;
        c.discount = Decimal::new(125, 1);
        assert_eq!(c.discount_for(Decimal::new(1999, 2)), Decimal::new(250, 2));
    }
}
