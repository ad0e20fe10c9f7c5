//! Article pricing with quantity discount tiers.
//!
//! Callers hand in a loosely typed [`PricingInput`] (numbers as they arrive
//! from JSON or a form) and get back an [`ArticlePricing`] that is known to be
//! consistent: integer positive price, integer thresholds of at least 2,
//! percentages in `(0, 100)`, unique thresholds, tiers sorted by threshold and
//! strictly increasing in discount.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    constants::pricing_limits::{INTEGER_LIMIT, MAX_DISCOUNT_PERCENTAGE, MIN_TIER_QUANTITY},
    error::ValidationError,
};

/// Untrusted pricing as supplied by a caller.
///
/// Deserialization never fails: fields that are missing or not numbers become
/// `NaN` and are rejected by [`validate_pricing`] with the error of the field
/// they belong to, and a `discounts` value that is not a list is treated as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct PricingInput {
    /// Price in minor currency units.
    pub price: f64,
    /// Optional discount tiers, in any order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounts: Option<Vec<DiscountTierInput>>,
}

impl PricingInput {
    /// Pricing with no discounts.
    pub fn new(price: f64) -> Self {
        Self {
            price,
            discounts: None,
        }
    }

    /// Append a discount tier.
    #[must_use]
    pub fn discount(mut self, minimum_quantity: f64, discount_percentage: f64) -> Self {
        self.discounts
            .get_or_insert_with(Vec::new)
            .push(DiscountTierInput {
                minimum_quantity,
                discount_percentage,
            });
        self
    }
}

/// Untrusted discount tier, see [`PricingInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct DiscountTierInput {
    /// Quantity at which the tier activates.
    pub minimum_quantity: f64,
    /// Percentage taken off the base price.
    pub discount_percentage: f64,
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(f64::NAN)
}

impl From<&Value> for DiscountTierInput {
    fn from(value: &Value) -> Self {
        Self {
            minimum_quantity: number(value.get("minimumQuantity")),
            discount_percentage: number(value.get("discountPercentage")),
        }
    }
}

impl From<Value> for DiscountTierInput {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<&Value> for PricingInput {
    fn from(value: &Value) -> Self {
        let discounts = match value.get("discounts") {
            Some(Value::Array(items)) => Some(items.iter().map(DiscountTierInput::from).collect()),
            _ => None,
        };

        Self {
            price: number(value.get("price")),
            discounts,
        }
    }
}

impl From<Value> for PricingInput {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<&ArticlePricing> for PricingInput {
    fn from(pricing: &ArticlePricing) -> Self {
        pricing.discounts.iter().fold(
            PricingInput {
                price: pricing.price as f64,
                discounts: Some(Vec::new()),
            },
            |input, tier| input.discount(tier.minimum_quantity as f64, tier.discount_percentage),
        )
    }
}

/// A discount tier: buying at least `minimum_quantity` takes
/// `discount_percentage` percent off the price.
///
/// Constructing a tier checks nothing; consistency is a property of a whole
/// [`ArticlePricing`] and is enforced by [`validate_pricing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTier {
    /// Quantity at which the tier activates (at least 2).
    pub minimum_quantity: u64,
    /// Percentage off the price, strictly between 0 and 100.
    #[serde(serialize_with = "serialize_percentage")]
    pub discount_percentage: f64,
}

/// Whole percentages are written as JSON integers (`5`, not `5.0`) so the
/// signed form matches what any other client would produce.
fn serialize_percentage<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match exact_integer(*value) {
        Some(whole) => serializer.serialize_u64(whole),
        None => serializer.serialize_f64(*value),
    }
}

/// Validated article pricing.
///
/// Only obtainable through [`validate_pricing`] (deserializing also validates),
/// so holding one means every rule has been checked. `discounts` is always
/// present, possibly empty, ascending by `minimum_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PricingInput")]
pub struct ArticlePricing {
    price: u64,
    discounts: Vec<DiscountTier>,
}

impl ArticlePricing {
    /// Pricing with no discount tiers. Fails for a zero price.
    pub fn flat(price: u64) -> Result<Self, ValidationError> {
        if price == 0 {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(Self {
            price,
            discounts: Vec::new(),
        })
    }

    // === Getters ===

    /// Price in minor currency units.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Discount tiers, ascending by minimum quantity.
    pub fn discounts(&self) -> &[DiscountTier] {
        &self.discounts
    }
}

impl TryFrom<PricingInput> for ArticlePricing {
    type Error = ValidationError;

    fn try_from(input: PricingInput) -> Result<Self, Self::Error> {
        validate_pricing(&input)
    }
}

impl TryFrom<&PricingInput> for ArticlePricing {
    type Error = ValidationError;

    fn try_from(input: &PricingInput) -> Result<Self, Self::Error> {
        validate_pricing(input)
    }
}

/// `n` as an unsigned integer, if it is finite, whole and fits in a `u64`.
fn exact_integer(n: f64) -> Option<u64> {
    (n.is_finite() && n.fract() == 0.0 && (0.0..INTEGER_LIMIT).contains(&n)).then(|| n as u64)
}

/// Validate and normalize pricing.
///
/// Rules are checked in a fixed order and the first violation is returned:
/// 1. price is an integer greater than 0,
/// 2. each tier, in input order: minimum quantity is an integer of at least 2,
///    then discount percentage is a number in `(0, 100)`,
/// 3. minimum quantities are unique,
/// 4. sorted by minimum quantity, each percentage is greater than the one
///    before it (the first is compared with 0).
///
/// # Example
/// ```
/// # use tollgate_common::{validate_pricing, PricingInput};
/// let pricing = validate_pricing(
///     &PricingInput::new(49.0).discount(20.0, 15.0).discount(10.0, 5.0),
/// )?;
///
/// assert_eq!(pricing.price(), 49);
/// assert_eq!(pricing.discounts()[0].minimum_quantity, 10);
/// assert_eq!(pricing.discounts()[1].minimum_quantity, 20);
/// # Ok::<_, tollgate_common::ValidationError>(())
/// ```
pub fn validate_pricing(input: &PricingInput) -> Result<ArticlePricing, ValidationError> {
    let price = exact_integer(input.price)
        .filter(|price| *price > 0)
        .ok_or(ValidationError::InvalidPrice)?;

    let raw = input.discounts.as_deref().unwrap_or_default();

    let mut discounts = Vec::with_capacity(raw.len());
    for tier in raw {
        let minimum_quantity = exact_integer(tier.minimum_quantity)
            .filter(|quantity| *quantity >= MIN_TIER_QUANTITY)
            .ok_or(ValidationError::InvalidMinimumQuantity)?;

        let discount_percentage = tier.discount_percentage;
        if !(discount_percentage.is_finite()
            && discount_percentage > 0.0
            && discount_percentage < MAX_DISCOUNT_PERCENTAGE)
        {
            return Err(ValidationError::InvalidDiscountPercentage);
        }

        discounts.push(DiscountTier {
            minimum_quantity,
            discount_percentage,
        });
    }

    let mut seen = HashSet::with_capacity(discounts.len());
    for tier in &discounts {
        if !seen.insert(tier.minimum_quantity) {
            return Err(ValidationError::DuplicateMinimumQuantity {
                minimum_quantity: tier.minimum_quantity,
            });
        }
    }

    discounts.sort_by_key(|tier| tier.minimum_quantity);

    let mut previous = 0.0;
    for tier in &discounts {
        if tier.discount_percentage <= previous {
            return Err(ValidationError::NonIncreasingDiscount);
        }
        previous = tier.discount_percentage;
    }

    Ok(ArticlePricing { price, discounts })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tier(minimum_quantity: u64, discount_percentage: f64) -> DiscountTier {
        DiscountTier {
            minimum_quantity,
            discount_percentage,
        }
    }

    #[test]
    fn positive_integer_price_without_discounts() {
        for price in [1_u64, 2, 49, 100, 99_999, 9_007_199_254_740_991] {
            let pricing = validate_pricing(&PricingInput::new(price as f64)).unwrap();
            assert_eq!(pricing.price(), price);
            assert!(pricing.discounts().is_empty());
        }
    }

    #[test]
    fn integers_beyond_double_precision_round_trip() {
        for price in [1_u64 << 53, 1 << 60] {
            let pricing = validate_pricing(&PricingInput::new(price as f64)).unwrap();
            assert_eq!(pricing.price(), price);

            let flat = ArticlePricing::flat(price).unwrap();
            assert_eq!(validate_pricing(&PricingInput::from(&flat)), Ok(flat.clone()));

            let json = serde_json::to_value(&flat).unwrap();
            assert_eq!(serde_json::from_value::<ArticlePricing>(json).unwrap(), flat);
        }

        let pricing = validate_pricing(&PricingInput::new(49.0).discount((1_u64 << 60) as f64, 5.0))
            .unwrap();
        assert_eq!(pricing.discounts()[0].minimum_quantity, 1 << 60);
    }

    #[test]
    fn rejects_bad_prices() {
        for price in [
            0.0,
            -0.0,
            -1.0,
            -49.0,
            0.5,
            49.99,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            1e300,
            INTEGER_LIMIT,
        ] {
            assert_eq!(
                validate_pricing(&PricingInput::new(price)),
                Err(ValidationError::InvalidPrice),
                "{price}"
            );
        }
    }

    #[test]
    fn sorts_tiers_by_minimum_quantity() {
        let pricing = validate_pricing(
            &PricingInput::new(49.0)
                .discount(20.0, 15.0)
                .discount(10.0, 5.0),
        )
        .unwrap();

        assert_eq!(pricing.price(), 49);
        assert_eq!(pricing.discounts(), &[tier(10, 5.0), tier(20, 15.0)]);
    }

    #[test]
    fn sorted_output_is_strictly_increasing() {
        let pricing = validate_pricing(
            &PricingInput::new(300.0)
                .discount(50.0, 40.5)
                .discount(2.0, 0.5)
                .discount(25.0, 30.0)
                .discount(5.0, 10.0),
        )
        .unwrap();

        let quantities: Vec<u64> = pricing.discounts().iter().map(|t| t.minimum_quantity).collect();
        assert_eq!(quantities, vec![2, 5, 25, 50]);

        let mut previous = 0.0;
        for t in pricing.discounts() {
            assert!(t.discount_percentage > previous);
            previous = t.discount_percentage;
        }
    }

    #[test]
    fn rejects_equal_or_decreasing_percentages() {
        assert_eq!(
            validate_pricing(&PricingInput::new(49.0).discount(10.0, 5.0).discount(20.0, 5.0)),
            Err(ValidationError::NonIncreasingDiscount)
        );
        // Input order does not matter, only order by quantity.
        assert_eq!(
            validate_pricing(&PricingInput::new(49.0).discount(10.0, 15.0).discount(20.0, 5.0)),
            Err(ValidationError::NonIncreasingDiscount)
        );
    }

    #[test]
    fn rejects_duplicate_quantities_whatever_the_percentages() {
        assert_eq!(
            validate_pricing(&PricingInput::new(49.0).discount(10.0, 5.0).discount(10.0, 15.0)),
            Err(ValidationError::DuplicateMinimumQuantity {
                minimum_quantity: 10
            })
        );
        // Duplicates are reported before monotonicity is looked at.
        assert_eq!(
            validate_pricing(
                &PricingInput::new(49.0)
                    .discount(10.0, 50.0)
                    .discount(20.0, 5.0)
                    .discount(20.0, 5.0)
            ),
            Err(ValidationError::DuplicateMinimumQuantity {
                minimum_quantity: 20
            })
        );
    }

    #[test]
    fn rejects_bad_tier_fields() {
        for quantity in [1.0, 0.0, -2.0, 2.5, f64::NAN, f64::INFINITY] {
            assert_eq!(
                validate_pricing(&PricingInput::new(10.0).discount(quantity, 5.0)),
                Err(ValidationError::InvalidMinimumQuantity),
                "{quantity}"
            );
        }
        for percentage in [0.0, -1.0, 100.0, 150.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                validate_pricing(&PricingInput::new(10.0).discount(2.0, percentage)),
                Err(ValidationError::InvalidDiscountPercentage),
                "{percentage}"
            );
        }
    }

    #[test]
    fn rejection_priority() {
        // Price before tiers.
        assert_eq!(
            validate_pricing(&PricingInput::new(0.0).discount(1.0, 500.0)),
            Err(ValidationError::InvalidPrice)
        );
        // Quantity before percentage within a tier.
        assert_eq!(
            validate_pricing(&PricingInput::new(10.0).discount(1.0, 500.0)),
            Err(ValidationError::InvalidMinimumQuantity)
        );
        // Field checks of a later tier before uniqueness of earlier ones.
        assert_eq!(
            validate_pricing(
                &PricingInput::new(10.0)
                    .discount(2.0, 5.0)
                    .discount(2.0, 5.0)
                    .discount(3.0, 100.0)
            ),
            Err(ValidationError::InvalidDiscountPercentage)
        );
    }

    #[test]
    fn lenient_deserialization() {
        let input: PricingInput = serde_json::from_value(json!({
            "price": 49,
            "discounts": [
                { "minimumQuantity": 20, "discountPercentage": 15 },
                { "minimumQuantity": 10, "discountPercentage": 5 }
            ]
        }))
        .unwrap();
        let pricing = validate_pricing(&input).unwrap();
        assert_eq!(
            serde_json::to_value(&pricing).unwrap(),
            json!({
                "price": 49,
                "discounts": [
                    { "minimumQuantity": 10, "discountPercentage": 5 },
                    { "minimumQuantity": 20, "discountPercentage": 15 }
                ]
            })
        );

        // Not a list: treated as absent.
        let input: PricingInput =
            serde_json::from_value(json!({ "price": 10, "discounts": "lots" })).unwrap();
        assert_eq!(
            serde_json::to_value(validate_pricing(&input).unwrap()).unwrap(),
            json!({ "price": 10, "discounts": [] })
        );

        // Wrong types are rejected with the field's own error.
        let input: PricingInput = serde_json::from_value(json!({ "price": "10" })).unwrap();
        assert_eq!(validate_pricing(&input), Err(ValidationError::InvalidPrice));

        let input: PricingInput =
            serde_json::from_value(json!({ "price": 10, "discounts": [7] })).unwrap();
        assert_eq!(
            validate_pricing(&input),
            Err(ValidationError::InvalidMinimumQuantity)
        );
    }

    #[test]
    fn fractional_percentages_survive_serialization() {
        let pricing = validate_pricing(&PricingInput::new(10.0).discount(3.0, 12.5)).unwrap();
        assert_eq!(
            serde_json::to_value(&pricing).unwrap(),
            json!({ "price": 10, "discounts": [{ "minimumQuantity": 3, "discountPercentage": 12.5 }] })
        );
    }

    #[test]
    fn deserializing_validated_pricing_validates() {
        let pricing: ArticlePricing =
            serde_json::from_value(json!({ "price": 10, "discounts": [
                { "minimumQuantity": 5, "discountPercentage": 20 },
                { "minimumQuantity": 2, "discountPercentage": 10 }
            ] }))
            .unwrap();
        assert_eq!(pricing.discounts(), &[tier(2, 10.0), tier(5, 20.0)]);

        let err = serde_json::from_value::<ArticlePricing>(json!({ "price": -5 })).unwrap_err();
        assert!(err.to_string().contains("Price must be an integer greater than 0."));
    }

    #[test]
    fn revalidating_is_a_no_op() {
        let pricing = validate_pricing(
            &PricingInput::new(49.0)
                .discount(20.0, 15.0)
                .discount(10.0, 5.0),
        )
        .unwrap();
        assert_eq!(validate_pricing(&PricingInput::from(&pricing)), Ok(pricing));
    }

    #[test]
    fn flat_pricing() {
        assert_eq!(ArticlePricing::flat(25).unwrap().price(), 25);
        assert_eq!(ArticlePricing::flat(0), Err(ValidationError::InvalidPrice));
    }
}
