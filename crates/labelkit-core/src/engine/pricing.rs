use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::error::RuleError;
use crate::lookup::schema::PriceTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLadderEntry {
    pub currency: String,
    pub amount: Decimal,
}

/// One price per supported currency, in the table's currency order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriceLadder {
    entries: Vec<PriceLadderEntry>,
    #[serde(skip)]
    reference_currency: String,
}

impl PriceLadder {
    pub fn entries(&self) -> &[PriceLadderEntry] {
        &self.entries
    }

    pub fn get(&self, currency: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.currency == currency)
            .map(|e| e.amount)
    }

    /// The base price the ladder was generated from.
    pub fn reference(&self) -> Option<Decimal> {
        self.get(&self.reference_currency)
    }

    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive the full price ladder from a base price in the reference currency.
///
/// A price point whose reference amount equals `base_price` supplies the
/// amounts for the currencies it lists. Everything else is converted with
/// the table's rate and rounded half-up to the currency's decimal places.
/// Either every currency gets a price or the call fails.
pub fn generate(base_price: Decimal, table: &PriceTable) -> Result<PriceLadder, RuleError> {
    if base_price <= Decimal::ZERO {
        return Err(RuleError::InvalidPrice {
            reason: format!("base price must be positive, got {base_price}"),
        });
    }

    let reference = table.reference_currency.as_str();
    let price_point = table
        .price_points
        .iter()
        .find(|row| row.get(reference) == Some(&base_price));
    if price_point.is_some() {
        debug!(%base_price, "using price point row");
    }

    let mut entries = Vec::with_capacity(table.currencies.len());
    let mut missing = Vec::new();
    if !table.currencies.iter().any(|c| c == reference) {
        missing.push(reference.to_string());
    }

    for currency in &table.currencies {
        let amount = if currency == reference {
            Some(base_price)
        } else if let Some(fixed) = price_point.and_then(|row| row.get(currency)) {
            Some(*fixed)
        } else {
            match table.rates.get(currency) {
                Some(rate) => Some(convert(
                    base_price,
                    *rate,
                    table.decimal_places_for(currency),
                )?),
                None => None,
            }
        };

        match amount {
            Some(amount) => entries.push(PriceLadderEntry {
                currency: currency.clone(),
                amount,
            }),
            None => missing.push(currency.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(RuleError::MissingRate {
            currencies: missing,
        });
    }

    Ok(PriceLadder {
        entries,
        reference_currency: reference.to_string(),
    })
}

fn convert(base_price: Decimal, rate: Decimal, dp: u32) -> Result<Decimal, RuleError> {
    let amount = base_price
        .checked_mul(rate)
        .ok_or_else(|| RuleError::InvalidPrice {
            reason: format!("base price {base_price} is too large to convert"),
        })?;
    Ok(amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}
