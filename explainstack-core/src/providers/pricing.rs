//! Approximate model pricing used for cost estimation
//!
//! Prices are indicative only and never affect request handling.

use serde::{Deserialize, Serialize};

/// Share of an estimated token count treated as input, in tenths
const INPUT_SHARE_TENTHS: u64 = 7;

/// Share of an estimated token count treated as output, in tenths
const OUTPUT_SHARE_TENTHS: u64 = 3;

/// Token quantity a price is quoted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingUnit {
    PerThousand,
    PerMillion,
}

impl PricingUnit {
    pub fn tokens(&self) -> f64 {
        match self {
            PricingUnit::PerThousand => 1_000.0,
            PricingUnit::PerMillion => 1_000_000.0,
        }
    }
}

/// USD price for input and output tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub input: f64,
    pub output: f64,
}

impl ModelPrice {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Static price table for one provider
#[derive(Debug, Clone, Copy)]
pub struct PricingTable {
    pub unit: PricingUnit,
    pub models: &'static [(&'static str, ModelPrice)],
    /// Tier applied to models missing from `models`
    pub fallback: Option<ModelPrice>,
}

impl PricingTable {
    /// Price for a model, falling back to the default tier
    pub fn price_for(&self, model: &str) -> Option<ModelPrice> {
        self.models
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, price)| *price)
            .or(self.fallback)
    }

    /// Estimated USD cost of `tokens` assuming a 70/30 input/output split
    pub fn estimate(&self, model: &str, tokens: u64) -> f64 {
        self.price_for(model)
            .map(|price| estimate_with(price, self.unit, tokens))
            .unwrap_or(0.0)
    }
}

/// Cost of `tokens` at a given price, assuming a 70/30 input/output split
pub fn estimate_with(price: ModelPrice, unit: PricingUnit, tokens: u64) -> f64 {
    let input_tokens = share_of(tokens, INPUT_SHARE_TENTHS);
    let output_tokens = share_of(tokens, OUTPUT_SHARE_TENTHS);

    let input_cost = input_tokens as f64 / unit.tokens() * price.input;
    let output_cost = output_tokens as f64 / unit.tokens() * price.output;

    input_cost + output_cost
}

/// `floor(tokens * tenths / 10)` without overflowing for large counts
fn share_of(tokens: u64, tenths: u64) -> u64 {
    tokens / 10 * tenths + tokens % 10 * tenths / 10
}
