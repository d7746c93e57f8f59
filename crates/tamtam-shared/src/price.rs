use serde::{Deserialize, Serialize};

use crate::error::PriceError;

/// What to do when the price typed by the seller is not a number.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PricePolicy {
    /// Publish anyway with a price of 0.0.
    #[default]
    Lenient,
    /// Refuse to publish.
    Strict,
}

impl std::str::FromStr for PricePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown price policy: {other}")),
        }
    }
}

/// Parse the price field. Surrounding whitespace and one trailing float
/// type suffix (`f`, `F`, `d` or `D`, as in `15.5f`) are ignored; NaN and
/// infinities count as invalid since they have no JSON representation.
pub fn parse_price(text: &str, policy: PricePolicy) -> Result<f32, PriceError> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix(['f', 'F', 'd', 'D'])
        .unwrap_or(trimmed);
    match number.parse::<f32>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => match policy {
            PricePolicy::Lenient => {
                tracing::warn!(input = %text, "Bad price, using 0.0");
                Ok(0.0)
            }
            PricePolicy::Strict => Err(PriceError::Invalid(text.to_string())),
        },
    }
}
