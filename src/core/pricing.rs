use crate::domain::model::DayOption;
use crate::utils::error::{BookingError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits of every quoted amount.
pub const PRICE_SCALE: u32 = 4;

/// Decimals of the ledger's native currency (1 coin = 10^18 smallest units).
pub const LEDGER_DECIMALS: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCalculator {
    price_per_day: Decimal,
}

impl PriceCalculator {
    /// 0.0005 per day, as hardcoded in the hotel contract.
    pub const DEFAULT_PRICE_PER_DAY: Decimal = Decimal::from_parts(5, 0, 0, false, 4);

    pub fn new(price_per_day: Decimal) -> Self {
        Self { price_per_day }
    }

    pub fn price_per_day(&self) -> Decimal {
        self.price_per_day
    }

    pub fn compute_price(&self, days_to_stay: i64) -> Result<Decimal> {
        if days_to_stay < 0 {
            return Err(BookingError::invalid_input(
                "days_to_stay",
                days_to_stay,
                "Number of days cannot be negative",
            ));
        }

        let amount = Decimal::from(days_to_stay)
            .checked_mul(self.price_per_day)
            .ok_or_else(|| {
                BookingError::invalid_input("days_to_stay", days_to_stay, "Price overflows")
            })?;

        Ok(amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Prices a raw form value; anything that is not a whole number is rejected.
    pub fn compute_price_for_input(&self, raw_days: &str) -> Result<Decimal> {
        let days = raw_days.trim().parse::<i64>().map_err(|_| {
            BookingError::invalid_input("days_to_stay", raw_days, "Not a whole number of days")
        })?;
        self.compute_price(days)
    }

    pub fn format_amount(amount: Decimal) -> String {
        format!("{:.*}", PRICE_SCALE as usize, amount)
    }
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PRICE_PER_DAY)
    }
}

/// Converts a decimal amount into the ledger's smallest unit.
pub fn to_smallest_unit(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() {
        return Err(BookingError::invalid_input(
            "total_amount_paid",
            amount,
            "Amount cannot be negative",
        ));
    }

    let scaled = amount
        .checked_mul(Decimal::from(10u64.pow(LEDGER_DECIMALS)))
        .ok_or_else(|| BookingError::invalid_input("total_amount_paid", amount, "Amount too large"))?;

    if !scaled.fract().is_zero() {
        return Err(BookingError::invalid_input(
            "total_amount_paid",
            amount,
            format!("More than {} fractional digits", LEDGER_DECIMALS),
        ));
    }

    scaled
        .to_u128()
        .ok_or_else(|| BookingError::invalid_input("total_amount_paid", amount, "Amount too large"))
}

/// The stay lengths a guest may pick, `1..=max_stay`, with their prices.
pub fn day_options(max_stay: u32, calculator: &PriceCalculator) -> Result<Vec<DayOption>> {
    (1..=max_stay)
        .map(|days| {
            let price = calculator.compute_price(i64::from(days))?;
            let label = if days == 1 {
                "1 day".to_string()
            } else {
                format!("{} days", days)
            };
            Ok(DayOption { days, label, price })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_known_prices() {
        let calc = PriceCalculator::default();
        assert_eq!(calc.compute_price(3).unwrap(), dec("0.0015"));
        assert_eq!(calc.compute_price(10).unwrap(), dec("0.0050"));
        assert_eq!(PriceCalculator::format_amount(calc.compute_price(10).unwrap()), "0.0050");
    }

    #[test]
    fn test_zero_days_is_zero() {
        let calc = PriceCalculator::default();
        assert!(calc.compute_price(0).unwrap().is_zero());
    }

    #[test]
    fn test_price_is_linear_and_strictly_increasing() {
        let calc = PriceCalculator::default();
        let mut previous = Decimal::ZERO;
        for days in 1..=10 {
            let price = calc.compute_price(days).unwrap();
            assert_eq!(price, Decimal::from(days) * calc.price_per_day());
            assert!(price > previous);
            previous = price;
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let calc = PriceCalculator::new(dec("0.00005"));
        assert_eq!(calc.compute_price(1).unwrap(), dec("0.0001"));
        assert_eq!(calc.compute_price(3).unwrap(), dec("0.0002"));
    }

    #[test]
    fn test_malformed_input() {
        let calc = PriceCalculator::default();
        assert!(matches!(
            calc.compute_price_for_input("three"),
            Err(BookingError::InvalidInput { .. })
        ));
        assert!(calc.compute_price(-1).is_err());
        assert_eq!(calc.compute_price_for_input(" 2 ").unwrap(), dec("0.0010"));
    }

    #[test]
    fn test_to_smallest_unit() {
        assert_eq!(to_smallest_unit(dec("0.0015")).unwrap(), 1_500_000_000_000_000);
        assert_eq!(to_smallest_unit(Decimal::ONE).unwrap(), 1_000_000_000_000_000_000);
        assert!(to_smallest_unit(dec("-0.1")).is_err());
    }

    #[test]
    fn test_day_options_labels() {
        let options = day_options(3, &PriceCalculator::default()).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "1 day");
        assert_eq!(options[2].label, "3 days");
        assert_eq!(options[2].price, dec("0.0015"));
    }
}
