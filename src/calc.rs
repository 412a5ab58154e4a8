//! Display quantities derived from user input and the static tariff.

use crate::model::{Charger, Rupees};
use crate::Error;

/// Assumed draw in kWh per hour of charging.
pub const ASSUMED_POWER_KW: f64 = 40.0;
pub const PLATFORM_FEE: Rupees = 5.0;
/// GST applied to the charging cost.
pub const TAX_RATE: f64 = 0.18;
/// Charging cost shown in the payment summary when nothing was booked.
pub const SAMPLE_BASE_COST: Rupees = 245.0;

const PRICE_SUFFIX: &str = "/kWh";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub assumed_power_kw: f64,
    pub platform_fee: Rupees,
    pub tax_rate: f64,
    pub sample_base_cost: Rupees,
}

impl Default for Tariff {
    fn default() -> Self {
        Tariff {
            assumed_power_kw: ASSUMED_POWER_KW,
            platform_fee: PLATFORM_FEE,
            tax_rate: TAX_RATE,
            sample_base_cost: SAMPLE_BASE_COST,
        }
    }
}

/// Extracts the per-kWh price from a display string such as `₹18/kWh`.
pub fn parse_unit_price(price: &str) -> Result<Rupees, Error> {
    let trimmed = price.trim();
    let number = trimmed
        .strip_suffix(PRICE_SUFFIX)
        .unwrap_or(trimmed)
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(Error::PriceParseError(price.to_string())),
    }
}

/// `round(duration / 60 * power * unit_price)`
pub fn estimated_cost(duration_minutes: u32, assumed_power_kw: f64, unit_price: Rupees) -> Rupees {
    (f64::from(duration_minutes) / 60.0 * assumed_power_kw * unit_price).round()
}

/// One point per ₹10 spent, rounded. Negative costs earn nothing.
pub fn reward_points(cost: Rupees) -> u64 {
    if cost > 0.0 {
        (cost / 10.0).round() as u64
    } else {
        0
    }
}

fn round_paise(amount: Rupees) -> Rupees {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub cost: Rupees,
    pub points: u64,
    /// Set when the charger's price could not be read; `cost` is then zero.
    pub price_error: Option<Error>,
}

impl CostEstimate {
    pub fn for_charger(charger: &Charger, duration_minutes: u32, tariff: &Tariff) -> Self {
        match parse_unit_price(&charger.price) {
            Ok(unit_price) => {
                let cost = estimated_cost(duration_minutes, tariff.assumed_power_kw, unit_price);
                CostEstimate {
                    cost,
                    points: reward_points(cost),
                    price_error: None,
                }
            }
            Err(e) => {
                log::warn!("charger {}: {}; estimating zero cost", charger.id, e);
                CostEstimate {
                    cost: 0.0,
                    points: 0,
                    price_error: Some(e),
                }
            }
        }
    }
}

/// Fixed-structure breakdown shown before paying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentSummary {
    pub base: Rupees,
    pub platform_fee: Rupees,
    pub tax: Rupees,
    pub total: Rupees,
}

impl PaymentSummary {
    pub fn new(base: Rupees, tariff: &Tariff) -> Self {
        let base = round_paise(base);
        let tax = round_paise(base * tariff.tax_rate);
        let platform_fee = round_paise(tariff.platform_fee);
        PaymentSummary {
            base,
            platform_fee,
            tax,
            total: round_paise(base + platform_fee + tax),
        }
    }
}

/// Bounded, stepped integer input. The value never leaves `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    min: u32,
    max: u32,
    step: u32,
    value: u32,
}

impl Slider {
    pub fn new(min: u32, max: u32, step: u32, initial: u32) -> Self {
        let mut slider = Slider {
            min,
            max: max.max(min),
            step: step.max(1),
            value: min,
        };
        slider.set(i64::from(initial));
        slider
    }

    /// Battery level to charge up to, in percent.
    pub fn target_battery() -> Self {
        Slider::new(20, 100, 5, 80)
    }

    /// Requested charging time, in minutes.
    pub fn duration() -> Self {
        Slider::new(15, 180, 15, 60)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    /// Clamps `requested` into bounds, snaps it to the nearest step and
    /// returns the stored value.
    pub fn set(&mut self, requested: i64) -> u32 {
        let clamped = requested.clamp(i64::from(self.min), i64::from(self.max)) as u32;
        let steps = (clamped - self.min + self.step / 2) / self.step;
        self.value = (self.min + steps * self.step).min(self.max);
        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn charger(price: &str) -> Charger {
        Charger {
            id: 1,
            price: price.to_string(),
            ..Charger::default()
        }
    }

    #[test]
    fn parses_display_prices() {
        assert_eq!(Ok(18.0), parse_unit_price("₹18/kWh"));
        assert_eq!(Ok(14.5), parse_unit_price(" ₹14.5/kWh "));
        assert_eq!(Ok(21.0), parse_unit_price("21"));
        assert_eq!(
            Err(Error::PriceParseError(String::from("free"))),
            parse_unit_price("free")
        );
        assert!(parse_unit_price("₹/kWh").is_err());
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert_eq!(
            Err(Error::PriceParseError(String::from("₹-18/kWh"))),
            parse_unit_price("₹-18/kWh")
        );
        assert_eq!(
            Err(Error::PriceParseError(String::from("-₹18/kWh"))),
            parse_unit_price("-₹18/kWh")
        );
        assert_eq!(Ok(0.0), parse_unit_price("₹0/kWh"));
    }

    #[test]
    fn sixty_minutes_at_eighteen_rupees() {
        let estimate = CostEstimate::for_charger(&charger("₹18/kWh"), 60, &Tariff::default());
        assert_eq!(720.0, estimate.cost);
        assert_eq!(72, estimate.points);
        assert_eq!(None, estimate.price_error);
    }

    #[test]
    fn cost_is_non_decreasing_in_duration() {
        for price in [14.0, 15.0, 16.0, 18.0, 20.0, 21.0].iter() {
            let mut last = 0.0;
            for minutes in (0..=240).step_by(5) {
                let cost = estimated_cost(minutes, ASSUMED_POWER_KW, *price);
                assert!(cost >= last, "{} min at {} gave {}", minutes, price, cost);
                last = cost;
            }
        }
    }

    #[test]
    fn unreadable_price_estimates_zero_and_flags_error() {
        let estimate = CostEstimate::for_charger(&charger("TBD"), 90, &Tariff::default());
        assert_eq!(0.0, estimate.cost);
        assert_eq!(0, estimate.points);
        assert_eq!(
            Some(Error::PriceParseError(String::from("TBD"))),
            estimate.price_error
        );
    }

    #[test]
    fn reward_points_round_cost_over_ten() {
        assert_eq!(0, reward_points(0.0));
        assert_eq!(0, reward_points(4.9));
        assert_eq!(1, reward_points(5.0));
        assert_eq!(13, reward_points(125.5));
        assert_eq!(72, reward_points(720.0));
        assert_eq!(0, reward_points(-50.0));
    }

    #[test]
    fn payment_summary_adds_fee_and_tax() {
        let summary = PaymentSummary::new(SAMPLE_BASE_COST, &Tariff::default());
        assert_eq!(245.0, summary.base);
        assert_eq!(5.0, summary.platform_fee);
        assert_eq!(44.1, summary.tax);
        assert_eq!(294.1, summary.total);

        let summary = PaymentSummary::new(720.0, &Tariff::default());
        assert_eq!(129.6, summary.tax);
        assert_eq!(854.6, summary.total);
    }

    #[test]
    fn sliders_stay_within_bounds() {
        let mut target = Slider::target_battery();
        assert_eq!(80, target.value());
        assert_eq!(20, target.set(20));
        assert_eq!(100, target.set(100));
        assert_eq!(20, target.set(-5));
        assert_eq!(100, target.set(250));
        assert_eq!(65, target.set(63));

        let mut duration = Slider::duration();
        assert_eq!(60, duration.value());
        assert_eq!(15, duration.set(15));
        assert_eq!(180, duration.set(180));
        assert_eq!(15, duration.set(0));
        assert_eq!(180, duration.set(1000));
        assert_eq!(90, duration.set(95));
        assert_eq!((15, 180), duration.bounds());
    }
}
