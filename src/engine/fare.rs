use std::sync::Arc;

use chrono::{Local, NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::geo::{distance, Location};

pub const BASE_FARE: Decimal = dec!(2.5);
pub const PRICE_PER_STEP: Decimal = dec!(1.0);
pub const PEAK_MULTIPLIER: Decimal = dec!(1.5);
pub const WEATHER_SURCHARGE: Decimal = dec!(1.25);
pub const MIN_FARE: Decimal = dec!(5.0);

pub trait Clock: Send + Sync {
    fn local_time(&self) -> NaiveTime;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn local_time(&self) -> NaiveTime {
        self.0
    }
}

pub trait WeatherSignal: Send + Sync {
    fn is_bad_weather(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticWeather(pub bool);

impl WeatherSignal for StaticWeather {
    fn is_bad_weather(&self) -> bool {
        self.0
    }
}

/// Caller-forced surcharges, applied on top of the clock and weather signals.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Surcharges {
    #[serde(default)]
    pub peak: bool,
    #[serde(default)]
    pub bad_weather: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub pickup: Location,
    pub destination: Location,
    pub distance: u32,
    pub peak_applied: bool,
    pub weather_applied: bool,
    pub amount: Decimal,
}

#[derive(Clone)]
pub struct FareCalculator {
    clock: Arc<dyn Clock>,
    weather: Arc<dyn WeatherSignal>,
}

impl FareCalculator {
    pub fn new(clock: Arc<dyn Clock>, weather: Arc<dyn WeatherSignal>) -> Self {
        Self { clock, weather }
    }

    /// Peak windows are 07:00-09:59 and 17:00-19:59 on the local clock.
    pub fn is_peak_hour(&self) -> bool {
        let hour = self.clock.local_time().hour();
        (7..=9).contains(&hour) || (17..=19).contains(&hour)
    }

    pub fn is_bad_weather(&self) -> bool {
        self.weather.is_bad_weather()
    }

    pub fn quote(&self, pickup: Location, destination: Location, overrides: Surcharges) -> FareQuote {
        let steps = distance(pickup, destination);
        let peak_applied = self.is_peak_hour() || overrides.peak;
        let weather_applied = self.is_bad_weather() || overrides.bad_weather;

        FareQuote {
            pickup,
            destination,
            distance: steps,
            peak_applied,
            weather_applied,
            amount: fare_for(steps, peak_applied, weather_applied),
        }
    }
}

pub fn fare_for(steps: u32, peak: bool, bad_weather: bool) -> Decimal {
    let mut fare = BASE_FARE + Decimal::from(steps) * PRICE_PER_STEP;

    if peak {
        fare *= PEAK_MULTIPLIER;
    }
    if bad_weather {
        fare *= WEATHER_SURCHARGE;
    }

    fare.max(MIN_FARE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    use super::{fare_for, FareCalculator, FixedClock, StaticWeather, Surcharges, MIN_FARE};
    use crate::geo::Location;

    fn calculator_at(hour: u32, minute: u32, bad_weather: bool) -> FareCalculator {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        FareCalculator::new(Arc::new(FixedClock(time)), Arc::new(StaticWeather(bad_weather)))
    }

    fn axis() -> Vec<Location> {
        ('A'..='Z').map(|c| Location::from_letter(c).unwrap()).collect()
    }

    fn loc(raw: &str) -> Location {
        raw.parse().unwrap()
    }

    #[test]
    fn off_peak_a_to_d_is_base_plus_three_steps() {
        let quote = calculator_at(11, 0, false).quote(loc("A"), loc("D"), Surcharges::default());
        assert_eq!(quote.distance, 3);
        assert!(!quote.peak_applied);
        assert_eq!(quote.amount, dec!(5.5));
    }

    #[test]
    fn short_trips_are_floored_at_minimum_fare() {
        let calculator = calculator_at(11, 0, false);
        assert_eq!(calculator.quote(loc("C"), loc("C"), Surcharges::default()).amount, MIN_FARE);
        assert_eq!(calculator.quote(loc("C"), loc("D"), Surcharges::default()).amount, MIN_FARE);
    }

    #[test]
    fn peak_clock_windows() {
        for (hour, minute, peak) in [
            (6, 59, false),
            (7, 0, true),
            (9, 59, true),
            (10, 0, false),
            (16, 59, false),
            (17, 0, true),
            (19, 59, true),
            (20, 0, false),
        ] {
            assert_eq!(calculator_at(hour, minute, false).is_peak_hour(), peak, "{hour}:{minute}");
        }
    }

    #[test]
    fn peak_hour_multiplies_fare() {
        let quote = calculator_at(8, 30, false).quote(loc("A"), loc("D"), Surcharges::default());
        assert!(quote.peak_applied);
        assert_eq!(quote.amount, dec!(8.25));
    }

    #[test]
    fn overrides_apply_outside_peak_and_clear_weather() {
        let calculator = calculator_at(11, 0, false);
        let peak = Surcharges { peak: true, bad_weather: false };
        let weather = Surcharges { peak: false, bad_weather: true };
        let both = Surcharges { peak: true, bad_weather: true };

        assert_eq!(calculator.quote(loc("A"), loc("D"), peak).amount, dec!(8.25));
        assert_eq!(calculator.quote(loc("A"), loc("D"), weather).amount, dec!(6.88));
        assert_eq!(calculator.quote(loc("A"), loc("D"), both).amount, dec!(10.31));
    }

    #[test]
    fn bad_weather_signal_applies_surcharge() {
        let quote = calculator_at(11, 0, true).quote(loc("A"), loc("E"), Surcharges::default());
        assert!(quote.weather_applied);
        assert_eq!(quote.amount, dec!(8.13));
    }

    #[test]
    fn multipliers_apply_before_the_floor() {
        // 2.5 * 1.5 * 1.25 = 4.6875, still below the minimum
        assert_eq!(fare_for(0, true, true), MIN_FARE);
    }

    #[test]
    fn quote_is_symmetric_over_the_axis() {
        let calculator = calculator_at(11, 0, false);
        for &p in &axis() {
            for &d in &axis() {
                let there = calculator.quote(p, d, Surcharges::default());
                let back = calculator.quote(d, p, Surcharges::default());
                assert_eq!(there.amount, back.amount, "{p}->{d}");
            }
        }
    }

    #[test]
    fn quote_never_drops_below_minimum_and_grows_with_distance() {
        for (peak, bad_weather) in [(false, false), (true, false), (false, true), (true, true)] {
            let fares: Vec<_> = (0..26).map(|steps| fare_for(steps, peak, bad_weather)).collect();
            assert!(fares.iter().all(|fare| *fare >= MIN_FARE));
            assert!(fares.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
