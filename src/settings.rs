use crate::calc::{Tariff, ASSUMED_POWER_KW, PLATFORM_FEE, SAMPLE_BASE_COST, TAX_RATE};
use crate::Error;
use config::Config;
use std::time::Duration;

pub const MAPS_URL: &str =
    "https://www.google.com/maps/search/?api=1&query=EV+Charging+Stations+near+me";

const ENV_PREFIX: &str = "UNWIRED";

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct UnwiredConfig {
    pub assumed_power_kw: f64,
    pub platform_fee: f64,
    pub tax_rate: f64,
    pub sample_base_cost: f64,
    pub initial_reward_points: u64,
    pub initial_progress: u8,
    /// Percent added to an active charge per clock tick; 0 keeps it static.
    pub progress_step: u8,
    pub clock_tick_ms: u64,
    pub listen_delay_ms: u64,
    pub maps_url: String,
}

impl Default for UnwiredConfig {
    fn default() -> Self {
        UnwiredConfig {
            assumed_power_kw: ASSUMED_POWER_KW,
            platform_fee: PLATFORM_FEE,
            tax_rate: TAX_RATE,
            sample_base_cost: SAMPLE_BASE_COST,
            initial_reward_points: 2450,
            initial_progress: 65,
            progress_step: 0,
            clock_tick_ms: 1000,
            listen_delay_ms: 2000,
            maps_url: String::from(MAPS_URL),
        }
    }
}

impl UnwiredConfig {
    pub fn tariff(&self) -> Tariff {
        Tariff {
            assumed_power_kw: self.assumed_power_kw,
            platform_fee: self.platform_fee,
            tax_rate: self.tax_rate,
            sample_base_cost: self.sample_base_cost,
        }
    }

    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.clock_tick_ms.max(1))
    }

    pub fn listen_delay(&self) -> Duration {
        Duration::from_millis(self.listen_delay_ms)
    }
}

fn config_err(e: config::ConfigError) -> Error {
    Error::Config(e.to_string())
}

/// Defaults overridden by `UNWIRED_*` environment variables.
pub fn read_settings() -> Result<UnwiredConfig, Error> {
    let defaults = UnwiredConfig::default();
    let mut settings = Config::default();
    settings
        .set_default("assumed_power_kw", defaults.assumed_power_kw)
        .map_err(config_err)?
        .set_default("platform_fee", defaults.platform_fee)
        .map_err(config_err)?
        .set_default("tax_rate", defaults.tax_rate)
        .map_err(config_err)?
        .set_default("sample_base_cost", defaults.sample_base_cost)
        .map_err(config_err)?
        .set_default("initial_reward_points", defaults.initial_reward_points as i64)
        .map_err(config_err)?
        .set_default("initial_progress", i64::from(defaults.initial_progress))
        .map_err(config_err)?
        .set_default("progress_step", i64::from(defaults.progress_step))
        .map_err(config_err)?
        .set_default("clock_tick_ms", defaults.clock_tick_ms as i64)
        .map_err(config_err)?
        .set_default("listen_delay_ms", defaults.listen_delay_ms as i64)
        .map_err(config_err)?
        .set_default("maps_url", defaults.maps_url)
        .map_err(config_err)?;
    settings
        .merge(config::Environment::with_prefix(ENV_PREFIX))
        .map_err(config_err)?;

    settings.try_into().map_err(config_err)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    // One test so the environment is not mutated concurrently.
    #[test]
    fn defaults_and_environment_overrides() {
        assert_eq!(UnwiredConfig::default(), read_settings().unwrap());

        env::set_var("UNWIRED_PROGRESS_STEP", "5");
        env::set_var("UNWIRED_ASSUMED_POWER_KW", "22");
        let settings = read_settings().unwrap();
        env::remove_var("UNWIRED_PROGRESS_STEP");
        env::remove_var("UNWIRED_ASSUMED_POWER_KW");

        assert_eq!(5, settings.progress_step);
        assert_eq!(22.0, settings.tariff().assumed_power_kw);
        assert_eq!(2450, settings.initial_reward_points);
        assert_eq!(Duration::from_secs(1), settings.clock_tick());
    }
}
