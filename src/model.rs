use crate::Error;
use serde::Deserialize;
use serde_json::Value;

pub type KWh = f64;
pub type Rupees = f64;
pub type Percent = u8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargerStatus {
    Available,
    Busy,
    Unknown(String),
}

impl Default for ChargerStatus {
    fn default() -> Self {
        ChargerStatus::Unknown(String::new())
    }
}

impl ChargerStatus {
    pub fn label(&self) -> &str {
        match self {
            ChargerStatus::Available => "Available",
            ChargerStatus::Busy => "Busy",
            ChargerStatus::Unknown(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for ChargerStatus {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;

        Value::as_str(&value)
            .ok_or_else(|| serde::de::Error::missing_field("status"))
            .map(|s| match s {
                "Available" => ChargerStatus::Available,
                "Busy" => ChargerStatus::Busy,
                other => ChargerStatus::Unknown(other.to_string()),
            })
    }
}

/// Static description of a charging station. Never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charger {
    pub id: u32,
    pub name: String,
    pub distance: String,
    /// Display price, e.g. `₹18/kWh`.
    pub price: String,
    pub available: u32,
    pub total: u32,
    pub rating: f64,
    pub fast_charge: bool,
    pub status: ChargerStatus,
    pub features: Vec<String>,
    pub power: String,
    pub connector: String,
    pub last_charged: String,
    pub online: bool,
}

impl Charger {
    pub fn is_available(&self) -> bool {
        self.status == ChargerStatus::Available
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub model: String,
    pub plate: String,
    pub battery_percent: Percent,
    pub range_km: u32,
    pub capacity: KWh,
    pub full_range_km: u32,
    pub last_charged: String,
    pub efficiency_km_per_kwh: f64,
    pub month_km: u32,
    pub saved_co2_kg: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub savings: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reward {
    pub id: u32,
    pub name: String,
    pub points: u64,
    pub available: bool,
}

impl Reward {
    /// A reward can be redeemed when it is offered and `balance` covers it.
    pub fn redeemable_with(&self, balance: u64) -> bool {
        self.available && balance >= self.points
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedRoute {
    pub id: u32,
    pub name: String,
    pub duration: String,
    pub distance: String,
    pub charging_stops: u32,
    pub cost: String,
    pub savings: String,
    pub charging_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub distance: String,
}

/// Figures shown on the charging status screen for the simulated session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingSample {
    pub station: String,
    pub minutes_left: u32,
    pub current_cost: Rupees,
    pub power_kw: f64,
    pub energy_added: KWh,
    pub session_minutes: u32,
    pub speed: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyUsage {
    pub day: String,
    pub kwh: KWh,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSample {
    pub month_kwh: KWh,
    pub month_spent: Rupees,
    pub sessions: u32,
    pub km_per_kwh: f64,
    pub peak_hours: String,
    pub average_session: String,
    pub efficiency_percent: Percent,
    pub weekly: Vec<DailyUsage>,
}

impl AnalyticsSample {
    pub fn weekly_total(&self) -> KWh {
        self.weekly.iter().map(|d| d.kwh).sum()
    }
}

/// Simulated in-progress charge. Only the clock tick or an explicit stop
/// changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargingSession {
    pub progress: Percent,
    pub active: bool,
}

impl ChargingSession {
    pub fn new(progress: Percent) -> Self {
        ChargingSession {
            progress: progress.min(100),
            active: true,
        }
    }

    /// Stops the session. Returns whether it was active before.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    pub fn advance(&mut self, step: Percent) {
        if self.active {
            self.progress = self.progress.saturating_add(step).min(100);
        }
    }
}

/// Session-scoped gamification counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardPoints(u64);

impl RewardPoints {
    pub fn new(balance: u64) -> Self {
        RewardPoints(balance)
    }

    pub fn balance(&self) -> u64 {
        self.0
    }

    pub fn credit(&mut self, points: u64) {
        self.0 = self.0.saturating_add(points);
    }

    pub fn redeem(&mut self, reward: &Reward) -> Result<u64, Error> {
        if !reward.available {
            return Err(Error::RewardUnavailable(reward.id));
        }
        if self.0 < reward.points {
            return Err(Error::RewardLocked {
                reward: reward.id,
                required: reward.points,
                balance: self.0,
            });
        }
        self.0 -= reward.points;
        Ok(self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reward(points: u64, available: bool) -> Reward {
        Reward {
            id: 7,
            name: String::from("Credit"),
            points,
            available,
        }
    }

    #[test]
    fn charger_status_falls_back_to_unknown() {
        let status: ChargerStatus = serde_json::from_str("\"Maintenance\"").unwrap();
        assert_eq!(ChargerStatus::Unknown(String::from("Maintenance")), status);
        assert_eq!("Maintenance", status.label());

        let status: ChargerStatus = serde_json::from_str("\"Busy\"").unwrap();
        assert_eq!(ChargerStatus::Busy, status);
    }

    #[test]
    fn stopping_twice_reports_first_stop_only() {
        let mut session = ChargingSession::new(65);
        assert!(session.stop());
        assert!(!session.stop());
        assert_eq!(65, session.progress);
    }

    #[test]
    fn advance_caps_at_full_and_ignores_stopped_sessions() {
        let mut session = ChargingSession::new(95);
        session.advance(10);
        assert_eq!(100, session.progress);

        let mut stopped = ChargingSession::new(40);
        stopped.stop();
        stopped.advance(10);
        assert_eq!(40, stopped.progress);
    }

    #[test]
    fn redeem_deducts_points() {
        let mut points = RewardPoints::new(2450);
        assert_eq!(Ok(1450), points.redeem(&reward(1000, true)));
        assert_eq!(1450, points.balance());
    }

    #[test]
    fn redeem_rejects_locked_and_unavailable() {
        let mut points = RewardPoints::new(300);
        assert_eq!(
            Err(Error::RewardLocked {
                reward: 7,
                required: 500,
                balance: 300
            }),
            points.redeem(&reward(500, true))
        );
        assert_eq!(
            Err(Error::RewardUnavailable(7)),
            points.redeem(&reward(100, false))
        );
        assert_eq!(300, points.balance());
    }
}
