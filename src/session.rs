//! Application state for the single in-process session.
//!
//! `Session` is what views render from. It owns the navigator and the
//! per-visit state of whichever screen is mounted: entering a screen mounts
//! its state (booking draft, assistant, charging clock), leaving drops it.

use crate::calc::{reward_points, CostEstimate, PaymentSummary, Slider, Tariff};
use crate::catalog::{Catalog, SearchFilter};
use crate::model::{Charger, ChargingSession, RewardPoints};
use crate::navigation::{Action, Navigator, ScreenId};
use crate::settings::UnwiredConfig;
use crate::timer::ScopedTimer;
use crate::voice::{Intent, VoiceAssistant};
use crate::{lock, Error};
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const WAITLIST_NOTICE: &str = "You're on the list! Thank you for joining the wireless charging waitlist. We'll notify you as soon as it's available in your area!";
const WIDGET_NOTICE: &str = "Added to Widget: charging status is now available on your home screen";

/// Transient selections on the booking screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingDraft {
    pub charger_id: u32,
    pub target_battery: Slider,
    pub duration: Slider,
}

impl BookingDraft {
    pub fn new(charger_id: u32) -> Self {
        BookingDraft {
            charger_id,
            target_battery: Slider::target_battery(),
            duration: Slider::duration(),
        }
    }
}

/// What the booking screen hands to the payment screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub charger_id: u32,
    pub charger_name: String,
    pub duration_minutes: u32,
    pub target_battery: u32,
    pub estimate: CostEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Card,
    Wallet,
    NetBanking,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Wallet,
        PaymentMethod::NetBanking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::NetBanking => "netbanking",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI Payment",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Wallet => "Digital Wallet",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "Pay using any UPI app",
            PaymentMethod::Card => "Visa, Mastercard, RuPay",
            PaymentMethod::Wallet => "Paytm, PhonePe, Google Pay",
            PaymentMethod::NetBanking => "All major banks supported",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "Instant",
            PaymentMethod::Card => "Secure",
            PaymentMethod::Wallet => "Fast",
            PaymentMethod::NetBanking => "Reliable",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Upi
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidChoice(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredTime {
    Night,
    Day,
}

impl PreferredTime {
    pub fn label(self) -> &'static str {
        match self {
            PreferredTime::Night => "Night (11 PM - 6 AM)",
            PreferredTime::Day => "Day (6 AM - 6 PM)",
        }
    }
}

impl FromStr for PreferredTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "night" => Ok(PreferredTime::Night),
            "day" => Ok(PreferredTime::Day),
            other => Err(Error::InvalidChoice(other.to_string())),
        }
    }
}

impl fmt::Display for PreferredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PreferredTime::Night => "night",
            PreferredTime::Day => "day",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargingPreferences {
    pub auto_charge: bool,
    pub charging_limit: Slider,
    pub eco_mode: bool,
    pub preferred_time: PreferredTime,
    pub notify_complete: bool,
    pub notify_low_battery: bool,
    pub notify_optimal_times: bool,
}

impl Default for ChargingPreferences {
    fn default() -> Self {
        ChargingPreferences {
            auto_charge: true,
            charging_limit: Slider::target_battery(),
            eco_mode: false,
            preferred_time: PreferredTime::Night,
            notify_complete: true,
            notify_low_battery: true,
            notify_optimal_times: true,
        }
    }
}

/// Partial update of [`ChargingPreferences`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub auto_charge: Option<bool>,
    pub charging_limit: Option<i64>,
    pub eco_mode: Option<bool>,
    pub preferred_time: Option<PreferredTime>,
    pub notify_complete: Option<bool>,
    pub notify_low_battery: Option<bool>,
    pub notify_optimal_times: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub from: String,
    pub to: String,
    pub calculated: bool,
}

impl Default for RoutePlan {
    fn default() -> Self {
        RoutePlan {
            from: String::from("Current Location"),
            to: String::new(),
            calculated: false,
        }
    }
}

/// Displayed clock of the charging screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub ticks: u64,
    pub now: DateTime<Local>,
}

impl ClockState {
    fn started(now: DateTime<Local>) -> Self {
        ClockState { ticks: 0, now }
    }

    fn tick(&mut self, now: DateTime<Local>) {
        self.ticks += 1;
        self.now = now;
    }
}

#[derive(Debug)]
pub struct Session {
    config: UnwiredConfig,
    catalog: Catalog,
    navigator: Navigator,
    rewards: RewardPoints,
    charging: Arc<Mutex<ChargingSession>>,
    clock: Arc<Mutex<ClockState>>,
    clock_timer: Option<ScopedTimer>,
    booking: Option<BookingDraft>,
    checkout: Option<Checkout>,
    payment_method: PaymentMethod,
    preferences: ChargingPreferences,
    search_query: String,
    search_filter: SearchFilter,
    route: RoutePlan,
    voice: Option<VoiceAssistant>,
    vehicle_collapsed: bool,
    notice: Option<String>,
}

impl Session {
    pub fn new(catalog: Catalog, config: UnwiredConfig) -> Self {
        Session {
            rewards: RewardPoints::new(config.initial_reward_points),
            charging: Arc::new(Mutex::new(ChargingSession::new(config.initial_progress))),
            clock: Arc::new(Mutex::new(ClockState::started(Local::now()))),
            clock_timer: None,
            navigator: Navigator::new(),
            booking: None,
            checkout: None,
            payment_method: PaymentMethod::default(),
            preferences: ChargingPreferences::default(),
            search_query: String::new(),
            search_filter: SearchFilter::default(),
            route: RoutePlan::default(),
            voice: None,
            vehicle_collapsed: false,
            notice: None,
            catalog,
            config,
        }
    }

    pub fn current(&self) -> ScreenId {
        self.navigator.current()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &UnwiredConfig {
        &self.config
    }

    pub fn tariff(&self) -> Tariff {
        self.config.tariff()
    }

    pub fn reward_points(&self) -> u64 {
        self.rewards.balance()
    }

    pub fn charging(&self) -> ChargingSession {
        *lock(&self.charging)
    }

    pub fn clock(&self) -> ClockState {
        *lock(&self.clock)
    }

    pub fn clock_running(&self) -> bool {
        self.clock_timer.is_some()
    }

    pub fn booking(&self) -> Option<&BookingDraft> {
        self.booking.as_ref()
    }

    pub fn booking_charger(&self) -> Option<&Charger> {
        self.booking
            .as_ref()
            .and_then(|draft| self.catalog.charger(draft.charger_id).ok())
    }

    pub fn booking_estimate(&self) -> Option<CostEstimate> {
        let draft = self.booking.as_ref()?;
        let charger = self.booking_charger()?;
        Some(CostEstimate::for_charger(
            charger,
            draft.duration.value(),
            &self.tariff(),
        ))
    }

    pub fn checkout(&self) -> Option<&Checkout> {
        self.checkout.as_ref()
    }

    /// Breakdown for the payment screen, based on the booked cost when the
    /// user came from booking and on the sample cost otherwise.
    pub fn payment_summary(&self) -> PaymentSummary {
        let tariff = self.tariff();
        let base = self
            .checkout
            .as_ref()
            .map(|c| c.estimate.cost)
            .unwrap_or(tariff.sample_base_cost);
        PaymentSummary::new(base, &tariff)
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn preferences(&self) -> &ChargingPreferences {
        &self.preferences
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_filter(&self) -> SearchFilter {
        self.search_filter
    }

    pub fn search_results(&self) -> Vec<&Charger> {
        self.catalog.search(&self.search_query, self.search_filter)
    }

    pub fn route(&self) -> &RoutePlan {
        &self.route
    }

    pub fn voice(&self) -> Option<&VoiceAssistant> {
        self.voice.as_ref()
    }

    pub fn vehicle_collapsed(&self) -> bool {
        self.vehicle_collapsed
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Makes `target` the current screen.
    pub fn navigate(&mut self, target: ScreenId) {
        self.notice = None;
        self.switch_to(target);
    }

    /// Navigates to a foreign identifier; unknown identifiers go home.
    pub fn navigate_to(&mut self, id: &str) {
        self.navigate(ScreenId::resolve(id));
    }

    /// Activates `action` on the current screen. `charger` selects the
    /// charger for [`Action::BookCharger`].
    pub fn apply(&mut self, action: Action, charger: Option<u32>) -> Result<(), Error> {
        self.notice = None;
        let from = self.current();

        match action {
            Action::BookCharger => {
                if let Some(id) = charger {
                    self.catalog.charger(id)?;
                }
            }
            Action::ProceedToPayment => {
                self.require(ScreenId::Booking)?;
                self.checkout = self.draft_checkout();
                if let Some(checkout) = &self.checkout {
                    log::info!(
                        "booking: {} for {} min, estimated ₹{}",
                        checkout.charger_name, checkout.duration_minutes, checkout.estimate.cost
                    );
                }
            }
            Action::PayAndBook => {
                self.require(ScreenId::PaymentMethods)?;
                let summary = self.payment_summary();
                log::info!(
                    "payment: ₹{:.2} via {}",
                    summary.total,
                    self.payment_method.as_str()
                );
                self.notice = Some(format!(
                    "Paid ₹{:.2} via {}. Your charger is booked!",
                    summary.total,
                    self.payment_method.label()
                ));
            }
            Action::StopCharging => {
                self.require(ScreenId::Charging)?;
                self.stop_charging();
            }
            Action::JoinWaitlist => self.notice = Some(String::from(WAITLIST_NOTICE)),
            Action::AddToWidget => self.notice = Some(String::from(WIDGET_NOTICE)),
            Action::ToggleVehicle => self.vehicle_collapsed = !self.vehicle_collapsed,
            Action::CalculateRoute => {
                self.require(ScreenId::RoutePlanning)?;
                self.route.calculated = true;
            }
            Action::StartListening => self.voice_mut()?.start_listening()?,
            Action::SendTranscript => {
                self.send_transcript()?;
            }
            Action::OpenDirections => {
                self.notice = Some(format!("Opening {}", self.config.maps_url));
            }
            _ => {}
        }

        if let Some(target) = action.target(from) {
            self.switch_to(target);
        }
        if let (Action::BookCharger, Some(id)) = (action, charger) {
            self.select_charger(id)?;
        }
        Ok(())
    }

    pub fn select_charger(&mut self, id: u32) -> Result<(), Error> {
        self.catalog.charger(id)?;
        self.draft_mut()?.charger_id = id;
        Ok(())
    }

    pub fn set_target_battery(&mut self, percent: i64) -> Result<u32, Error> {
        Ok(self.draft_mut()?.target_battery.set(percent))
    }

    pub fn set_duration(&mut self, minutes: i64) -> Result<u32, Error> {
        Ok(self.draft_mut()?.duration.set(minutes))
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), Error> {
        self.require(ScreenId::PaymentMethods)?;
        self.payment_method = method;
        Ok(())
    }

    pub fn set_search(&mut self, query: Option<String>, filter: Option<SearchFilter>) {
        if let Some(query) = query {
            self.search_query = query;
        }
        if let Some(filter) = filter {
            self.search_filter = filter;
        }
    }

    pub fn set_route(&mut self, from: Option<String>, to: Option<String>) {
        if let Some(from) = from {
            self.route.from = from;
        }
        if let Some(to) = to {
            self.route.to = to;
        }
        self.route.calculated = false;
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        let prefs = &mut self.preferences;
        if let Some(v) = update.auto_charge {
            prefs.auto_charge = v;
        }
        if let Some(v) = update.charging_limit {
            prefs.charging_limit.set(v);
        }
        if let Some(v) = update.eco_mode {
            prefs.eco_mode = v;
        }
        if let Some(v) = update.preferred_time {
            prefs.preferred_time = v;
        }
        if let Some(v) = update.notify_complete {
            prefs.notify_complete = v;
        }
        if let Some(v) = update.notify_low_battery {
            prefs.notify_low_battery = v;
        }
        if let Some(v) = update.notify_optimal_times {
            prefs.notify_optimal_times = v;
        }
        log::debug!("settings: {:?}", prefs);
    }

    /// Redeems a reward, returning the remaining balance.
    pub fn redeem(&mut self, reward_id: u32) -> Result<u64, Error> {
        let reward = self.catalog.reward(reward_id)?;
        let balance = self.rewards.redeem(reward)?;
        log::info!("rewards: redeemed {:?}, balance {}", reward.name, balance);
        self.notice = Some(format!("Redeemed {}", reward.name));
        Ok(balance)
    }

    pub fn send_voice(&mut self, command: &str) -> Result<Intent, Error> {
        Ok(self.voice_mut()?.send(command))
    }

    pub fn send_transcript(&mut self) -> Result<Option<Intent>, Error> {
        Ok(self.voice_mut()?.send_transcript())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if let Some(previous) = self.navigator.navigate(target) {
            self.unmount(previous);
            self.mount(target);
        }
    }

    fn mount(&mut self, screen: ScreenId) {
        match screen {
            ScreenId::Booking => {
                self.booking = self.catalog.chargers.first().map(|c| BookingDraft::new(c.id));
            }
            ScreenId::Charging => self.start_clock(),
            ScreenId::VoiceAssistant => {
                self.voice = Some(VoiceAssistant::new(
                    self.catalog.voice_phrases.clone(),
                    self.config.listen_delay(),
                ));
            }
            ScreenId::PaymentMethods => self.payment_method = PaymentMethod::default(),
            _ => {}
        }
    }

    fn unmount(&mut self, screen: ScreenId) {
        match screen {
            ScreenId::Booking => self.booking = None,
            ScreenId::Charging => self.clock_timer = None,
            ScreenId::VoiceAssistant => self.voice = None,
            ScreenId::PaymentMethods => self.checkout = None,
            _ => {}
        }
    }

    fn start_clock(&mut self) {
        *lock(&self.clock) = ClockState::started(Local::now());

        let clock = Arc::clone(&self.clock);
        let charging = Arc::clone(&self.charging);
        let step = self.config.progress_step;
        let timer = ScopedTimer::repeating("charging-clock", self.config.clock_tick(), move || {
            let ticks = {
                let mut clock = lock(&clock);
                clock.tick(Local::now());
                clock.ticks
            };
            if step > 0 {
                lock(&charging).advance(step);
            }
            log::trace!("charging clock: tick {}", ticks);
        });

        match timer {
            Ok(timer) => self.clock_timer = Some(timer),
            Err(e) => log::warn!("{}; charging clock not running", e),
        }
    }

    fn stop_charging(&mut self) {
        if !lock(&self.charging).stop() {
            return;
        }
        let points = reward_points(self.catalog.charging.current_cost);
        self.rewards.credit(points);
        log::info!("charging: stopped, +{} points", points);
        self.notice = Some(format!("Charging stopped. You earned {} points!", points));
    }

    fn draft_checkout(&self) -> Option<Checkout> {
        let draft = self.booking.as_ref()?;
        let charger = self.booking_charger()?;
        Some(Checkout {
            charger_id: charger.id,
            charger_name: charger.name.clone(),
            duration_minutes: draft.duration.value(),
            target_battery: draft.target_battery.value(),
            estimate: CostEstimate::for_charger(charger, draft.duration.value(), &self.tariff()),
        })
    }

    fn require(&self, expected: ScreenId) -> Result<(), Error> {
        let actual = self.current();
        if actual == expected {
            Ok(())
        } else {
            Err(Error::NotOnScreen { expected, actual })
        }
    }

    fn draft_mut(&mut self) -> Result<&mut BookingDraft, Error> {
        let actual = self.current();
        self.booking.as_mut().ok_or(Error::NotOnScreen {
            expected: ScreenId::Booking,
            actual,
        })
    }

    fn voice_mut(&mut self) -> Result<&mut VoiceAssistant, Error> {
        let actual = self.current();
        self.voice.as_mut().ok_or(Error::NotOnScreen {
            expected: ScreenId::VoiceAssistant,
            actual,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    fn session() -> Session {
        Session::new(Catalog::builtin().unwrap(), UnwiredConfig::default())
    }

    #[test]
    fn starts_home_and_falls_back_home() {
        let mut s = session();
        assert_eq!(ScreenId::Home, s.current());
        s.navigate_to("rewards");
        assert_eq!(ScreenId::Rewards, s.current());
        s.navigate_to("nowhere");
        assert_eq!(ScreenId::Home, s.current());
    }

    #[test]
    fn booking_draft_lives_only_on_booking_screen() {
        let mut s = session();
        assert!(s.booking().is_none());

        s.apply(Action::BookCharger, None).unwrap();
        assert_eq!(ScreenId::Booking, s.current());
        assert_eq!(1, s.booking().unwrap().charger_id);
        assert_eq!(100, s.set_target_battery(120).unwrap());
        assert_eq!(15, s.set_duration(10).unwrap());

        s.apply(Action::CancelBooking, None).unwrap();
        assert_eq!(ScreenId::Home, s.current());
        assert!(s.booking().is_none());
        assert_eq!(
            Err(Error::NotOnScreen {
                expected: ScreenId::Booking,
                actual: ScreenId::Home
            }),
            s.set_duration(30)
        );

        s.navigate(ScreenId::Booking);
        let draft = s.booking().unwrap();
        assert_eq!(80, draft.target_battery.value());
        assert_eq!(60, draft.duration.value());
    }

    #[test]
    fn book_a_specific_charger() {
        let mut s = session();
        s.navigate(ScreenId::Map);
        s.apply(Action::BookCharger, Some(4)).unwrap();
        assert_eq!("ChargeZone Hub", s.booking_charger().unwrap().name);
        assert_eq!(800.0, s.booking_estimate().unwrap().cost);

        assert_eq!(Err(Error::UnknownCharger(99)), s.apply(Action::BookCharger, Some(99)));
        assert_eq!(Err(Error::UnknownCharger(99)), s.select_charger(99));
        assert_eq!(4, s.booking().unwrap().charger_id);
    }

    #[test]
    fn booked_cost_flows_into_payment_summary() {
        let mut s = session();
        s.navigate(ScreenId::Booking);
        assert_eq!(720.0, s.booking_estimate().unwrap().cost);
        assert_eq!(72, s.booking_estimate().unwrap().points);

        s.set_duration(90).unwrap();
        s.apply(Action::ProceedToPayment, None).unwrap();
        assert_eq!(ScreenId::PaymentMethods, s.current());
        assert_eq!(1080.0, s.checkout().unwrap().estimate.cost);
        let summary = s.payment_summary();
        assert_eq!(1080.0, summary.base);
        assert_eq!(194.4, summary.tax);
        assert_eq!(1279.4, summary.total);

        s.select_payment_method(PaymentMethod::Card).unwrap();
        s.apply(Action::PayAndBook, None).unwrap();
        assert_eq!(ScreenId::Home, s.current());
        assert!(s.checkout().is_none());
        assert!(s.notice().unwrap().contains("Credit/Debit Card"));
    }

    #[test]
    fn payment_without_booking_uses_sample_cost() {
        let mut s = session();
        s.navigate(ScreenId::Profile);
        s.apply(Action::OpenPaymentMethods, None).unwrap();
        assert_eq!(245.0, s.payment_summary().base);
        assert_eq!(PaymentMethod::Upi, s.payment_method());

        s.apply(Action::Back, None).unwrap();
        assert_eq!(ScreenId::Booking, s.current());

        s.navigate(ScreenId::Home);
        assert_eq!(
            Err(Error::NotOnScreen {
                expected: ScreenId::Booking,
                actual: ScreenId::Home
            }),
            s.apply(Action::ProceedToPayment, None)
        );
    }

    #[test]
    fn stopping_charge_credits_points_once() {
        let mut s = session();
        assert_eq!(
            Err(Error::NotOnScreen {
                expected: ScreenId::Charging,
                actual: ScreenId::Home
            }),
            s.apply(Action::StopCharging, None)
        );

        s.navigate(ScreenId::Charging);
        assert!(!s.clock_running());
        s.apply(Action::StopCharging, None).unwrap();
        assert!(!s.charging().active);
        assert_eq!(65, s.charging().progress);
        assert_eq!(2463, s.reward_points());

        s.apply(Action::StopCharging, None).unwrap();
        assert_eq!(2463, s.reward_points());
        assert_eq!(None, s.notice());
    }

    #[test]
    fn redeeming_rewards() {
        let mut s = session();
        assert_eq!(Ok(1450), s.redeem(2));
        assert_eq!(
            Err(Error::RewardLocked {
                reward: 3,
                required: 2000,
                balance: 1450
            }),
            s.redeem(3)
        );
        assert_eq!(Err(Error::RewardUnavailable(4)), s.redeem(4));
        assert_eq!(Err(Error::UnknownReward(12)), s.redeem(12));
        assert_eq!(1450, s.reward_points());
    }

    #[test]
    fn back_and_screen_actions() {
        let mut s = session();
        s.navigate(ScreenId::Profile);
        s.apply(Action::OpenSettings, None).unwrap();
        s.apply(Action::Back, None).unwrap();
        assert_eq!(ScreenId::Profile, s.current());

        s.navigate(ScreenId::Search);
        s.apply(Action::Back, None).unwrap();
        assert_eq!(ScreenId::Search, s.current());

        s.apply(Action::ToggleVehicle, None).unwrap();
        assert!(s.vehicle_collapsed());
        s.apply(Action::JoinWaitlist, None).unwrap();
        assert!(s.notice().unwrap().starts_with("You're on the list!"));
        s.navigate(ScreenId::Home);
        assert_eq!(None, s.notice());
    }

    #[test]
    fn search_and_route_state() {
        let mut s = session();
        s.set_search(Some(String::from("grid")), None);
        assert_eq!(1, s.search_results().len());
        s.set_search(Some(String::new()), Some(SearchFilter::Fast));
        assert_eq!(4, s.search_results().len());

        s.navigate(ScreenId::RoutePlanning);
        s.set_route(None, Some(String::from("Mumbai")));
        s.apply(Action::CalculateRoute, None).unwrap();
        assert!(s.route().calculated);
        assert_eq!("Current Location", s.route().from);
    }

    #[test]
    fn preferences_update_is_partial_and_bounded() {
        let mut s = session();
        s.update_preferences(PreferencesUpdate {
            charging_limit: Some(5),
            eco_mode: Some(true),
            preferred_time: Some(PreferredTime::Day),
            ..PreferencesUpdate::default()
        });
        let prefs = s.preferences();
        assert_eq!(20, prefs.charging_limit.value());
        assert!(prefs.eco_mode);
        assert!(prefs.auto_charge);
        assert_eq!(PreferredTime::Day, prefs.preferred_time);
    }

    #[test]
    fn voice_actions_need_voice_screen() {
        let mut s = session();
        assert_eq!(
            Err(Error::NotOnScreen {
                expected: ScreenId::VoiceAssistant,
                actual: ScreenId::Home
            }),
            s.send_voice("find charger")
        );

        s.apply(Action::OpenVoiceAssistant, None).unwrap();
        assert_eq!(Ok(Intent::FindCharger), s.send_voice("Find charger, low cost"));
        assert_eq!(3, s.voice().unwrap().snapshot().history.len());

        s.apply(Action::Back, None).unwrap();
        assert!(s.voice().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn charging_clock_runs_only_while_mounted() {
        let mut s = session();
        s.navigate(ScreenId::Charging);
        assert!(s.clock_running());

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(3, s.clock().ticks);
        assert_eq!(65, s.charging().progress);

        s.navigate(ScreenId::Home);
        assert!(!s.clock_running());
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(3, s.clock().ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_progress_advances_per_tick() {
        let config = UnwiredConfig {
            progress_step: 5,
            ..UnwiredConfig::default()
        };
        let mut s = Session::new(Catalog::builtin().unwrap(), config);
        s.navigate(ScreenId::Charging);

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(80, s.charging().progress);

        s.apply(Action::StopCharging, None).unwrap();
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(80, s.charging().progress);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_voice_screen_cancels_listening() {
        let mut s = session();
        s.navigate(ScreenId::VoiceAssistant);
        s.apply(Action::StartListening, None).unwrap();
        assert!(s.voice().unwrap().snapshot().listening);

        time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(
            Some(String::from("Find nearest charging station")),
            s.voice().unwrap().snapshot().transcript
        );
        s.apply(Action::SendTranscript, None).unwrap();
        assert_eq!(3, s.voice().unwrap().snapshot().history.len());

        s.apply(Action::StartListening, None).unwrap();
        s.navigate(ScreenId::Home);
        time::sleep(Duration::from_secs(5)).await;
        s.navigate(ScreenId::VoiceAssistant);
        let state = s.voice().unwrap().snapshot();
        assert!(!state.listening);
        assert_eq!(None, state.transcript);
        assert_eq!(1, state.history.len());
    }
}
