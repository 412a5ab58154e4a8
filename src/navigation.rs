//! Screen identifiers, user actions and the navigation controller.
//!
//! There is no history stack: every screen that offers a way back names a
//! fixed previous screen, and any screen may jump to any other directly.

use crate::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenId {
    Home,
    Search,
    Map,
    Charging,
    Profile,
    Settings,
    Analytics,
    Payments,
    Booking,
    Schedule,
    Amenities,
    RoutePlanning,
    Rewards,
    AiRecommendations,
    PaymentMethods,
    VoiceAssistant,
    WirelessWaitlist,
}

impl ScreenId {
    pub const ALL: [ScreenId; 17] = [
        ScreenId::Home,
        ScreenId::Search,
        ScreenId::Map,
        ScreenId::Charging,
        ScreenId::Profile,
        ScreenId::Settings,
        ScreenId::Analytics,
        ScreenId::Payments,
        ScreenId::Booking,
        ScreenId::Schedule,
        ScreenId::Amenities,
        ScreenId::RoutePlanning,
        ScreenId::Rewards,
        ScreenId::AiRecommendations,
        ScreenId::PaymentMethods,
        ScreenId::VoiceAssistant,
        ScreenId::WirelessWaitlist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenId::Home => "home",
            ScreenId::Search => "search",
            ScreenId::Map => "map",
            ScreenId::Charging => "charging",
            ScreenId::Profile => "profile",
            ScreenId::Settings => "settings",
            ScreenId::Analytics => "analytics",
            ScreenId::Payments => "payments",
            ScreenId::Booking => "booking",
            ScreenId::Schedule => "schedule",
            ScreenId::Amenities => "amenities",
            ScreenId::RoutePlanning => "route-planning",
            ScreenId::Rewards => "rewards",
            ScreenId::AiRecommendations => "ai-recommendations",
            ScreenId::PaymentMethods => "payment-methods",
            ScreenId::VoiceAssistant => "voice-assistant",
            ScreenId::WirelessWaitlist => "wireless-waitlist",
        }
    }

    /// Parses `id`, falling back to `Home` for anything unrecognized.
    pub fn resolve(id: &str) -> ScreenId {
        id.parse().unwrap_or_else(|e: Error| {
            log::warn!("{}, falling back to {}", e, ScreenId::Home);
            ScreenId::Home
        })
    }

    /// Fixed target of the screen's back button, if it has one.
    pub fn back_target(self) -> Option<ScreenId> {
        match self {
            ScreenId::Booking
            | ScreenId::Rewards
            | ScreenId::AiRecommendations
            | ScreenId::VoiceAssistant
            | ScreenId::Charging => Some(ScreenId::Home),
            ScreenId::Settings | ScreenId::Analytics => Some(ScreenId::Profile),
            ScreenId::PaymentMethods => Some(ScreenId::Booking),
            _ => None,
        }
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        ScreenId::Home
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenId::ALL
            .iter()
            .copied()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| Error::InvalidScreenId(s.to_string()))
    }
}

/// Entries of the bottom navigation bar shown under every screen.
pub const BOTTOM_NAV: [(ScreenId, &str); 4] = [
    (ScreenId::Home, "Home"),
    (ScreenId::Map, "Map"),
    (ScreenId::Charging, "Charge"),
    (ScreenId::Profile, "Profile"),
];

/// Button activations a screen can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    OpenRewards,
    OpenRecommendations,
    OpenVoiceAssistant,
    FindChargers,
    PlanRoute,
    ViewAllChargers,
    BookCharger,
    ShowMap,
    Back,
    ProceedToPayment,
    CancelBooking,
    PayAndBook,
    OpenSettings,
    OpenAnalytics,
    OpenPaymentMethods,
    ExploreNearby,
    StopCharging,
    JoinWaitlist,
    AddToWidget,
    ToggleVehicle,
    CalculateRoute,
    StartListening,
    SendTranscript,
    OpenDirections,
}

impl Action {
    pub const ALL: [Action; 24] = [
        Action::OpenRewards,
        Action::OpenRecommendations,
        Action::OpenVoiceAssistant,
        Action::FindChargers,
        Action::PlanRoute,
        Action::ViewAllChargers,
        Action::BookCharger,
        Action::ShowMap,
        Action::Back,
        Action::ProceedToPayment,
        Action::CancelBooking,
        Action::PayAndBook,
        Action::OpenSettings,
        Action::OpenAnalytics,
        Action::OpenPaymentMethods,
        Action::ExploreNearby,
        Action::StopCharging,
        Action::JoinWaitlist,
        Action::AddToWidget,
        Action::ToggleVehicle,
        Action::CalculateRoute,
        Action::StartListening,
        Action::SendTranscript,
        Action::OpenDirections,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::OpenRewards => "open-rewards",
            Action::OpenRecommendations => "open-recommendations",
            Action::OpenVoiceAssistant => "open-voice-assistant",
            Action::FindChargers => "find-chargers",
            Action::PlanRoute => "plan-route",
            Action::ViewAllChargers => "view-all-chargers",
            Action::BookCharger => "book-charger",
            Action::ShowMap => "show-map",
            Action::Back => "back",
            Action::ProceedToPayment => "proceed-to-payment",
            Action::CancelBooking => "cancel-booking",
            Action::PayAndBook => "pay-and-book",
            Action::OpenSettings => "open-settings",
            Action::OpenAnalytics => "open-analytics",
            Action::OpenPaymentMethods => "open-payment-methods",
            Action::ExploreNearby => "explore-nearby",
            Action::StopCharging => "stop-charging",
            Action::JoinWaitlist => "join-waitlist",
            Action::AddToWidget => "add-to-widget",
            Action::ToggleVehicle => "toggle-vehicle",
            Action::CalculateRoute => "calculate-route",
            Action::StartListening => "start-listening",
            Action::SendTranscript => "send-transcript",
            Action::OpenDirections => "open-directions",
        }
    }

    /// Screen the action leads to when activated on `from`, or `None` if
    /// the action only changes state on the current screen.
    pub fn target(self, from: ScreenId) -> Option<ScreenId> {
        match self {
            Action::OpenRewards => Some(ScreenId::Rewards),
            Action::OpenRecommendations => Some(ScreenId::AiRecommendations),
            Action::OpenVoiceAssistant => Some(ScreenId::VoiceAssistant),
            Action::FindChargers | Action::ViewAllChargers => Some(ScreenId::Search),
            Action::PlanRoute => Some(ScreenId::RoutePlanning),
            Action::BookCharger => Some(ScreenId::Booking),
            Action::ShowMap => Some(ScreenId::Map),
            Action::Back => from.back_target(),
            Action::ProceedToPayment | Action::OpenPaymentMethods => {
                Some(ScreenId::PaymentMethods)
            }
            Action::CancelBooking | Action::PayAndBook => Some(ScreenId::Home),
            Action::OpenSettings => Some(ScreenId::Settings),
            Action::OpenAnalytics => Some(ScreenId::Analytics),
            Action::ExploreNearby => Some(ScreenId::Amenities),
            Action::StopCharging
            | Action::JoinWaitlist
            | Action::AddToWidget
            | Action::ToggleVehicle
            | Action::CalculateRoute
            | Action::StartListening
            | Action::SendTranscript
            | Action::OpenDirections => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Holds the single current screen.
#[derive(Debug, Default)]
pub struct Navigator {
    current: ScreenId,
}

impl Navigator {
    pub fn new() -> Self {
        Navigator::default()
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }

    /// Makes `target` current. Returns the screen that was left, or `None`
    /// when `target` already was current.
    pub fn navigate(&mut self, target: ScreenId) -> Option<ScreenId> {
        if target == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, target);
        log::debug!("screen: {} -> {}", previous, target);
        Some(previous)
    }

    /// Like [`Navigator::navigate`] for a foreign identifier; unknown
    /// identifiers navigate home.
    pub fn navigate_to(&mut self, id: &str) -> Option<ScreenId> {
        self.navigate(ScreenId::resolve(id))
    }
}
