//! Rendered screens.
//!
//! A [`View`] is plain data: title, titled sections of text lines and the
//! actions the screen offers. The server returns it as JSON or text.

mod screens;

use crate::navigation::{Action, ScreenId, BOTTOM_NAV};
use crate::session::Session;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub screen: ScreenId,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub screen: ScreenId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
    pub actions: Vec<Action>,
    pub bottom_nav: Vec<NavItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl View {
    fn new<T: Into<String>>(title: T) -> Self {
        View {
            screen: ScreenId::default(),
            title: title.into(),
            subtitle: None,
            sections: Vec::new(),
            actions: Vec::new(),
            bottom_nav: Vec::new(),
            notice: None,
        }
    }

    fn subtitle<T: Into<String>>(mut self, subtitle: T) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    fn section<H, I, S>(mut self, heading: H, lines: I) -> Self
    where
        H: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.push(Section {
            heading: heading.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn actions(mut self, actions: &[Action]) -> Self {
        self.actions.extend_from_slice(actions);
        self
    }

    pub fn section_named(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

/// Builds the view of the session's current screen.
pub fn render(session: &Session) -> View {
    let current = session.current();
    let mut view = match current {
        // No dedicated screen yet; shown as home while staying current.
        ScreenId::Home | ScreenId::Payments | ScreenId::Schedule | ScreenId::Amenities => {
            screens::home(session)
        }
        ScreenId::Search => screens::search(session),
        ScreenId::Map => screens::map(session),
        ScreenId::Charging => screens::charging(session),
        ScreenId::Profile => screens::profile(session),
        ScreenId::Settings => screens::settings(session),
        ScreenId::Analytics => screens::analytics(session),
        ScreenId::Booking => screens::booking(session),
        ScreenId::RoutePlanning => screens::route_planning(session),
        ScreenId::Rewards => screens::rewards(session),
        ScreenId::AiRecommendations => screens::ai_recommendations(session),
        ScreenId::PaymentMethods => screens::payment_methods(session),
        ScreenId::VoiceAssistant => screens::voice_assistant(session),
        ScreenId::WirelessWaitlist => screens::wireless_waitlist(session),
    };

    view.screen = current;
    if current != ScreenId::VoiceAssistant {
        view.actions.push(Action::OpenVoiceAssistant);
    }
    view.bottom_nav = BOTTOM_NAV
        .iter()
        .map(|&(screen, label)| NavItem {
            screen,
            label,
            active: screen == current,
        })
        .collect();
    view.notice = session.notice().map(String::from);
    view
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{}", subtitle)?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "! {}", notice)?;
        }
        for section in &self.sections {
            writeln!(f, "\n-- {} --", section.heading)?;
            for line in &section.lines {
                writeln!(f, "  {}", line)?;
            }
        }

        let actions: Vec<&str> = self.actions.iter().map(|a| a.as_str()).collect();
        writeln!(f, "\nactions: {}", actions.join(", "))?;

        let nav: Vec<String> = self
            .bottom_nav
            .iter()
            .map(|item| {
                if item.active {
                    format!("[{}]", item.label)
                } else {
                    item.label.to_string()
                }
            })
            .collect();
        write!(f, "nav: {}", nav.join(" | "))
    }
}
