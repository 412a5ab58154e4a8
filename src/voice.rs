//! Simulated voice assistant ("Aria").
//!
//! Recognition is faked: "listening" arms a one-shot timer that hands back
//! the next canned phrase. Replies come from a fixed keyword table where the
//! first matching intent wins.

use crate::timer::ScopedTimer;
use crate::{lock, Error};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GREETING: &str = "Hi! I'm Aria, your EV charging assistant. I can help you find chargers, schedule charging sessions, or answer any questions about your vehicle. How can I assist you today?";

/// Number of canned phrases offered as one-tap commands.
pub const QUICK_COMMANDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    FindCharger,
    Schedule,
    Battery,
    Route,
    Cost,
    Fallback,
}

impl Intent {
    /// Keyword match in fixed precedence order.
    pub fn classify(command: &str) -> Intent {
        let command = command.to_lowercase();
        if command.contains("find") && command.contains("charger") {
            Intent::FindCharger
        } else if command.contains("schedule") {
            Intent::Schedule
        } else if command.contains("battery") {
            Intent::Battery
        } else if command.contains("route") {
            Intent::Route
        } else if command.contains("cost") {
            Intent::Cost
        } else {
            Intent::Fallback
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            Intent::FindCharger => "I found 3 charging stations within 2km. Tata Power EZ Charge is closest at 0.2km with 8 available slots. Would you like me to book it for you?",
            Intent::Schedule => "I can schedule your charging for tonight between 11 PM to 6 AM for maximum savings. This will save you ₹180 compared to day rates. Shall I proceed?",
            Intent::Battery => "Your Tata Nexon EV Max is currently at 78% battery with 312km range remaining. Based on your usage pattern, you'll need charging in about 2 days.",
            Intent::Route => "I can plan an optimal route to Mumbai with 2 charging stops. The journey will take 4 hours 30 minutes including 45 minutes of charging time. Total cost: ₹450.",
            Intent::Cost => "Your average charging cost is ₹18 per kWh. This month you've spent ₹2,156 on charging. I can help you save 40% by scheduling night charging.",
            Intent::Fallback => "I understand you're looking for charging assistance. Let me help you with that. Would you like me to find nearby chargers, schedule a charging session, or check your vehicle status?",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::FindCharger => "find-charger",
            Intent::Schedule => "schedule",
            Intent::Battery => "battery",
            Intent::Route => "route",
            Intent::Cost => "cost",
            Intent::Fallback => "fallback",
        }
    }
}

/// Canned reply for `command`.
pub fn respond(command: &str) -> &'static str {
    Intent::classify(command).reply()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Aria,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub message: String,
    pub at: DateTime<Local>,
}

impl ConversationEntry {
    fn now(speaker: Speaker, message: &str) -> Self {
        ConversationEntry {
            speaker,
            message: message.to_string(),
            at: Local::now(),
        }
    }
}

/// State shared with the listening timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceState {
    pub listening: bool,
    pub transcript: Option<String>,
    pub history: Vec<ConversationEntry>,
}

/// Per-visit assistant state; dropping it cancels any pending listen.
#[derive(Debug)]
pub struct VoiceAssistant {
    state: Arc<Mutex<VoiceState>>,
    phrases: Vec<String>,
    next_phrase: usize,
    listen_delay: Duration,
    listen_timer: Option<ScopedTimer>,
}

impl VoiceAssistant {
    pub fn new(phrases: Vec<String>, listen_delay: Duration) -> Self {
        let state = VoiceState {
            history: vec![ConversationEntry::now(Speaker::Aria, GREETING)],
            ..VoiceState::default()
        };
        VoiceAssistant {
            state: Arc::new(Mutex::new(state)),
            phrases,
            next_phrase: 0,
            listen_delay,
            listen_timer: None,
        }
    }

    pub fn quick_commands(&self) -> &[String] {
        &self.phrases[..self.phrases.len().min(QUICK_COMMANDS)]
    }

    pub fn snapshot(&self) -> VoiceState {
        lock(&self.state).clone()
    }

    /// Starts simulated recognition. Ignored while already listening.
    pub fn start_listening(&mut self) -> Result<(), Error> {
        if self.phrases.is_empty() {
            log::warn!("voice: no phrases to recognize");
            return Ok(());
        }
        {
            let mut state = lock(&self.state);
            if state.listening {
                return Ok(());
            }
            state.listening = true;
            state.transcript = None;
        }

        let phrase = self.phrases[self.next_phrase % self.phrases.len()].clone();
        self.next_phrase = self.next_phrase.wrapping_add(1);

        let state = Arc::clone(&self.state);
        let timer = ScopedTimer::once("voice-listen", self.listen_delay, move || {
            let mut state = lock(&state);
            state.listening = false;
            log::debug!("voice: recognized {:?}", phrase);
            state.transcript = Some(phrase);
        });

        match timer {
            Ok(timer) => {
                self.listen_timer = Some(timer);
                Ok(())
            }
            Err(e) => {
                lock(&self.state).listening = false;
                Err(e)
            }
        }
    }

    /// Appends `command` and Aria's reply to the conversation.
    pub fn send(&mut self, command: &str) -> Intent {
        let intent = Intent::classify(command);
        let mut state = lock(&self.state);
        state
            .history
            .push(ConversationEntry::now(Speaker::User, command));
        state
            .history
            .push(ConversationEntry::now(Speaker::Aria, intent.reply()));
        state.transcript = None;
        log::debug!("voice: {:?} -> {}", command, intent.as_str());
        intent
    }

    /// Sends the recognized transcript, if any.
    pub fn send_transcript(&mut self) -> Option<Intent> {
        let transcript = lock(&self.state).transcript.take()?;
        Some(self.send(&transcript))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::time;

    fn phrases() -> Vec<String> {
        [
            "Find nearest charging station",
            "Schedule charging for tonight",
            "Show my charging history",
            "Book a fast charger",
            "What's my battery status?",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn conversation_is_stamped_in_local_time() {
        let before = Local::now();
        let mut assistant = VoiceAssistant::new(phrases(), Duration::from_secs(2));
        assistant.send("battery");
        let after = Local::now();

        let history = assistant.snapshot().history;
        assert_eq!(3, history.len());
        for entry in &history {
            assert_eq!(after.offset(), entry.at.offset());
            assert!(before <= entry.at && entry.at <= after);
        }
    }

    #[test]
    fn keyword_precedence_is_fixed() {
        assert_eq!(Intent::FindCharger, Intent::classify("Find a charger, what's the cost?"));
        assert_eq!(Intent::Schedule, Intent::classify("schedule by battery"));
        assert_eq!(Intent::Battery, Intent::classify("BATTERY route cost"));
        assert_eq!(Intent::Route, Intent::classify("Plan route to Mumbai"));
        assert_eq!(Intent::Cost, Intent::classify("Show charging costs"));
        assert_eq!(Intent::Fallback, Intent::classify("Book a fast charger"));
        assert_eq!(Intent::Fallback, Intent::classify(""));
    }

    #[test]
    fn find_without_charger_is_not_a_search() {
        assert_eq!(Intent::Fallback, Intent::classify("Find nearest charging station"));
        assert_eq!(Intent::FindCharger, Intent::classify("Find 24/7 chargers nearby"));
    }

    #[test]
    fn respond_returns_intent_reply() {
        assert_eq!(Intent::Cost.reply(), respond("what does it cost"));
        assert!(respond("find charger").starts_with("I found 3 charging stations"));
    }

    #[test]
    fn send_records_both_sides() {
        let mut aria = VoiceAssistant::new(phrases(), Duration::from_secs(2));
        assert_eq!(1, aria.snapshot().history.len());
        assert_eq!(4, aria.quick_commands().len());

        assert_eq!(Intent::Battery, aria.send("battery?"));
        let state = aria.snapshot();
        assert_eq!(3, state.history.len());
        assert_eq!(Speaker::User, state.history[1].speaker);
        assert_eq!(Intent::Battery.reply(), state.history[2].message);
        assert_eq!(None, aria.send_transcript());
    }

    #[tokio::test(start_paused = true)]
    async fn listening_supplies_phrases_in_rotation() {
        let mut aria = VoiceAssistant::new(phrases(), Duration::from_secs(2));

        aria.start_listening().unwrap();
        assert!(aria.snapshot().listening);
        // A second press while listening is ignored.
        aria.start_listening().unwrap();

        time::sleep(Duration::from_millis(2100)).await;
        let state = aria.snapshot();
        assert!(!state.listening);
        assert_eq!(Some(String::from("Find nearest charging station")), state.transcript);

        assert_eq!(Some(Intent::Fallback), aria.send_transcript());
        assert_eq!(None, aria.snapshot().transcript);

        aria.start_listening().unwrap();
        time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(
            Some(String::from("Schedule charging for tonight")),
            aria.snapshot().transcript
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_assistant_cancels_listen() {
        let mut aria = VoiceAssistant::new(phrases(), Duration::from_secs(2));
        aria.start_listening().unwrap();
        let shared = Arc::clone(&aria.state);
        drop(aria);

        time::sleep(Duration::from_secs(5)).await;
        let state = lock(&shared);
        assert!(state.listening);
        assert_eq!(None, state.transcript);
    }
}
