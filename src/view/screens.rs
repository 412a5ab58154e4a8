use super::View;
use crate::model::{Charger, Rupees};
use crate::navigation::Action;
use crate::session::{PaymentMethod, Session};
use crate::timer::time_of_day;
use crate::voice::Speaker;

fn rupees(amount: Rupees) -> String {
    format!("₹{:.2}", amount)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

fn charger_lines(c: &Charger) -> Vec<String> {
    let features: Vec<&str> = c.features.iter().take(3).map(String::as_str).collect();
    vec![
        format!(
            "{} • {}/{} {}",
            if c.online { "Online" } else { "Offline" },
            c.available,
            c.total,
            c.status.label()
        ),
        features.join(" · "),
        format!("{} • {} • {} • ★{}", c.distance, c.price, c.power, c.rating),
        format!("Last charged: {}", c.last_charged),
    ]
}

fn with_chargers<'a, I>(mut view: View, chargers: I) -> View
where
    I: IntoIterator<Item = &'a Charger>,
{
    for charger in chargers {
        view = view.section(charger.name.as_str(), charger_lines(charger));
    }
    view
}

fn wireless_lines() -> Vec<&'static str> {
    vec![
        "Experience the future of EV charging. No cables, no hassle. Coming soon to select locations.",
        "Fast Charging • Convenient • Easy to Use • No Cables Required",
    ]
}

pub(super) fn home(session: &Session) -> View {
    let catalog = session.catalog();
    let vehicle = &catalog.vehicle;
    let first_name = catalog.profile.name.split_whitespace().next().unwrap_or("there");
    let charging = session.charging();

    let mut vehicle_lines = Vec::new();
    if !session.vehicle_collapsed() {
        vehicle_lines.push(format!(
            "{}% • {} km range",
            vehicle.battery_percent, vehicle.range_km
        ));
        vehicle_lines.push(format!("Last charged {}", vehicle.last_charged));
        vehicle_lines.push(format!(
            "Efficiency {} km/kWh • This Month {} km • Saved CO₂ {} kg",
            vehicle.efficiency_km_per_kwh, vehicle.month_km, vehicle.saved_co2_kg
        ));
    }
    vehicle_lines.push(format!("{} pts", session.reward_points()));

    let mut view = View::new(format!("Good morning, {}!", first_name))
        .subtitle("Ready to charge your EV?")
        .section(
            "Your EV Journey",
            vec![vehicle.plate.clone(), String::from("Powered by clean energy")],
        )
        .section(vehicle.model.as_str(), vehicle_lines)
        .section("Introducing Wireless Charging", wireless_lines());

    if let Some(rec) = catalog.recommendations.first() {
        view = view.section(
            "AI Recommendation",
            vec![rec.title.clone(), rec.description.clone()],
        );
    }

    let mut actions = vec![
        Action::OpenRewards,
        Action::OpenRecommendations,
        Action::ToggleVehicle,
        Action::JoinWaitlist,
    ];
    if charging.active {
        view = view.section(
            "Currently Charging",
            vec![
                catalog.charging.station.clone(),
                format!("{}%", charging.progress),
                format!(
                    "{} min remaining • {}",
                    catalog.charging.minutes_left,
                    rupees(catalog.charging.current_cost)
                ),
            ],
        );
        actions.push(Action::AddToWidget);
    }
    actions.extend_from_slice(&[
        Action::FindChargers,
        Action::PlanRoute,
        Action::ViewAllChargers,
        Action::BookCharger,
        Action::ShowMap,
    ]);

    with_chargers(view, catalog.chargers.iter().take(4)).actions(&actions)
}

pub(super) fn search(session: &Session) -> View {
    let results = session.search_results();
    let view = View::new("Find Chargers").subtitle(format!(
        "Search: \"{}\" • Filter: {}",
        session.search_query(),
        session.search_filter()
    ));
    let view = if results.is_empty() {
        view.section("No results", vec!["No chargers match your search"])
    } else {
        with_chargers(view, results)
    };
    view.actions(&[Action::BookCharger])
}

pub(super) fn map(session: &Session) -> View {
    let chargers = &session.catalog().chargers;
    with_chargers(
        View::new("Map View").subtitle(format!("{} nearby chargers", chargers.len())),
        chargers,
    )
    .actions(&[Action::OpenDirections, Action::BookCharger])
}

pub(super) fn charging(session: &Session) -> View {
    let sample = &session.catalog().charging;
    let charging = session.charging();
    let clock = session.clock();

    let status = if charging.active {
        "Charging"
    } else {
        "Stopped"
    };
    let activities = session
        .catalog()
        .activities
        .iter()
        .map(|a| format!("{}: {} ({} • {})", a.title, a.description, a.duration, a.distance));

    let view = View::new("Charging Status")
        .subtitle(sample.station.as_str())
        .section(
            "Battery Level",
            vec![
                format!("{}%", charging.progress),
                String::from(status),
                time_of_day(&clock.now, true),
            ],
        )
        .section(
            "Session",
            vec![
                format!("{} Minutes Left", sample.minutes_left),
                format!("{} Current Cost", rupees(sample.current_cost)),
            ],
        )
        .section(
            "Charging Details",
            vec![
                format!("Power Output: {} kW", sample.power_kw),
                format!("Energy Added: {} kWh", sample.energy_added),
                format!("Session Time: {} minutes", sample.session_minutes),
                format!("Charging Speed: {}", sample.speed),
            ],
        )
        .section("Things to do while charging", activities);

    if charging.active {
        view.actions(&[Action::Back, Action::ExploreNearby, Action::StopCharging])
    } else {
        view.actions(&[Action::Back, Action::ExploreNearby])
    }
}

pub(super) fn profile(session: &Session) -> View {
    let catalog = session.catalog();
    let vehicle = &catalog.vehicle;
    View::new(catalog.profile.name.as_str())
        .subtitle(catalog.profile.email.as_str())
        .section(
            "Reward Points",
            vec![format!("{} points", session.reward_points())],
        )
        .section(
            "Vehicle Information",
            vec![
                format!("Model: {}", vehicle.model),
                format!("Battery: {} kWh", vehicle.capacity),
                format!("Range: {} km", vehicle.full_range_km),
            ],
        )
        .actions(&[
            Action::OpenSettings,
            Action::OpenAnalytics,
            Action::OpenRewards,
            Action::OpenPaymentMethods,
        ])
}

pub(super) fn settings(session: &Session) -> View {
    let prefs = session.preferences();
    View::new("Charging Settings")
        .section(
            "Smart Charging",
            vec![
                format!("Auto-start Charging: {}", on_off(prefs.auto_charge)),
                format!(
                    "Default Charging Limit: {}% (recommended: 80% for daily use)",
                    prefs.charging_limit.value()
                ),
                format!("Eco Mode: {}", on_off(prefs.eco_mode)),
            ],
        )
        .section(
            "Preferred Charging Times",
            vec![
                prefs.preferred_time.label().to_string(),
                String::from("Night charging saves up to 40% on electricity costs"),
            ],
        )
        .section(
            "Notifications",
            vec![
                format!("Charging Complete: {}", on_off(prefs.notify_complete)),
                format!("Low Battery Alert: {}", on_off(prefs.notify_low_battery)),
                format!(
                    "Optimal Charging Times: {}",
                    on_off(prefs.notify_optimal_times)
                ),
            ],
        )
        .actions(&[Action::Back])
}

pub(super) fn analytics(session: &Session) -> View {
    let stats = &session.catalog().analytics;
    let mut pattern: Vec<String> = stats
        .weekly
        .iter()
        .map(|d| format!("{}: {} kWh", d.day, d.kwh))
        .collect();
    pattern.push(format!("Week total: {} kWh", stats.weekly_total()));
    pattern.push(format!(
        "Peak Hours {} • Avg. Session {} • Efficiency {}%",
        stats.peak_hours, stats.average_session, stats.efficiency_percent
    ));

    View::new("Analytics Dashboard")
        .section(
            "Key Metrics",
            vec![
                format!("{} kWh This Month", stats.month_kwh),
                format!("₹{} Total Spent", stats.month_spent),
                format!("{} Charging Sessions", stats.sessions),
                format!("{} km/kWh", stats.km_per_kwh),
            ],
        )
        .section("Charging Pattern", pattern)
        .section(
            "Recent Activity",
            vec!["Charging Session Completed • Added 32.5 kWh • +₹585"; 3],
        )
        .actions(&[Action::Back])
}

pub(super) fn booking(session: &Session) -> View {
    let view = View::new("Book Charger");
    let (draft, charger, estimate) = match (
        session.booking(),
        session.booking_charger(),
        session.booking_estimate(),
    ) {
        (Some(draft), Some(charger), Some(estimate)) => (draft, charger, estimate),
        _ => {
            return view
                .section("No charger selected", vec!["There are no chargers to book"])
                .actions(&[Action::Back, Action::CancelBooking]);
        }
    };

    let mut summary = vec![
        format!("Estimated Cost: ₹{}", estimate.cost),
        format!("Estimated Time: {} min", draft.duration.value()),
        format!("Reward Points: +{} pts", estimate.points),
    ];
    if let Some(e) = &estimate.price_error {
        summary.push(format!("Data error: {}", e));
    }

    view.section(
        charger.name.as_str(),
        vec![
            charger.status.label().to_string(),
            charger.features.join(" · "),
            format!("Distance: {}", charger.distance),
            format!("Power: {}", charger.power),
            format!("Rate: {}", charger.price),
        ],
    )
    .section(
        "Charging Preferences",
        vec![
            format!("Target Battery Level: {}%", draft.target_battery.value()),
            format!("Duration: {} minutes", draft.duration.value()),
        ],
    )
    .section("Booking Summary", summary)
    .actions(&[
        Action::Back,
        Action::ProceedToPayment,
        Action::CancelBooking,
    ])
}

pub(super) fn route_planning(session: &Session) -> View {
    let route = session.route();
    let to = if route.to.is_empty() {
        "Enter destination"
    } else {
        route.to.as_str()
    };
    let mut view = View::new("Smart Route Planning").section(
        "Trip",
        vec![format!("From: {}", route.from), format!("To: {}", to)],
    );

    if route.calculated {
        for r in &session.catalog().routes {
            view = view.section(
                r.name.as_str(),
                vec![
                    format!("{} • Save {}", r.cost, r.savings),
                    format!("{} • {}", r.duration, r.distance),
                    format!("{} stops • {} charging", r.charging_stops, r.charging_time),
                ],
            );
        }
    }
    view.actions(&[Action::CalculateRoute])
}

pub(super) fn rewards(session: &Session) -> View {
    let balance = session.reward_points();
    let rewards = session.catalog().rewards.iter().map(|r| {
        format!(
            "{} - {} points - {}",
            r.name,
            r.points,
            if r.redeemable_with(balance) {
                "Redeem"
            } else {
                "Locked"
            }
        )
    });

    View::new("EV Rewards")
        .section(
            "Points Balance",
            vec![
                format!("{} Reward Points", balance),
                String::from("Earn points with every charge!"),
            ],
        )
        .section("Available Rewards", rewards)
        .section(
            "How to Earn Points",
            vec![
                "Complete charging session: +10 pts per ₹100",
                "Rate charging station: +50 pts",
                "Refer a friend: +500 pts",
            ],
        )
        .actions(&[Action::Back])
}

pub(super) fn ai_recommendations(session: &Session) -> View {
    let catalog = session.catalog();
    let mut view = View::new("AI Recommendations");
    for rec in &catalog.recommendations {
        view = view.section(
            rec.title.as_str(),
            vec![rec.description.clone(), rec.savings.clone()],
        );
    }
    view.section("AI Insights", catalog.insights.iter().cloned())
        .actions(&[Action::Back])
}

pub(super) fn payment_methods(session: &Session) -> View {
    let selected = session.payment_method();
    let methods = PaymentMethod::ALL.iter().map(|&m| {
        format!(
            "[{}] {}: {} ({})",
            if m == selected { "x" } else { " " },
            m.label(),
            m.description(),
            m.badge()
        )
    });

    let mut view = View::new("Payment Methods").section("Methods", methods);
    if let Some(checkout) = session.checkout() {
        view = view.section(
            "Booking",
            vec![format!(
                "{} • {} min • target {}%",
                checkout.charger_name, checkout.duration_minutes, checkout.target_battery
            )],
        );
    }

    let summary = session.payment_summary();
    view.section(
        "Payment Summary",
        vec![
            format!("Charging Cost: {}", rupees(summary.base)),
            format!("Platform Fee: {}", rupees(summary.platform_fee)),
            format!(
                "GST ({:.0}%): {}",
                session.tariff().tax_rate * 100.0,
                rupees(summary.tax)
            ),
            format!("Total Amount: {}", rupees(summary.total)),
        ],
    )
    .actions(&[Action::Back, Action::PayAndBook])
}

pub(super) fn voice_assistant(session: &Session) -> View {
    let view = View::new("Aria Assistant").subtitle("Your EV charging assistant");
    let voice = match session.voice() {
        Some(voice) => voice,
        None => return view.actions(&[Action::Back]),
    };
    let state = voice.snapshot();

    let conversation = state.history.iter().map(|entry| {
        let who = match entry.speaker {
            Speaker::Aria => "Aria",
            Speaker::User => "You",
        };
        format!("[{}] {}: {}", time_of_day(&entry.at, false), who, entry.message)
    });
    let input = if state.listening {
        String::from("Listening...")
    } else if let Some(transcript) = &state.transcript {
        format!("Heard: \"{}\"", transcript)
    } else {
        String::from("Hold to Speak")
    };

    let mut actions = vec![Action::Back];
    if !state.listening {
        actions.push(Action::StartListening);
    }
    if state.transcript.is_some() {
        actions.push(Action::SendTranscript);
    }

    view.section("Conversation", conversation)
        .section("Voice Input", vec![input])
        .section("Quick Commands", voice.quick_commands().iter().cloned())
        .actions(&actions)
}

pub(super) fn wireless_waitlist(_session: &Session) -> View {
    View::new("Wireless Charging")
        .subtitle("Coming soon")
        .section("Introducing Wireless Charging", wireless_lines())
        .actions(&[Action::JoinWaitlist])
}
