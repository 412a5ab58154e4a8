#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use std::sync::Mutex;
use unwired_rs::catalog::{Catalog, SearchFilter};
use unwired_rs::navigation::Action;
use unwired_rs::session::{PaymentMethod, PreferencesUpdate, PreferredTime, Session};
use unwired_rs::settings::{read_settings, UnwiredConfig};
use unwired_rs::view::{self, View};
use unwired_rs::{lock, Error};

mod metrics;

/// Structure containing state for API handlers.
pub struct StateData {
    session: Mutex<Session>,
    maps_url: String,
}

impl StateData {
    fn new(catalog: Catalog, config: UnwiredConfig) -> Self {
        StateData {
            maps_url: config.maps_url.clone(),
            session: Mutex::new(Session::new(catalog, config)),
        }
    }
}

/// Runs `change` against the session and renders whatever screen is current
/// afterwards.
fn transition<F>(state: &State<StateData>, change: F) -> Result<Json<View>, Error>
where
    F: FnOnce(&mut Session) -> Result<(), Error>,
{
    let mut session = lock(&state.session);
    let before = session.current();
    change(&mut session)?;

    let after = session.current();
    if before != after {
        metrics::screen_view(after);
    }
    metrics::observe(&session);
    Ok(Json(view::render(&session)))
}

/// Query form of `POST /settings`; absent fields are left unchanged.
#[derive(Debug, FromForm)]
struct PreferencesForm {
    auto_charge: Option<bool>,
    charging_limit: Option<i64>,
    eco_mode: Option<bool>,
    preferred_time: Option<String>,
    notify_complete: Option<bool>,
    notify_low_battery: Option<bool>,
    notify_optimal_times: Option<bool>,
}

impl PreferencesForm {
    fn into_update(self) -> Result<PreferencesUpdate, Error> {
        Ok(PreferencesUpdate {
            auto_charge: self.auto_charge,
            charging_limit: self.charging_limit,
            eco_mode: self.eco_mode,
            preferred_time: self
                .preferred_time
                .as_deref()
                .map(str::parse::<PreferredTime>)
                .transpose()?,
            notify_complete: self.notify_complete,
            notify_low_battery: self.notify_low_battery,
            notify_optimal_times: self.notify_optimal_times,
        })
    }
}

#[get("/")]
fn view_route(state: &State<StateData>) -> Json<View> {
    Json(view::render(&lock(&state.session)))
}

#[get("/text")]
fn text_route(state: &State<StateData>) -> String {
    view::render(&lock(&state.session)).to_string()
}

#[post("/navigate/<screen>")]
fn navigate_route(screen: &str, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| {
        session.navigate_to(screen);
        Ok(())
    })
}

#[post("/action/<action>?<charger>")]
fn action_route(
    action: &str,
    charger: Option<&str>,
    state: &State<StateData>,
) -> Result<Json<View>, Error> {
    let action: Action = action.parse()?;
    let charger = charger
        .map(|id| {
            id.parse::<u32>()
                .map_err(|_| Error::InvalidChoice(id.to_string()))
        })
        .transpose()?;
    transition(state, |session| session.apply(action, charger))
}

#[post("/booking/charger/<id>")]
fn booking_charger_route(id: u32, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| session.select_charger(id))
}

#[post("/booking/target/<percent>")]
fn booking_target_route(percent: i64, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| session.set_target_battery(percent).map(|_| ()))
}

#[post("/booking/duration/<minutes>")]
fn booking_duration_route(minutes: i64, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| session.set_duration(minutes).map(|_| ()))
}

#[post("/search?<query>&<filter>")]
fn search_route(
    query: Option<String>,
    filter: Option<String>,
    state: &State<StateData>,
) -> Result<Json<View>, Error> {
    let filter = filter
        .as_deref()
        .map(str::parse::<SearchFilter>)
        .transpose()?;
    transition(state, |session| {
        session.set_search(query, filter);
        Ok(())
    })
}

#[post("/voice/send?<command>")]
fn voice_send_route(command: String, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| {
        let intent = session.send_voice(&command)?;
        metrics::voice_command(intent);
        Ok(())
    })
}

#[post("/voice/transcript")]
fn voice_transcript_route(state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| {
        if let Some(intent) = session.send_transcript()? {
            metrics::voice_command(intent);
        }
        Ok(())
    })
}

#[post("/rewards/<id>/redeem")]
fn redeem_route(id: u32, state: &State<StateData>) -> Result<Json<View>, Error> {
    transition(state, |session| session.redeem(id).map(|_| ()))
}

#[post("/payment-method/<method>")]
fn payment_method_route(method: &str, state: &State<StateData>) -> Result<Json<View>, Error> {
    let method: PaymentMethod = method.parse()?;
    transition(state, |session| session.select_payment_method(method))
}

#[post("/route?<from>&<to>")]
fn route_route(
    from: Option<String>,
    to: Option<String>,
    state: &State<StateData>,
) -> Result<Json<View>, Error> {
    transition(state, |session| {
        session.set_route(from, to);
        Ok(())
    })
}

#[post("/settings?<prefs..>")]
fn settings_route(prefs: PreferencesForm, state: &State<StateData>) -> Result<Json<View>, Error> {
    let update = prefs.into_update()?;
    transition(state, |session| {
        session.update_preferences(update);
        Ok(())
    })
}

#[get("/directions")]
fn directions_route(state: &State<StateData>) -> Redirect {
    Redirect::to(state.maps_url.clone())
}

#[get("/metrics")]
fn metrics_route(state: &State<StateData>) -> Result<String, Error> {
    metrics::observe(&lock(&state.session));
    metrics::read()
}

fn build(state: StateData) -> Rocket<Build> {
    rocket::build().manage(state).mount(
        "/",
        routes![
            view_route,
            text_route,
            navigate_route,
            action_route,
            booking_charger_route,
            booking_target_route,
            booking_duration_route,
            search_route,
            voice_send_route,
            voice_transcript_route,
            redeem_route,
            payment_method_route,
            route_route,
            settings_route,
            directions_route,
            metrics_route,
        ],
    )
}

#[launch]
fn rocket() -> Rocket<Build> {
    env_logger::init();

    let settings = read_settings().unwrap_or_else(|e| {
        log::error!("{}; using default settings", e);
        UnwiredConfig::default()
    });
    let catalog = Catalog::builtin().unwrap_or_else(|e| {
        log::error!("{}; starting with an empty catalog", e);
        Catalog::default()
    });

    build(StateData::new(catalog, settings))
}
