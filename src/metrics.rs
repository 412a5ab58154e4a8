use prometheus::{Encoder, Gauge, IntCounterVec, IntGauge, TextEncoder};
use unwired_rs::navigation::ScreenId;
use unwired_rs::session::Session;
use unwired_rs::voice::Intent;
use unwired_rs::Error;

lazy_static! {
    static ref SCREEN_VIEWS_COUNTER: IntCounterVec = register_int_counter_vec!(
        opts!("screen_views", "number of times a screen became current",),
        &["screen"],
    )
    .unwrap();
    static ref VOICE_COMMANDS_COUNTER: IntCounterVec = register_int_counter_vec!(
        opts!("voice_commands", "voice commands answered, by matched intent",),
        &["intent"],
    )
    .unwrap();
    static ref REWARD_POINTS_GAUGE: IntGauge =
        register_int_gauge!(opts!("reward_points", "current reward points balance",)).unwrap();
    static ref BOOKING_ESTIMATE_GAUGE: Gauge = register_gauge!(opts!(
        "booking_estimate_rupees",
        "estimated cost of the booking being drafted",
    ))
    .unwrap();
}

pub fn screen_view(screen: ScreenId) {
    SCREEN_VIEWS_COUNTER
        .with_label_values(&[screen.as_str()])
        .inc();
}

pub fn voice_command(intent: Intent) {
    VOICE_COMMANDS_COUNTER
        .with_label_values(&[intent.as_str()])
        .inc();
}

/// Copy gauges from the current `session`.
pub fn observe(session: &Session) {
    REWARD_POINTS_GAUGE.set(session.reward_points() as i64);
    BOOKING_ESTIMATE_GAUGE.set(booking_estimate(session));
}

/// Cost of the booking being drafted; 0 once the draft is gone.
fn booking_estimate(session: &Session) -> f64 {
    session.booking_estimate().map_or(0.0, |estimate| estimate.cost)
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|_| Error::FormatError)?;
    String::from_utf8(buffer).or(Err(Error::FormatError))
}
