//! Cancellable scheduled tasks tied to the lifetime of their owner.

use crate::Error;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// A tokio task that is aborted when the `ScopedTimer` is dropped.
///
/// Screens own their timers, so unmounting a screen (dropping its state)
/// guarantees no further callbacks run.
#[derive(Debug)]
pub struct ScopedTimer {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    /// Calls `on_tick` every `period`, first after one full period.
    pub fn repeating<F>(name: &'static str, period: Duration, mut on_tick: F) -> Result<Self, Error>
    where
        F: FnMut() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime(name))?;
        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        log::debug!("timer {}: every {:?}", name, period);

        Ok(ScopedTimer { name, handle })
    }

    /// Calls `on_expiry` once after `delay`.
    pub fn once<F>(name: &'static str, delay: Duration, on_expiry: F) -> Result<Self, Error>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime(name))?;
        let handle = runtime.spawn(async move {
            time::sleep(delay).await;
            on_expiry();
        });
        log::debug!("timer {}: once after {:?}", name, delay);

        Ok(ScopedTimer { name, handle })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
        log::debug!("timer {}: released", self.name);
    }
}

/// Time of day in `at`'s own zone, `HH:MM` or `HH:MM:SS`.
pub fn time_of_day<Tz>(at: &DateTime<Tz>, with_seconds: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let format = if with_seconds { "%H:%M:%S" } else { "%H:%M" };
    at.format(format).to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{FixedOffset, Local, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn repeating_timer_stops_after_drop() {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let timer = ScopedTimer::repeating("test", Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(3, ticks.load(Ordering::SeqCst));

        drop(timer);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(3, ticks.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_fires_once() {
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        let timer = ScopedTimer::once("test", Duration::from_secs(2), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(0, fired.load(Ordering::SeqCst));
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(1, fired.load(Ordering::SeqCst));
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_one_shot_never_fires() {
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        let timer = ScopedTimer::once("test", Duration::from_secs(2), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        drop(timer);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(0, fired.load(Ordering::SeqCst));
    }

    #[test]
    fn needs_a_runtime() {
        let result = ScopedTimer::once("orphan", Duration::from_secs(1), || {});
        assert_eq!(Some(Error::NoRuntime("orphan")), result.err());
    }

    #[test]
    fn formats_time_of_day_in_its_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 4, 13, 5, 9).unwrap();
        assert_eq!("13:05:09", time_of_day(&utc, true));
        assert_eq!("13:05", time_of_day(&utc, false));

        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        assert_eq!("18:35:09", time_of_day(&utc.with_timezone(&ist), true));
    }

    #[test]
    fn local_time_of_day_follows_local_offset() {
        let now = Local::now();
        assert_eq!(
            now.naive_local().format("%H:%M:%S").to_string(),
            time_of_day(&now, true)
        );
    }
}
