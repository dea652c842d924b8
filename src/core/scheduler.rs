use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime, TimeZone};
use std::future::Future;
use std::time::Duration;

/// When runs are due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A fixed delay between the end of one run and the start of the next.
    Interval(Duration),
    /// Once a day at a local wall-clock time.
    Daily(NaiveTime),
}

impl Schedule {
    pub fn delay_from<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Duration {
        match self {
            Schedule::Interval(every) => *every,
            Schedule::Daily(at) => {
                let zone = now.timezone();
                let today = now.date_naive();
                // wall-clock targets resolved in the zone so DST days are 23h or 25h long
                (0..=2)
                    .filter_map(|days| {
                        resolve_local(&zone, (today + ChronoDuration::days(days)).and_time(*at))
                    })
                    .find(|next| *next > now)
                    .and_then(|next| next.signed_duration_since(&now).to_std().ok())
                    .unwrap_or(Duration::ZERO)
            }
        }
    }
}

/// Maps a local time onto the zone: the earlier instant when it repeats, an hour
/// later when it falls in a spring-forward gap.
fn resolve_local<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&local).earliest().or_else(|| {
        zone.from_local_datetime(&(local + ChronoDuration::hours(1)))
            .earliest()
    })
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::Interval(every) => write!(f, "every {}s", every.as_secs()),
            Schedule::Daily(at) => write!(f, "daily at {}", at.format("%H:%M")),
        }
    }
}

/// Runs a job on a [`Schedule`], one invocation at a time, until shutdown.
#[derive(Debug, Clone)]
pub struct Scheduler {
    schedule: Schedule,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            run_on_start: false,
        }
    }

    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    /// Returns how many runs completed. A run in progress is finished before shutdown is honored.
    pub async fn run<F, Fut, S>(&self, mut job: F, shutdown: S) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut runs = 0u64;

        if self.run_on_start {
            job().await;
            runs += 1;
        }

        loop {
            let delay = self.schedule.delay_from(Local::now());
            tracing::info!("⌛ Next run in {}s ({})", delay.as_secs(), self.schedule);

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Stopping scheduler after {} run(s)", runs);
                    return runs;
                }
                _ = tokio::time::sleep(delay) => {
                    job().await;
                    runs += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDate, Utc};

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_interval_delay_is_constant() {
        let schedule = Schedule::Interval(Duration::from_secs(10));
        assert_eq!(schedule.delay_from(utc(3, 0)), Duration::from_secs(10));
    }

    #[test]
    fn test_daily_later_today() {
        let schedule = Schedule::Daily(at(21, 0));
        assert_eq!(schedule.delay_from(utc(20, 30)), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_daily_already_passed_rolls_to_tomorrow() {
        let schedule = Schedule::Daily(at(21, 0));
        assert_eq!(
            schedule.delay_from(utc(21, 0)),
            Duration::from_secs(24 * 3600)
        );
        assert_eq!(
            schedule.delay_from(utc(22, 0)),
            Duration::from_secs(23 * 3600)
        );
    }

    /// UTC+1 until 2026-03-29 01:00 UTC, UTC+2 afterwards; local 02:00-03:00 is skipped.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 29)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
    }

    fn hours(h: i32) -> FixedOffset {
        FixedOffset::east_opt(h * 3600).unwrap()
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap_start = switch_utc() + ChronoDuration::hours(1);
            let gap_end = switch_utc() + ChronoDuration::hours(2);
            if *local < gap_start {
                LocalResult::Single(hours(1))
            } else if *local < gap_end {
                LocalResult::None
            } else {
                LocalResult::Single(hours(2))
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < switch_utc() {
                hours(1)
            } else {
                hours(2)
            }
        }
    }

    fn spring_forward_utc(day: u32, h: u32, m: u32) -> DateTime<SpringForward> {
        SpringForward.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2026, 3, day)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_daily_across_dst_change_keeps_wall_clock_time() {
        // 21:00 local on the 28th; the next 21:00 local is only 23 hours away
        let now = spring_forward_utc(28, 20, 0);
        let schedule = Schedule::Daily(at(21, 0));
        assert_eq!(schedule.delay_from(now), Duration::from_secs(23 * 3600));
    }

    #[test]
    fn test_daily_time_in_dst_gap_runs_an_hour_later() {
        // midnight local on the 29th; 02:30 does not exist, 03:30 is 01:30 UTC
        let now = spring_forward_utc(28, 23, 0);
        let schedule = Schedule::Daily(at(2, 30));
        assert_eq!(schedule.delay_from(now), Duration::from_secs(150 * 60));
    }

    #[test]
    fn test_display() {
        assert_eq!(Schedule::Daily(at(9, 5)).to_string(), "daily at 09:05");
        assert_eq!(
            Schedule::Interval(Duration::from_secs(86400)).to_string(),
            "every 86400s"
        );
    }
}
