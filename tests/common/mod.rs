use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use danci_recall::{InMemoryProgressStore, InitialInterval, ProgressTracker, SchedulerConfig};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
}

pub fn create_test_tracker() -> ProgressTracker {
    let config = SchedulerConfig {
        initial_interval: InitialInterval::new(24.0, 4.0),
        log_level: "debug".to_string(),
        ..SchedulerConfig::default()
    };
    let _ = danci_recall::logging::init_tracing(&config);

    ProgressTracker::new(config, Arc::new(InMemoryProgressStore::new()))
        .expect("default test config is valid")
}
