use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::anomaly::AnomalyClassifier;
use crate::store::SatelliteStore;

/// Source of "now" for derived values.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SatelliteStore>,
    pub classifier: AnomalyClassifier,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Arc<dyn SatelliteStore>, classifier: AnomalyClassifier) -> Self {
        Self {
            store,
            classifier,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}
