// Queue Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Queue identifier (storage-assigned)
pub type QueueId = i64;

/// Owning group reference (groups are managed outside this service)
pub type GroupId = i64;

/// Availability / category reference
pub type AvailabilityId = i64;

pub const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

const MAX_TITLE_LEN: usize = 200;

/// Reception window of a queue, epoch ms. Always `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if end <= start {
            return Err(DomainError::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Fill in whatever the caller left out.
    ///
    /// Start defaults to `now`; end defaults to start plus `duration_hours`
    /// (or `default_hours` when no duration was given either).
    pub fn resolve(
        start: Option<i64>,
        end: Option<i64>,
        duration_hours: Option<i64>,
        now: i64,
        default_hours: i64,
    ) -> Result<Self> {
        let start = start.unwrap_or(now);
        let end = match end {
            Some(end) => end,
            None => {
                let hours = duration_hours.unwrap_or(default_hours);
                if hours <= 0 {
                    return Err(DomainError::InvalidDuration(hours));
                }
                start.saturating_add(hours.saturating_mul(MILLIS_PER_HOUR))
            }
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

/// Queue Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub title: Option<String>,
    pub group_id: Option<GroupId>,
    pub availability_id: Option<AvailabilityId>,
    pub time_start: i64, // epoch ms
    pub time_end: i64,   // epoch ms
}

impl Queue {
    pub fn is_open_at(&self, now_millis: i64) -> bool {
        self.time_start <= now_millis && now_millis < self.time_end
    }
}

/// A queue that has not been persisted yet (window already resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQueue {
    pub title: Option<String>,
    pub group_id: Option<GroupId>,
    pub availability_id: Option<AvailabilityId>,
    pub window: TimeWindow,
}

impl NewQueue {
    pub fn new(title: Option<String>, window: TimeWindow) -> Result<Self> {
        Ok(Self {
            title: normalize_title(title)?,
            group_id: None,
            availability_id: None,
            window,
        })
    }

    pub fn with_group(mut self, group_id: Option<GroupId>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_availability(mut self, availability_id: Option<AvailabilityId>) -> Self {
        self.availability_id = availability_id;
        self
    }
}

/// Blank titles are stored as absent
pub fn normalize_title(title: Option<String>) -> Result<Option<String>> {
    match title.map(|t| t.trim().to_string()) {
        Some(t) if t.is_empty() => Ok(None),
        Some(t) if t.chars().count() > MAX_TITLE_LEN => Err(DomainError::TitleTooLong {
            len: t.chars().count(),
            max: MAX_TITLE_LEN,
        }),
        other => Ok(other),
    }
}
