// Queue Domain Model

use super::entry::{Minutes, QueueEntry};
use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Queue identifier (UUID v4)
pub type QueueId = String;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Per-queue business rules, supplied at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSettings {
    pub max_party_size: u32,
    pub min_party_size: u32,
    /// Percentage over capacity allowed (informational)
    pub allowed_over_capacity: u32,
    pub default_estimated_wait_time: Minutes,
    /// Notify a customer when they are this many positions away
    pub notification_threshold: u32,
}

impl QueueSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_party_size > self.max_party_size {
            return Err(DomainError::InvalidSettings(format!(
                "min party size {} exceeds max party size {}",
                self.min_party_size, self.max_party_size
            )));
        }
        if self.default_estimated_wait_time < 0 {
            return Err(DomainError::InvalidSettings(format!(
                "default estimated wait time must not be negative (got {})",
                self.default_estimated_wait_time
            )));
        }
        Ok(())
    }

    pub fn accepts_party_size(&self, party_size: u32) -> bool {
        (self.min_party_size..=self.max_party_size).contains(&party_size)
    }
}

/// Opening hours. Not enforced when customers join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open_time: String,  // 24h "HH:mm"
    pub close_time: String, // 24h "HH:mm"
    pub timezone: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_time: "09:00".to_string(),
            close_time: "22:00".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl BusinessHours {
    pub fn validate(&self) -> Result<()> {
        for value in [&self.open_time, &self.close_time] {
            chrono::NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT).map_err(|_| {
                DomainError::InvalidBusinessHours(format!("'{}' is not a HH:mm time", value))
            })?;
        }
        if self.timezone.trim().is_empty() {
            return Err(DomainError::InvalidBusinessHours(
                "timezone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Queue aggregate: configuration plus its ordered entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    pub max_capacity: u32,
    /// Counter maintained next to `entries`; not derived from it
    pub current_size: u32,
    /// Always sorted by position ascending
    pub entries: Vec<QueueEntry>,
    pub average_wait_time: Minutes,
    pub is_active: bool,
    pub business_hours: BusinessHours,
    pub settings: QueueSettings,
}

impl Queue {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn find_entry(&self, entry_id: &str) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn find_entry_mut(&mut self, entry_id: &str) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|e| e.id == entry_id)
    }

    pub fn entry_index(&self, entry_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == entry_id)
    }

    /// Stable sort by position
    pub fn sort_entries(&mut self) {
        self.entries.sort_by_key(|e| e.position);
    }

    /// True when entry positions are exactly 1..=N
    pub fn has_contiguous_positions(&self) -> bool {
        let mut positions: Vec<u32> = self.entries.iter().map(|e| e.position).collect();
        positions.sort_unstable();
        positions
            .iter()
            .enumerate()
            .all(|(index, position)| *position as usize == index + 1)
    }
}

/// Partial update of a queue aggregate. Unset fields are left untouched.
///
/// Entries are only changed through the entry-level repository operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuePatch {
    pub name: Option<String>,
    pub max_capacity: Option<u32>,
    pub current_size: Option<u32>,
    pub average_wait_time: Option<Minutes>,
    pub is_active: Option<bool>,
    pub business_hours: Option<BusinessHours>,
    pub settings: Option<QueueSettings>,
}

impl QueuePatch {
    pub fn current_size(current_size: u32) -> Self {
        Self {
            current_size: Some(current_size),
            ..Default::default()
        }
    }

    pub fn average_wait_time(average_wait_time: Minutes) -> Self {
        Self {
            average_wait_time: Some(average_wait_time),
            ..Default::default()
        }
    }

    pub fn is_active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, queue: &mut Queue) {
        if let Some(name) = &self.name {
            queue.name = name.clone();
        }
        if let Some(max_capacity) = self.max_capacity {
            queue.max_capacity = max_capacity;
        }
        if let Some(current_size) = self.current_size {
            queue.current_size = current_size;
        }
        if let Some(average_wait_time) = self.average_wait_time {
            queue.average_wait_time = average_wait_time;
        }
        if let Some(is_active) = self.is_active {
            queue.is_active = is_active;
        }
        if let Some(business_hours) = &self.business_hours {
            queue.business_hours = business_hours.clone();
        }
        if let Some(settings) = &self.settings {
            queue.settings = settings.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> QueueSettings {
        QueueSettings {
            max_party_size: 8,
            min_party_size: 1,
            allowed_over_capacity: 10,
            default_estimated_wait_time: 30,
            notification_threshold: 2,
        }
    }

    fn queue() -> Queue {
        Queue {
            id: "q-1".to_string(),
            name: "Main Dining".to_string(),
            max_capacity: 80,
            current_size: 0,
            entries: vec![],
            average_wait_time: 30,
            is_active: true,
            business_hours: BusinessHours::default(),
            settings: settings(),
        }
    }

    #[test]
    fn test_settings_validation() {
        assert!(settings().validate().is_ok());

        let inverted = QueueSettings {
            min_party_size: 9,
            ..settings()
        };
        let err = inverted.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds max party size"));
    }

    #[test]
    fn test_party_size_bounds_are_inclusive() {
        let settings = settings();
        assert!(settings.accepts_party_size(1));
        assert!(settings.accepts_party_size(8));
        assert!(!settings.accepts_party_size(0));
        assert!(!settings.accepts_party_size(9));
    }

    #[test]
    fn test_business_hours_validation() {
        assert!(BusinessHours::default().validate().is_ok());

        let bad = BusinessHours {
            open_time: "25:00".to_string(),
            ..BusinessHours::default()
        };
        assert!(bad.validate().is_err());

        let no_zone = BusinessHours {
            timezone: " ".to_string(),
            ..BusinessHours::default()
        };
        assert!(no_zone.validate().is_err());
    }

    #[test]
    fn test_sort_and_contiguity() {
        let mut queue = queue();
        queue.entries.push(QueueEntry::new("b", "c", "q-1", 2, 30, 0, 2));
        queue.entries.push(QueueEntry::new("a", "c", "q-1", 2, 30, 0, 1));
        queue.sort_entries();

        assert_eq!(queue.entries[0].id, "a");
        assert!(queue.has_contiguous_positions());

        queue.entries[1].position = 4;
        assert!(!queue.has_contiguous_positions());
    }

    #[test]
    fn test_patch_merges_set_fields() {
        let mut queue = queue();
        QueuePatch {
            current_size: Some(3),
            is_active: Some(false),
            ..Default::default()
        }
        .apply_to(&mut queue);

        assert_eq!(queue.current_size, 3);
        assert!(!queue.is_active);
        assert_eq!(queue.average_wait_time, 30);
        assert_eq!(queue.name, "Main Dining");
    }
}
