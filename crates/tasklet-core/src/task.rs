use std::fmt;
use std::str::FromStr;

use std::collections::BTreeSet;

use anyhow::anyhow;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::store::SlotCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One to-do item. All three fields are required when decoding; a record
/// missing any of them invalidates the slot it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Active, FilterMode::Completed];

    pub fn as_key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.is_active(),
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(anyhow!(
                "unknown filter {other:?}; expected all, active or completed"
            )),
        }
    }
}

/// The tasks `mode` keeps, in their original order.
pub fn filtered(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

/// JSON array of task records whose ids are pairwise distinct. A repeated id
/// rejects the whole slot, the same as a malformed record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListCodec;

impl SlotCodec<Vec<Task>> for TaskListCodec {
    fn encode(tasks: &Vec<Task>) -> anyhow::Result<String> {
        Ok(serde_json::to_string(tasks)?)
    }

    fn decode(raw: &str) -> anyhow::Result<Vec<Task>> {
        let tasks: Vec<Task> = serde_json::from_str(raw)?;
        let mut seen = BTreeSet::new();
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(anyhow!("duplicate task id {}", task.id));
            }
        }
        Ok(tasks)
    }
}

/// Wall-clock source for identifier generation, in Unix milliseconds.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// Creation-time identifiers that never repeat within a session: the clock
/// reading, bumped past the last issued id when the clock has not advanced.
/// Once `u64::MAX` has been issued or loaded the generator is exhausted.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn seeded(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|task| task.id.0).max().unwrap_or(0),
        }
    }

    pub fn next(&mut self, now_millis: u64) -> Option<TaskId> {
        let id = now_millis.max(self.last.checked_add(1)?);
        self.last = id;
        Some(TaskId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tick_ids_are_bumped() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next(1_000), Some(TaskId(1_000)));
        assert_eq!(ids.next(1_000), Some(TaskId(1_001)));
        assert_eq!(ids.next(1_000), Some(TaskId(1_002)));
        assert_eq!(ids.next(5_000), Some(TaskId(5_000)));
    }

    #[test]
    fn backwards_clock_still_increases() {
        let mut ids = IdGenerator::default();
        let first = ids.next(9_000);
        let second = ids.next(3_000);
        assert!(second > first);
    }

    #[test]
    fn seeding_skips_past_loaded_ids() {
        let loaded = vec![
            Task::new(TaskId(50), "a".to_string()),
            Task::new(TaskId(80), "b".to_string()),
        ];
        let mut ids = IdGenerator::seeded(&loaded);
        assert_eq!(ids.next(10), Some(TaskId(81)));
    }

    #[test]
    fn generator_exhausts_instead_of_repeating() {
        let loaded = vec![Task::new(TaskId(u64::MAX), "last".to_string())];
        let mut ids = IdGenerator::seeded(&loaded);
        assert_eq!(ids.next(1_000), None);
        assert_eq!(ids.next(u64::MAX), None);

        let mut fresh = IdGenerator::default();
        assert_eq!(fresh.next(u64::MAX), Some(TaskId(u64::MAX)));
        assert_eq!(fresh.next(u64::MAX), None);
    }

    #[test]
    fn task_list_codec_rejects_repeated_ids() {
        let raw = r#"[{"id":5,"text":"a","completed":false},{"id":5,"text":"b","completed":false}]"#;
        let err = TaskListCodec::decode(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 5"));

        let raw = r#"[{"id":5,"text":"a","completed":false},{"id":6,"text":"b","completed":true}]"#;
        let tasks = TaskListCodec::decode(raw).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(TaskListCodec::encode(&tasks).unwrap(), raw);
    }

    #[test]
    fn task_record_requires_every_field() {
        let ok: Task = serde_json::from_str(r#"{"id":1,"text":"a","completed":true}"#).unwrap();
        assert!(ok.completed);
        assert!(!ok.is_active());

        assert!(serde_json::from_str::<Task>(r#"{"id":1,"text":"a"}"#).is_err());
        assert!(serde_json::from_str::<Task>(r#"{"id":"1","text":"a","completed":false}"#).is_err());
    }

    #[test]
    fn filter_mode_parses_keys() {
        assert_eq!("Active".parse::<FilterMode>().unwrap(), FilterMode::Active);
        assert_eq!(" completed ".parse::<FilterMode>().unwrap(), FilterMode::Completed);
        assert!("done".parse::<FilterMode>().is_err());
        for mode in FilterMode::ALL {
            assert_eq!(mode.as_key().parse::<FilterMode>().unwrap(), mode);
        }
    }
}
