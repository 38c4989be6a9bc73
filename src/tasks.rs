use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::TaskRecord;

/// Follow-ups split by state at a given instant.
///
/// The buckets are disjoint and together hold every input task, each in
/// input order. The split is only valid for the `now` it was computed at.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPartition {
    pub overdue: Vec<TaskRecord>,
    pub upcoming: Vec<TaskRecord>,
    pub completed: Vec<TaskRecord>,
}

impl TaskPartition {
    pub fn len(&self) -> usize {
        self.overdue.len() + self.upcoming.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `limit` upcoming follow-ups, for display.
    pub fn upcoming_preview(&self, limit: usize) -> &[TaskRecord] {
        &self.upcoming[..self.upcoming.len().min(limit)]
    }
}

/// Partition follow-ups into overdue, upcoming and completed.
pub fn classify(tasks: &[TaskRecord], now: DateTime<Utc>) -> TaskPartition {
    let mut partition = TaskPartition::default();
    for task in tasks {
        let bucket = if task.is_completed {
            &mut partition.completed
        } else if task.scheduled_at < now {
            &mut partition.overdue
        } else {
            &mut partition.upcoming
        };
        bucket.push(task.clone());
    }
    partition
}

/// Follow-ups assigned to one salesperson, classified at `now`.
pub fn classify_for_owner(
    tasks: &[TaskRecord],
    owner_id: &str,
    now: DateTime<Utc>,
) -> TaskPartition {
    let owned: Vec<TaskRecord> = tasks
        .iter()
        .filter(|t| t.owner_id.as_deref() == Some(owner_id))
        .cloned()
        .collect();
    classify(&owned, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    fn task(id: &str, offset_secs: i64, done: bool) -> TaskRecord {
        TaskRecord {
            id: id.into(),
            scheduled_at: now() + Duration::seconds(offset_secs),
            is_completed: done,
            owner_id: Some("u1".into()),
            lead_id: None,
            lead_name: None,
            note: None,
        }
    }

    fn ids(tasks: &[TaskRecord]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_one_second_boundaries() {
        let p = classify(&[task("past", -1, false), task("future", 1, false)], now());
        assert_eq!(ids(&p.overdue), vec!["past"]);
        assert_eq!(ids(&p.upcoming), vec!["future"]);
        assert!(p.completed.is_empty());
    }

    #[test]
    fn test_scheduled_exactly_now_is_upcoming() {
        let p = classify(&[task("now", 0, false)], now());
        assert_eq!(ids(&p.upcoming), vec!["now"]);
    }

    #[test]
    fn test_completed_is_never_overdue() {
        let p = classify(
            &[task("old", -86_400, true), task("new", 86_400, true)],
            now(),
        );
        assert_eq!(ids(&p.completed), vec!["old", "new"]);
        assert!(p.overdue.is_empty());
        assert!(p.upcoming.is_empty());
    }

    #[test]
    fn test_partition_is_exhaustive_and_ordered() {
        let tasks = vec![
            task("a", 300, false),
            task("b", -300, false),
            task("c", 60, true),
            task("d", 100, false),
            task("e", -10, false),
        ];
        let p = classify(&tasks, now());
        assert_eq!(p.len(), tasks.len());
        assert_eq!(ids(&p.overdue), vec!["b", "e"]);
        assert_eq!(ids(&p.upcoming), vec!["a", "d"]);
        assert_eq!(ids(&p.completed), vec!["c"]);
    }

    #[test]
    fn test_later_now_moves_upcoming_to_overdue() {
        let tasks = vec![task("a", 60, false)];
        assert_eq!(classify(&tasks, now()).upcoming.len(), 1);
        let later = now() + Duration::minutes(2);
        assert_eq!(classify(&tasks, later).overdue.len(), 1);
    }

    #[test]
    fn test_upcoming_preview_caps() {
        let tasks: Vec<TaskRecord> = (0..8).map(|i| task(&i.to_string(), 60 + i, false)).collect();
        let p = classify(&tasks, now());
        assert_eq!(p.upcoming.len(), 8);
        assert_eq!(ids(p.upcoming_preview(5)), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(p.upcoming_preview(20).len(), 8);
    }

    #[test]
    fn test_empty_input() {
        let p = classify(&[], now());
        assert!(p.is_empty());
    }

    #[test]
    fn test_classify_for_owner() {
        let mut other = task("x", -5, false);
        other.owner_id = Some("u2".into());
        let tasks = vec![task("mine", -5, false), other];
        let p = classify_for_owner(&tasks, "u1", now());
        assert_eq!(ids(&p.overdue), vec!["mine"]);
        assert_eq!(p.len(), 1);
    }
}
