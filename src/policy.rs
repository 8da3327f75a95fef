//! Age and tag based purge decisions, shared by movies and episodes.

use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Anything that can be aged and protected by a tag.
pub trait Purgeable {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
    fn tags(&self) -> &[u64];
    /// The date the item's age is counted from.
    fn added(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Carries the exclusion tag
    Excluded,
    /// Not older than the maximum age yet
    TooYoung,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep(KeepReason),
    Purge,
}

#[derive(Debug)]
pub struct Decision<'a, T> {
    pub item: &'a T,
    /// Whole days since [`Purgeable::added`], truncated toward zero.
    pub age_days: i64,
    pub verdict: Verdict,
}

impl<T> Decision<'_, T> {
    pub fn is_purge(&self) -> bool {
        self.verdict == Verdict::Purge
    }
}

impl<T: Purgeable> Display for Decision<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\" (id: {}) Age: {} days",
            self.item.name(),
            self.item.id(),
            self.age_days
        )
    }
}

/// Decisions split by verdict, each side in input order.
#[derive(Debug)]
pub struct Partition<'a, T> {
    pub keep: Vec<Decision<'a, T>>,
    pub purge: Vec<Decision<'a, T>>,
}

impl<'a, T> FromIterator<Decision<'a, T>> for Partition<'a, T> {
    fn from_iter<I: IntoIterator<Item = Decision<'a, T>>>(iter: I) -> Self {
        let (purge, keep) = iter.into_iter().partition(|d| d.is_purge());
        Self { keep, purge }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PurgePolicy {
    exclusion_tag: u64,
    max_age_days: i64,
}

impl PurgePolicy {
    pub fn new(exclusion_tag: u64, max_age_days: u32) -> Self {
        Self {
            exclusion_tag,
            max_age_days: i64::from(max_age_days),
        }
    }

    /// Tagged items are always kept. Anything else is purged once it is
    /// strictly older than the maximum age.
    pub fn classify<'a, T: Purgeable>(&self, item: &'a T, now: DateTime<Utc>) -> Decision<'a, T> {
        let age_days = (now - item.added()).num_days();
        let verdict = if item.tags().contains(&self.exclusion_tag) {
            Verdict::Keep(KeepReason::Excluded)
        } else if age_days > self.max_age_days {
            Verdict::Purge
        } else {
            Verdict::Keep(KeepReason::TooYoung)
        };
        Decision {
            item,
            age_days,
            verdict,
        }
    }

    pub fn evaluate<'a, T, I>(&self, items: I, now: DateTime<Utc>) -> Vec<Decision<'a, T>>
    where
        T: Purgeable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items
            .into_iter()
            .map(|item| self.classify(item, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    const EXCLUDE: u64 = 7;

    struct Item {
        id: u64,
        name: String,
        tags: Vec<u64>,
        added: DateTime<Utc>,
    }

    impl Purgeable for Item {
        fn id(&self) -> u64 {
            self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn tags(&self) -> &[u64] {
            &self.tags
        }
        fn added(&self) -> DateTime<Utc> {
            self.added
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
    }

    fn item(id: u64, tags: &[u64], age: TimeDelta) -> Item {
        Item {
            id,
            name: format!("item {id}"),
            tags: tags.to_vec(),
            added: now() - age,
        }
    }

    #[test]
    fn test_older_than_max_age_is_purged() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let old = item(1, &[], TimeDelta::days(91));
        let decision = policy.classify(&old, now());
        assert_eq!(decision.verdict, Verdict::Purge);
        assert_eq!(decision.age_days, 91);
    }

    #[test]
    fn test_exact_max_age_is_kept() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let boundary = item(1, &[], TimeDelta::days(90));
        let decision = policy.classify(&boundary, now());
        assert_eq!(decision.verdict, Verdict::Keep(KeepReason::TooYoung));
        assert_eq!(decision.age_days, 90);
    }

    #[test]
    fn test_partial_days_are_truncated() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let almost = item(1, &[], TimeDelta::days(91) - TimeDelta::seconds(1));
        let decision = policy.classify(&almost, now());
        assert_eq!(decision.age_days, 90);
        assert_eq!(decision.verdict, Verdict::Keep(KeepReason::TooYoung));
    }

    #[test]
    fn test_excluded_is_kept_regardless_of_age() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let ancient = Item {
            added: DateTime::<Utc>::MIN_UTC,
            ..item(1, &[3, EXCLUDE], TimeDelta::zero())
        };
        let decision = policy.classify(&ancient, now());
        assert_eq!(decision.verdict, Verdict::Keep(KeepReason::Excluded));
    }

    #[test]
    fn test_other_tags_do_not_protect() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let tagged = item(1, &[1, 2, 3], TimeDelta::days(200));
        assert!(policy.classify(&tagged, now()).is_purge());
    }

    #[test]
    fn test_future_date_is_kept() {
        let policy = PurgePolicy::new(EXCLUDE, 0);
        let future = item(1, &[], TimeDelta::days(-2));
        let decision = policy.classify(&future, now());
        assert_eq!(decision.age_days, -2);
        assert_eq!(decision.verdict, Verdict::Keep(KeepReason::TooYoung));
    }

    #[test]
    fn test_zero_max_age() {
        let policy = PurgePolicy::new(EXCLUDE, 0);
        let today = item(1, &[], TimeDelta::hours(23));
        let yesterday = item(2, &[], TimeDelta::days(1));
        assert!(!policy.classify(&today, now()).is_purge());
        assert!(policy.classify(&yesterday, now()).is_purge());
    }

    #[test]
    fn test_partition_keeps_input_order() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let items = vec![
            item(1, &[], TimeDelta::days(100)),
            item(2, &[EXCLUDE], TimeDelta::days(100)),
            item(3, &[], TimeDelta::days(85)),
            item(4, &[], TimeDelta::days(120)),
            item(5, &[], TimeDelta::days(3)),
        ];
        let partition: Partition<'_, Item> = policy.evaluate(&items, now()).into_iter().collect();
        let purge: Vec<u64> = partition.purge.iter().map(|d| d.item.id).collect();
        let keep: Vec<u64> = partition.keep.iter().map(|d| d.item.id).collect();
        assert_eq!(purge, vec![1, 4]);
        assert_eq!(keep, vec![2, 3, 5]);
        assert_eq!(
            partition.keep[0].verdict,
            Verdict::Keep(KeepReason::Excluded)
        );
        assert_eq!(
            partition.keep[1].verdict,
            Verdict::Keep(KeepReason::TooYoung)
        );
    }

    #[test]
    fn test_decision_display() {
        let policy = PurgePolicy::new(EXCLUDE, 90);
        let old = item(12, &[], TimeDelta::days(100));
        assert_eq!(
            policy.classify(&old, now()).to_string(),
            "\"item 12\" (id: 12) Age: 100 days"
        );
    }
}
