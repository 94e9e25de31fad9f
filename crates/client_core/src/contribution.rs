use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Per-day activity counts behind a profile's contribution calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionCalendar {
    counts: BTreeMap<NaiveDate, u32>,
}

impl ContributionCalendar {
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut counts = BTreeMap::new();
        for date in dates {
            *counts.entry(date).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Buckets timestamps by their UTC calendar day.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        Self::from_dates(timestamps.into_iter().map(|ts| ts.date_naive()))
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn active_days(&self) -> usize {
        self.counts.len()
    }

    /// Consecutive active days ending today, or ending yesterday when nothing
    /// has happened yet today.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let start = if self.is_active(today) {
            today
        } else {
            match today.pred_opt() {
                Some(yesterday) if self.is_active(yesterday) => yesterday,
                _ => return 0,
            }
        };

        let mut streak = 0;
        let mut day = Some(start);
        while let Some(current) = day.filter(|d| self.is_active(*d)) {
            streak += 1;
            day = current.pred_opt();
        }
        streak
    }

    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for date in self.counts.keys() {
            run = match previous.and_then(|p| p.succ_opt()) {
                Some(expected) if expected == *date => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(*date);
        }
        longest
    }

    /// `weeks` rows of Sunday-to-Saturday counts, the last row holding `end`.
    pub fn weeks(&self, end: NaiveDate, weeks: usize) -> Vec<[u32; 7]> {
        if weeks == 0 {
            return Vec::new();
        }
        let Some(first) = (weeks as u64 - 1)
            .checked_mul(7)
            .and_then(|span| span.checked_add(u64::from(end.weekday().num_days_from_sunday())))
            .and_then(|back| end.checked_sub_days(Days::new(back)))
        else {
            return Vec::new();
        };

        (0..weeks)
            .map(|week| {
                let mut row = [0; 7];
                for (offset, slot) in row.iter_mut().enumerate() {
                    let days = week as u64 * 7 + offset as u64;
                    if let Some(day) = first.checked_add_days(Days::new(days)) {
                        *slot = self.count_on(day);
                    }
                }
                row
            })
            .collect()
    }

    fn is_active(&self, date: NaiveDate) -> bool {
        self.count_on(date) > 0
    }
}

#[cfg(test)]
#[path = "tests/contribution_tests.rs"]
mod tests;
