//! GPA statistics over the whole store

use crate::error::StoreResult;
use crate::storage::record::{StudentRecord, GPA_RANGE};
use crate::storage::RecordStore;

/// GPA band used by the distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaBand {
    /// 3.5 to 4.0
    Excellent,
    /// 3.0 up to 3.5
    Good,
    /// 2.0 up to 3.0
    Average,
    /// Below 2.0
    Poor,
}

impl GpaBand {
    pub const ALL: [GpaBand; 4] = [
        GpaBand::Excellent,
        GpaBand::Good,
        GpaBand::Average,
        GpaBand::Poor,
    ];

    pub fn from_gpa(gpa: f32) -> Self {
        if gpa >= 3.5 {
            GpaBand::Excellent
        } else if gpa >= 3.0 {
            GpaBand::Good
        } else if gpa >= 2.0 {
            GpaBand::Average
        } else {
            GpaBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpaBand::Excellent => "Excellent (3.5-4.0)",
            GpaBand::Good => "Good (3.0-3.49)",
            GpaBand::Average => "Average (2.0-2.99)",
            GpaBand::Poor => "Poor (Below 2.0)",
        }
    }
}

/// Record counts per GPA band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpaDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

impl GpaDistribution {
    pub fn add(&mut self, gpa: f32) {
        match GpaBand::from_gpa(gpa) {
            GpaBand::Excellent => self.excellent += 1,
            GpaBand::Good => self.good += 1,
            GpaBand::Average => self.average += 1,
            GpaBand::Poor => self.poor += 1,
        }
    }

    pub fn count(&self, band: GpaBand) -> usize {
        match band {
            GpaBand::Excellent => self.excellent,
            GpaBand::Good => self.good,
            GpaBand::Average => self.average,
            GpaBand::Poor => self.poor,
        }
    }
}

/// Highest or lowest GPA and who holds it
#[derive(Debug, Clone, PartialEq)]
pub struct GpaExtreme {
    pub gpa: f32,
    /// `None` when no record strictly passed the starting bound
    pub holder: Option<String>,
}

/// Aggregate over a non-empty store
#[derive(Debug, Clone, PartialEq)]
pub struct GpaSummary {
    pub count: usize,
    pub average: f64,
    pub highest: GpaExtreme,
    pub lowest: GpaExtreme,
    pub distribution: GpaDistribution,
}

/// Result of an aggregate scan
#[derive(Debug, Clone, PartialEq)]
pub enum Statistics {
    /// No records to aggregate
    Empty,
    Summary(GpaSummary),
}

/// Running aggregate
///
/// Highest starts at the bottom of the GPA range and lowest at the top.
/// Both move only on a strictly better value, so the first holder wins ties.
#[derive(Debug, Clone)]
pub struct GpaAccumulator {
    count: usize,
    total: f64,
    highest: GpaExtreme,
    lowest: GpaExtreme,
    distribution: GpaDistribution,
}

impl Default for GpaAccumulator {
    fn default() -> Self {
        GpaAccumulator {
            count: 0,
            total: 0.0,
            highest: GpaExtreme {
                gpa: *GPA_RANGE.start(),
                holder: None,
            },
            lowest: GpaExtreme {
                gpa: *GPA_RANGE.end(),
                holder: None,
            },
            distribution: GpaDistribution::default(),
        }
    }
}

impl GpaAccumulator {
    pub fn push(&mut self, record: &StudentRecord) {
        self.count += 1;
        self.total += f64::from(record.gpa);

        if record.gpa > self.highest.gpa {
            self.highest = GpaExtreme {
                gpa: record.gpa,
                holder: Some(record.name.clone()),
            };
        }
        if record.gpa < self.lowest.gpa {
            self.lowest = GpaExtreme {
                gpa: record.gpa,
                holder: Some(record.name.clone()),
            };
        }

        self.distribution.add(record.gpa);
    }

    pub fn finish(self) -> Statistics {
        if self.count == 0 {
            return Statistics::Empty;
        }
        Statistics::Summary(GpaSummary {
            count: self.count,
            average: self.total / self.count as f64,
            highest: self.highest,
            lowest: self.lowest,
            distribution: self.distribution,
        })
    }
}

/// Aggregate in-memory records
pub fn summarize<'a, I>(records: I) -> Statistics
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut acc = GpaAccumulator::default();
    for record in records {
        acc.push(record);
    }
    acc.finish()
}

/// Aggregate every record in the store in one scan
pub fn aggregate(store: &RecordStore) -> StoreResult<Statistics> {
    let mut acc = GpaAccumulator::default();
    for record in store.scan()? {
        acc.push(&record?);
    }
    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn student(roll_no: i32, name: &str, gpa: f32) -> StudentRecord {
        StudentRecord {
            roll_no,
            name: name.to_string(),
            department: "ME".to_string(),
            course: "Statics".to_string(),
            year_joined: 2015,
            gpa,
        }
    }

    fn summary(stats: Statistics) -> GpaSummary {
        match stats {
            Statistics::Summary(summary) => summary,
            Statistics::Empty => panic!("expected a summary"),
        }
    }

    #[test]
    fn test_one_record_per_band() {
        let records = vec![
            student(1, "A", 3.9),
            student(2, "B", 2.1),
            student(3, "C", 3.4),
            student(4, "D", 0.5),
        ];
        let s = summary(summarize(&records));

        assert_eq!(s.count, 4);
        assert!((s.average - 2.475).abs() < 1e-6);
        assert_eq!(s.highest.gpa, 3.9);
        assert_eq!(s.highest.holder.as_deref(), Some("A"));
        assert_eq!(s.lowest.gpa, 0.5);
        assert_eq!(s.lowest.holder.as_deref(), Some("D"));
        assert_eq!(
            s.distribution,
            GpaDistribution {
                excellent: 1,
                good: 1,
                average: 1,
                poor: 1,
            }
        );
    }

    #[test]
    fn test_empty_is_explicit() {
        assert_eq!(summarize(&Vec::<StudentRecord>::new()), Statistics::Empty);
    }

    #[test]
    fn test_ties_keep_first_holder() {
        let records = vec![
            student(1, "First", 3.0),
            student(2, "Second", 3.0),
            student(3, "Third", 1.0),
            student(4, "Fourth", 1.0),
        ];
        let s = summary(summarize(&records));
        assert_eq!(s.highest.holder.as_deref(), Some("First"));
        assert_eq!(s.lowest.holder.as_deref(), Some("Third"));
    }

    #[test]
    fn test_boundary_values_never_beat_start() {
        let records = vec![student(1, "Zero", 0.0), student(2, "Also zero", 0.0)];
        let s = summary(summarize(&records));
        assert_eq!(s.highest.gpa, 0.0);
        assert_eq!(s.highest.holder, None);
        assert_eq!(s.lowest.holder.as_deref(), Some("Zero"));

        let records = vec![student(1, "Perfect", 4.0)];
        let s = summary(summarize(&records));
        assert_eq!(s.highest.holder.as_deref(), Some("Perfect"));
        assert_eq!(s.lowest.gpa, 4.0);
        assert_eq!(s.lowest.holder, None);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(GpaBand::from_gpa(4.0), GpaBand::Excellent);
        assert_eq!(GpaBand::from_gpa(3.5), GpaBand::Excellent);
        assert_eq!(GpaBand::from_gpa(3.49), GpaBand::Good);
        assert_eq!(GpaBand::from_gpa(3.0), GpaBand::Good);
        assert_eq!(GpaBand::from_gpa(2.99), GpaBand::Average);
        assert_eq!(GpaBand::from_gpa(2.0), GpaBand::Average);
        assert_eq!(GpaBand::from_gpa(1.99), GpaBand::Poor);
        assert_eq!(GpaBand::from_gpa(0.0), GpaBand::Poor);
    }

    #[test]
    fn test_aggregate_from_store() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("students.dat"));
        assert_eq!(aggregate(&store).unwrap(), Statistics::Empty);

        store.append(&student(1, "A", 3.6)).unwrap();
        store.append(&student(2, "B", 2.4)).unwrap();

        let s = summary(aggregate(&store).unwrap());
        assert_eq!(s.count, 2);
        assert!((s.average - 3.0).abs() < 1e-6);
        assert_eq!(s.distribution.count(GpaBand::Excellent), 1);
        assert_eq!(s.distribution.count(GpaBand::Average), 1);
    }
}
