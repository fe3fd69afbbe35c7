//! Per-field record changes for Update
//!
//! Each field change is optional and validated on its own. A change outside
//! its domain is discarded and the stored value is kept; the rest still apply.

use crate::storage::record::{
    validate_gpa, validate_name, validate_text, validate_year, StudentRecord, COURSE_WIDTH,
    DEPARTMENT_WIDTH,
};

bitflags::bitflags! {
    /// Set of record fields touched by an update
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChangedFields: u8 {
        const NAME = 0x01;
        const DEPARTMENT = 0x02;
        const COURSE = 0x04;
        const YEAR_JOINED = 0x08;
        const GPA = 0x10;
    }
}

impl ChangedFields {
    /// Human readable field names, in layout order
    pub fn labels(&self) -> Vec<&'static str> {
        self.iter()
            .map(|field| match field {
                f if f == ChangedFields::NAME => "name",
                f if f == ChangedFields::DEPARTMENT => "department",
                f if f == ChangedFields::COURSE => "course",
                f if f == ChangedFields::YEAR_JOINED => "year joined",
                _ => "GPA",
            })
            .collect()
    }
}

/// Requested changes; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    pub name: Option<String>,
    pub department: Option<String>,
    pub course: Option<String>,
    pub year_joined: Option<i32>,
    pub gpa: Option<f32>,
}

/// Result of a successful update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// Record as stored after the update
    pub record: StudentRecord,
    /// Changes that were written
    pub applied: ChangedFields,
    /// Changes discarded for being out of range
    pub rejected: ChangedFields,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.department.is_none()
            && self.course.is_none()
            && self.year_joined.is_none()
            && self.gpa.is_none()
    }

    /// Apply valid changes to `record`, returning (applied, rejected)
    pub fn apply_to(&self, record: &mut StudentRecord) -> (ChangedFields, ChangedFields) {
        let mut applied = ChangedFields::empty();
        let mut rejected = ChangedFields::empty();

        if let Some(name) = &self.name {
            if validate_name(name).is_ok() {
                record.name = name.clone();
                applied |= ChangedFields::NAME;
            } else {
                rejected |= ChangedFields::NAME;
            }
        }

        if let Some(department) = &self.department {
            if validate_text("department", department, DEPARTMENT_WIDTH).is_ok() {
                record.department = department.clone();
                applied |= ChangedFields::DEPARTMENT;
            } else {
                rejected |= ChangedFields::DEPARTMENT;
            }
        }

        if let Some(course) = &self.course {
            if validate_text("course", course, COURSE_WIDTH).is_ok() {
                record.course = course.clone();
                applied |= ChangedFields::COURSE;
            } else {
                rejected |= ChangedFields::COURSE;
            }
        }

        if let Some(year) = self.year_joined {
            if validate_year(year).is_ok() {
                record.year_joined = year;
                applied |= ChangedFields::YEAR_JOINED;
            } else {
                rejected |= ChangedFields::YEAR_JOINED;
            }
        }

        if let Some(gpa) = self.gpa {
            if validate_gpa(gpa).is_ok() {
                record.gpa = gpa;
                applied |= ChangedFields::GPA;
            } else {
                rejected |= ChangedFields::GPA;
            }
        }

        (applied, rejected)
    }
}
