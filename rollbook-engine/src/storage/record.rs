//! Student record layout
//!
//! Records are fixed width and stored back to back with no file header.
//! Layout (little-endian, [`RECORD_SIZE`] bytes):
//! - Offset 0:   roll_no (i32)
//! - Offset 4:   name (50 bytes, NUL padded)
//! - Offset 54:  department (50 bytes, NUL padded)
//! - Offset 104: course (30 bytes, NUL padded)
//! - Offset 134: year_joined (i32)
//! - Offset 138: gpa (f32)
//!
//! Text buffers always keep one trailing NUL, so a buffer of width `n`
//! holds at most `n - 1` bytes of UTF-8.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};
use std::ops::RangeInclusive;

use crate::error::ValidationError;

/// Width of the name buffer
pub const NAME_WIDTH: usize = 50;
/// Width of the department buffer
pub const DEPARTMENT_WIDTH: usize = 50;
/// Width of the course buffer
pub const COURSE_WIDTH: usize = 30;

/// Size of one record on disk
pub const RECORD_SIZE: usize = 4 + NAME_WIDTH + DEPARTMENT_WIDTH + COURSE_WIDTH + 4 + 4;

const ROLL_NO_AT: usize = 0;
const NAME_AT: usize = ROLL_NO_AT + 4;
const DEPARTMENT_AT: usize = NAME_AT + NAME_WIDTH;
const COURSE_AT: usize = DEPARTMENT_AT + DEPARTMENT_WIDTH;
const YEAR_AT: usize = COURSE_AT + COURSE_WIDTH;
const GPA_AT: usize = YEAR_AT + 4;

/// Accepted years of joining
pub const YEAR_RANGE: RangeInclusive<i32> = 2000..=2025;
/// Accepted GPA values
pub const GPA_RANGE: RangeInclusive<f32> = 0.0..=4.0;

/// One student's data as stored in the file
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Unique key
    pub roll_no: i32,
    pub name: String,
    pub department: String,
    pub course: String,
    pub year_joined: i32,
    pub gpa: f32,
}

impl StudentRecord {
    /// Check every field against its domain
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_roll_no(self.roll_no)?;
        validate_name(&self.name)?;
        validate_text("department", &self.department, DEPARTMENT_WIDTH)?;
        validate_text("course", &self.course, COURSE_WIDTH)?;
        validate_year(self.year_joined)?;
        validate_gpa(self.gpa)?;
        Ok(())
    }

    /// Encode into the fixed-width layout
    ///
    /// Text longer than its buffer is truncated at a character boundary.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        LittleEndian::write_i32(&mut buf[ROLL_NO_AT..NAME_AT], self.roll_no);
        put_text(&mut buf[NAME_AT..DEPARTMENT_AT], &self.name);
        put_text(&mut buf[DEPARTMENT_AT..COURSE_AT], &self.department);
        put_text(&mut buf[COURSE_AT..YEAR_AT], &self.course);
        LittleEndian::write_i32(&mut buf[YEAR_AT..GPA_AT], self.year_joined);
        LittleEndian::write_f32(&mut buf[GPA_AT..RECORD_SIZE], self.gpa);
        buf
    }

    /// Decode from the fixed-width layout
    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        if data.len() < RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Student record too short",
            ));
        }

        let mut cursor = Cursor::new(data);
        let roll_no = cursor.read_i32::<LittleEndian>()?;

        let mut name = [0u8; NAME_WIDTH];
        cursor.read_exact(&mut name)?;
        let mut department = [0u8; DEPARTMENT_WIDTH];
        cursor.read_exact(&mut department)?;
        let mut course = [0u8; COURSE_WIDTH];
        cursor.read_exact(&mut course)?;

        let year_joined = cursor.read_i32::<LittleEndian>()?;
        let gpa = cursor.read_f32::<LittleEndian>()?;

        Ok(StudentRecord {
            roll_no,
            name: take_text(&name),
            department: take_text(&department),
            course: take_text(&course),
            year_joined,
            gpa,
        })
    }
}

pub fn validate_roll_no(roll_no: i32) -> Result<(), ValidationError> {
    if roll_no <= 0 {
        return Err(ValidationError::RollNumber(roll_no));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    validate_text("name", name, NAME_WIDTH)
}

/// Check that `value` fits a text buffer of `width` bytes
pub fn validate_text(field: &'static str, value: &str, width: usize) -> Result<(), ValidationError> {
    let max = width - 1;
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    if !YEAR_RANGE.contains(&year) {
        return Err(ValidationError::YearJoined(year));
    }
    Ok(())
}

pub fn validate_gpa(gpa: f32) -> Result<(), ValidationError> {
    // NaN fails the range check too
    if !GPA_RANGE.contains(&gpa) {
        return Err(ValidationError::Gpa(gpa));
    }
    Ok(())
}

fn put_text(dst: &mut [u8], text: &str) {
    let mut end = text.len().min(dst.len() - 1);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    dst[..end].copy_from_slice(&text.as_bytes()[..end]);
}

fn take_text(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StudentRecord {
        StudentRecord {
            roll_no: 101,
            name: "Ada Lovelace".to_string(),
            department: "CS".to_string(),
            course: "Analytical Engines".to_string(),
            year_joined: 2021,
            gpa: 3.75,
        }
    }

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, 142);
        assert_eq!(sample().to_bytes().len(), RECORD_SIZE);
    }

    #[test]
    fn test_layout_offsets() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..4], &101i32.to_le_bytes());
        assert_eq!(&bytes[4..16], b"Ada Lovelace");
        assert_eq!(bytes[16], 0);
        assert_eq!(&bytes[54..56], b"CS");
        assert_eq!(&bytes[134..138], &2021i32.to_le_bytes());
        assert_eq!(&bytes[138..142], &3.75f32.to_le_bytes());
    }

    #[test]
    fn test_decode_matches_encode() {
        let record = sample();
        let parsed = StudentRecord::from_bytes(&record.to_bytes()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let bytes = sample().to_bytes();
        let err = StudentRecord::from_bytes(&bytes[..RECORD_SIZE - 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_overlong_text_truncated_on_char_boundary() {
        let mut record = sample();
        // 28 two-byte characters = 56 bytes, course buffer holds 29
        record.course = "é".repeat(28);
        let parsed = StudentRecord::from_bytes(&record.to_bytes()).unwrap();
        assert_eq!(parsed.course, "é".repeat(14));
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let mut record = sample();
        record.department = String::new();
        record.course = "c".repeat(COURSE_WIDTH - 1);
        record.name = "n".repeat(NAME_WIDTH - 1);
        record.year_joined = 2000;
        record.gpa = 4.0;
        assert!(record.validate().is_ok());
        record.year_joined = 2025;
        record.gpa = 0.0;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let mut record = sample();
        record.roll_no = 0;
        assert_eq!(record.validate(), Err(ValidationError::RollNumber(0)));

        let mut record = sample();
        record.name.clear();
        assert_eq!(record.validate(), Err(ValidationError::EmptyName));

        let mut record = sample();
        record.name = "n".repeat(NAME_WIDTH);
        assert!(matches!(
            record.validate(),
            Err(ValidationError::TooLong { field: "name", len: 50, max: 49 })
        ));

        let mut record = sample();
        record.year_joined = 1999;
        assert_eq!(record.validate(), Err(ValidationError::YearJoined(1999)));

        let mut record = sample();
        record.gpa = 4.5;
        assert_eq!(record.validate(), Err(ValidationError::Gpa(4.5)));

        let mut record = sample();
        record.gpa = f32::NAN;
        assert!(record.validate().is_err());
    }
}
