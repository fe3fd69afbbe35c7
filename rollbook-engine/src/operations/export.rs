//! CSV export
//!
//! Fields are written verbatim. Commas or quotes inside text fields are not
//! escaped, so such rows will not parse back cleanly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::StoreResult;
use crate::storage::record::StudentRecord;
use crate::storage::RecordStore;

/// First line of every export
pub const CSV_HEADER: &str = "Roll Number,Name,Department,Course,Year Joined,GPA";

/// Format one record as a CSV line, without the newline
pub fn csv_row(record: &StudentRecord) -> String {
    format!(
        "{},{},{},{},{},{:.2}",
        record.roll_no,
        record.name,
        record.department,
        record.course,
        record.year_joined,
        record.gpa
    )
}

/// Write the header and one line per record, returning the record count
pub fn write_csv<W, I>(out: &mut W, records: I) -> StoreResult<usize>
where
    W: Write,
    I: IntoIterator<Item = StoreResult<StudentRecord>>,
{
    writeln!(out, "{}", CSV_HEADER)?;
    let mut count = 0;
    for record in records {
        writeln!(out, "{}", csv_row(&record?))?;
        count += 1;
    }
    Ok(count)
}

/// Export every record in the store to `destination`
pub fn export_csv(store: &RecordStore, destination: &Path) -> StoreResult<usize> {
    let records = store.scan()?;
    let mut out = BufWriter::new(File::create(destination)?);
    let count = write_csv(&mut out, records)?;
    out.flush()?;

    info!(count, destination = %destination.display(), "Exported records");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn student(roll_no: i32, name: &str, department: &str, gpa: f32) -> StudentRecord {
        StudentRecord {
            roll_no,
            name: name.to_string(),
            department: department.to_string(),
            course: "B.Tech".to_string(),
            year_joined: 2019,
            gpa,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let records = vec![
            Ok(student(1, "Ada", "CS", 3.9)),
            Ok(student(2, "Alan", "", 2.0)),
        ];
        let mut out = Vec::new();

        assert_eq!(write_csv(&mut out, records).unwrap(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Roll Number,Name,Department,Course,Year Joined,GPA\n\
             1,Ada,CS,B.Tech,2019,3.90\n\
             2,Alan,,B.Tech,2019,2.00\n"
        );
    }

    #[test]
    fn test_commas_not_escaped() {
        let row = csv_row(&student(3, "Lovelace, Ada", "CS", 3.5));
        assert_eq!(row, "3,Lovelace, Ada,CS,B.Tech,2019,3.50");
    }

    #[test]
    fn test_export_store_to_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("students.dat"));
        store.append(&student(1, "Ada", "CS", 3.9)).unwrap();
        store.append(&student(2, "Alan", "EE", 3.1)).unwrap();

        let destination = dir.path().join("export.csv");
        assert_eq!(export_csv(&store, &destination).unwrap(), 2);

        let text = fs::read_to_string(&destination).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[2], "2,Alan,EE,B.Tech,2019,3.10");
    }

    #[test]
    fn test_export_empty_store_writes_header_only() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("students.dat"));
        let destination = dir.path().join("export.csv");

        assert_eq!(export_csv(&store, &destination).unwrap(), 0);
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            format!("{}\n", CSV_HEADER)
        );
    }
}
