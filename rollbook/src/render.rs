//! Text rendering for the interactive menu

use std::io::{self, Write};

use rollbook_engine::operations::stats::{GpaBand, GpaExtreme, GpaSummary};
use rollbook_engine::StudentRecord;

const BOX_INNER: usize = 48;

fn rule(left: char, fill: char, right: char) -> String {
    let mut line = String::with_capacity(BOX_INNER + 2);
    line.push(left);
    line.extend(std::iter::repeat(fill).take(BOX_INNER));
    line.push(right);
    line
}

/// Double-line box around `lines`
pub fn notice<W: Write>(out: &mut W, lines: &[&str]) -> io::Result<()> {
    writeln!(out, "\n{}", rule('╔', '═', '╗'))?;
    for line in lines {
        writeln!(out, "║  {:<46}║", line)?;
    }
    writeln!(out, "{}", rule('╚', '═', '╝'))
}

/// Section heading box with a centered title
pub fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", rule('╔', '═', '╗'))?;
    writeln!(out, "║{:^48}║", title)?;
    writeln!(out, "{}", rule('╚', '═', '╝'))
}

pub fn welcome<W: Write>(out: &mut W) -> io::Result<()> {
    let version = format!("ROLLBOOK v{}", env!("CARGO_PKG_VERSION"));
    writeln!(out, "\n{}", rule('╔', '═', '╗'))?;
    writeln!(out, "║{:48}║", "")?;
    writeln!(out, "║{:^48}║", version)?;
    writeln!(out, "║{:^48}║", "Student Record Manager")?;
    writeln!(out, "║{:48}║", "")?;
    writeln!(out, "{}", rule('╚', '═', '╝'))
}

pub fn farewell<W: Write>(out: &mut W) -> io::Result<()> {
    notice(out, &["Thank you for using Rollbook!", "Have a great day!"])
}

pub fn main_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{}", rule('┌', '─', '┐'))?;
    writeln!(out, "│{:^48}│", "MAIN MENU")?;
    writeln!(out, "{}", rule('├', '─', '┤'))?;
    for item in [
        "1. Add New Student",
        "2. Display All Students",
        "3. Search Student",
        "4. Update Student Details",
        "5. Delete Student",
        "6. View Statistics",
        "7. Export to CSV",
        "8. Exit",
    ] {
        writeln!(out, "│  {:<46}│", item)?;
    }
    writeln!(out, "{}", rule('└', '─', '┘'))
}

pub fn record_table<W: Write>(out: &mut W, records: &[StudentRecord]) -> io::Result<()> {
    writeln!(out, "\n╔════════╦══════════════════════════════╦═══════════════╦════════════════════╦══════╦═════╗")?;
    writeln!(out, "║ Roll # ║ Name                         ║ Department    ║ Course             ║ Year ║ GPA ║")?;
    writeln!(out, "╠════════╬══════════════════════════════╬═══════════════╬════════════════════╬══════╬═════╣")?;
    for r in records {
        writeln!(
            out,
            "║ {:<6} ║ {:<28} ║ {:<13} ║ {:<18} ║ {:>4} ║ {:.1} ║",
            r.roll_no, r.name, r.department, r.course, r.year_joined, r.gpa
        )?;
    }
    writeln!(out, "╚════════╩══════════════════════════════╩═══════════════╩════════════════════╩══════╩═════╝")?;
    writeln!(out, "\nTotal Students: {}", records.len())
}

pub fn record_detail<W: Write>(out: &mut W, r: &StudentRecord) -> io::Result<()> {
    writeln!(out, "\n{}", rule('╔', '═', '╗'))?;
    writeln!(out, "║{:^48}║", "STUDENT FOUND")?;
    writeln!(out, "{}", rule('╠', '═', '╣'))?;
    writeln!(out, "║  Roll Number : {:<32} ║", r.roll_no)?;
    writeln!(out, "║  Name        : {:<32} ║", r.name)?;
    writeln!(out, "║  Department  : {:<32} ║", r.department)?;
    writeln!(out, "║  Course      : {:<32} ║", r.course)?;
    writeln!(out, "║  Year Joined : {:<32} ║", r.year_joined)?;
    writeln!(out, "║  GPA         : {:<32.2} ║", r.gpa)?;
    writeln!(out, "{}", rule('╚', '═', '╝'))
}

pub fn current_details<W: Write>(out: &mut W, r: &StudentRecord) -> io::Result<()> {
    writeln!(out, "\n┌─── Current Details ───┐")?;
    writeln!(out, "│ Name       : {}", r.name)?;
    writeln!(out, "│ Department : {}", r.department)?;
    writeln!(out, "│ Course     : {}", r.course)?;
    writeln!(out, "│ Year       : {}", r.year_joined)?;
    writeln!(out, "│ GPA        : {:.2}", r.gpa)?;
    writeln!(out, "└───────────────────────┘")
}

pub fn delete_preview<W: Write>(out: &mut W, r: &StudentRecord) -> io::Result<()> {
    writeln!(out, "\n┌─── Student to Delete ───┐")?;
    writeln!(out, "│ Roll Number : {}", r.roll_no)?;
    writeln!(out, "│ Name        : {}", r.name)?;
    writeln!(out, "│ Department  : {}", r.department)?;
    writeln!(out, "│ GPA         : {:.2}", r.gpa)?;
    writeln!(out, "└─────────────────────────┘")
}

fn holder(extreme: &GpaExtreme) -> &str {
    extreme.holder.as_deref().unwrap_or("-")
}

pub fn statistics<W: Write>(out: &mut W, s: &GpaSummary) -> io::Result<()> {
    writeln!(out, "\n{}", rule('╔', '═', '╗'))?;
    writeln!(out, "║{:^48}║", "DATABASE STATISTICS")?;
    writeln!(out, "{}", rule('╠', '═', '╣'))?;
    writeln!(out, "║  Total Students    : {:<25} ║", s.count)?;
    writeln!(out, "║  Average GPA       : {:<25.2} ║", s.average)?;
    writeln!(out, "║  Highest GPA       : {:<25.2} ║", s.highest.gpa)?;
    writeln!(out, "║  Top Performer     : {:<25} ║", holder(&s.highest))?;
    writeln!(out, "║  Lowest GPA        : {:<25.2} ║", s.lowest.gpa)?;
    writeln!(out, "║  Needs Improvement : {:<25} ║", holder(&s.lowest))?;
    writeln!(out, "{}", rule('╚', '═', '╝'))?;

    writeln!(out, "\nGPA Distribution:")?;
    for band in GpaBand::ALL {
        writeln!(
            out,
            "   {:<20}: {} students",
            band.label(),
            s.distribution.count(band)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_engine::operations::stats::summarize;
    use rollbook_engine::Statistics;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn student(roll_no: i32, name: &str, gpa: f32) -> StudentRecord {
        StudentRecord {
            roll_no,
            name: name.to_string(),
            department: "CE".to_string(),
            course: "Surveying".to_string(),
            year_joined: 2022,
            gpa,
        }
    }

    #[test]
    fn test_box_lines_share_width() {
        let text = render(|out| notice(out, &["Student added successfully!"]));
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths, vec![50, 50, 50]);
    }

    #[test]
    fn test_table_rows_and_total() {
        let text = render(|out| {
            record_table(out, &[student(1, "Ada", 3.94), student(22, "Alan", 2.0)])
        });
        assert!(text.contains("║ 1      ║ Ada "));
        assert!(text.contains("║ 2022 ║ 3.9 ║"));
        assert!(text.contains("Total Students: 2"));
    }

    #[test]
    fn test_statistics_lists_every_band() {
        let records = vec![student(1, "Ada", 3.9), student(2, "Alan", 1.5)];
        let Statistics::Summary(summary) = summarize(&records) else {
            panic!("expected a summary");
        };
        let text = render(|out| statistics(out, &summary));

        assert!(text.contains("Top Performer     : Ada"));
        assert!(text.contains("Needs Improvement : Alan"));
        assert!(text.contains("Excellent (3.5-4.0) : 1 students"));
        assert!(text.contains("Poor (Below 2.0)    : 1 students"));
    }
}
