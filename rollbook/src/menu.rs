//! Interactive menu loop
//!
//! Each numbered choice maps to one record store operation. Store errors are
//! reported and the loop carries on; only terminal I/O errors or the end of
//! input stop it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::warn;

use rollbook_engine::operations::{aggregate, export_csv};
use rollbook_engine::storage::record::{COURSE_WIDTH, DEPARTMENT_WIDTH, NAME_WIDTH};
use rollbook_engine::{FieldChanges, RecordStore, Statistics, StoreError, StudentRecord};

use crate::console::{parse_gpa, parse_roll, parse_year, Console};
use crate::render;

/// Menu choices, numbered as shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add = 1,
    DisplayAll = 2,
    Search = 3,
    Update = 4,
    Delete = 5,
    Statistics = 6,
    Export = 7,
    Exit = 8,
}

impl MenuChoice {
    pub fn from_raw(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(MenuChoice::Add),
            2 => Some(MenuChoice::DisplayAll),
            3 => Some(MenuChoice::Search),
            4 => Some(MenuChoice::Update),
            5 => Some(MenuChoice::Delete),
            6 => Some(MenuChoice::Statistics),
            7 => Some(MenuChoice::Export),
            8 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// What the loop does after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Menu behaviour taken from the configuration
#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub export_path: PathBuf,
    pub pause: bool,
}

pub struct Menu<'a, R, W> {
    store: &'a RecordStore,
    options: MenuOptions,
    console: Console<R, W>,
}

/// Bail out of an action with `Flow::Exit` when input runs dry
macro_rules! or_exit {
    ($answer:expr) => {
        match $answer? {
            Some(value) => value,
            None => return Ok(Flow::Exit),
        }
    };
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a RecordStore, options: MenuOptions, input: R, output: W) -> Self {
        Menu {
            store,
            options,
            console: Console::new(input, output),
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        render::welcome(self.console.out())?;
        if self.options.pause && self.console.ask("\nPress Enter to continue...")?.is_none() {
            return render::farewell(self.console.out());
        }

        loop {
            render::main_menu(self.console.out())?;
            let Some(line) = self.console.ask("Enter your choice: ")? else {
                break;
            };

            let flow = match line.trim().parse::<u32>() {
                Err(_) => {
                    writeln!(self.console.out(), "\n⚠ Invalid input! Please enter a number.")?;
                    Flow::Continue
                }
                Ok(raw) => match MenuChoice::from_raw(raw) {
                    None => {
                        writeln!(self.console.out(), "\n⚠ Invalid choice! Please select 1-8.")?;
                        Flow::Continue
                    }
                    Some(MenuChoice::Exit) => break,
                    Some(choice) => self.dispatch(choice)?,
                },
            };

            if flow == Flow::Exit || self.pause()? == Flow::Exit {
                break;
            }
        }

        render::farewell(self.console.out())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<Flow> {
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::DisplayAll => self.display_all(),
            MenuChoice::Search => self.search(),
            MenuChoice::Update => self.update(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::Statistics => self.statistics(),
            MenuChoice::Export => self.export(),
            MenuChoice::Exit => Ok(Flow::Exit),
        }
    }

    fn pause(&mut self) -> io::Result<Flow> {
        if !self.options.pause {
            return Ok(Flow::Continue);
        }
        match self.console.ask("\nPress Enter to continue...")? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Exit),
        }
    }

    fn report(&mut self, err: &StoreError) -> io::Result<Flow> {
        warn!(error = %err, "Operation failed");
        writeln!(self.console.out(), "\n⚠ Error: {}", err)?;
        Ok(Flow::Continue)
    }

    fn ask_roll(&mut self, prompt: &str) -> io::Result<Option<Option<i32>>> {
        Ok(self.console.ask(prompt)?.map(|line| parse_roll(&line)))
    }

    fn add(&mut self) -> io::Result<Flow> {
        render::banner(self.console.out(), "ADD NEW STUDENT")?;

        let roll_no = or_exit!(self.console.ask_until(
            "\nEnter Roll Number: ",
            "⚠ Please enter a valid positive number: ",
            parse_roll,
        ));

        match self.store.find_by_roll(roll_no) {
            Ok(Some(_)) => {
                writeln!(
                    self.console.out(),
                    "\n⚠ Error: Roll number {} already exists!",
                    roll_no
                )?;
                return Ok(Flow::Continue);
            }
            Ok(None) => {}
            Err(e) => return self.report(&e),
        }

        let name = or_exit!(self.console.ask_text("Enter Name: ", NAME_WIDTH - 1));
        if name.is_empty() {
            writeln!(self.console.out(), "\n⚠ Error: Name cannot be empty!")?;
            return Ok(Flow::Continue);
        }
        let department = or_exit!(self
            .console
            .ask_text("Enter Department (CS/EE/ME/CE/Other): ", DEPARTMENT_WIDTH - 1));
        let course = or_exit!(self.console.ask_text("Enter Course: ", COURSE_WIDTH - 1));
        let year_joined = or_exit!(self.console.ask_until(
            "Enter Year of Joining (2000-2025): ",
            "⚠ Please enter a valid year (2000-2025): ",
            parse_year,
        ));
        let gpa = or_exit!(self.console.ask_until(
            "Enter GPA (0.0-4.0): ",
            "⚠ Please enter a valid GPA (0.0-4.0): ",
            parse_gpa,
        ));

        let record = StudentRecord {
            roll_no,
            name,
            department,
            course,
            year_joined,
            gpa,
        };

        match self.store.append(&record) {
            Ok(_) => {
                let registered = format!("Roll Number {} has been registered.", roll_no);
                render::notice(
                    self.console.out(),
                    &["✓ Student added successfully!", registered.as_str()],
                )?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(&e),
        }
    }

    fn display_all(&mut self) -> io::Result<Flow> {
        if !self.store.exists() {
            render::notice(
                self.console.out(),
                &[
                    "⚠ No records found!",
                    "Database is empty.",
                    "Add some students first.",
                ],
            )?;
            return Ok(Flow::Continue);
        }

        match self.store.records() {
            Ok(records) => {
                render::record_table(self.console.out(), &records)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(&e),
        }
    }

    fn search(&mut self) -> io::Result<Flow> {
        render::banner(self.console.out(), "SEARCH STUDENT")?;

        let answer = or_exit!(self.ask_roll("\nEnter Roll Number to search: "));
        let Some(roll_no) = answer else {
            writeln!(self.console.out(), "\n⚠ Invalid input!")?;
            return Ok(Flow::Continue);
        };

        match self.store.find_by_roll(roll_no) {
            Ok(Some(found)) => render::record_detail(self.console.out(), &found.record)?,
            Ok(None) => {
                let message = format!("⚠ Student with Roll Number {} not found!", roll_no);
                render::notice(self.console.out(), &[message.as_str()])?;
            }
            Err(e) => return self.report(&e),
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> io::Result<Flow> {
        render::banner(self.console.out(), "UPDATE STUDENT DETAILS")?;

        let answer = or_exit!(self.ask_roll("\nEnter Roll Number to update: "));
        let Some(roll_no) = answer else {
            writeln!(self.console.out(), "\n⚠ Invalid input!")?;
            return Ok(Flow::Continue);
        };

        let current = match self.store.find_by_roll(roll_no) {
            Ok(Some(found)) => found.record,
            Ok(None) => {
                writeln!(
                    self.console.out(),
                    "\n⚠ Student with Roll Number {} not found!",
                    roll_no
                )?;
                return Ok(Flow::Continue);
            }
            Err(e) => return self.report(&e),
        };

        render::current_details(self.console.out(), &current)?;
        writeln!(
            self.console.out(),
            "\nEnter new details (press Enter to keep current):\n"
        )?;

        let name = or_exit!(self.console.ask(&format!("New Name [{}]: ", current.name)));
        let department = or_exit!(self
            .console
            .ask(&format!("New Department [{}]: ", current.department)));
        let course = or_exit!(self.console.ask(&format!("New Course [{}]: ", current.course)));
        let year = or_exit!(self
            .console
            .ask(&format!("New Year [{}]: ", current.year_joined)));
        let gpa = or_exit!(self.console.ask(&format!("New GPA [{:.2}]: ", current.gpa)));

        // Unparsable numbers count as "keep current"; range checks are the store's
        let changes = FieldChanges {
            name: non_blank(&name),
            department: non_blank(&department),
            course: non_blank(&course),
            year_joined: non_blank(&year).and_then(|y| y.parse().ok()),
            gpa: non_blank(&gpa).and_then(|g| g.parse().ok()),
        };

        if changes.is_empty() {
            writeln!(self.console.out(), "\nNo changes made.")?;
            return Ok(Flow::Continue);
        }

        match self.store.update_by_roll(roll_no, &changes) {
            Ok(outcome) => {
                render::notice(
                    self.console.out(),
                    &["✓ Student record updated successfully!"],
                )?;
                for field in outcome.rejected.labels() {
                    writeln!(
                        self.console.out(),
                        "⚠ Kept current {}: new value was invalid.",
                        field
                    )?;
                }
                Ok(Flow::Continue)
            }
            Err(e) => self.report(&e),
        }
    }

    fn delete(&mut self) -> io::Result<Flow> {
        render::banner(self.console.out(), "DELETE STUDENT")?;

        let answer = or_exit!(self.ask_roll("\nEnter Roll Number to delete: "));
        let Some(roll_no) = answer else {
            writeln!(self.console.out(), "\n⚠ Invalid input!")?;
            return Ok(Flow::Continue);
        };

        if !self.store.exists() {
            writeln!(self.console.out(), "\n⚠ Database is empty!")?;
            return Ok(Flow::Continue);
        }

        let target = match self.store.find_by_roll(roll_no) {
            Ok(Some(found)) => found.record,
            Ok(None) => {
                writeln!(
                    self.console.out(),
                    "\n⚠ Student with Roll Number {} not found!",
                    roll_no
                )?;
                return Ok(Flow::Continue);
            }
            Err(e) => return self.report(&e),
        };

        render::delete_preview(self.console.out(), &target)?;
        let confirm = or_exit!(self
            .console
            .ask("\n⚠ Are you sure you want to delete this student? (y/n): "));
        if !matches!(confirm.trim().chars().next(), Some('y' | 'Y')) {
            writeln!(self.console.out(), "\n✓ Deletion cancelled.")?;
            return Ok(Flow::Continue);
        }

        match self.store.delete_by_roll(roll_no) {
            Ok(_) => {
                render::notice(self.console.out(), &["✓ Student deleted successfully!"])?;
                Ok(Flow::Continue)
            }
            Err(e) if e.is_not_found() => {
                writeln!(
                    self.console.out(),
                    "\n⚠ Student with Roll Number {} not found!",
                    roll_no
                )?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(&e),
        }
    }

    fn statistics(&mut self) -> io::Result<Flow> {
        match aggregate(self.store) {
            Ok(Statistics::Summary(summary)) => {
                render::statistics(self.console.out(), &summary)?;
            }
            Ok(Statistics::Empty) => {
                writeln!(self.console.out(), "\n⚠ No students in database!")?;
            }
            Err(e) => return self.report(&e),
        }
        Ok(Flow::Continue)
    }

    fn export(&mut self) -> io::Result<Flow> {
        if !self.store.exists() {
            writeln!(self.console.out(), "\n⚠ No data to export!")?;
            return Ok(Flow::Continue);
        }

        match export_csv(self.store, &self.options.export_path) {
            Ok(count) => {
                let exported = format!(
                    "{} records exported to {}",
                    count,
                    self.options.export_path.display()
                );
                render::notice(
                    self.console.out(),
                    &["✓ Export Successful!", exported.as_str()],
                )?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(&e),
        }
    }
}

fn non_blank(line: &str) -> Option<String> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
