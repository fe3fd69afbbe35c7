//! Flat-file record store
//!
//! The store file is a plain sequence of [`RECORD_SIZE`] byte records in
//! insertion order. There is no header and no index:
//! - Append writes one record at the end after a full-scan duplicate check
//! - Scans read from the start and stop at the last whole record
//! - Update overwrites one record at its original offset
//! - Delete rebuilds the file without the record and renames it into place
//!
//! Every operation opens the file itself and closes it before returning.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::record::{StudentRecord, RECORD_SIZE};
use crate::error::{StoreError, StoreResult};
use crate::operations::changes::{FieldChanges, UpdateOutcome};

/// Suffix added to the store path to name the rebuild file
pub const TEMP_SUFFIX: &str = ".tmp";

/// Rebuild file used when none is configured: the store path plus [`TEMP_SUFFIX`]
pub fn default_temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// A record together with its byte offset in the store file
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub offset: u64,
    pub record: StudentRecord,
}

/// Student records backed by a single file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl RecordStore {
    /// Create a store for `path`; the file is created by the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let temp_path = default_temp_path(&path);
        RecordStore { path, temp_path }
    }

    /// Use a different rebuild file
    ///
    /// It must live on the same filesystem as the store for the final
    /// rename to be atomic.
    pub fn with_temp_path(mut self, temp_path: impl Into<PathBuf>) -> Self {
        self.temp_path = temp_path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Check whether the store file exists yet
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Scan all records with their offsets
    ///
    /// A missing store file yields nothing.
    pub fn scan_located(&self) -> StoreResult<Scan> {
        match File::open(&self.path) {
            Ok(file) => {
                debug!(path = %self.path.display(), "Scanning store");
                Ok(Scan::new(BufReader::new(file)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file absent, nothing to scan");
                Ok(Scan::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Scan all records in file order
    pub fn scan(&self) -> StoreResult<impl Iterator<Item = StoreResult<StudentRecord>>> {
        Ok(self
            .scan_located()?
            .map(|entry| entry.map(|located| located.record)))
    }

    /// Read every record into memory
    pub fn records(&self) -> StoreResult<Vec<StudentRecord>> {
        self.scan()?.collect()
    }

    /// Number of whole records in the file
    pub fn count(&self) -> StoreResult<usize> {
        let mut count = 0;
        for entry in self.scan_located()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Find the first record with `roll_no`
    pub fn find_by_roll(&self, roll_no: i32) -> StoreResult<Option<Located>> {
        for entry in self.scan_located()? {
            let entry = entry?;
            if entry.record.roll_no == roll_no {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Append a record, returning its offset
    pub fn append(&self, record: &StudentRecord) -> StoreResult<u64> {
        record.validate()?;

        if self.find_by_roll(record.roll_no)?.is_some() {
            return Err(StoreError::DuplicateKey(record.roll_no));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        let offset = len - len % RECORD_SIZE as u64;
        if offset != len {
            warn!(
                path = %self.path.display(),
                trailing = len - offset,
                "Dropping partial trailing record before append"
            );
            file.set_len(offset)?;
        }

        file.seek(SeekFrom::Start(offset))?;
        let written = file
            .write_all(&record.to_bytes())
            .and_then(|_| file.sync_data());

        if let Err(e) = written {
            // Do not leave a torn record behind
            if let Err(undo) = file.set_len(offset) {
                warn!(error = %undo, "Failed to roll back partial append");
            }
            return Err(e.into());
        }

        info!(roll_no = record.roll_no, offset, "Appended record");
        Ok(offset)
    }

    /// Apply `changes` to the record with `roll_no`, in place
    pub fn update_by_roll(&self, roll_no: i32, changes: &FieldChanges) -> StoreResult<UpdateOutcome> {
        let Located { offset, record } = self
            .find_by_roll(roll_no)?
            .ok_or(StoreError::NotFound(roll_no))?;

        let mut updated = record.clone();
        let (applied, rejected) = changes.apply_to(&mut updated);

        if !rejected.is_empty() {
            warn!(roll_no, rejected = ?rejected.labels(), "Discarded out-of-range changes");
        }

        if updated != record {
            let mut file = OpenOptions::new().write(true).open(&self.path)?;
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&updated.to_bytes())?;
            file.sync_data()?;
            info!(roll_no, offset, applied = ?applied.labels(), "Updated record");
        }

        Ok(UpdateOutcome {
            record: updated,
            applied,
            rejected,
        })
    }

    /// Remove the record with `roll_no`, returning it
    pub fn delete_by_roll(&self, roll_no: i32) -> StoreResult<StudentRecord> {
        let target = self
            .find_by_roll(roll_no)?
            .ok_or(StoreError::NotFound(roll_no))?;

        let kept = match self.rebuild_without(target.offset) {
            Ok(kept) => kept,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&self.temp_path) {
                    if cleanup.kind() != io::ErrorKind::NotFound {
                        warn!(
                            path = %self.temp_path.display(),
                            error = %cleanup,
                            "Failed to remove rebuild file"
                        );
                    }
                }
                return Err(e);
            }
        };

        self.commit_rebuild()?;

        info!(roll_no, kept, "Deleted record");
        Ok(target.record)
    }

    /// Rename the rebuild file over the store file
    ///
    /// On failure the store file is left as it was.
    fn commit_rebuild(&self) -> StoreResult<()> {
        if let Err(e) = fs::rename(&self.temp_path, &self.path) {
            warn!(
                from = %self.temp_path.display(),
                to = %self.path.display(),
                error = %e,
                "Failed to replace store with rebuild file"
            );
            return Err(e.into());
        }
        sync_parent_dir(&self.path);
        Ok(())
    }

    /// Copy every record except the one at `skip_offset` into the rebuild file
    fn rebuild_without(&self, skip_offset: u64) -> StoreResult<usize> {
        let mut source = BufReader::new(File::open(&self.path)?);
        let mut temp = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.temp_path)?,
        );

        let mut chunk = [0u8; RECORD_SIZE];
        let mut offset = 0u64;
        let mut kept = 0;
        while read_chunk(&mut source, &mut chunk)? {
            if offset != skip_offset {
                temp.write_all(&chunk)?;
                kept += 1;
            }
            offset += RECORD_SIZE as u64;
        }

        let temp = temp.into_inner().map_err(|e| e.into_error())?;
        temp.sync_all()?;
        Ok(kept)
    }
}

/// Lazy sequence of records read from the start of the store file
pub struct Scan {
    reader: Option<BufReader<File>>,
    offset: u64,
}

impl Scan {
    fn new(reader: BufReader<File>) -> Self {
        Scan {
            reader: Some(reader),
            offset: 0,
        }
    }

    fn empty() -> Self {
        Scan {
            reader: None,
            offset: 0,
        }
    }
}

impl Iterator for Scan {
    type Item = StoreResult<Located>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut chunk = [0u8; RECORD_SIZE];

        let item = match read_chunk(reader, &mut chunk) {
            Ok(true) => StudentRecord::from_bytes(&chunk).map(|record| Located {
                offset: self.offset,
                record,
            }),
            Ok(false) => {
                self.reader = None;
                return None;
            }
            Err(e) => Err(e),
        };

        match item {
            Ok(located) => {
                self.offset += RECORD_SIZE as u64;
                Some(Ok(located))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(e.into()))
            }
        }
    }
}

/// Fill `buf` from `reader`; false at end of data, including a short tail
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if filled > 0 && filled < buf.len() {
        debug!(trailing = filled, "Ignoring partial trailing record");
    }
    Ok(filled == buf.len())
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let synced = File::open(parent).and_then(|dir| dir.sync_all());
        if let Err(e) = synced {
            debug!(path = %parent.display(), error = %e, "Failed to sync store directory");
        }
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
