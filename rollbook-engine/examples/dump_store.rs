//! Debug tool to list the raw contents of a store file

use std::path::PathBuf;
use rollbook_engine::storage::RecordStore;
use rollbook_engine::RECORD_SIZE;

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: dump_store <store_file>");
        return Ok(());
    }

    let filename = &args[1];
    let path = PathBuf::from(filename);

    println!("=== Dumping {} ===\n", filename);

    let store = RecordStore::new(&path);
    if !store.exists() {
        println!("File not found");
        return Ok(());
    }

    let len = std::fs::metadata(&path)?.len();
    println!("File size: {} bytes", len);
    println!("Record size: {} bytes", RECORD_SIZE);
    println!("Whole records: {}", len / RECORD_SIZE as u64);
    if len % RECORD_SIZE as u64 != 0 {
        println!("Trailing bytes: {}", len % RECORD_SIZE as u64);
    }

    let scan = match store.scan_located() {
        Ok(scan) => scan,
        Err(e) => {
            println!("Error opening file: {}", e);
            return Ok(());
        }
    };

    println!();
    for entry in scan {
        match entry {
            Ok(located) => {
                let r = &located.record;
                println!(
                    "@{:>8}  roll={:<6} name={:?} dept={:?} course={:?} year={} gpa={:.2}",
                    located.offset, r.roll_no, r.name, r.department, r.course, r.year_joined, r.gpa
                );
            }
            Err(e) => {
                println!("Read error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
