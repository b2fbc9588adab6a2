use std::env;
use std::path::{Path, PathBuf};

use fieldguard_validate::{check_document, load_document, validate_collect};
use serde_json::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let schema_path = args.next().map(PathBuf::from).ok_or("missing schema path")?;
    let record_path = args.next().map(PathBuf::from).ok_or("missing record path")?;
    if args.next().is_some() {
        return Err("unexpected argument".into());
    }

    let document = load_document(&load_json(&schema_path)?)?;
    check_document(&document)?;

    let outcome = validate_collect(&load_json(&record_path)?, &document.fields);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if outcome.did_fail {
        std::process::exit(1);
    }
    Ok(())
}

fn load_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let json = serde_json::from_str(&contents)?;
    Ok(json)
}
