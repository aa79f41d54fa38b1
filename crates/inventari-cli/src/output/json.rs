use inventari_core::error::InventariError;
use inventari_core::model::{ParsedTable, Table};
use std::path::Path;

pub fn print(parsed: &ParsedTable) -> Result<(), InventariError> {
    let json = serde_json::to_string_pretty(parsed)?;
    println!("{json}");
    Ok(())
}

pub fn write(table: &Table, path: &Path) -> Result<(), InventariError> {
    let json = serde_json::to_string_pretty(table)?;
    std::fs::write(path, json)?;
    Ok(())
}
