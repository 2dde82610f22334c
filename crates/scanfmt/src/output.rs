//! Output formatting helpers for the `scanfmt` CLI.

use std::io::{self, Write};

use scan_core::field::Field;
use serde::Serialize;

/// JSON view of one loaded document.
#[derive(Serialize)]
pub struct FieldsView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub fields: Vec<&'a Field>,
}

/// Write `value` as pretty JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print fields one per line, numbered from 1.
pub fn print_fields<'a>(fields: impl IntoIterator<Item = &'a Field>) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut count = 0;
    for field in fields {
        count += 1;
        let _ = writeln!(handle, "{count:>3}. {field}");
    }
    if count == 0 {
        let _ = writeln!(handle, "(no fields)");
    }
}
