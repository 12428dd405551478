//! JSON output for one-shot commands
//!
//! Results go to stdout as a single JSON object per line; logs go to stderr.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::CliResult;

/// Writes `{"status": "ok", "data": ...}` to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": serde_json::to_value(data)?,
    });
    write_value(&mut io::stdout(), &response)
}

/// Writes `{"status": "error", "code": ..., "message": ...}` to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message,
    });
    write_value(&mut io::stdout(), &response)
}

fn write_value<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
