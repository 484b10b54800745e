use std::io::{self, Write};

use anyhow::{Result, bail};
use reftag_core::path::RecordFields;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn parse_fields_arg(raw: Option<&str>) -> Result<RecordFields> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(RecordFields::new());
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(fields)) => Ok(fields),
        Ok(_) => bail!("--fields must be a JSON object"),
        Err(err) => bail!("invalid --fields JSON: {err}"),
    }
}
