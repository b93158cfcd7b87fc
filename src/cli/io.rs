//! JSON output for one-shot commands
//!
//! Each command prints exactly one line: `{"status":"ok","data":...}`.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    status: &'static str,
    data: &'a T,
}

/// Write a success envelope around `data` to stdout
pub fn write_response<T: Serialize>(data: T) -> CliResult<()> {
    write_response_to(&mut io::stdout().lock(), &data)
}

/// Write a success envelope around `data` to `out`
pub fn write_response_to<W: Write, T: Serialize>(out: &mut W, data: &T) -> CliResult<()> {
    serde_json::to_writer(
        &mut *out,
        &Envelope {
            status: "ok",
            data,
        },
    )?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_envelope_is_one_line() {
        let mut out = Vec::new();
        write_response_to(&mut out, &json!({"endpoint_id": 3})).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"status": "ok", "data": {"endpoint_id": 3}}));
    }
}
