//! NDJSON output for commands other than `deploy`
//!
//! Deploy events go through the library's `JsonEventSink`; the records here
//! (`init`, `encrypt`, `ps`, errors) share its one-object-per-line framing.

use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Write to stdout; a closed pipe is not worth failing the command over.
pub fn emit(event: serde_json::Value) {
    let mut out = io::stdout().lock();
    if let Err(e) = write_event(&mut out, &event) {
        tracing::debug!(error = %e, "could not write json event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_event_emits_one_line() {
        let mut buf = Vec::new();
        write_event(&mut buf, &serde_json::json!({"event": "error", "kind": "io"})).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"event\":\"error\",\"kind\":\"io\"}\n");
    }
}
