pub mod config;
pub mod types;

use std::io::{self, Write};

use config::OutputConfig;
use types::Envelope;

/// Writes a single envelope per line (or pretty-printed) to the given writer.
pub fn emit(env: &Envelope, cfg: OutputConfig, w: &mut dyn Write) -> io::Result<()> {
    if cfg.pretty { serde_json::to_writer_pretty(&mut *w, env).map_err(to_io)? } else { serde_json::to_writer(&mut *w, env).map_err(to_io)? }
    writeln!(w)
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::new(io::ErrorKind::Other, e) }
