use serde::Serialize;
use std::io::{self, Write};

pub(super) fn write<T: Serialize>(result: &T, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)
}
