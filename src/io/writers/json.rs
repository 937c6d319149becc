use std::io::Write;

use crate::analysis::ConsolidatedArchitecture;
use crate::io::output::OutputWriter;

/// Pretty-printed JSON of the architecture artifact.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_architecture(
        &mut self,
        architecture: &ConsolidatedArchitecture,
    ) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(architecture)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
