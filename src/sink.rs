//! Destinations for generated reports and exports.

/// Accepts a complete payload for a named destination. A payload is only handed over once it
/// has been fully serialized, so a failed serialization never reaches the sink.
pub trait Sink {
    fn write(&mut self, destination: &str, payload: &[u8]) -> std::io::Result<()>;
}

/// Write each payload to the file named by its destination, relative to an optional base
/// directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSink {
    base: Option<std::path::PathBuf>,
}

impl FileSink {
    pub fn new() -> Self {
        Default::default()
    }

    /// Resolve relative destinations under `base`.
    pub fn in_dir<P: Into<std::path::PathBuf>>(base: P) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    pub fn resolve(&self, destination: &str) -> std::path::PathBuf {
        match &self.base {
            Some(base) => base.join(destination),
            None => destination.into(),
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, destination: &str, payload: &[u8]) -> std::io::Result<()> {
        std::fs::write(self.resolve(destination), payload)
    }
}

/// Keep every payload in memory, in the order they were written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub outputs: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Default::default()
    }

    /// The last payload written to `destination`, as text.
    pub fn contents(&self, destination: &str) -> Option<String> {
        self.outputs
            .iter()
            .rev()
            .find(|(name, _)| name == destination)
            .map(|(_, payload)| String::from_utf8_lossy(payload).into_owned())
    }
}

impl Sink for MemorySink {
    fn write(&mut self, destination: &str, payload: &[u8]) -> std::io::Result<()> {
        self.outputs.push((destination.to_owned(), payload.to_vec()));
        Ok(())
    }
}
