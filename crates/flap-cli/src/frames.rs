use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flap_core::{Renderer, WorldSnapshot};

/// Renderer that appends each snapshot to a file as one JSON line.
///
/// The first write error is kept and reported by [`JsonLinesRenderer::finish`];
/// later frames are dropped.
pub struct JsonLinesRenderer {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
    error: Option<io::Error>,
}

impl JsonLinesRenderer {
    pub fn create(path: &Path) -> Result<Self, String> {
        let file =
            File::create(path).map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
            error: None,
        })
    }

    /// Flush and return how many frames were written.
    pub fn finish(mut self) -> Result<usize, String> {
        let result = match self.error.take() {
            Some(e) => Err(e),
            None => self.out.flush(),
        };
        result
            .map(|()| self.written)
            .map_err(|e| format!("cannot write to {}: {e}", self.path.display()))
    }
}

impl Renderer for JsonLinesRenderer {
    fn present(&mut self, snapshot: &WorldSnapshot) {
        if self.error.is_some() {
            return;
        }
        let line = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        match line {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flap_core::{SimConfig, World};
    use tempfile::TempDir;

    #[test]
    fn one_line_per_frame() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.jsonl");
        let world = World::new(2, SimConfig::default()).unwrap();

        let mut renderer = JsonLinesRenderer::create(&path).unwrap();
        renderer.present(&world.snapshot());
        renderer.present(&world.snapshot());
        assert_eq!(renderer.finish().unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let frame: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(frame["agents"].as_array().unwrap().len(), 2);
        assert_eq!(frame["obstacles"].as_array().unwrap().len(), 1);
        assert_eq!(frame["ground"]["x1"], 0.0);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("frames.jsonl");
        let err = JsonLinesRenderer::create(&path).err().unwrap();
        assert!(err.contains("cannot write to"));
    }
}
