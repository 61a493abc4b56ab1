use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

/// Largest accepted input, from a file or stdin.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Path argument that selects stdin explicitly.
const STDIN_MARKER: &str = "-";

pub struct InputReader;

impl InputReader {
    /// Reads a whole file, or stdin when `file_path` is `None` or `-`.
    pub fn read(file_path: Option<&str>) -> Result<String> {
        match file_path {
            None | Some(STDIN_MARKER) => Self::read_stdin(),
            Some(path) => Self::read_file(path),
        }
    }

    /// Reads one text per line for batch runs, skipping blank lines.
    pub fn read_lines(file_path: Option<&str>) -> Result<Vec<String>> {
        let contents = Self::read(file_path)?;
        let lines: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if lines.is_empty() {
            bail!("Error: Batch input contains no texts");
        }

        Ok(lines)
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > MAX_INPUT_SIZE {
            bail!(too_large(size, "file"));
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(too_large(buffer.len(), "input"));
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

#[allow(clippy::cast_precision_loss)]
fn too_large(size: usize, what: &str) -> String {
    format!(
        "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
         Consider splitting the {what} into smaller parts.",
        size as f64 / 1024.0 / 1024.0
    )
}
