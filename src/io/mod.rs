//! Stream handles: `-` means a standard stream, anything else a file.
//!
//! Handles close when dropped, on success and error paths alike. Output is
//! buffered; call [`Output::finish`] to surface the final flush error instead
//! of losing it in `Drop`.

use std::fs::File;
use std::io::{self, BufWriter, Read, StdinLock, StdoutLock, Write};
use std::path::Path;

/// The path that selects stdin or stdout.
pub const STD_STREAM: &str = "-";

fn is_std_stream(path: &Path) -> bool {
    path.as_os_str() == STD_STREAM
}

/// A readable input stream.
pub enum Input {
    /// Standard input.
    Stdin(StdinLock<'static>),
    /// An opened file.
    File(File),
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Stdin(stdin) => stdin.read(buf),
            Input::File(file) => file.read(buf),
        }
    }
}

/// A buffered, writable output stream.
pub enum Output {
    /// Standard output.
    Stdout(BufWriter<StdoutLock<'static>>),
    /// A created or truncated file.
    File(BufWriter<File>),
}

impl Output {
    /// Flushes buffered output and closes the stream.
    pub fn finish(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(out) => out.write(buf),
            Output::File(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(out) => out.flush(),
            Output::File(out) => out.flush(),
        }
    }
}

/// Opens `path` for reading, or locks stdin for `-`.
pub fn open_input(path: &Path) -> io::Result<Input> {
    if is_std_stream(path) {
        Ok(Input::Stdin(io::stdin().lock()))
    } else {
        File::open(path).map(Input::File)
    }
}

/// Creates or truncates `path` for writing, or locks stdout for `-`.
pub fn open_output(path: &Path) -> io::Result<Output> {
    if is_std_stream(path) {
        Ok(Output::Stdout(BufWriter::new(io::stdout().lock())))
    } else {
        File::create(path).map(|file| Output::File(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let mut output = open_output(&path).unwrap();
        output.write_all(b"payload").unwrap();
        output.finish().unwrap();

        let mut input = open_input(&path).unwrap();
        let mut data = Vec::new();
        input.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"payload");
    }

    #[test]
    fn test_output_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"much longer old content").unwrap();

        let mut output = open_output(&path).unwrap();
        output.write_all(b"new").unwrap();
        output.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_input(&dir.path().join("absent")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_dash_selects_std_stream() {
        assert!(is_std_stream(Path::new("-")));
        assert!(!is_std_stream(Path::new("./-")));
        assert!(matches!(open_input(Path::new("-")).unwrap(), Input::Stdin(_)));
    }
}
