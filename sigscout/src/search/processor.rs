use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use tracing::{trace, warn};

use crate::metrics::ScanMetrics;

// Constants for file processing
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// The bytes of one file, either owned or memory mapped
#[derive(Debug)]
pub enum FileContent {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for FileContent {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileContent::Owned(bytes) => bytes,
            FileContent::Mapped(mmap) => mmap,
        }
    }
}

/// Loads file content, choosing the read strategy from the file size
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    metrics: ScanMetrics,
}

impl FileProcessor {
    pub fn new(metrics: ScanMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Reads a small file in one call
    fn load_small_file(&self, path: &Path) -> io::Result<FileContent> {
        trace!("Using simple file loading for: {}", path.display());
        fs::read(path).map(FileContent::Owned)
    }

    /// Reads a file through a buffered reader
    fn load_file_buffered(&self, path: &Path, size_hint: u64) -> io::Result<FileContent> {
        trace!("Using buffered file loading for: {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut bytes = Vec::with_capacity(usize::try_from(size_hint).unwrap_or(0));
        reader.read_to_end(&mut bytes)?;
        Ok(FileContent::Owned(bytes))
    }

    /// Maps a large file into memory
    fn load_mmap_file(&self, path: &Path) -> io::Result<FileContent> {
        trace!("Using memory mapped loading for: {}", path.display());
        let file = File::open(path)?;
        // The map is read-only and dropped before the classifier returns.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(FileContent::Mapped(mmap))
    }

    /// Loads the content of `path`.
    ///
    /// Directories are rejected; every other failure is the underlying I/O
    /// error.
    pub fn load(&self, path: &Path) -> io::Result<FileContent> {
        trace!("Loading file: {}", path.display());

        let content = match path.metadata() {
            Ok(metadata) if metadata.is_dir() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is a directory", path.display()),
                ));
            }
            Ok(metadata) => {
                let size = metadata.len();
                let loaded = if size < SMALL_FILE_THRESHOLD {
                    self.load_small_file(path)
                } else if size >= LARGE_FILE_THRESHOLD {
                    self.load_mmap_file(path)
                } else {
                    self.load_file_buffered(path, size)
                };
                let content = loaded?;
                self.metrics.record_file_processing(content.len() as u64);
                content
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(e),
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                let content = self.load_file_buffered(path, 0)?;
                self.metrics.record_file_processing(content.len() as u64);
                content
            }
        };

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_small_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.txt");
        fs::write(&path, b"line one\nPNG\nline three\n").unwrap();

        let processor = FileProcessor::default();
        let content = processor.load(&path).unwrap();
        assert!(matches!(content, FileContent::Owned(_)));
        assert_eq!(&*content, b"line one\nPNG\nline three\n");
        assert_eq!(processor.metrics().get_stats().small_files, 1);
    }

    #[test]
    fn test_load_buffered_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("medium.bin");
        let mut file = File::create(&path).unwrap();
        let line = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcde\n";
        for _ in 0..1024 {
            file.write_all(line).unwrap();
        }
        drop(file);

        let processor = FileProcessor::default();
        let content = processor.load(&path).unwrap();
        assert_eq!(content.len(), 64 * 1024);
        assert!(content.ends_with(b"abcde\n"));

        let stats = processor.metrics().get_stats();
        assert_eq!(stats.buffered_files, 1);
        assert_eq!(stats.bytes_read, 64 * 1024);
    }

    #[test]
    fn test_load_large_file_is_mapped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let file = File::create(&path).unwrap();
        file.set_len(LARGE_FILE_THRESHOLD).unwrap();
        drop(file);

        let processor = FileProcessor::default();
        let content = processor.load(&path).unwrap();
        assert!(matches!(content, FileContent::Mapped(_)));
        assert_eq!(content.len() as u64, LARGE_FILE_THRESHOLD);
        assert_eq!(processor.metrics().get_stats().mmap_files, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let processor = FileProcessor::default();

        let err = processor.load(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(processor.metrics().get_stats().files_loaded(), 0);
    }

    #[test]
    fn test_load_directory_is_rejected() {
        let dir = tempdir().unwrap();
        let processor = FileProcessor::default();

        let err = processor.load(dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("is a directory"));
    }
}
