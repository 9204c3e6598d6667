//! ZIP container writer.

use super::EntryHeader;
use super::EntrySink;
use crate::ArchiveConfig;
use crate::Result;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes entries into a ZIP archive.
///
/// Level 0 stores entries uncompressed; anything else deflates.
pub struct ZipSink {
    zip: ZipWriter<BufWriter<File>>,
    options: SimpleFileOptions,
}

impl EntrySink for ZipSink {
    const TAG: &'static str = "zip";

    fn create(file: File, config: &ArchiveConfig) -> Result<Self> {
        let base = SimpleFileOptions::default().last_modified_time(DateTime::default());
        let options = if config.compression_level == Some(0) {
            base.compression_method(CompressionMethod::Stored)
        } else {
            let level = config.compression_level.unwrap_or(6);
            base.compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(level)))
        };

        Ok(Self {
            zip: ZipWriter::new(BufWriter::new(file)),
            options,
        })
    }

    fn append(&mut self, header: &EntryHeader, data: &mut dyn Read) -> Result<()> {
        let options = match header.mode {
            Some(mode) => self.options.unix_permissions(mode),
            None => self.options,
        };

        self.zip
            .start_file(header.name.as_str(), options)
            .map_err(|e| std::io::Error::other(format!("failed to start file in ZIP: {e}")))?;
        std::io::copy(data, &mut self.zip)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        let mut writer = self
            .zip
            .finish()
            .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn header(name: &str, data: &[u8], mode: Option<u32>) -> EntryHeader {
        EntryHeader {
            name: name.to_string(),
            size: data.len() as u64,
            mode,
        }
    }

    #[test]
    fn test_zip_sink_writes_entries_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.zip");

        let mut sink = ZipSink::create(File::create(&path).unwrap(), &ArchiveConfig::default())
            .unwrap();
        sink.append(&header("first.txt", b"one", None), &mut Cursor::new(b"one"))
            .unwrap();
        sink.append(
            &header("dir/second.txt", b"two", Some(0o600)),
            &mut Cursor::new(b"two"),
        )
        .unwrap();
        sink.finish().unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "first.txt");

        let mut second = archive.by_index(1).unwrap();
        assert_eq!(second.name(), "dir/second.txt");
        assert_eq!(second.unix_mode().map(|m| m & 0o777), Some(0o600));
        let mut content = String::new();
        second.read_to_string(&mut content).unwrap();
        assert_eq!(content, "two");
    }

    #[test]
    fn test_zip_sink_stored_level_zero() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stored.zip");
        let config = ArchiveConfig::default().with_compression_level(0);

        let mut sink = ZipSink::create(File::create(&path).unwrap(), &config).unwrap();
        sink.append(&header("a.txt", b"aaaa", None), &mut Cursor::new(b"aaaa"))
            .unwrap();
        sink.finish().unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        assert_eq!(entry.size(), 4);
    }
}
