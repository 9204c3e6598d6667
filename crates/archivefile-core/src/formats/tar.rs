//! Gzip-compressed TAR container writer.

use super::EntryHeader;
use super::EntrySink;
use super::FIXED_MTIME_UNIX;
use crate::ArchiveConfig;
use crate::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use tar::Builder;
use tar::EntryType;
use tar::Header;

/// Default mode for entries without recorded permissions.
const DEFAULT_MODE: u32 = 0o644;

/// Writes entries into a `.tar.gz` archive.
pub struct TarGzSink {
    builder: Builder<GzEncoder<BufWriter<File>>>,
}

impl EntrySink for TarGzSink {
    const TAG: &'static str = "tar.gz";

    fn create(file: File, config: &ArchiveConfig) -> Result<Self> {
        let level = config.compression_level.map_or_else(Compression::default, |level| {
            Compression::new(u32::from(level))
        });
        let encoder = GzEncoder::new(BufWriter::new(file), level);
        Ok(Self {
            builder: Builder::new(encoder),
        })
    }

    fn append(&mut self, header: &EntryHeader, data: &mut dyn Read) -> Result<()> {
        let mut tar_header = Header::new_gnu();
        tar_header.set_entry_type(EntryType::Regular);
        tar_header.set_size(header.size);
        tar_header.set_mode(header.mode.unwrap_or(DEFAULT_MODE) & 0o7777);
        tar_header.set_mtime(FIXED_MTIME_UNIX);
        tar_header.set_cksum();

        self.builder
            .append_data(&mut tar_header, &header.name, data)?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let encoder = self.builder.into_inner()?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_tar_gz_sink_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.tar.gz");

        let mut sink =
            TarGzSink::create(File::create(&path).unwrap(), &ArchiveConfig::default()).unwrap();
        sink.append(
            &EntryHeader {
                name: "bin/run.sh".to_string(),
                size: 9,
                mode: Some(0o100_755),
            },
            &mut Cursor::new(b"#!/bin/sh"),
        )
        .unwrap();
        sink.finish().unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&path).unwrap()));
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        assert_eq!(entry.path().unwrap().to_str(), Some("bin/run.sh"));
        assert_eq!(entry.header().mode().unwrap() & 0o777, 0o755);
        assert_eq!(entry.header().mtime().unwrap(), FIXED_MTIME_UNIX);

        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "#!/bin/sh");
        drop(entry);
        assert!(entries.next().is_none());
    }
}
