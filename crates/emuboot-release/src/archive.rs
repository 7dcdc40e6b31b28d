//! Release archive extraction

use camino::Utf8Path;
use emuboot_core::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use tracing::debug;

/// Unpacks a downloaded archive
pub trait Archive: Send + Sync {
    /// Extract `archive` into `dest`, overwriting files already present
    fn extract(&self, archive: &Utf8Path, dest: &Utf8Path) -> Result<()>;
}

/// gzip-compressed tarball
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchive;

impl Archive for TarGzArchive {
    fn extract(&self, archive: &Utf8Path, dest: &Utf8Path) -> Result<()> {
        debug!("Extracting {} into {}", archive, dest);

        let file =
            File::open(archive).map_err(|e| Error::extraction_failed(archive.as_str(), e))?;
        let mut tarball = tar::Archive::new(GzDecoder::new(file));
        tarball.set_preserve_permissions(true);
        tarball.set_overwrite(true);
        tarball
            .unpack(dest)
            .map_err(|e| Error::extraction_failed(archive.as_str(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use tempfile::TempDir;

    fn build_tarball(path: &Utf8Path, entries: &[(&str, &[u8], u32)]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data, mode) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_tarball() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let archive = root.join("release.tar.gz");
        build_tarball(
            &archive,
            &[
                ("publish/Ryujinx.sh", b"#!/bin/sh\nexec ./Ryujinx\n".as_slice(), 0o755),
                ("publish/Ryujinx", b"ELF".as_slice(), 0o755),
            ],
        );

        let dest = root.join("out");
        fs::create_dir_all(&dest).unwrap();
        TarGzArchive.extract(&archive, &dest).unwrap();

        assert!(dest.join("publish/Ryujinx.sh").is_file());
        assert_eq!(fs::read(dest.join("publish/Ryujinx")).unwrap(), b"ELF");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dest.join("publish/Ryujinx.sh"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_extract_corrupt_archive_fails() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let archive = root.join("broken.tar.gz");
        fs::write(&archive, b"not a tarball").unwrap();

        let err = TarGzArchive.extract(&archive, &root).unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed { .. }));
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let err = TarGzArchive
            .extract(&root.join("missing.tar.gz"), &root)
            .unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed { .. }));
    }
}
