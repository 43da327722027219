use std::io::{Cursor, Read, Write};

use bytes::Bytes;
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

use crate::error::ConvertError;

/// A single entry from the input container.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub path: String,
    pub is_dir: bool,
    pub data: Bytes,
}

/// In-memory view of an input archive, in the container's entry order.
#[derive(Debug)]
pub struct SourceArchive {
    entries: Vec<SourceEntry>,
}

impl SourceArchive {
    /// Decode an input buffer as a zip container, reading every entry up front.
    pub fn open(bytes: &[u8]) -> Result<SourceArchive, ConvertError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes)).map_err(ConvertError::ArchiveFormat)?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(ConvertError::ArchiveFormat)?;
            let path = entry.name().to_string();
            let is_dir = entry.is_dir();

            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|source| ConvertError::EntryRead {
                    path: path.clone(),
                    source,
                })?;

            entries.push(SourceEntry {
                path,
                is_dir,
                data: Bytes::from(data),
            });
        }

        Ok(SourceArchive { entries })
    }

    /// Non-directory entries in container order.
    pub fn files(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }

    /// Raw bytes of the non-directory entry with this exact path.
    pub fn read(&self, path: &str) -> Option<&Bytes> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.path == path)
            .map(|e| &e.data)
    }
}

/// Output archive under construction: an ordered path -> bytes mapping.
///
/// Paths are written in insertion order. A path pushed twice is written
/// twice; readers take the later copy, the container format's own
/// last-wins rule.
#[derive(Default)]
pub struct OutputArchive {
    entries: Vec<(String, Bytes)>,
}

impl OutputArchive {
    pub fn new() -> OutputArchive {
        OutputArchive::default()
    }

    pub fn push(&mut self, path: String, data: impl Into<Bytes>) {
        self.entries.push((path, data.into()));
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, Bytes)>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all entries into a compressed zip blob.
    pub fn into_blob(self) -> Result<Vec<u8>, ConvertError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for (path, data) in &self.entries {
            writer
                .start_file(path.as_str(), options)
                .map_err(ConvertError::Serialize)?;
            writer
                .write_all(data)
                .map_err(|e| ConvertError::Serialize(e.into()))?;
        }

        let cursor = writer.finish().map_err(ConvertError::Serialize)?;
        Ok(cursor.into_inner())
    }
}

/// Build a zip blob from (path, contents) pairs, in order.
#[cfg(test)]
pub(crate) fn zip_fixture(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, data) in entries {
        writer
            .start_file(*path, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use zip::ZipArchive;

    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn open_preserves_entry_order_and_contents() {
        let blob = zip_fixture(&[
            ("z_last_alphabetically.txt", b"one".as_slice()),
            ("assets/icon.png", b"two".as_slice()),
            ("a.txt", b"three".as_slice()),
        ]);

        let archive = SourceArchive::open(&blob).unwrap();
        let paths: Vec<_> = archive.files().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["z_last_alphabetically.txt", "assets/icon.png", "a.txt"]
        );
        assert_eq!(archive.read("a.txt").unwrap().as_ref(), b"three");
        assert!(archive.read("missing.txt").is_none());
    }

    #[test]
    fn open_skips_directory_entries_in_files() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .add_directory("assets/", SimpleFileOptions::default())
            .unwrap();
        writer
            .start_file("assets/icon.png", SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"png").unwrap();
        let blob = writer.finish().unwrap().into_inner();

        let archive = SourceArchive::open(&blob).unwrap();
        let paths: Vec<_> = archive.files().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["assets/icon.png"]);
    }

    #[test]
    fn open_rejects_garbage() {
        let err = SourceArchive::open(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ConvertError::ArchiveFormat(_)));
    }

    #[test]
    fn output_round_trips_in_insertion_order() {
        let mut out = OutputArchive::new();
        out.push("mod/b.txt".to_string(), &b"bbb"[..]);
        out.push("mod/a.txt".to_string(), &b"aaa"[..]);
        assert_eq!(out.len(), 2);

        let blob = out.into_blob().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(blob)).unwrap();

        let first = zip.by_index(0).unwrap().name().to_string();
        assert_eq!(first, "mod/b.txt");

        let mut contents = String::new();
        zip.by_name("mod/a.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "aaa");
    }
}
