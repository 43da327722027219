use bytes::Bytes;
use rayon::prelude::*;
use serde::Serialize;

use crate::archive::SourceEntry;

/// Classification applied to each source entry to pick its relocated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Assets,
    Data,
    Classes,
    Other,
}

/// Replace every character outside [A-Za-z0-9._-] with '_'.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Default mod id candidate: the input file name with a trailing
/// .jar/.zip stripped (case-insensitive).
pub fn default_mod_id(source_name: &str) -> String {
    let lower = source_name.to_ascii_lowercase();
    for ext in [".jar", ".zip"] {
        if lower.ends_with(ext) {
            return source_name[..source_name.len() - ext.len()].to_string();
        }
    }
    source_name.to_string()
}

pub fn classify(path: &str) -> Bucket {
    if path.starts_with("assets/") {
        Bucket::Assets
    } else if path.starts_with("data/") {
        Bucket::Data
    } else if path.ends_with(".class") {
        Bucket::Classes
    } else {
        Bucket::Other
    }
}

/// Relocated path for an entry under the mod's root folder.
pub fn relocate(mod_id: &str, path: &str, bucket: Bucket) -> String {
    match bucket {
        Bucket::Classes => format!("{mod_id}/classes/{path}"),
        _ => format!("{mod_id}/{path}"),
    }
}

/// Per-bucket entry counts for the conversion report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub assets: usize,
    pub data: usize,
    pub classes: usize,
    pub other: usize,
}

impl BucketCounts {
    pub fn total(&self) -> usize {
        self.assets + self.data + self.classes + self.other
    }

    fn bump(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Assets => self.assets += 1,
            Bucket::Data => self.data += 1,
            Bucket::Classes => self.classes += 1,
            Bucket::Other => self.other += 1,
        }
    }
}

/// Classify and relocate every entry, preserving container order.
/// Entries are independent of one another, so the mapping runs in parallel.
pub fn relocate_entries(
    mod_id: &str,
    files: &[&SourceEntry],
) -> (Vec<(String, Bytes)>, BucketCounts) {
    let relocated: Vec<_> = files
        .par_iter()
        .map(|entry| {
            let bucket = classify(&entry.path);
            (
                relocate(mod_id, &entry.path, bucket),
                entry.data.clone(),
                bucket,
            )
        })
        .collect();

    let mut counts = BucketCounts::default();
    let mut entries = Vec::with_capacity(relocated.len());
    for (path, data, bucket) in relocated {
        counts.bump(bucket);
        entries.push((path, data));
    }

    (entries, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_id("cool-mod_1.2"), "cool-mod_1.2");
        assert_eq!(sanitize_id("weird name!"), "weird_name_");
        assert_eq!(sanitize_id("päth/to\\mod"), "p_th_to_mod");
    }

    #[test]
    fn sanitize_is_idempotent_and_total() {
        let inputs = ["weird name!", "ünïcode", "a b c", "already_safe-1.0", ""];
        for input in inputs {
            let once = sanitize_id(input);
            assert_eq!(sanitize_id(&once), once);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }
    }

    #[test]
    fn default_id_strips_archive_extensions() {
        assert_eq!(default_mod_id("examplemod.jar"), "examplemod");
        assert_eq!(default_mod_id("ExampleMod.ZIP"), "ExampleMod");
        assert_eq!(default_mod_id("noextension"), "noextension");
        // Only a trailing extension is stripped.
        assert_eq!(default_mod_id("mod.jar.bak"), "mod.jar.bak");
    }

    #[test]
    fn buckets_follow_prefix_then_suffix_rules() {
        assert_eq!(classify("assets/coolmod/icon.png"), Bucket::Assets);
        assert_eq!(classify("data/tags/blocks.json"), Bucket::Data);
        assert_eq!(classify("com/example/Main.class"), Bucket::Classes);
        assert_eq!(classify("fabric.mod.json"), Bucket::Other);
        // Prefix match requires the separator.
        assert_eq!(classify("assets_backup/icon.png"), Bucket::Other);
        // The assets/ prefix wins over the .class suffix.
        assert_eq!(classify("assets/Weird.class"), Bucket::Assets);
    }

    #[test]
    fn relocation_only_inserts_classes_segment_for_class_files() {
        assert_eq!(
            relocate("coolmod", "assets/icon.png", Bucket::Assets),
            "coolmod/assets/icon.png"
        );
        assert_eq!(
            relocate("coolmod", "com/example/Main.class", Bucket::Classes),
            "coolmod/classes/com/example/Main.class"
        );
        assert_eq!(
            relocate("coolmod", "readme.txt", Bucket::Other),
            "coolmod/readme.txt"
        );
    }

    #[test]
    fn relocate_entries_counts_and_preserves_order() {
        let entries = vec![
            SourceEntry {
                path: "readme.txt".to_string(),
                is_dir: false,
                data: Bytes::from_static(b"hi"),
            },
            SourceEntry {
                path: "assets/a.png".to_string(),
                is_dir: false,
                data: Bytes::from_static(b"png"),
            },
            SourceEntry {
                path: "com/A.class".to_string(),
                is_dir: false,
                data: Bytes::from_static(b"clazz"),
            },
        ];
        let refs: Vec<_> = entries.iter().collect();

        let (relocated, counts) = relocate_entries("m", &refs);
        let paths: Vec<_> = relocated.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec!["m/readme.txt", "m/assets/a.png", "m/classes/com/A.class"]
        );
        assert_eq!(counts.assets, 1);
        assert_eq!(counts.data, 0);
        assert_eq!(counts.classes, 1);
        assert_eq!(counts.other, 1);
        assert_eq!(counts.total(), entries.len());
    }
}
