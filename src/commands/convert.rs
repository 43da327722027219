use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::convert::convert;

/// Convert each input archive and write `<mod_id>_EaglerConverted.zip` into
/// `output_folder`. Items are processed one at a time; a bad input is
/// reported and the batch moves on to the next file.
pub fn convert_files(inputs: &[PathBuf], output_folder: &Path) -> Result<()> {
    fs::create_dir_all(output_folder).context("Failed to create output folder")?;

    for input in inputs {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        eprintln!("Processing: {}", name);

        let result = fs::read(input)
            .context("Failed to read input file")
            .and_then(|bytes| convert(&name, &bytes).map_err(Into::into))
            .and_then(|conversion| {
                eprintln!("Detected mod ID: {}", conversion.mod_id);
                let out_path = output_folder.join(&conversion.file_name);
                fs::write(&out_path, &conversion.blob)
                    .with_context(|| format!("Failed to write {:?}", out_path))?;
                Ok(conversion)
            });

        match result {
            Ok(conversion) => eprintln!("Finished: {}", conversion.mod_id),
            Err(e) => eprintln!("Error processing {}: {:#}", name, e),
        }
    }

    Ok(())
}
