// Reading and rewriting parts inside a docx zip package

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub(crate) fn open(path: &Path) -> Result<ZipArchive<File>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    ZipArchive::new(file).map_err(|e| format!("{} is not a docx package: {e}", path.display()))
}

/// Reads one XML part. A part absent from the package yields `None`.
pub fn read_part(path: &Path, part: &str) -> Result<Option<String>, String> {
    let mut archive = open(path)?;
    read_part_from(&mut archive, part)
}

pub(crate) fn read_part_from(
    archive: &mut ZipArchive<File>,
    part: &str,
) -> Result<Option<String>, String> {
    let mut entry = match archive.by_name(part) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(format!("failed to read {part}: {e}")),
    };
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("failed to read {part}: {e}"))?;
    Ok(Some(xml))
}

/// Names of every entry in the package.
pub fn part_names(archive: &ZipArchive<File>) -> Vec<String> {
    archive.file_names().map(str::to_string).collect()
}

/// Copies `source` to `output`, swapping in the given part contents.
///
/// Untouched entries are copied raw. The package is assembled in a temp file
/// beside `output` and moved into place only once complete.
pub fn write_package(
    source: &Path,
    output: &Path,
    replacements: &HashMap<String, String>,
) -> Result<(), String> {
    let mut archive = open(source)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".cargos-")
        .suffix(".docx")
        .tempfile_in(dir)
        .map_err(|e| format!("failed to create temp file in {}: {e}", dir.display()))?;

    {
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for i in 0..archive.len() {
            let entry = archive
                .by_index_raw(i)
                .map_err(|e| format!("failed to read entry {i}: {e}"))?;
            let name = entry.name().to_string();
            match replacements.get(&name) {
                Some(content) => {
                    drop(entry);
                    zip.start_file(name.as_str(), options)
                        .map_err(|e| format!("failed to write {name}: {e}"))?;
                    zip.write_all(content.as_bytes())
                        .map_err(|e| format!("failed to write {name}: {e}"))?;
                }
                None => {
                    zip.raw_copy_file(entry)
                        .map_err(|e| format!("failed to copy {name}: {e}"))?;
                }
            }
        }

        for (name, content) in replacements {
            if archive.index_for_name(name).is_none() {
                zip.start_file(name.as_str(), options)
                    .map_err(|e| format!("failed to write {name}: {e}"))?;
                zip.write_all(content.as_bytes())
                    .map_err(|e| format!("failed to write {name}: {e}"))?;
            }
        }

        zip.finish()
            .map_err(|e| format!("failed to finish {}: {e}", output.display()))?;
    }

    tmp.persist(output)
        .map_err(|e| format!("failed to write {}: {}", output.display(), e.error))?;
    Ok(())
}
