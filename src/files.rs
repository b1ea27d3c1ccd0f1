use crate::error::DraftError;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// `-` stands for stdin or stdout.
pub const STDIO: &str = "-";

/// Reads the whole input as text. Invalid UTF-8 (e.g. a Latin-1 subtitle file)
/// is decoded lossily rather than rejected.
pub fn read_input(path: &str) -> Result<String, DraftError> {
    if path == STDIO {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|source| DraftError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(decode(buffer, Path::new("<stdin>")));
    }

    let path = Path::new(path);
    if !path.exists() {
        return Err(DraftError::InputNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| DraftError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from '{}'", bytes.len(), path.display());
    Ok(decode(bytes, path))
}

fn decode(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!(
                "'{}' is not valid UTF-8, replacing undecodable bytes",
                path.display()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Writes the whole of `data` in one go. Files are written next to the
/// destination first and renamed over it, so a failed write leaves the old
/// file alone.
pub fn write_output(path: &str, data: &[u8]) -> Result<(), DraftError> {
    if path == STDIO {
        let mut out = io::stdout().lock();
        return out
            .write_all(data)
            .and_then(|()| out.flush())
            .map_err(|source| DraftError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            });
    }

    let dest = Path::new(path);
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, data)
        .and_then(|()| std::fs::rename(&tmp, dest))
        .map_err(|source| {
            if let Err(err) = std::fs::remove_file(&tmp) {
                log::debug!("Could not remove '{}': {}", tmp.display(), err);
            }
            DraftError::Io {
                path: dest.to_path_buf(),
                source,
            }
        })?;
    log::debug!("Wrote {} bytes to '{}'", data.len(), dest.display());
    Ok(())
}
