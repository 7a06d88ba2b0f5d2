//! Output file writing.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use md2web_shared::{Md2WebError, Result};

/// Write `content` to `path`, creating parent directories as needed.
///
/// The content goes to a hidden `.<name>.tmp` sibling first and is renamed
/// over the target, so readers never observe a half-written file.
pub(crate) async fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Md2WebError::io(parent, e))?;
    }

    let file_name = path.file_name().ok_or_else(|| {
        Md2WebError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::write(&temp, content)
        .await
        .map_err(|e| Md2WebError::io(&temp, e))?;
    fs::rename(&temp, path)
        .await
        .map_err(|e| Md2WebError::io(path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "wrote output file");
    Ok(())
}
