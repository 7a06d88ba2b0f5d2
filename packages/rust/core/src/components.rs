//! Component generation: one rendered page component per markdown source.

use std::path::Path;

use tokio::fs;
use tracing::{debug, info, instrument};

use md2web_markdown::{RenderOptions, render_component};
use md2web_shared::{Md2WebError, Result, SourceFile};

use crate::output::write_output;
use crate::pipeline::ProgressReporter;
use crate::route::{component_path, source_segments};

/// Render every source file and write it to `<components_dir>/<path>/index.vue`.
///
/// Every file is rewritten on each call. The first failing read or write
/// aborts the loop; components written before it stay on disk.
///
/// Returns the number of components written.
#[instrument(skip_all, fields(components_dir = %components_dir.display(), files = files.len()))]
pub async fn generate_components(
    files: &[SourceFile],
    components_dir: &Path,
    opts: &RenderOptions,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let total = files.len();

    for (i, file) in files.iter().enumerate() {
        let source = fs::read_to_string(&file.path)
            .await
            .map_err(|e| Md2WebError::io(&file.path, e))?;

        let target = component_path(components_dir, &source_segments(file));
        write_output(&target, &render_component(&source, opts)).await?;

        debug!(source = %file.path.display(), target = %target.display(), "wrote component");
        progress.component_written(&target, i + 1, total);
    }

    info!(count = total, "components written");
    Ok(total)
}
