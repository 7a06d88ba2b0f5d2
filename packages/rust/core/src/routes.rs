//! Route table generation.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, instrument, warn};

use md2web_shared::{Result, SourceFile};

use crate::output::write_output;
use crate::route::RouteDescriptor;

/// Render route descriptors as a default-exported array module.
///
/// ```text
/// export default [
/// { path: '/a/b', name: 'a.b', component: () => import('/src/docs/a/b/index.vue')}
/// ]
/// ```
pub fn render_route_table(routes: &[RouteDescriptor]) -> String {
    let entries: Vec<String> = routes
        .iter()
        .map(|route| {
            format!(
                "{{ path: '/{}', name: '{}', component: () => import('{}')}}",
                js_string(&route.path),
                js_string(&route.name),
                js_string(&route.component),
            )
        })
        .collect();

    format!("export default [\n{}\n]", entries.join(",\n"))
}

/// Build the route table for `files` and write it to `target`.
///
/// Returns the number of routes written.
#[instrument(skip_all, fields(target = %target.display(), files = files.len()))]
pub async fn generate_routes(
    files: &[SourceFile],
    target: &Path,
    import_prefix: &str,
) -> Result<usize> {
    let routes: Vec<RouteDescriptor> = files
        .iter()
        .map(|file| RouteDescriptor::for_source(file, import_prefix))
        .collect();

    warn_duplicates(&routes);
    write_output(target, &render_route_table(&routes)).await?;

    info!(count = routes.len(), "route table written");
    Ok(routes.len())
}

/// Escape a value for a single-quoted JavaScript string literal.
///
/// Line terminators are escaped too: a file name may legally contain one.
fn js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn warn_duplicates(routes: &[RouteDescriptor]) {
    let mut seen = HashSet::new();
    for route in routes {
        if !seen.insert(route.path.as_str()) {
            warn!(path = %route.path, "several sources map to the same route");
        }
    }
}
