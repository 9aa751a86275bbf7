use std::path::{Component, Path};

/// Folder label used when no explicit output folder is configured.
pub const DEFAULT_OUTPUT_FOLDER: &str = "output";

pub fn output_object_key(
    function_name: Option<&str>,
    folder: &str,
    request_id: &str,
    file_name: &str,
) -> String {
    let folder = folder.trim_matches('/');
    let file_name = file_name.trim_start_matches('/');
    match function_name {
        Some(function_name) => {
            let function_name = function_name.trim_matches('/');
            format!("{function_name}/{folder}/{request_id}/{file_name}")
        }
        None => format!("{folder}/{request_id}/{file_name}"),
    }
}

/// Key used by default for files under the output folder.
pub fn default_output_object_key(function_name: &str, request_id: &str, file_name: &str) -> String {
    output_object_key(
        Some(function_name),
        DEFAULT_OUTPUT_FOLDER,
        request_id,
        file_name,
    )
}

/// Path of `file` relative to `root`, joined with `/` regardless of platform.
///
/// Files outside `root` keep their full path minus any root prefix.
pub fn relative_file_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
