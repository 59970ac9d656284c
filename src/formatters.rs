//! Small pure helpers for names, file names and durations.

use std::time::Duration;

const ILLEGAL_FILE_NAME_CHARS: &[char] = &['/', '\\', '?', '<', '>', ':', '*', '|', '"'];
const MAX_FILE_NAME_BYTES: usize = 255;

/// Builds the display label of a route from its short and long names.
///
/// Absent or empty parts are skipped; the rest are joined with `" - "`.
pub fn compose_route_name(short_name: Option<&str>, long_name: Option<&str>) -> String {
    [short_name, long_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Converts an elapsed duration into whole seconds, rounding half up.
pub fn elapsed_seconds(elapsed: Duration) -> u64 {
    (elapsed.as_millis() as f64 / 1000.0).round() as u64
}

/// Strips characters that are unsafe in a single path component.
///
/// Returns an empty string when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !ILLEGAL_FILE_NAME_CHARS.contains(c))
        .collect();

    if cleaned == "." || cleaned == ".." {
        return String::new();
    }

    let mut cleaned = cleaned.trim_end_matches(['.', ' ']).to_string();

    if cleaned.len() > MAX_FILE_NAME_BYTES {
        let mut end = MAX_FILE_NAME_BYTES;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }

    cleaned
}
