/// Local filename for a document: every character outside `[A-Za-z0-9_.-]`
/// becomes `_`, and `.{extension}` is appended unless already present
/// (ASCII case-insensitive).
pub fn sanitize_filename(name: &str, extension: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| if is_permitted(c) { c } else { '_' })
        .collect();

    let suffix = format!(".{}", extension.trim().trim_start_matches('.'));
    if !cleaned
        .to_ascii_lowercase()
        .ends_with(&suffix.to_ascii_lowercase())
    {
        cleaned.push_str(&suffix);
    }

    let stem_len = cleaned.find('.').unwrap_or(cleaned.len());
    if is_reserved_windows_name(&cleaned[..stem_len]) {
        cleaned.insert(stem_len, '_');
    }
    cleaned
}

fn is_permitted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
