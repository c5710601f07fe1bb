//! Display-name helpers for clips.

/// Drops everything from the last `.` on. Names without a usable stem are
/// returned unchanged.
pub fn remove_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"airhorn.mp3"` becomes `"Airhorn"`.
pub fn capitalize_and_remove_extension(file_name: &str) -> String {
    capitalize_first(remove_extension(file_name))
}

/// Audio format implied by a file name's or URL's extension; `m4a` is reported as `aac`.
pub fn audio_format_from_url(url: &str) -> Option<String> {
    let clean = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = clean.rsplit('/').next().unwrap_or(clean);
    let (_, ext) = last_segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    if ext == "m4a" {
        return Some("aac".to_string());
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_extension() {
        assert_eq!(remove_extension("airhorn.mp3"), "airhorn");
        assert_eq!(remove_extension("a.b.wav"), "a.b");
        assert_eq!(remove_extension("noext"), "noext");
        assert_eq!(remove_extension(".hidden"), ".hidden");
    }

    #[test]
    fn test_capitalize_and_remove_extension() {
        assert_eq!(capitalize_and_remove_extension("airhorn.mp3"), "Airhorn");
        assert_eq!(capitalize_and_remove_extension("éclair.ogg"), "Éclair");
        assert_eq!(capitalize_and_remove_extension("Already.wav"), "Already");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_audio_format_from_url() {
        assert_eq!(audio_format_from_url("https://x/a/b.MP3?t=1").as_deref(), Some("mp3"));
        assert_eq!(audio_format_from_url("https://x/clip.m4a#frag").as_deref(), Some("aac"));
        assert_eq!(audio_format_from_url("https://x/v1.2/clip"), None);
        assert_eq!(audio_format_from_url("BEEP.WAV").as_deref(), Some("wav"));
    }
}
