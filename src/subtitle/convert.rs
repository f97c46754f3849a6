//! SubRip to WebVTT conversion
//!
//! The conversion is deliberately shallow: the `WEBVTT` header is prepended
//! and every `H:MM:SS,mmm` timestamp gets its comma replaced by a period.
//! Cue numbers, text and arrows are passed through unchanged, and malformed
//! input is not rejected.

/// WebVTT file header line
pub const WEBVTT_HEADER: &str = "WEBVTT";

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Rewrite SRT timestamps (`00:00:01,000`) into VTT syntax (`00:00:01.000`)
/// without adding a header.
pub fn convert_timestamps(text: &str) -> String {
    regex!(r"(\d+:\d+:\d+),(\d+)")
        .replace_all(text, "$1.$2")
        .into_owned()
}

/// Convert SubRip text to WebVTT text.
pub fn srt_to_vtt(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + WEBVTT_HEADER.len() + 2);
    output.push_str(WEBVTT_HEADER);
    output.push_str("\n\n");
    output.push_str(&convert_timestamps(text));
    output
}

/// Decide whether subtitle text loaded from `name` (a file name or URL)
/// must go through [`srt_to_vtt`] before use.
///
/// `.srt` always converts. `.vtt` never does. Anything else converts only
/// when it looks like SubRip: it has cue arrows but no `WEBVTT` header.
pub fn needs_conversion(name: &str, text: &str) -> bool {
    let name = name.to_lowercase();
    if name.ends_with(".srt") {
        return true;
    }
    !name.ends_with(".vtt") && text.contains("-->") && !text.contains(WEBVTT_HEADER)
}

/// Convert `text` when [`needs_conversion`] says so, otherwise return it as is.
pub fn to_vtt(name: &str, text: String) -> String {
    if needs_conversion(name, &text) {
        srt_to_vtt(&text)
    } else {
        text
    }
}
