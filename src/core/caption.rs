use crate::domain::model::PROCESSED_PREFIX;

const IMAGE_EXTENSIONS: [&str; 4] = [".jpeg", ".jpg", ".png", ".gif"];

/// Post text is cut to this many characters to stay within Bluesky's post limit.
pub const MAX_POST_TEXT_CHARS: usize = 300;

/// Turns a processed file path into the human-readable caption.
pub fn caption_for(processed: &str) -> String {
    let name = processed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(processed);
    let name = name.strip_prefix(PROCESSED_PREFIX).unwrap_or(name);

    IMAGE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
        .to_string()
}

pub fn post_text(caption: &str) -> String {
    caption.chars().take(MAX_POST_TEXT_CHARS).collect()
}
