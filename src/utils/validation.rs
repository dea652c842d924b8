use crate::utils::error::{BotError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BotError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            // never echo credentials back into logs
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("BLUESKY_SERVICE", "https://bsky.social").is_ok());
        assert!(validate_url("BLUESKY_SERVICE", "http://localhost:2583").is_ok());
        assert!(validate_url("BLUESKY_SERVICE", "").is_err());
        assert!(validate_url("BLUESKY_SERVICE", "invalid-url").is_err());
        assert!(validate_url("BLUESKY_SERVICE", "ftp://bsky.social").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("DIRECTORY_SOURCE", "/source_dir").is_ok());
        assert!(validate_path("DIRECTORY_SOURCE", "").is_err());
        assert!(validate_path("DIRECTORY_SOURCE", "/a\0b").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("BOT_JPEG_QUALITY", 85u8, 1, 100).is_ok());
        assert!(validate_range("BOT_JPEG_QUALITY", 0u8, 1, 100).is_err());
        assert!(validate_range("BOT_MAX_ATTEMPTS", 21usize, 1, 20).is_err());
    }

    #[test]
    fn test_non_empty_string_hides_value() {
        match validate_non_empty_string("BLUESKY_PASSWORD", "   ") {
            Err(BotError::InvalidConfigValueError { value, .. }) => assert!(value.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
