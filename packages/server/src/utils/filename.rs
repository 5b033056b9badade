/// Longest accepted upload file name, in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Result of validating an upload file name.
#[derive(Debug)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename is longer than [`MAX_FILENAME_LENGTH`].
    TooLong,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `..`.
    PathTraversal,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (NUL, CR, LF, etc.).
    ControlCharacter,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "File name cannot be empty",
            Self::TooLong => "File name must be at most 255 characters",
            Self::ContainsPathSeparator => "Invalid file name: path separators are not allowed",
            Self::PathTraversal => "Invalid file name: '..' is not allowed",
            Self::Hidden => "Invalid file name: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid file name: control characters are not allowed",
        }
    }
}

/// Validates a flat file name (no directory components allowed) and returns it
/// trimmed. The result is safe to embed in an object key.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::TooLong);
    }

    // Covers NUL as well as CR/LF that would end up in object metadata.
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}

/// Last non-empty segment of an object pathname, used as a display name when
/// the uploader did not supply one.
pub fn last_path_segment(pathname: &str) -> Option<&str> {
    pathname.rsplit('/').find(|segment| !segment.is_empty())
}
