use std::path::Path;

/// Audio container formats the loader knows how to decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Wav,
    Ogg,
    Mp3,
}

impl Format {
    /// Resolve the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
        }
    }
}

pub fn is_audio_file(path: &Path) -> bool {
    Format::from_path(path).is_some()
}

/// Dotfiles and dot-directories (editor swap files, `.DS_Store`, ...).
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
