use std::env;

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 6;

const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub max_files: usize,
    pub allowed_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
            allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadLimits {
    /// Defaults overridden by `MAX_FILE_SIZE` and `MAX_FILES_PER_LISTING`.
    pub fn from_env() -> Self {
        let mut limits = Self::default();
        if let Some(size) = read_env_usize("MAX_FILE_SIZE") {
            limits.max_file_size = size;
        }
        if let Some(files) = read_env_usize("MAX_FILES_PER_LISTING") {
            limits.max_files = files;
        }
        limits
    }

    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_max_files(mut self, files: usize) -> Self {
        self.max_files = files;
        self
    }

    pub fn allows_type(&self, content_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}

fn read_env_usize(key: &str) -> Option<usize> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a non-negative integer");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    pub title_max_chars: usize,
    pub description_max_chars: usize,
    pub uploads: UploadLimits,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            title_max_chars: 100,
            description_max_chars: 2000,
            uploads: UploadLimits::default(),
        }
    }
}

impl ServiceOptions {
    pub fn from_env() -> Self {
        Self::default().with_uploads(UploadLimits::from_env())
    }

    pub fn with_uploads(mut self, uploads: UploadLimits) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn with_title_max_chars(mut self, chars: usize) -> Self {
        self.title_max_chars = chars;
        self
    }

    pub fn with_description_max_chars(mut self, chars: usize) -> Self {
        self.description_max_chars = chars;
        self
    }
}
