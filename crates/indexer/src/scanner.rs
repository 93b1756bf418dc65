use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Recursive scanner for image files in a dataset directory.
pub struct DatasetScanner {
    root: PathBuf,
}

impl DatasetScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Collect image files under the root, sorted so repeated builds of
    /// the same dataset produce identical artifacts.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // skip hidden files and directories
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let path = entry.path();
                    if !Self::is_image_file(path) {
                        log::debug!("Skipping non-image file {:?}", path);
                        continue;
                    }
                    files.push(path.to_path_buf());
                }
                Err(err) => log::warn!("Failed to read entry: {err}"),
            }
        }

        files.sort();
        log::info!("Found {} image files under {:?}", files.len(), self.root);
        files
    }

    fn is_image_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                IMAGE_EXTENSIONS.iter().any(|candidate| *candidate == ext)
            })
            .unwrap_or(false)
    }
}
