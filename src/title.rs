use crate::device::DevicePath;

/// A launchable title as found by the storage scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Title {
    /// Disc serial, e.g. `SLUS_209.46`.
    pub id: String,
    /// Image file name without extension.
    pub name: String,
    pub path: DevicePath,
}

impl Title {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: DevicePath) -> Self {
        Self { id: id.into(), name: name.into(), path }
    }

    /// Derives the name from the image file name, dropping the extension.
    pub fn from_path(id: impl Into<String>, path: DevicePath) -> Self {
        let file_name = path.file_name().unwrap_or_default();
        let name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };
        Self::new(id, name.to_owned(), path)
    }
}
