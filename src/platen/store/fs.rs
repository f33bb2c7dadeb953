use super::StoreBackend;
use crate::error::{PlatenError, Result};
use crate::model::SiteData;
use std::fs;
use std::path::{Path, PathBuf};

pub const SITE_FILENAME: &str = "site.json";

/// File-based storage: the whole site lives in `site.json` under the site
/// directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn site_path(&self) -> PathBuf {
        self.root.join(SITE_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PlatenError::Io)?;
        }
        Ok(())
    }
}

impl StoreBackend for FileStore {
    fn load(&self) -> Result<SiteData> {
        let path = self.site_path();
        if !path.exists() {
            return Ok(SiteData::default());
        }

        let content = fs::read_to_string(&path).map_err(PlatenError::Io)?;
        // A site file that no longer parses is treated like a missing one;
        // the next save rewrites it wholesale.
        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(_) => Ok(SiteData::default()),
        }
    }

    fn save(&mut self, data: &SiteData) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(data).map_err(PlatenError::Serialization)?;
        fs::write(self.site_path(), content).map_err(PlatenError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.load().unwrap(), SiteData::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let data = SiteData::starter();
        store.save(&data).unwrap();

        assert_eq!(store.load().unwrap(), data);
    }

    #[test]
    fn unparseable_file_loads_as_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.site_path(), "{not json").unwrap();

        assert_eq!(store.load().unwrap(), SiteData::default());
    }

    #[test]
    fn save_creates_the_site_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sites").join("demo");
        let mut store = FileStore::new(&nested);

        store.save(&SiteData::default()).unwrap();

        assert!(store.site_path().exists());
    }
}
