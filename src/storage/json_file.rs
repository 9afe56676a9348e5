use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::core::errors::Result;

use super::KeyValueStore;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem backend storing each key as `<canonical key>.json` inside one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = tmp_path(&path, &Uuid::new_v4().simple().to_string());
        if let Err(err) = write_atomic(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            // cleanup is best effort, the write error is what gets reported
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote key file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Maps a key onto a safe file stem. Keys made of lowercase ASCII, digits, `_`, `-` and `.`
/// pass through unchanged.
fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' | '.' => c,
            _ => '_',
        })
        .collect();
    let trimmed = sanitized.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        "key".into()
    } else {
        trimmed.to_string()
    }
}

/// Sibling of `path` unique per write, so concurrent writers never share a scratch file.
fn tmp_path(path: &Path, nonce: &str) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{nonce}.{TMP_SUFFIX}"),
        None => format!("{nonce}.{TMP_SUFFIX}"),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_keeps_collection_keys() {
        assert_eq!(canonical_name("squareone_goals"), "squareone_goals");
        assert_eq!(
            canonical_name("squareone_goals.corrupt"),
            "squareone_goals.corrupt"
        );
        assert_eq!(canonical_name("My Key/../x"), "my_key_.._x");
        assert_eq!(canonical_name("..."), "key");
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let path = PathBuf::from("/data/squareone_budgets.json");
        assert_eq!(
            tmp_path(&path, "ab12"),
            PathBuf::from("/data/squareone_budgets.json.ab12.tmp")
        );
    }
}
