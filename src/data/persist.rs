use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CrmError;

/// Reads a JSON file, or returns the default value when the file does not exist yet.
pub(crate) fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CrmError> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

/// Writes the value next to `path` first and renames it into place, so readers never see half a file.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CrmError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: BTreeMap<String, u32> = load_json(&dir.path().join("nothing.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn saved_value_loads_back_without_leftover_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        let value = BTreeMap::from([(String::from("a"), 1u32), (String::from("b"), 2)]);

        save_json(&path, &value).unwrap();
        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap();

        assert_eq!(loaded, value);
        assert!(!dir.path().join("values.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, b"{ not json").unwrap();

        let loaded: Result<BTreeMap<String, u32>, CrmError> = load_json(&path);
        assert!(matches!(loaded, Err(CrmError::Serialization(_))));
    }
}
