use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of the on-disk data and the paths inside it
///
/// ```text
/// data/
/// ├── films.yaml
/// ├── clients.yaml
/// ├── settings.yaml
/// ├── quotes.yaml
/// ├── appointments.yaml
/// └── clients/
///     └── {client_id}/
///         └── budgets.yaml
/// ```
#[derive(Debug, Clone)]
pub struct DataDirectory {
    base_directory: PathBuf,
}

impl DataDirectory {
    /// Open a data directory, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            debug!("Created data directory {:?}", base_path);
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn films_file(&self) -> PathBuf {
        self.base_directory.join("films.yaml")
    }

    pub fn clients_file(&self) -> PathBuf {
        self.base_directory.join("clients.yaml")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_directory.join("settings.yaml")
    }

    pub fn quotes_file(&self) -> PathBuf {
        self.base_directory.join("quotes.yaml")
    }

    pub fn appointments_file(&self) -> PathBuf {
        self.base_directory.join("appointments.yaml")
    }

    pub fn client_directory(&self, client_id: &str) -> PathBuf {
        self.base_directory.join("clients").join(encode_path_segment(client_id))
    }

    pub fn budgets_file(&self, client_id: &str) -> PathBuf {
        self.client_directory(client_id).join("budgets.yaml")
    }
}

/// Write a file through a temp file and a rename so readers never see a partial file
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Read a YAML document, `None` when the file does not exist
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let yaml_content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_yaml::from_str(&yaml_content).with_context(|| format!("Malformed file {}", path.display()))?;
    Ok(Some(value))
}

/// Serialize a value to YAML and write it atomically
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let yaml_content = serde_yaml::to_string(value)?;
    write_atomically(path, &yaml_content)
}

/// Percent-encode an id into a single directory name. Distinct ids stay distinct.
fn encode_path_segment(id: &str) -> String {
    id.bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => (b as char).to_string(),
            other => format!("%{:02X}", other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_are_rooted_in_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data = DataDirectory::new(temp_dir.path().join("nested")).unwrap();

        assert!(data.base_directory().exists());
        assert_eq!(data.films_file(), temp_dir.path().join("nested").join("films.yaml"));
        assert!(data.budgets_file("client-7").ends_with("clients/client-7/budgets.yaml"));
    }

    #[test]
    fn test_client_ids_cannot_escape_the_data_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data = DataDirectory::new(temp_dir.path()).unwrap();

        let dir = data.client_directory("../../etc");
        assert!(dir.starts_with(temp_dir.path().join("clients")));
        assert!(dir.ends_with("%2E%2E%2F%2E%2E%2Fetc"));
    }

    #[test]
    fn test_distinct_client_ids_get_distinct_directories() {
        let temp_dir = TempDir::new().unwrap();
        let data = DataDirectory::new(temp_dir.path()).unwrap();

        assert_ne!(data.budgets_file("a/b"), data.budgets_file("a_b"));
        assert_ne!(data.budgets_file("a%2Fb"), data.budgets_file("a/b"));
        assert!(data.client_directory("Ana Souza").ends_with("Ana%20Souza"));
        assert!(data.client_directory("José").ends_with("Jos%C3%A9"));
    }

    #[test]
    fn test_yaml_helpers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("numbers.yaml");

        assert_eq!(read_yaml::<Vec<u32>>(&path).unwrap(), None);
        write_yaml(&path, &vec![1u32, 2, 3]).unwrap();
        assert_eq!(read_yaml::<Vec<u32>>(&path).unwrap(), Some(vec![1, 2, 3]));

        fs::write(&path, "[1, 2").unwrap();
        assert!(read_yaml::<Vec<u32>>(&path).is_err());
    }

    #[test]
    fn test_write_atomically_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b.yaml");

        write_atomically(&target, "key: value\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "key: value\n");
        assert!(!target.with_extension("tmp").exists());
    }
}
