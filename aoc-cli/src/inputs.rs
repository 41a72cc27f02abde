//! Locating and reading puzzle inputs on disk

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where puzzle inputs are read from
///
/// Directory layout: `{input_dir}/{year}_day{day:02}.txt`. An explicit file,
/// when given, replaces the directory lookup for every puzzle.
pub struct InputLocator {
    input_dir: PathBuf,
    input_file: Option<PathBuf>,
}

impl InputLocator {
    pub fn new(input_dir: PathBuf, input_file: Option<PathBuf>) -> Self {
        Self {
            input_dir,
            input_file,
        }
    }

    /// Path the input for `year`/`day` is read from
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        match &self.input_file {
            Some(file) => file.clone(),
            None => self.input_dir.join(format!("{}_day{:02}.txt", year, day)),
        }
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.input_path(year, day).is_file()
    }

    pub fn read(&self, year: u16, day: u8) -> Result<String, InputError> {
        read_input(&self.input_path(year, day))
    }
}

fn read_input(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => InputError::Missing(path.to_path_buf()),
        _ => InputError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_layout() {
        let dir = TempDir::new().unwrap();
        let locator = InputLocator::new(dir.path().to_path_buf(), None);
        assert_eq!(
            locator.input_path(2025, 7),
            dir.path().join("2025_day07.txt")
        );

        assert!(!locator.contains(2025, 7));
        fs::write(dir.path().join("2025_day07.txt"), ".S.\n").unwrap();
        assert!(locator.contains(2025, 7));
        assert_eq!(locator.read(2025, 7).unwrap(), ".S.\n");
    }

    #[test]
    fn test_missing_input_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let locator = InputLocator::new(dir.path().to_path_buf(), None);
        let err = locator.read(2021, 18).unwrap_err();
        assert!(matches!(&err, InputError::Missing(path) if path.ends_with("2021_day18.txt")));
    }

    #[test]
    fn test_explicit_file_overrides_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("custom.txt");
        fs::write(&file, "[1,2]\n").unwrap();

        let locator = InputLocator::new(PathBuf::from("does-not-exist"), Some(file.clone()));
        assert_eq!(locator.input_path(2021, 18), file);
        assert_eq!(locator.read(2021, 18).unwrap(), "[1,2]\n");
    }

    #[test]
    fn test_directory_is_not_an_input() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("2025_day01.txt")).unwrap();
        let locator = InputLocator::new(dir.path().to_path_buf(), None);
        assert!(!locator.contains(2025, 1));
        assert!(matches!(locator.read(2025, 1), Err(InputError::Io { .. })));
    }
}
