use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const DELIMITER: char = ';';

#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed line {line} in '{path}': expected 'value;identifier', found '{content}'")]
    MissingDelimiter {
        path: String,
        line: usize,
        content: String,
    },
}

/// One `value;identifier` line of a guest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPair {
    pub value: String,
    pub identifier: String,
}

/// Reads `value;identifier` pairs from a file, in file order.
pub fn load_identifier_pairs(path: &Path) -> Result<Vec<IdentifierPair>, IdentifierError> {
    let file = File::open(path).map_err(|e| IdentifierError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_identifier_pairs(&mut BufReader::new(file), &path.to_string_lossy())
}

/// Reads `value;identifier` pairs from any buffered reader. `source` names the input in errors.
///
/// Lines are split at the first delimiter and both halves are trimmed. Blank lines are skipped.
pub fn read_identifier_pairs(
    reader: &mut impl BufRead,
    source: &str,
) -> Result<Vec<IdentifierPair>, IdentifierError> {
    let mut pairs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IdentifierError::Io {
            path: source.to_string(),
            source: e,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (value, identifier) =
            line.split_once(DELIMITER)
                .ok_or_else(|| IdentifierError::MissingDelimiter {
                    path: source.to_string(),
                    line: index + 1,
                    content: line.to_string(),
                })?;
        pairs.push(IdentifierPair {
            value: value.trim().to_string(),
            identifier: identifier.trim().to_string(),
        });
    }
    Ok(pairs)
}

/// Chemical structure and common name of a guest molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestInfo {
    pub smiles: String,
    pub name: String,
}

/// Guest identifier to [`GuestInfo`] for one family of guest files.
#[derive(Debug, Clone, Default)]
pub struct GuestCatalog {
    guests: HashMap<String, GuestInfo>,
}

impl GuestCatalog {
    /// Joins a structure list and a name list on their shared identifiers.
    ///
    /// Identifiers that appear in only one list are dropped. When an identifier is repeated
    /// within a list, its last line wins in both the structure and the name list.
    pub fn from_pairs(smiles: &[IdentifierPair], names: &[IdentifierPair]) -> Self {
        let name_by_id: HashMap<&str, &str> = names
            .iter()
            .map(|pair| (pair.identifier.as_str(), pair.value.as_str()))
            .collect();

        let mut guests = HashMap::new();
        for pair in smiles {
            match name_by_id.get(pair.identifier.as_str()) {
                Some(name) => {
                    guests.insert(
                        pair.identifier.clone(),
                        GuestInfo {
                            smiles: pair.value.clone(),
                            name: name.to_string(),
                        },
                    );
                }
                None => debug!("Guest '{}' has a structure but no name; skipping.", pair.identifier),
            }
        }
        Self { guests }
    }

    pub fn load(smiles_path: &Path, names_path: &Path) -> Result<Self, IdentifierError> {
        let smiles = load_identifier_pairs(smiles_path)?;
        let names = load_identifier_pairs(names_path)?;
        let catalog = Self::from_pairs(&smiles, &names);
        debug!(
            "Loaded {} guests from {:?} and {:?}",
            catalog.len(),
            smiles_path,
            names_path
        );
        Ok(catalog)
    }

    pub fn get(&self, guest: &str) -> Option<&GuestInfo> {
        self.guests.get(guest)
    }

    pub fn len(&self) -> usize {
        self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }
}

/// Host name to the [`GuestCatalog`] of its guests. Several hosts may share one catalog.
#[derive(Debug, Clone, Default)]
pub struct HostCatalog {
    catalogs: Vec<GuestCatalog>,
    index_by_host: HashMap<String, usize>,
}

impl HostCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, hosts: I, catalog: GuestCatalog)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.catalogs.len();
        self.catalogs.push(catalog);
        for host in hosts {
            self.index_by_host.insert(host.into(), index);
        }
    }

    pub fn guests_of(&self, host: &str) -> Option<&GuestCatalog> {
        self.index_by_host.get(host).map(|&i| &self.catalogs[i])
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.index_by_host.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn pairs(text: &str) -> Vec<IdentifierPair> {
        read_identifier_pairs(&mut Cursor::new(text), "inline").unwrap()
    }

    #[test]
    fn lines_are_split_and_trimmed() {
        let parsed = pairs("  c1ccccc1 ; G1 \nCCO;G2\n");
        assert_eq!(
            parsed,
            vec![
                IdentifierPair {
                    value: "c1ccccc1".into(),
                    identifier: "G1".into()
                },
                IdentifierPair {
                    value: "CCO".into(),
                    identifier: "G2".into()
                },
            ]
        );
    }

    #[test]
    fn only_first_delimiter_splits() {
        let parsed = pairs("value;G1;extra");
        assert_eq!(parsed[0].value, "value");
        assert_eq!(parsed[0].identifier, "G1;extra");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(pairs("\n\nCCO;G1\n\n").len(), 1);
    }

    #[test]
    fn missing_delimiter_is_a_format_error() {
        let result = read_identifier_pairs(&mut Cursor::new("CCO;G1\nbenzene G2\n"), "names.txt");
        match result {
            Err(IdentifierError::MissingDelimiter { path, line, content }) => {
                assert_eq!(path, "names.txt");
                assert_eq!(line, 2);
                assert_eq!(content, "benzene G2");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn catalog_joins_on_identifier() {
        let smiles = pairs("c1ccccc1;G1\nCCO;G2\nCC;G3");
        let names = pairs("ethanol;G2\nbenzene;G1");
        let catalog = GuestCatalog::from_pairs(&smiles, &names);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("G1"),
            Some(&GuestInfo {
                smiles: "c1ccccc1".into(),
                name: "benzene".into()
            })
        );
        assert_eq!(catalog.get("G2").unwrap().name, "ethanol");
        assert!(catalog.get("G3").is_none());
    }

    #[test]
    fn repeated_identifiers_keep_their_last_line() {
        let smiles = pairs("C;G1\nCC;G1");
        let names = pairs("methane;G1\nethane;G1");
        let catalog = GuestCatalog::from_pairs(&smiles, &names);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("G1"),
            Some(&GuestInfo {
                smiles: "CC".into(),
                name: "ethane".into()
            })
        );
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempdir().unwrap();
        let smiles_path = dir.path().join("smiles.txt");
        let names_path = dir.path().join("names.txt");
        fs::write(&smiles_path, "c1ccccc1;G1\n").unwrap();
        fs::write(&names_path, "benzene;G1\n").unwrap();

        let catalog = GuestCatalog::load(&smiles_path, &names_path).unwrap();
        assert_eq!(catalog.get("G1").unwrap().smiles, "c1ccccc1");
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_identifier_pairs(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(IdentifierError::Io { .. })));
    }

    #[test]
    fn hosts_can_share_a_catalog() {
        let catalog = GuestCatalog::from_pairs(&pairs("CCO;G1"), &pairs("ethanol;G1"));
        let mut hosts = HostCatalog::new();
        hosts.insert(["TEMOA", "TEETOA"], catalog);
        assert_eq!(hosts.guests_of("TEMOA").unwrap().get("G1").unwrap().name, "ethanol");
        assert_eq!(hosts.guests_of("TEETOA").unwrap().len(), 1);
        assert!(hosts.guests_of("CB8").is_none());
    }
}
