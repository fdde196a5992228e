use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// One row of the work table: which molecule and channel window to process
/// for a given source and delivery uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub uid: String,
    pub name: String,
    pub project: String,
    pub mol: String,
    pub chans: Option<ChannelRange>,
}

/// A channel window written `"<start>~<end>"` in the table. The moment map
/// covers it inclusively; movie frames cover `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRange {
    pub start: usize,
    pub end: usize,
}

impl ChannelRange {
    pub fn parse(value: &str) -> Result<Self, ChannelRangeParseError> {
        let bad = || ChannelRangeParseError(value.to_string());

        let (start, end) = value.split_once('~').ok_or_else(|| bad())?;
        let start = start.trim().parse().map_err(|_| bad())?;
        let end = end.trim().parse().map_err(|_| bad())?;

        Ok(ChannelRange { start, end })
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.start, self.end)
    }
}

#[derive(Debug)]
pub struct ChannelRangeParseError(String);

impl fmt::Display for ChannelRangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid channel range {:?}, expected \"<start>~<end>\"",
            self.0
        )
    }
}

impl std::error::Error for ChannelRangeParseError {}

#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
    Chans(ChannelRangeParseError),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Csv(e) => write!(f, "Failed to read work table: {}", e),
            TableError::Chans(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
            TableError::Chans(e) => Some(e),
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> TableError {
        TableError::Csv(err)
    }
}

impl From<ChannelRangeParseError> for TableError {
    fn from(err: ChannelRangeParseError) -> TableError {
        TableError::Chans(err)
    }
}

#[derive(Debug, Deserialize)]
struct RawItem {
    uid: String,
    name: String,
    project: String,
    mol: String,
    chans: Option<String>,
}

/// Normalizes a molecule label for use in file names: spaces become
/// underscores and parentheses are dropped (`"CO (2-1)"` -> `"CO_2-1"`).
pub fn normalize_mol(mol: &str) -> String {
    mol.replace(' ', "_").replace(['(', ')'], "")
}

/// Loads the work table. A missing or malformed table is a fatal startup
/// error; a blank `chans` field is not, it simply disables the row.
pub fn load_work_items<P: AsRef<Path>>(path: P) -> Result<Vec<WorkItem>, TableError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut items = Vec::new();
    for row in reader.deserialize() {
        let raw: RawItem = row?;

        let chans = match raw.chans.as_deref() {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(ChannelRange::parse(value)?),
        };

        items.push(WorkItem {
            uid: raw.uid,
            name: raw.name,
            project: raw.project,
            mol: normalize_mol(&raw.mol),
            chans,
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_mol() {
        assert_eq!(normalize_mol("CO (2-1)"), "CO_2-1");
        assert_eq!(normalize_mol("13CO (1-0)"), "13CO_1-0");
        assert_eq!(normalize_mol("SiO"), "SiO");
    }

    #[test]
    fn test_parse_channel_range() {
        assert_eq!(
            ChannelRange::parse("10~20").unwrap(),
            ChannelRange { start: 10, end: 20 }
        );

        assert!(ChannelRange::parse("10-20").is_err());
        assert!(ChannelRange::parse("10~").is_err());
        assert!(ChannelRange::parse("a~b").is_err());
    }

    #[test]
    fn test_load_work_items() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("chans.csv");
        fs::write(
            &table,
            "uid,name,project,mol,chans\n\
             uid://A/B,NGC253,2019.1.001,CO (1-0),10~20\n\
             uid://A/C,NGC253,2019.1.001,SiO,\n",
        )
        .unwrap();

        let items = load_work_items(&table).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].mol, "CO_1-0");
        assert_eq!(
            items[0].chans,
            Some(ChannelRange { start: 10, end: 20 })
        );
        // A blank channel range disables the row instead of failing the load.
        assert_eq!(items[1].chans, None);
    }

    #[test]
    fn test_load_rejects_bad_channel_range() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("chans.csv");
        fs::write(
            &table,
            "uid,name,project,mol,chans\nuid://A/B,NGC253,P,CO,10:20\n",
        )
        .unwrap();

        assert!(load_work_items(&table).is_err());
    }

    #[test]
    fn test_load_missing_table_fails() {
        assert!(load_work_items("does_not_exist.csv").is_err());
    }
}
