use std::fs;
use std::path::Path;

use sgp4::Elements;

use crate::orbit::error::CatalogError;

/// A validated element set read from a catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub norad_id: u32,
    pub line1: String,
    pub line2: String,
}

/// Read every element set from a `.tle`/`.txt` catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let content = fs::read_to_string(path)?;
    let source_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    parse_catalog(&content, &source_name)
}

/// Parse catalog text. Every element set must pass SGP4 element parsing.
pub fn parse_catalog(content: &str, source_name: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut results = Vec::new();

    for (name, line1, line2) in split_element_sets(content) {
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| CatalogError::InvalidTle {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        let norad_id = u32::try_from(elements.norad_id).map_err(|_| CatalogError::InvalidTle {
            source_name: source_name.to_string(),
            message: format!("catalog number {} out of range", elements.norad_id),
        })?;

        results.push(CatalogEntry {
            name: name.unwrap_or_else(|| format!("NORAD {}", norad_id)),
            norad_id,
            line1,
            line2,
        });
    }

    if results.is_empty() {
        return Err(CatalogError::Empty(source_name.to_string()));
    }
    Ok(results)
}

/// Split catalog text into (title, line1, line2) element sets. A title is
/// the non-element line directly before a line 1, with any `0 ` prefix
/// removed; bare 2-line sets have none.
fn split_element_sets(content: &str) -> Vec<(Option<String>, String, String)> {
    let mut sets = Vec::new();
    let mut title: Option<&str> = None;
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .peekable();

    while let Some(line) = lines.next() {
        if line.starts_with("1 ") {
            if let Some(line2) = lines.next_if(|next| next.starts_with("2 ")) {
                let name = title
                    .take()
                    .map(|t| t.strip_prefix("0 ").unwrap_or(t).trim().to_string());
                sets.push((name, line.to_string(), line2.to_string()));
                continue;
            }
        }
        title = Some(line);
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
";

    #[test]
    fn three_line_entries_keep_their_name() {
        let entries = parse_catalog(ISS, "stations.tle").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ISS (ZARYA)");
        assert_eq!(entries[0].norad_id, 25544);
        assert!(entries[0].line1.starts_with("1 25544U"));
    }

    #[test]
    fn zero_prefixed_titles_are_stripped() {
        let entries = parse_catalog(&format!("0 {}", ISS), "celestrak.tle").unwrap();
        assert_eq!(entries[0].name, "ISS (ZARYA)");
    }

    #[test]
    fn two_line_entries_get_a_catalog_name() {
        let bare: String = ISS.lines().skip(1).map(|l| format!("{}\n", l)).collect();
        let entries = parse_catalog(&bare, "bare.tle").unwrap();
        assert_eq!(entries[0].name, "NORAD 25544");
    }

    #[test]
    fn stray_lines_are_skipped() {
        let content = format!("# comment\n\n{}\ntrailing", ISS);
        let entries = parse_catalog(&content, "mixed.txt").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn truncated_line_is_reported() {
        let broken = ISS.replace("236008\n", "23600\n");
        let err = parse_catalog(&broken, "broken.tle").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidTle { ref source_name, .. } if source_name == "broken.tle"
        ));
    }

    #[test]
    fn empty_catalog_is_an_error() {
        assert!(matches!(
            parse_catalog("nothing here", "empty.tle"),
            Err(CatalogError::Empty(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".tle").tempfile().unwrap();
        file.write_all(ISS.as_bytes()).unwrap();
        let entries = load_catalog(file.path()).unwrap();
        assert_eq!(entries[0].norad_id, 25544);
    }
}
