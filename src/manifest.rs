//! Wire types for the ligand manifest.
//!
//! The manifest is a single JSON document listing every selectable ligand
//! together with the shared protein structure reference:
//!
//! ```json
//! {
//!   "ligands": [
//!     { "name": "LigA", "sdf_path": "/a.sdf", "statistics": { "MW": "300" } }
//!   ],
//!   "pdb_data": "/s.pdb"
//! }
//! ```
//!
//! It is fetched once per session and immutable after load.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::LigviewError;

/// Well-known path of the manifest resource.
pub const MANIFEST_PATH: &str = "/ligand_data.json";

/// Stable ligand identifier: index into the manifest's ligand list.
///
/// The manifest is immutable after load, so the index doubles as the
/// selection key. List order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigandId(pub usize);

/// One selectable docked molecule.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Ligand {
    /// Display name; also the download file stem.
    pub name: String,
    /// Location of the ligand's chemical file.
    pub sdf_path: String,
    /// Precomputed statistics, displayed verbatim in wire order.
    #[serde(default)]
    pub statistics: Map<String, Value>,
}

impl Ligand {
    /// Statistics as display rows, in wire order.
    ///
    /// String values display bare; anything else displays in canonical
    /// JSON form.
    #[must_use]
    pub fn statistics_rows(&self) -> Vec<(String, String)> {
        self.statistics
            .iter()
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect()
    }
}

/// The manifest document: ligand list plus the shared structure reference.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Manifest {
    /// Selectable ligands in display order.
    pub ligands: Vec<Ligand>,
    /// Location of the protein structure file.
    #[serde(rename = "pdb_data")]
    pub structure_path: String,
}

impl Manifest {
    /// Parse a manifest from raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::ManifestParse`] if the text is not a valid
    /// manifest document.
    pub fn from_json(text: &str) -> Result<Self, LigviewError> {
        serde_json::from_str(text)
            .map_err(|e| LigviewError::ManifestParse(e.to_string()))
    }

    /// Look up a ligand by its stable id.
    #[must_use]
    pub fn ligand(&self, id: LigandId) -> Option<&Ligand> {
        self.ligands.get(id.0)
    }

    /// Id of the first ligand, used as the convenience default selection.
    #[must_use]
    pub fn first_ligand(&self) -> Option<LigandId> {
        if self.ligands.is_empty() {
            None
        } else {
            Some(LigandId(0))
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "ligands": [
            { "name": "LigA", "sdf_path": "/a.sdf",
              "statistics": { "MW": "300", "Affinity": -7.2 } },
            { "name": "LigB", "sdf_path": "/b.sdf" }
        ],
        "pdb_data": "/s.pdb"
    }"#;

    #[test]
    fn parses_the_wire_format() {
        let manifest = Manifest::from_json(FIXTURE).unwrap();
        assert_eq!(manifest.structure_path, "/s.pdb");
        assert_eq!(manifest.ligands.len(), 2);
        assert_eq!(manifest.ligands[0].name, "LigA");
        assert_eq!(manifest.ligands[1].sdf_path, "/b.sdf");
    }

    #[test]
    fn statistics_rows_keep_wire_order_and_formatting() {
        let manifest = Manifest::from_json(FIXTURE).unwrap();
        let rows = manifest.ligands[0].statistics_rows();
        // "MW" sorts after "Affinity" alphabetically; wire order must win.
        assert_eq!(rows[0], ("MW".to_owned(), "300".to_owned()));
        assert_eq!(rows[1], ("Affinity".to_owned(), "-7.2".to_owned()));
    }

    #[test]
    fn missing_statistics_defaults_to_empty() {
        let manifest = Manifest::from_json(FIXTURE).unwrap();
        assert!(manifest.ligands[1].statistics.is_empty());
        assert!(manifest.ligands[1].statistics_rows().is_empty());
    }

    #[test]
    fn ligand_lookup_by_id() {
        let manifest = Manifest::from_json(FIXTURE).unwrap();
        assert_eq!(manifest.first_ligand(), Some(LigandId(0)));
        assert_eq!(
            manifest.ligand(LigandId(1)).map(|l| l.name.as_str()),
            Some("LigB")
        );
        assert!(manifest.ligand(LigandId(2)).is_none());
    }

    #[test]
    fn empty_manifest_has_no_default_selection() {
        let manifest =
            Manifest::from_json(r#"{ "ligands": [], "pdb_data": "/s.pdb" }"#)
                .unwrap();
        assert_eq!(manifest.first_ligand(), None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Manifest::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LigviewError::ManifestParse(_)));
    }
}
