use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::catalog::error::CatalogError;
use crate::catalog::types::CatalogEntry;

/// Deep-sky catalog loaded from a comma-separated file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Load a catalog file. Lines starting with `#` are comments.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.display().to_string()));
        }
        let catalog = Self::from_reader(File::open(path)?)?;
        log::info!(
            "Loaded {} catalog entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let entries = csv_reader
            .deserialize()
            .collect::<Result<Vec<CatalogEntry>, _>>()?;

        Self::new(entries)
    }

    /// Write the catalog (with whatever coordinates it carries) as CSV.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_writer(File::create(path)?)?;
        log::info!("Catalog with {} entries saved to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [CatalogEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    pub(crate) const SAMPLE_CSV: &str = "\
# Messier and Caldwell sample
ID,Other ID,Name,Type,Distance (kly),Constellation,RA,DEC
M1,NGC 1952,Crab Nebula,Neb-SN,6.5,Taurus,83.6331,22.0145
M13,NGC 6205,Great Globular Cluster in Hercules,cl-G,22.2,Hercules,250.4235,36.4613
M31,NGC 224,Andromeda Galaxy,gal-SB,2540,Andromeda,10.6847,41.2688
M45,,Pleiades,cl-O,0.444,Taurus,56.6010,24.1140
M101,NGC 5457,Pinwheel Galaxy,gal-S,20870,Ursa Major,210.8023,54.3488
C14,NGC 869 & NGC 884,Double Cluster,cl-O,7.5,Perseus,34.7500,57.1333
C63,NGC 7293,Helix Nebula,Neb-P,0.7,Aquarius,337.4108,-20.8372
C80,NGC 5139,Omega Centauri,cl-G,17.3,Centaurus,201.6968,-47.4795
C106,NGC 104,47 Tucanae,cl-G,14.7,Tucana,6.0236,-72.0813
";

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn loads_rows_and_skips_comments() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 9);

        let m45 = &catalog.entries()[3];
        assert_eq!(m45.id, "M45");
        assert_eq!(m45.other_id, None);
        assert_eq!(m45.name.as_deref(), Some("Pleiades"));
        assert_eq!(m45.coordinates(), Some((56.6010, 24.1140)));
    }

    #[test]
    fn non_numeric_coordinates_load_as_missing() {
        let raw = "ID,Other ID,Name,Type,RA,DEC\nM31,NGC 224,Andromeda Galaxy,gal-SB,00h 42m 44s,+41° 16′ 9″\n";
        let catalog = Catalog::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(catalog.entries()[0].coordinates(), None);
        assert_eq!(catalog.entries()[0].distance_kly, None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = "ID,Type\nM1,Neb-SN\nM1,Neb-SN\n";
        let err = Catalog::from_reader(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "M1"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Catalog::load(Path::new("/nonexistent/amastro_catalog.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn save_then_load_keeps_entries() {
        let catalog = sample_catalog();
        let mut file = NamedTempFile::new().unwrap();
        catalog.to_writer(&mut file).unwrap();
        file.flush().unwrap();

        let reloaded = Catalog::load(file.path()).unwrap();
        assert_eq!(reloaded.entries(), catalog.entries());
    }
}
