use std::cmp::Ordering;

use crate::catalog::types::{CatalogEntry, CatalogFamily};

/// User criteria for picking catalog rows.
///
/// An explicit `targets` list overrides every other filter.
#[derive(Debug, Clone)]
pub struct Selection {
    pub targets: Option<Vec<String>>,
    pub messier: bool,
    pub caldwell: bool,
    pub types: Option<Vec<String>>,
    pub type_exclude: bool,
    pub nickname_only: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            targets: None,
            messier: true,
            caldwell: true,
            types: None,
            type_exclude: false,
            nickname_only: false,
        }
    }
}

impl Selection {
    /// Filter `entries`, keeping catalog order.
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        if let Some(targets) = &self.targets {
            log::info!("Choosing only these: {:?}", targets);
            return entries
                .iter()
                .filter(|e| targets.iter().any(|t| t == &e.id))
                .collect();
        }

        let mut selected: Vec<&CatalogEntry> = entries.iter().collect();

        if !self.messier {
            log::info!("Messier objects are ignored.");
            selected.retain(|e| e.family() != Some(CatalogFamily::Messier));
        }
        if !self.caldwell {
            log::info!("Caldwell objects are ignored.");
            selected.retain(|e| e.family() != Some(CatalogFamily::Caldwell));
        }
        if let Some(types) = &self.types {
            if self.type_exclude {
                log::info!("Following types will be ignored: {:?}", types);
                selected.retain(|e| !types.contains(&e.kind));
            } else {
                log::info!("Only take the following types: {:?}", types);
                selected.retain(|e| types.contains(&e.kind));
            }
        }
        if self.nickname_only {
            log::info!("Only those with common nicknames are selected.");
            selected.retain(|e| e.has_name());
        }

        selected
    }
}

/// Sort by declination, northernmost first. Rows without DEC go last.
pub fn sort_by_declination(entries: &mut [&CatalogEntry]) {
    entries.sort_by(|a, b| cmp_dec_desc(a.dec_deg, b.dec_deg));
}

pub(crate) fn cmp_dec_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::tests::{sample_catalog, SAMPLE_CSV};
    use crate::catalog::Catalog;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn ids(entries: &[&CatalogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn explicit_targets_override_other_filters() {
        let catalog = sample_catalog();
        let selection = Selection {
            targets: Some(vec!["C14".into(), "M31".into(), "M999".into()]),
            messier: false,
            caldwell: false,
            types: Some(vec!["Neb-P".into()]),
            type_exclude: false,
            nickname_only: true,
        };
        assert_eq!(ids(&selection.apply(catalog.entries())), ["M31", "C14"]);
    }

    #[test]
    fn excluding_messier_removes_only_m_prefixed() {
        let catalog = sample_catalog();
        let selection = Selection {
            messier: false,
            ..Selection::default()
        };
        let selected = selection.apply(catalog.entries());
        assert!(selected.iter().all(|e| !e.id.starts_with('M')));
        let expected = catalog
            .entries()
            .iter()
            .filter(|e| !e.id.starts_with('M'))
            .count();
        assert_eq!(selected.len(), expected);
    }

    #[test]
    fn excluding_caldwell_removes_only_c_prefixed() {
        let catalog = sample_catalog();
        let selection = Selection {
            caldwell: false,
            ..Selection::default()
        };
        assert_eq!(
            ids(&selection.apply(catalog.entries())),
            ["M1", "M13", "M31", "M45", "M101"]
        );
    }

    #[test]
    fn type_allow_and_deny_lists() {
        let catalog = sample_catalog();
        let allow = Selection {
            types: Some(vec!["cl-G".into(), "cl-O".into()]),
            ..Selection::default()
        };
        assert_eq!(
            ids(&allow.apply(catalog.entries())),
            ["M13", "M45", "C14", "C80", "C106"]
        );

        let deny = Selection {
            type_exclude: true,
            ..allow
        };
        assert_eq!(
            ids(&deny.apply(catalog.entries())),
            ["M1", "M31", "M101", "C63"]
        );
    }

    #[test]
    fn nickname_filter_keeps_named_rows() {
        let raw = "ID,Name,Type\nM1,Crab Nebula,Neb-SN\nM2,,cl-G\nM3,  ,cl-G\n";
        let catalog = Catalog::from_reader(raw.as_bytes()).unwrap();
        let selection = Selection {
            nickname_only: true,
            ..Selection::default()
        };
        assert_eq!(ids(&selection.apply(catalog.entries())), ["M1"]);
    }

    #[test]
    fn declination_sort_is_descending() {
        let catalog = sample_catalog();
        let mut selected = Selection::default().apply(catalog.entries());
        sort_by_declination(&mut selected);
        assert_eq!(
            ids(&selected),
            ["C14", "M101", "M31", "M13", "M45", "M1", "C63", "C80", "C106"]
        );
    }

    #[test]
    fn derived_csv_round_trip_gives_same_selection() {
        let in_memory = Catalog::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        in_memory.to_writer(&mut file).unwrap();
        file.flush().unwrap();
        let reloaded = Catalog::load(file.path()).unwrap();

        let selection = Selection {
            types: Some(vec!["Neb-SN".into(), "gal-SB".into(), "cl-O".into()]),
            ..Selection::default()
        };
        let mut a = selection.apply(in_memory.entries());
        let mut b = selection.apply(reloaded.entries());
        sort_by_declination(&mut a);
        sort_by_declination(&mut b);
        assert_eq!(a, b);
    }
}
