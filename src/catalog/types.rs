use serde::{Deserialize, Deserializer, Serialize};

/// Deep-sky catalog an identifier belongs to, decided by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CatalogFamily {
    Messier,
    Caldwell,
}

impl CatalogFamily {
    pub fn of(id: &str) -> Option<Self> {
        if id.starts_with('M') {
            Some(CatalogFamily::Messier)
        } else if id.starts_with('C') {
            Some(CatalogFamily::Caldwell)
        } else {
            None
        }
    }
}

/// One row of the deep-sky catalog CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Other ID", default)]
    pub other_id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Distance (kly)", default, deserialize_with = "lenient_f64")]
    pub distance_kly: Option<f64>,
    #[serde(rename = "Constellation", default)]
    pub constellation: Option<String>,
    #[serde(rename = "RA", default, deserialize_with = "lenient_f64")]
    pub ra_deg: Option<f64>,
    #[serde(rename = "DEC", default, deserialize_with = "lenient_f64")]
    pub dec_deg: Option<f64>,
}

impl CatalogEntry {
    pub fn family(&self) -> Option<CatalogFamily> {
        CatalogFamily::of(&self.id)
    }

    /// Catalog number, e.g. 31 for "M31".
    pub fn number(&self) -> Option<u32> {
        self.family()?;
        self.id.get(1..)?.trim().parse().ok()
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.ra_deg?, self.dec_deg?))
    }

    /// First alternate identifier ("NGC 224 & UGC 454" -> "NGC 224").
    pub fn primary_other_id(&self) -> Option<&str> {
        self.other_id
            .as_deref()
            .and_then(|o| o.split(" & ").next())
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }

    /// Legend label used for plots, e.g. "M31 (gal-SB)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.id, self.kind)
    }

    /// Wikipedia article for Messier and Caldwell objects.
    pub fn wiki_url(&self) -> Option<String> {
        let family = self.family()?;
        Some(format!(
            "https://en.wikipedia.org/wiki/{}_{}",
            family,
            self.id.get(1..)?
        ))
    }

    /// Wikipedia thumbnail file name, e.g. "Messier_031.jpg".
    pub fn thumbnail_file(&self) -> Option<String> {
        let family = self.family()?;
        let number = self.number()?;
        Some(thumbnail_file(family, number))
    }

    pub fn finder_chart_file(&self) -> String {
        format!("DSS-200px-{}.jpg", self.id)
    }

    pub fn finder_chart_zscale_file(&self) -> String {
        format!("DSS-200px-{}-zscale.jpg", self.id)
    }
}

pub fn thumbnail_file(family: CatalogFamily, number: u32) -> String {
    format!("{}_{:03}.jpg", family, number)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

pub const TYPE_LEGEND: &str = r#"
Abbreviations for "Type" column
* cl: Cluster
  - cl-O: open cluster
  - cl-G: globular cluster
* gal: Galaxy
  - gal-SB: Barred spiral galaxy
  - gal-S: Spiral galaxy
  - gal-S0: Lenticular galaxy
  - gal-E: Elliptical galaxy
  - gal-dE: Dwarf elliptical galaxy
  - gal-dSph: Dwarf Spheroidal Galaxy
  - gal-cD: Supergiant Elliptical Galaxy
  - gal-Irr: Irregular galaxy
  - gal-IrrB: Barred irregular galaxy
  - gal-Inter: Interacting galaxy
* Neb: Nebula
  - Neb-P: Planetary nebula
  - Neb-HII: H II Region Nebula
  - Neb-SN: Supernova remnant
* MW: Milky Way

Messier data from https://en.wikipedia.org/wiki/Messier_object
Caldwell data from https://en.wikipedia.org/wiki/Caldwell_catalogue
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, other: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            other_id: other.map(String::from),
            name: None,
            kind: "gal-SB".to_string(),
            distance_kly: None,
            constellation: None,
            ra_deg: None,
            dec_deg: None,
        }
    }

    #[test]
    fn family_from_prefix() {
        assert_eq!(CatalogFamily::of("M31"), Some(CatalogFamily::Messier));
        assert_eq!(CatalogFamily::of("C14"), Some(CatalogFamily::Caldwell));
        assert_eq!(CatalogFamily::of("NGC 224"), None);
    }

    #[test]
    fn wiki_url_and_thumbnail() {
        let m31 = entry("M31", None);
        assert_eq!(
            m31.wiki_url().as_deref(),
            Some("https://en.wikipedia.org/wiki/Messier_31")
        );
        assert_eq!(m31.thumbnail_file().as_deref(), Some("Messier_031.jpg"));

        let c5 = entry("C5", None);
        assert_eq!(
            c5.wiki_url().as_deref(),
            Some("https://en.wikipedia.org/wiki/Caldwell_5")
        );
        assert_eq!(c5.thumbnail_file().as_deref(), Some("Caldwell_005.jpg"));
        assert_eq!(c5.finder_chart_zscale_file(), "DSS-200px-C5-zscale.jpg");

        assert_eq!(entry("NGC 7000", None).wiki_url(), None);
    }

    #[test]
    fn primary_other_id_takes_first_alias() {
        assert_eq!(
            entry("C14", Some("NGC 869 & NGC 884")).primary_other_id(),
            Some("NGC 869")
        );
        assert_eq!(entry("M45", Some("")).primary_other_id(), None);
        assert_eq!(entry("M45", None).primary_other_id(), None);
    }
}
