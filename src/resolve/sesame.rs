//! Object name resolution through the CDS Sesame service.

use reqwest::blocking::Client;

use super::error::ResolveError;
use crate::catalog::CatalogEntry;
use crate::net;

const SESAME_URL: &str = "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A";

pub fn sesame_url(name: &str) -> String {
    format!("{}?{}", SESAME_URL, urlencoding::encode(name.trim()))
}

/// Extracts `(ra, dec)` in degrees from the `%J` line of a Sesame reply.
pub fn parse_sesame(text: &str) -> Option<(f64, f64)> {
    text.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("%J")?;
        let mut fields = rest.split_whitespace();
        let ra: f64 = fields.next()?.parse().ok()?;
        let dec: f64 = fields.next()?.parse().ok()?;
        Some((ra, dec))
    })
}

/// `Ok(None)` when the service answered but does not know the name.
pub fn resolve_name(client: &Client, name: &str) -> Result<Option<(f64, f64)>, ResolveError> {
    let text = net::fetch_text(client, &sesame_url(name))?;
    Ok(parse_sesame(&text))
}

/// Resolves the catalog ID, falling back to the first alternate ID.
pub fn resolve_entry(client: &Client, entry: &CatalogEntry) -> Result<(f64, f64), ResolveError> {
    resolve_entry_with(entry, |name| resolve_name(client, name))
}

/// `resolve_entry` over any name lookup. A failed lookup of the primary ID,
/// miss or error, is retried once with the alternate ID.
pub fn resolve_entry_with<F>(
    entry: &CatalogEntry,
    mut lookup: F,
) -> Result<(f64, f64), ResolveError>
where
    F: FnMut(&str) -> Result<Option<(f64, f64)>, ResolveError>,
{
    match lookup(&entry.id) {
        Ok(Some(coords)) => return Ok(coords),
        Ok(None) => log::warn!("Sesame does not know {}", entry.id),
        Err(e) => log::warn!("Resolving {} failed: {}", entry.id, e),
    }

    let Some(other) = entry.primary_other_id() else {
        return Err(ResolveError::Unresolved(entry.id.clone()));
    };
    lookup(other)?
        .ok_or_else(|| ResolveError::Unresolved(format!("{} (nor {})", entry.id, other)))
}

pub fn round4(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn entry(id: &str, other_id: &str) -> CatalogEntry {
        let csv = format!("ID,Other ID,Name,Type\n{},{},,gal-S\n", id, other_id);
        Catalog::from_reader(csv.as_bytes()).unwrap().entries()[0].clone()
    }

    const M31_REPLY: &str = "\
# M31\t#Q23498742
#=S=Simbad (via url):    1
%@ 3034758
%I.0 M  31
%C.0 AGN
%J 10.68470833 +41.26875000 = 00:42:44.33 +41:16:07.5
%J.E [1.10 1.10 0] A 2006AJ....131.1163S
%V v -300 [4] / 2009ApJ...
#====Done (2024-Oct-05,10:00:00z)====
";

    #[test]
    fn parses_j2000_line() {
        assert_eq!(parse_sesame(M31_REPLY), Some((10.68470833, 41.26875)));
    }

    #[test]
    fn negative_declination() {
        let reply = "%J 6.02362500 -72.08130556 = 00:24:05.67 -72:04:52.7\n";
        assert_eq!(parse_sesame(reply), Some((6.023625, -72.08130556)));
    }

    #[test]
    fn unknown_name_has_no_coordinates() {
        let reply = "# NotAnObject\t#Q1\n#! *** Nothing found *** \n#====Done====\n";
        assert_eq!(parse_sesame(reply), None);
    }

    #[test]
    fn url_encodes_spaces() {
        assert_eq!(
            sesame_url("NGC 224"),
            "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A?NGC%20224"
        );
        assert_eq!(sesame_url("M31"), "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A?M31");
    }

    #[test]
    fn rounding_to_four_decimals() {
        assert_eq!(round4(10.68470833), 10.6847);
        assert_eq!(round4(-72.08130556), -72.0813);
    }

    #[test]
    fn primary_id_resolves_without_fallback() {
        let mut asked = Vec::new();
        let coords = resolve_entry_with(&entry("M31", "NGC 224"), |name| {
            asked.push(name.to_string());
            Ok(Some((10.6847, 41.2688)))
        })
        .unwrap();
        assert_eq!(coords, (10.6847, 41.2688));
        assert_eq!(asked, vec!["M31"]);
    }

    #[test]
    fn falls_back_to_first_alias() {
        let mut asked = Vec::new();
        let coords = resolve_entry_with(&entry("C14", "NGC 869 & NGC 884"), |name| {
            asked.push(name.to_string());
            Ok((name == "NGC 869").then_some((34.75, 57.13)))
        })
        .unwrap();
        assert_eq!(coords, (34.75, 57.13));
        assert_eq!(asked, vec!["C14", "NGC 869"]);

        let coords = resolve_entry_with(&entry("C41", "Mel 25"), |name| {
            if name == "C41" {
                Err(ResolveError::Unresolved("service down".to_string()))
            } else {
                Ok(Some((66.75, 15.87)))
            }
        })
        .unwrap();
        assert_eq!(coords, (66.75, 15.87));
    }

    #[test]
    fn both_names_unknown_is_unresolved() {
        let mut calls = 0;
        let err = resolve_entry_with(&entry("C99", "Coalsack"), |_| {
            calls += 1;
            Ok(None)
        })
        .unwrap_err();
        assert!(matches!(err, ResolveError::Unresolved(ref msg) if msg == "C99 (nor Coalsack)"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn no_alias_is_unresolved() {
        let mut calls = 0;
        let err = resolve_entry_with(&entry("M40", ""), |_| {
            calls += 1;
            Ok(None)
        })
        .unwrap_err();
        assert!(matches!(err, ResolveError::Unresolved(ref id) if id == "M40"));
        assert_eq!(calls, 1);
    }
}
