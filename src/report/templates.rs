use askama::Template;

use super::cells::AltitudeCell;

/// One catalog object in the HTML table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: String,
    /// Only Messier and Caldwell objects have an article.
    pub wiki_url: Option<String>,
    pub other_id: String,
    pub name: String,
    /// Window start, requested moment, window end.
    pub altitudes: [AltitudeCell; 3],
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub kind: String,
    /// Empty when the object has no Wikipedia thumbnail.
    pub lowres: String,
    pub dss: String,
    pub dss_zscale: String,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub columns: &'a [String; 3],
    pub rows: &'a [ReportRow],
}
