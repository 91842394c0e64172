// src/io/export.rs

//! Tabular exports of the element data (JSON, CSV, HTML).

use crate::error::{PtError, Result};
use crate::model::Element;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Favorites,
    Custom(BTreeSet<u32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGroup {
    Basic,
    Properties,
    Applications,
    Compounds,
    Electron,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Basic,
        FieldGroup::Properties,
        FieldGroup::Applications,
        FieldGroup::Compounds,
        FieldGroup::Electron,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldGroup::Basic => "Basic",
            FieldGroup::Properties => "Properties",
            FieldGroup::Applications => "Applications",
            FieldGroup::Compounds => "Compounds",
            FieldGroup::Electron => "Electronic",
        }
    }

    /// Basic and properties are checked by default
    pub fn default_selected(self) -> bool {
        matches!(self, FieldGroup::Basic | FieldGroup::Properties)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
    Html,
}

impl DataFormat {
    pub const ALL: [DataFormat; 3] = [DataFormat::Json, DataFormat::Csv, DataFormat::Html];

    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Csv => "csv",
            DataFormat::Html => "html",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataFormat::Json => "JSON",
            DataFormat::Csv => "CSV",
            DataFormat::Html => "HTML",
        }
    }

    pub fn default_file_name(self) -> String {
        format!("periodic-table.{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub include_metadata: bool,
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { include_metadata: true, pretty: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub selection: Selection,
    pub fields: Vec<FieldGroup>,
    pub format: DataFormat,
    pub options: ExportOptions,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            fields: FieldGroup::ALL.into_iter().filter(|f| f.default_selected()).collect(),
            format: DataFormat::Json,
            options: ExportOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub export_date: String,
    pub total_elements: usize,
    pub fields: Vec<FieldGroup>,
    pub options: ExportOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub metadata: Metadata,
    pub elements: Vec<Record>,
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
}

// --- Selection and records ---

pub fn select<'a>(elements: &'a [Element], selection: &Selection, favorites: &[u32]) -> Vec<&'a Element> {
    elements
        .iter()
        .filter(|e| match selection {
            Selection::All => true,
            Selection::Favorites => favorites.contains(&e.atomic_number),
            Selection::Custom(set) => set.contains(&e.atomic_number),
        })
        .collect()
}

/// Keys are inserted group by group so the column order is stable
pub fn record(element: &Element, fields: &[FieldGroup]) -> Record {
    let mut r = Record::new();
    let has = |g: FieldGroup| fields.contains(&g);

    if has(FieldGroup::Basic) {
        r.insert("atomicNumber".into(), json!(element.atomic_number));
        r.insert("symbol".into(), json!(element.symbol));
        r.insert("name".into(), json!(element.name));
        r.insert("atomicMass".into(), json!(element.atomic_mass));
        r.insert("category".into(), json!(element.category));
        r.insert("group".into(), json!(element.group));
        r.insert("period".into(), json!(element.period));
        r.insert("block".into(), json!(element.block));
    }
    if has(FieldGroup::Properties) {
        r.insert("density".into(), json!(element.density));
        r.insert("meltingPoint".into(), json!(element.melting_point));
        r.insert("boilingPoint".into(), json!(element.boiling_point));
        r.insert("electronegativity".into(), json!(element.electronegativity));
        r.insert("atomicRadius".into(), json!(element.atomic_radius));
        r.insert("ionizationEnergy".into(), json!(element.ionization_energy));
    }
    if has(FieldGroup::Applications) {
        r.insert("applications".into(), json!(element.applications));
    }
    if has(FieldGroup::Compounds) {
        r.insert("compounds".into(), json!(element.compounds));
    }
    if has(FieldGroup::Electron) {
        r.insert("electronConfiguration".into(), json!(element.electron_configuration));
    }
    r
}

pub fn prepare(
    elements: &[Element],
    favorites: &[u32],
    request: &ExportRequest,
    now: DateTime<Utc>,
) -> ExportDocument {
    let records: Vec<Record> = select(elements, &request.selection, favorites)
        .into_iter()
        .map(|e| record(e, &request.fields))
        .collect();

    ExportDocument {
        metadata: Metadata {
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_elements: records.len(),
            fields: request.fields.clone(),
            options: request.options,
        },
        elements: records,
        generated_at: now,
    }
}

// --- Serializers ---

fn cell_text(value: &Value, separator: &str) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| cell_text(v, separator))
            .collect::<Vec<_>>()
            .join(separator),
        // Compounds
        Value::Object(map) => match (map.get("formula"), map.get("name")) {
            (Some(Value::String(f)), Some(Value::String(n))) => format!("{} ({})", f, n),
            _ => Value::Object(map.clone()).to_string(),
        },
    }
}

pub fn to_json(doc: &ExportDocument, options: &ExportOptions) -> Result<String> {
    let text = match (options.include_metadata, options.pretty) {
        (true, true) => serde_json::to_string_pretty(doc)?,
        (true, false) => serde_json::to_string(doc)?,
        (false, true) => serde_json::to_string_pretty(&doc.elements)?,
        (false, false) => serde_json::to_string(&doc.elements)?,
    };
    Ok(text)
}

/// Header from the first record's keys, left bare; every data cell quoted
pub fn to_csv(records: &[Record]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut head = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    head.write_record(&headers)?;
    let buf = head.into_inner().map_err(|e| PtError::Export(e.to_string()))?;

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(buf);
    for rec in records {
        wtr.write_record(
            headers
                .iter()
                .map(|h| rec.get(*h).map(|v| cell_text(v, "; ")).unwrap_or_default()),
        )?;
    }
    let bytes = wtr.into_inner().map_err(|e| PtError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PtError::Export(e.to_string()))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(doc: &ExportDocument) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Periodic Table - Exported Data</title>\n");
    html.push_str(
        "<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f2f2f2; }\n\
         .header { text-align: center; margin-bottom: 20px; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n<div class=\"header\">\n");
    html.push_str("<h1>Periodic Table - Exported Data</h1>\n");
    html.push_str(&format!(
        "<p>Exported at: {}</p>\n",
        doc.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!("<p>Total elements: {}</p>\n</div>\n", doc.elements.len()));

    html.push_str("<table>\n<thead>\n<tr>");
    if let Some(first) = doc.elements.first() {
        for key in first.keys() {
            html.push_str(&format!("<th>{}</th>", escape_html(key)));
        }
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for rec in &doc.elements {
        html.push_str("<tr>");
        for value in rec.values() {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell_text(value, ", "))));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

pub fn render(doc: &ExportDocument, format: DataFormat, options: &ExportOptions) -> Result<String> {
    match format {
        DataFormat::Json => to_json(doc, options),
        DataFormat::Csv => to_csv(&doc.elements),
        DataFormat::Html => Ok(to_html(doc)),
    }
}

/// Same output as `render`, cut to the first `limit` records
pub fn preview(doc: &ExportDocument, format: DataFormat, options: &ExportOptions, limit: usize) -> Result<String> {
    let mut head = doc.clone();
    head.elements.truncate(limit);
    render(&head, format, options)
}

pub fn write(path: &Path, doc: &ExportDocument, format: DataFormat, options: &ExportOptions) -> Result<()> {
    if doc.elements.is_empty() {
        return Err(PtError::Export("no elements selected".to_string()));
    }
    let content = render(doc, format, options)?;
    fs::write(path, content)?;
    log::info!("Exported {} elements to {:?}", doc.elements.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elements::fixtures::element;
    use crate::model::Compound;
    use chrono::TimeZone;

    fn sample() -> Vec<Element> {
        let mut h = element(1, "H", Some(1), 1);
        h.name = "Hydrogen".into();
        h.electronegativity = Some(2.2);
        h.applications = vec!["Fuel cells".into(), "The \"clean\" fuel".into()];
        h.compounds = vec![Compound { formula: "H2O".into(), name: "Water".into() }];
        let mut he = element(2, "He", Some(18), 1);
        he.name = "Helium".into();
        let fe = element(26, "Fe", Some(8), 4);
        vec![h, he, fe]
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_selection_modes() {
        let elements = sample();
        assert_eq!(select(&elements, &Selection::All, &[]).len(), 3);

        let favs = select(&elements, &Selection::Favorites, &[26, 99]);
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].symbol, "Fe");

        let custom = Selection::Custom([1, 2].into_iter().collect());
        assert_eq!(select(&elements, &custom, &[]).len(), 2);
    }

    #[test]
    fn test_record_field_order() {
        let elements = sample();
        let r = record(&elements[0], &[FieldGroup::Electron, FieldGroup::Basic]);
        let keys: Vec<&str> = r.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys[0], "atomicNumber");
        assert_eq!(keys.last(), Some(&"electronConfiguration"));
        assert_eq!(r["category"], json!("transition-metal"));
        assert!(!r.contains_key("density"));
    }

    #[test]
    fn test_json_metadata() {
        let elements = sample();
        let request = ExportRequest::default();
        let doc = prepare(&elements, &[], &request, fixed_now());
        let text = to_json(&doc, &request.options).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed["metadata"]["exportDate"], json!("2026-03-01T12:00:00.000Z"));
        assert_eq!(parsed["metadata"]["totalElements"], json!(3));
        assert_eq!(parsed["metadata"]["fields"], json!(["basic", "properties"]));
        assert_eq!(parsed["elements"][0]["electronegativity"], json!(2.2));
        assert_eq!(parsed["elements"][1]["electronegativity"], Value::Null);
    }

    #[test]
    fn test_csv_quoting_and_arrays() {
        let elements = sample();
        let request = ExportRequest {
            fields: vec![FieldGroup::Basic, FieldGroup::Applications, FieldGroup::Compounds],
            ..ExportRequest::default()
        };
        let doc = prepare(&elements, &[], &request, fixed_now());
        let csv = to_csv(&doc.elements).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("atomicNumber,symbol,name,"));
        assert!(lines[0].ends_with("applications,compounds"));
        assert!(lines[1].starts_with("\"1\",\"H\",\"Hydrogen\","));
        assert!(lines[1].contains("\"Fuel cells; The \"\"clean\"\" fuel\""));
        assert!(lines[1].ends_with("\"H2O (Water)\""));
        // Empty lists become empty cells
        assert!(lines[2].ends_with("\"\",\"\""));
    }

    #[test]
    fn test_csv_empty() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_html_escapes_and_counts() {
        let elements = sample();
        let request = ExportRequest {
            fields: vec![FieldGroup::Basic, FieldGroup::Applications],
            ..ExportRequest::default()
        };
        let doc = prepare(&elements, &[], &request, fixed_now());
        let html = to_html(&doc);
        assert!(html.contains("<p>Total elements: 3</p>"));
        assert!(html.contains("<th>atomicNumber</th>"));
        assert!(html.contains("The &quot;clean&quot; fuel"));
        assert_eq!(html.matches("<tr>").count(), 4);
    }

    #[test]
    fn test_preview_truncates() {
        let elements = sample();
        let request = ExportRequest::default();
        let doc = prepare(&elements, &[], &request, fixed_now());
        let text = preview(&doc, DataFormat::Csv, &request.options, 1).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_write_rejects_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let request = ExportRequest { selection: Selection::Favorites, ..ExportRequest::default() };
        let doc = prepare(&sample(), &[], &request, fixed_now());
        let path = dir.path().join("out.json");
        assert!(matches!(
            write(&path, &doc, DataFormat::Json, &request.options),
            Err(PtError::Export(_))
        ));

        let all = prepare(&sample(), &[], &ExportRequest::default(), fixed_now());
        write(&path, &all, DataFormat::Json, &ExportOptions::default()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"Hydrogen\""));
    }
}
