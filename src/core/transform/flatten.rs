//! One-to-many flattening of records into report rows
//!
//! A record with no findings becomes exactly one row with empty finding
//! columns. A record with N findings becomes N rows that repeat the
//! record-level cells verbatim and vary only in the finding-level cells.

use super::path::lookup;
use super::sanitize::{sanitize_str, sanitize_value};
use crate::domain::{ColumnSchema, FINDING_PREFIX};
use serde_json::Value;

/// Record field holding the list of findings
pub const FINDINGS_FIELD: &str = "vulnerabilities";

static NULL: Value = Value::Null;

/// One flat report row, aligned with the flattener's column schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    schema: &'a ColumnSchema,
    values: Vec<String>,
}

impl<'a> Row<'a> {
    /// Cell for a column, if the column is part of the schema
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema
            .index_of(column)
            .map(|index| self.values[index].as_str())
    }

    /// Cells in schema order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Column names in schema order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schema.columns().iter().map(String::as_str)
    }

    /// `(column, cell)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys().zip(self.values.iter().map(String::as_str))
    }

    /// Consume the row, keeping only the cells
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// Expands records into rows against a fixed column schema
#[derive(Debug, Clone)]
pub struct RowFlattener {
    schema: ColumnSchema,
}

impl RowFlattener {
    /// Create a flattener for a column schema
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    /// The schema every emitted row conforms to
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Lazily expand a record into its rows
    ///
    /// The sequence is pure in its inputs; calling `rows` again restarts it.
    ///
    /// # Examples
    ///
    /// ```
    /// use weekly_inventory::core::transform::RowFlattener;
    /// use weekly_inventory::domain::ColumnSchema;
    /// use serde_json::json;
    ///
    /// let schema = ColumnSchema::parse_list("name,vuln_qid").unwrap();
    /// let flattener = RowFlattener::new(schema);
    /// let record = json!({"name": "web", "vulnerabilities": [{"qid": 1}, {"qid": 2}]});
    ///
    /// let qids: Vec<String> = flattener
    ///     .rows(&record)
    ///     .map(|row| row.get("vuln_qid").unwrap().to_string())
    ///     .collect();
    /// assert_eq!(qids, vec!["1", "2"]);
    /// ```
    pub fn rows<'a>(&'a self, record: &'a Value) -> Rows<'a> {
        let findings = record
            .get(FINDINGS_FIELD)
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
            .map(|list| list.iter());

        Rows {
            flattener: self,
            base: self.base_row(record),
            findings,
            base_emitted: false,
        }
    }

    /// Record-level cells, with every finding-level cell empty
    fn base_row(&self, record: &Value) -> Vec<String> {
        let mut values = vec![String::new(); self.schema.len()];
        for (index, column) in self.schema.record_columns() {
            values[index] = cell_at(record, column);
        }
        values
    }

    fn finding_row(&self, base: &[String], finding: &Value) -> Vec<String> {
        let fields = FindingFields::extract(finding);
        let mut values = base.to_vec();
        for (index, column) in self.schema.finding_columns() {
            values[index] = fields.cell(column, finding);
        }
        values
    }
}

/// Lazy row sequence for one record
pub struct Rows<'a> {
    flattener: &'a RowFlattener,
    base: Vec<String>,
    findings: Option<std::slice::Iter<'a, Value>>,
    base_emitted: bool,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Row<'a>> {
        let flattener: &'a RowFlattener = self.flattener;

        let values = match self.findings.as_mut() {
            Some(findings) => {
                let finding = findings.next()?;
                flattener.finding_row(&self.base, finding)
            }
            None if self.base_emitted => return None,
            None => {
                self.base_emitted = true;
                self.base.clone()
            }
        };

        Some(Row {
            schema: &flattener.schema,
            values,
        })
    }
}

/// Built-in finding columns, computed once per finding
struct FindingFields {
    qid: String,
    first_found: String,
    last_found: String,
    type_detected: String,
    scan_types: String,
    software_names: String,
    software_versions: String,
    software_fix_versions: String,
    software_package_paths: String,
}

impl FindingFields {
    fn extract(finding: &Value) -> Self {
        let scan_types = match field(finding, "scanType") {
            Value::Array(items) => items
                .iter()
                .map(sanitize_value)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            other => sanitize_value(other),
        };

        // Four parallel lists: position i in each belongs to software entry i,
        // so a missing field still takes its slot.
        let mut names = Vec::new();
        let mut versions = Vec::new();
        let mut fix_versions = Vec::new();
        let mut package_paths = Vec::new();
        if let Value::Array(entries) = field(finding, "software") {
            for entry in entries {
                let name = match sanitize_value(field(entry, "name")) {
                    name if name.is_empty() => sanitize_value(field(entry, "software")),
                    name => name,
                };
                names.push(name);
                versions.push(sanitize_value(field(entry, "version")));
                fix_versions.push(sanitize_value(field(entry, "fixVersion")));
                package_paths.push(sanitize_value(field(entry, "packagePath")));
            }
        }

        Self {
            qid: sanitize_value(field(finding, "qid")),
            first_found: sanitize_value(field(finding, "firstFound")),
            last_found: sanitize_value(field(finding, "lastFound")),
            type_detected: sanitize_value(field(finding, "typeDetected")),
            scan_types,
            software_names: sanitize_str(&names.join(", ")),
            software_versions: sanitize_str(&versions.join(", ")),
            software_fix_versions: sanitize_str(&fix_versions.join(", ")),
            software_package_paths: sanitize_str(&package_paths.join(", ")),
        }
    }

    fn cell(&self, column: &str, finding: &Value) -> String {
        match column {
            "vuln_qid" => self.qid.clone(),
            "vuln_firstFound" => self.first_found.clone(),
            "vuln_lastFound" => self.last_found.clone(),
            "vuln_typeDetected" => self.type_detected.clone(),
            "vuln_scanTypes" => self.scan_types.clone(),
            "vuln_software_names" => self.software_names.clone(),
            "vuln_software_versions" => self.software_versions.clone(),
            "vuln_software_fixVersions" => self.software_fix_versions.clone(),
            "vuln_software_packagePaths" => self.software_package_paths.clone(),
            // Any other prefixed column reads its remainder as a path into the finding
            other => {
                let path = other.strip_prefix(FINDING_PREFIX).unwrap_or(other);
                cell_at(finding, path)
            }
        }
    }
}

/// Resolve a path and sanitize whatever it lands on
fn cell_at(value: &Value, path: &str) -> String {
    lookup(value, path).map(sanitize_value).unwrap_or_default()
}

fn field<'v>(value: &'v Value, key: &str) -> &'v Value {
    value.get(key).unwrap_or(&NULL)
}
