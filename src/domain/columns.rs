//! Column schema for the tabular report
//!
//! Columns without the [`FINDING_PREFIX`] are record-level: they are resolved
//! once per record as a dotted path and repeated on every row. Prefixed
//! columns are finding-level and vary per vulnerability finding.

use super::errors::InventoryError;
use super::result::Result;
use std::collections::HashSet;

/// Prefix marking finding-level columns
pub const FINDING_PREFIX: &str = "vuln_";

/// Default column order: container identity, host/cluster, runtime context,
/// then one set of finding columns per vulnerability
pub const DEFAULT_COLUMNS: &[&str] = &[
    // Container identity & status
    "containerId",
    "uuid",
    "name",
    "state",
    "ipv4",
    "ipv6",
    "created",
    "updated",
    "stateChanged",
    "riskScore",
    "qdsSeverity",
    "maxQdsScore",
    "imageId",
    "imageSha",
    "imageUuid",
    "customerUuid",
    "privileged",
    "isRoot",
    "isVulnPropagated",
    "source",
    "sensorUuid",
    // Host / cluster
    "host.sensorUuid",
    "host.hostname",
    "host.ipAddress",
    "cluster.name",
    "cluster.uid",
    "cluster.version",
    "cluster.k8s.pod.name",
    "cluster.k8s.pod.namespace",
    "cluster.k8s.pod.uuid",
    "cluster.k8s.pod.controller[0].name",
    "cluster.k8s.pod.controller[0].type",
    "hostArchitecture",
    // Runtime context
    "environment",
    "command",
    "arguments",
    // Findings
    "vuln_qid",
    "vuln_firstFound",
    "vuln_lastFound",
    "vuln_typeDetected",
    "vuln_scanTypes",
    "vuln_software_names",
    "vuln_software_versions",
    "vuln_software_fixVersions",
    "vuln_software_packagePaths",
];

/// Ordered, duplicate-free list of output columns, fixed for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Build a schema from an ordered column list
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the list is empty, contains a blank
    /// name, or repeats a column.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(InventoryError::Configuration(
                "column schema cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if column.trim().is_empty() {
                return Err(InventoryError::Configuration(
                    "column names cannot be blank".to_string(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(InventoryError::Configuration(format!(
                    "duplicate column in schema: {column}"
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Parse a comma-separated override such as `"name,state,vuln_qid"`
    ///
    /// Whitespace around names is trimmed and empty entries are dropped.
    pub fn parse_list(list: &str) -> Result<Self> {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// All columns in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column in the schema
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Whether a column name is finding-level
    pub fn is_finding_column(column: &str) -> bool {
        column.starts_with(FINDING_PREFIX)
    }

    /// Record-level columns with their positions
    pub fn record_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !Self::is_finding_column(c))
            .map(|(i, c)| (i, c.as_str()))
    }

    /// Finding-level columns with their positions
    pub fn finding_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| Self::is_finding_column(c))
            .map(|(i, c)| (i, c.as_str()))
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
