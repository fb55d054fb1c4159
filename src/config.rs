//!
//! Mapper configuration.
//!
//! A plain settings object passed by reference into table-name
//! resolution and the read path. No framework; callers construct one
//! with the builder-style setters and hand it to the [`Mapper`]
//! (or directly to the components).
//!
//! [`Mapper`]: crate::mapper::Mapper

/// Configuration for the mapping components.
#[derive(Clone, Debug, Default)]
pub struct MapperConfig {
    table_name_prefix: Option<String>,
    consistent_reads: bool,
}

impl MapperConfig {
    /// A configuration with no prefix and eventually-consistent reads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every resolved physical table name, e.g. `"staging-"`.
    pub fn with_table_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_name_prefix = Some(prefix.into());
        self
    }

    /// Request strongly consistent reads on the batch-read path.
    pub fn with_consistent_reads(mut self, consistent: bool) -> Self {
        self.consistent_reads = consistent;
        self
    }

    /// The configured table-name prefix, if any.
    pub fn table_name_prefix(&self) -> Option<&str> {
        self.table_name_prefix.as_deref()
    }

    /// Whether batch reads should be strongly consistent.
    pub fn consistent_reads(&self) -> bool {
        self.consistent_reads
    }
}
