//! Operation summaries reported back to the user.

use std::fmt;

use serde::Serialize;

use crate::error::GridError;
use crate::host::Operation;
use crate::model::ElementId;

/// One unit of a batch that failed without aborting the batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartialFailure {
    pub unit: String,
    pub reason: String,
}

/// What an operation changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub operation: Operation,
    pub rows: usize,
    pub columns: usize,
    pub created: Vec<ElementId>,
    pub modified: usize,
    pub deleted: usize,
    pub failures: Vec<PartialFailure>,
}

impl Summary {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            rows: 0,
            columns: 0,
            created: Vec::new(),
            modified: 0,
            deleted: 0,
            failures: Vec::new(),
        }
    }

    /// Records and logs a unit that failed.
    pub fn fail(&mut self, unit: impl Into<String>, err: &GridError) {
        let unit = unit.into();
        tracing::warn!(operation = %self.operation, %unit, %err, "unit failed, continuing");
        self.failures.push(PartialFailure {
            unit,
            reason: err.to_string(),
        });
    }

    /// Folds another summary's counts into this one.
    pub fn absorb(&mut self, other: Summary) {
        self.rows += other.rows;
        self.columns += other.columns;
        self.created.extend(other.created);
        self.modified += other.modified;
        self.deleted += other.deleted;
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operation.label();
        let mut first = true;
        let mut part = |f: &mut fmt::Formatter<'_>, n: usize, what: &str| -> fmt::Result {
            if n == 0 {
                return Ok(());
            }
            let sep = if first { ": " } else { ", " };
            first = false;
            write!(f, "{sep}{n} {what}")
        };
        let mut s = op.chars();
        if let Some(c) = s.next() {
            write!(f, "{}{}", c.to_uppercase(), s.as_str())?;
        }
        part(f, self.rows, "rows")?;
        part(f, self.columns, "columns")?;
        part(f, self.created.len(), "elements created")?;
        part(f, self.modified, "elements updated")?;
        part(f, self.deleted, "elements removed")?;
        if first {
            f.write_str(": nothing to change")?;
        }
        if !self.failures.is_empty() {
            write!(f, " ({} skipped after errors)", self.failures.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_nonzero_counts() {
        let mut s = Summary::new(Operation::AddRow);
        s.rows = 1;
        s.created = vec![ElementId(1), ElementId(2)];
        s.fail("column 3", &GridError::host("create", "nope"));
        insta::assert_snapshot!(s.to_string(), @"Add row: 1 rows, 2 elements created (1 skipped after errors)");
    }

    #[test]
    fn display_empty() {
        let s = Summary::new(Operation::RemoveSeparators);
        assert_eq!(s.to_string(), "Remove separators: nothing to change");
    }
}
