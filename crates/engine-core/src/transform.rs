use crate::error::TransformError;
use model::records::record::Record;
use std::collections::HashMap;

/// One transform step in the pull → transform → push path.
pub trait Transform: Send + Sync {
    fn apply(&self, records: Vec<Record>) -> Result<Vec<Record>, TransformError>;
}

/// An ordered chain of transform steps applied to every batch.
#[derive(Default)]
pub struct TransformPipeline {
    steps: Vec<Box<dyn Transform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        TransformPipeline::default()
    }

    pub fn add<T>(mut self, step: T) -> Self
    where
        T: Transform + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn add_if<T, F>(self, condition: bool, step: F) -> Self
    where
        T: Transform + 'static,
        F: FnOnce() -> T,
    {
        if condition { self.add(step()) } else { self }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform for TransformPipeline {
    fn apply(&self, records: Vec<Record>) -> Result<Vec<Record>, TransformError> {
        self.steps
            .iter()
            .try_fold(records, |records, step| step.apply(records))
    }
}

/// Renames the entity a record targets (source table → destination table).
pub struct EntityRenamer {
    map: HashMap<String, String>,
}

impl EntityRenamer {
    pub fn new(map: HashMap<String, String>) -> Self {
        EntityRenamer { map }
    }
}

impl Transform for EntityRenamer {
    fn apply(&self, mut records: Vec<Record>) -> Result<Vec<Record>, TransformError> {
        for record in &mut records {
            if let Some(renamed) = self.map.get(&record.entity) {
                record.entity = renamed.clone();
            }
        }
        Ok(records)
    }
}

/// Renames fields on every record (source column → destination column).
pub struct FieldRenamer {
    map: HashMap<String, String>,
}

impl FieldRenamer {
    pub fn new(map: HashMap<String, String>) -> Self {
        FieldRenamer { map }
    }
}

impl Transform for FieldRenamer {
    fn apply(&self, mut records: Vec<Record>) -> Result<Vec<Record>, TransformError> {
        for record in &mut records {
            for field in &mut record.fields {
                if let Some(renamed) = self.map.get(&field.name) {
                    field.name = renamed.clone();
                }
            }
        }
        Ok(records)
    }
}
