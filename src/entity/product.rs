use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::production_record::ProductionRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub customer_id: String,
    pub code: String,
    pub name: String,
    /// Free-form attributes such as `dimensions` or `material`.
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub records: Vec<Arc<ProductionRecord>>,
}

impl Product {
    pub fn find_record(&self, record_id: &str) -> Option<&ProductionRecord> {
        self.records
            .iter()
            .map(Arc::as_ref)
            .find(|record| record.id == record_id)
    }

    pub fn first_record(&self) -> Option<&ProductionRecord> {
        self.records.first().map(Arc::as_ref)
    }

    pub fn spec(&self, key: &str) -> Option<&str> {
        self.specs.get(key).map(String::as_str)
    }
}
