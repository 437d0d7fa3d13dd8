//! DynamoDB-backed live registry with the version-guarded conditional put.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{info, warn};

use crate::domain::LiveRecord;

use super::{LiveRegistry, PutOutcome, StoreError};

/// Writes live records to a DynamoDB table.
///
/// The guarded put is the system's only concurrency-control primitive: the
/// table's conditional-write support enforces "last version wins, never
/// regress" without any locks held by the publisher.
pub struct DynamoLiveRegistry {
    client: Client,
    table: String,
    dry_run: bool,
}

impl DynamoLiveRegistry {
    /// Create a registry writing to `table`.
    pub fn new(client: Client, table: impl Into<String>, dry_run: bool) -> Self {
        Self {
            client,
            table: table.into(),
            dry_run,
        }
    }

    /// Flatten a record into a DynamoDB item, adding the composite key.
    fn to_item(record: &LiveRecord) -> Result<HashMap<String, AttributeValue>, StoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let serde_json::Value::Object(fields) = value else {
            return Err(StoreError::Serialization(
                "live record did not serialize to an object".to_string(),
            ));
        };

        let mut item = HashMap::new();
        item.insert("PK".to_string(), AttributeValue::S(record.pk()?));
        item.insert("SK".to_string(), AttributeValue::S(record.sk().to_string()));
        for (name, field) in fields {
            item.insert(name, json_to_attribute(field)?);
        }
        Ok(item)
    }
}

/// Convert a JSON value to its DynamoDB attribute equivalent.
fn json_to_attribute(value: serde_json::Value) -> Result<AttributeValue, StoreError> {
    match value {
        serde_json::Value::Null => Ok(AttributeValue::Null(true)),
        serde_json::Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        serde_json::Value::Number(n) => Ok(AttributeValue::N(n.to_string())),
        serde_json::Value::String(s) => Ok(AttributeValue::S(s)),
        serde_json::Value::Array(items) => {
            let list = items
                .into_iter()
                .map(json_to_attribute)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AttributeValue::L(list))
        }
        serde_json::Value::Object(fields) => {
            let map = fields
                .into_iter()
                .map(|(k, v)| json_to_attribute(v).map(|av| (k, av)))
                .collect::<Result<HashMap<_, _>, _>>()?;
            Ok(AttributeValue::M(map))
        }
    }
}

#[async_trait]
impl LiveRegistry for DynamoLiveRegistry {
    async fn put_live(
        &self,
        record: &LiveRecord,
        guard_version: bool,
    ) -> Result<PutOutcome, StoreError> {
        let pk = record.pk()?;

        if self.dry_run {
            // The condition cannot be evaluated without the real call, so a
            // dry run only reports the intended write.
            let json = serde_json::to_string(record)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            info!(table = %self.table, %pk, sk = record.sk(), record = %json, "dry-run: would put live record");
            return Ok(PutOutcome::DryRun);
        }

        let item = Self::to_item(record)?;
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item));

        if guard_version {
            if let Some(version) = record.version() {
                request = request
                    .condition_expression("attribute_not_exists(#v) OR #v <= :newv")
                    .expression_attribute_names("#v", "version")
                    .expression_attribute_values(":newv", AttributeValue::N(version.to_string()));
            }
        }

        match request.send().await {
            Ok(_) => {
                info!(table = %self.table, %pk, sk = record.sk(), "put live record");
                Ok(PutOutcome::Written)
            }
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, |e| e.is_conditional_check_failed_exception()) =>
            {
                warn!(table = %self.table, %pk, "newer or equal version already live, skipping");
                Ok(PutOutcome::Skipped)
            }
            Err(err) => Err(StoreError::LiveWrite {
                pk,
                message: format!("{}", DisplayErrorContext(&err)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_attribute_scalars() {
        assert_eq!(
            json_to_attribute(json!("hello")).unwrap(),
            AttributeValue::S("hello".to_string())
        );
        assert_eq!(
            json_to_attribute(json!(42)).unwrap(),
            AttributeValue::N("42".to_string())
        );
        assert_eq!(
            json_to_attribute(json!(true)).unwrap(),
            AttributeValue::Bool(true)
        );
        assert_eq!(
            json_to_attribute(json!(null)).unwrap(),
            AttributeValue::Null(true)
        );
    }

    #[test]
    fn test_json_to_attribute_nested() {
        let attr = json_to_attribute(json!({"ids": ["e_1", "e_2"], "count": 2})).unwrap();

        let AttributeValue::M(map) = attr else {
            panic!("expected a map attribute");
        };
        assert_eq!(
            map["ids"],
            AttributeValue::L(vec![
                AttributeValue::S("e_1".to_string()),
                AttributeValue::S("e_2".to_string()),
            ])
        );
        assert_eq!(map["count"], AttributeValue::N("2".to_string()));
    }

    #[test]
    fn test_record_item_has_composite_key() {
        let record = LiveRecord::Unit(crate::domain::UnitLive {
            unit_id: "u_1".to_string(),
            title: "Intro".to_string(),
            content: String::new(),
            episode_ids: vec!["e_1".to_string()],
            episode_fq_ids: vec!["u_1#e_1".to_string()],
            updated_at: 1_700_000_000,
        });

        let item = DynamoLiveRegistry::to_item(&record).unwrap();
        assert_eq!(item["PK"], AttributeValue::S("UNIT#u_1".to_string()));
        assert_eq!(item["SK"], AttributeValue::S("LIVE".to_string()));
        assert_eq!(
            item["entityType"],
            AttributeValue::S("UNIT_LIVE".to_string())
        );
    }
}
