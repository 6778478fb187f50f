//! Upload of qualifying posts to a remote Bitable table.
//!
//! Every upload issues a fresh tenant access token and sends a single
//! `batch_create` request. Nothing is retried.

use crate::config::{Credentials, FieldNames, StoreConfig};
use crate::diagnostics::Diagnostics;
use crate::error::{HarvestError, Result};
use crate::filter::dedupe;
use crate::results::ExtractedRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

/// A table that accepts a batch of records in one call
#[allow(async_fn_in_trait)]
pub trait TabularStore {
    /// Inserts the records and returns how many were created
    async fn batch_create_records(&self, records: &[ExtractedRecord]) -> Result<usize>;
}

/// Result of a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub inserted: usize,
    pub duplicates_removed: usize,
}

/// Dedupes `records` by link and uploads what is left in a single batch
pub async fn submit<S: TabularStore>(
    store: &S,
    records: Vec<ExtractedRecord>,
    sink: &dyn Diagnostics,
) -> Result<Submission> {
    let deduped = dedupe(records);
    if deduped.removed > 0 {
        sink.info(&format!(
            "Removed {} duplicate posts before upload",
            deduped.removed
        ));
    }

    if deduped.records.is_empty() {
        sink.info("Nothing to upload");
        return Ok(Submission {
            inserted: 0,
            duplicates_removed: deduped.removed,
        });
    }

    sink.info(&format!(
        "Uploading {} posts to the remote table",
        deduped.records.len()
    ));
    let inserted = store.batch_create_records(&deduped.records).await?;
    sink.info(&format!("Saved {} posts to the remote table", inserted));

    Ok(Submission {
        inserted,
        duplicates_removed: deduped.removed,
    })
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
}

/// Body of a `batch_create` call
#[derive(Debug, Serialize)]
pub struct BatchCreateRequest {
    pub records: Vec<RecordPayload>,
}

#[derive(Debug, Serialize)]
pub struct RecordPayload {
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct BatchCreateResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<BatchCreateData>,
}

#[derive(Debug, Deserialize)]
struct BatchCreateData {
    #[serde(default)]
    records: Vec<Value>,
}

impl BatchCreateResponse {
    /// Number of records the table reports as created, or `sent` when the
    /// response carries no data
    fn inserted(&self, sent: usize) -> usize {
        self.data.as_ref().map_or(sent, |data| data.records.len())
    }
}

impl RecordPayload {
    /// Maps a record onto the table's title, link and like-count columns
    pub fn from_record(record: &ExtractedRecord, fields: &FieldNames) -> Self {
        let mut map = Map::new();
        map.insert(fields.title.clone(), Value::String(record.title.clone()));
        map.insert(
            fields.link.clone(),
            json!({
                "type": "url",
                "text": record.title,
                "url": record.link,
            }),
        );
        map.insert(
            fields.likes.clone(),
            Value::String(record.like_count.to_string()),
        );
        Self { fields: map }
    }
}

impl BatchCreateRequest {
    pub fn new(records: &[ExtractedRecord], fields: &FieldNames) -> Self {
        Self {
            records: records
                .iter()
                .map(|r| RecordPayload::from_record(r, fields))
                .collect(),
        }
    }
}

/// Bitable open API client
pub struct BitableClient {
    client: reqwest::Client,
    config: StoreConfig,
}

impl BitableClient {
    /// Creates a client; fails when any credential is blank
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.credentials()?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    fn token_url(&self) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), TOKEN_PATH)
    }

    fn batch_create_url(&self, credentials: &Credentials) -> String {
        format!(
            "{}/open-apis/bitable/v1/apps/{}/tables/{}/records/batch_create",
            self.config.api_base.trim_end_matches('/'),
            credentials.base_id,
            credentials.table_id
        )
    }

    /// Exchanges the app id and secret for a tenant access token
    pub async fn tenant_access_token(&self) -> Result<String> {
        let credentials = self.config.credentials()?;
        let resp = self
            .client
            .post(self.token_url())
            .json(&TokenRequest {
                app_id: credentials.app_id,
                app_secret: credentials.app_secret,
            })
            .send()
            .await?;

        let token: TokenResponse = resp.json().await?;
        match token.tenant_access_token {
            Some(token) if !token.is_empty() => {
                ::log::debug!("Obtained tenant access token");
                Ok(token)
            }
            _ => Err(HarvestError::Token(token.msg)),
        }
    }
}

impl TabularStore for BitableClient {
    async fn batch_create_records(&self, records: &[ExtractedRecord]) -> Result<usize> {
        let credentials = self.config.credentials()?;
        let token = self.tenant_access_token().await?;

        let body = BatchCreateRequest::new(records, &self.config.fields);
        ::log::debug!(
            "Sending {} records to table {}",
            body.records.len(),
            credentials.table_id
        );

        let resp = self
            .client
            .post(self.batch_create_url(&credentials))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let result: BatchCreateResponse = resp.json().await?;
        if result.code != 0 {
            return Err(HarvestError::Store {
                code: result.code,
                message: result.msg,
            });
        }

        Ok(result.inserted(records.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogBuffer;
    use std::sync::Mutex;

    /// Records every batch it receives; optionally rejects them
    #[derive(Default)]
    struct FakeStore {
        batches: Mutex<Vec<Vec<ExtractedRecord>>>,
        reject: bool,
    }

    impl TabularStore for FakeStore {
        async fn batch_create_records(&self, records: &[ExtractedRecord]) -> Result<usize> {
            self.batches.lock().unwrap().push(records.to_vec());
            if self.reject {
                return Err(HarvestError::Store {
                    code: 1254045,
                    message: "FieldNameNotFound".to_string(),
                });
            }
            Ok(records.len())
        }
    }

    fn record(link: &str, like_count: u64) -> ExtractedRecord {
        ExtractedRecord::new(
            "Coffee shops".to_string(),
            link.to_string(),
            like_count.to_string(),
            like_count,
        )
    }

    fn complete_store_config() -> StoreConfig {
        StoreConfig {
            app_id: "cli_a1".to_string(),
            app_secret: "secret".to_string(),
            base_id: "bascn1".to_string(),
            table_id: "tbl1".to_string(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_record_payload() {
        let payload = RecordPayload::from_record(
            &record("https://www.xiaohongshu.com/explore/abc123", 15000),
            &FieldNames::default(),
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "fields": {
                    "标题": "Coffee shops",
                    "链接": {
                        "type": "url",
                        "text": "Coffee shops",
                        "url": "https://www.xiaohongshu.com/explore/abc123"
                    },
                    "点赞数": "15000"
                }
            })
        );
    }

    #[test]
    fn test_batch_request_uses_custom_field_names() {
        let fields = FieldNames {
            title: "Title".to_string(),
            link: "Link".to_string(),
            likes: "Likes".to_string(),
        };
        let body = BatchCreateRequest::new(&[record("a", 1), record("b", 2)], &fields);
        let value = serde_json::to_value(&body).unwrap();

        let records = value["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["fields"]["Likes"], "2");
        assert_eq!(records[1]["fields"]["Link"]["url"], "b");
    }

    #[test]
    fn test_client_requires_credentials() {
        let result = BitableClient::new(StoreConfig::default());
        assert!(matches!(
            result,
            Err(HarvestError::IncompleteCredentials(_))
        ));
    }

    #[test]
    fn test_endpoint_urls() {
        let mut config = complete_store_config();
        config.api_base = "https://open.larksuite.com/".to_string();
        let client = BitableClient::new(config).unwrap();
        let credentials = client.config.credentials().unwrap();

        assert_eq!(
            client.token_url(),
            "https://open.larksuite.com/open-apis/auth/v3/tenant_access_token/internal"
        );
        assert_eq!(
            client.batch_create_url(&credentials),
            "https://open.larksuite.com/open-apis/bitable/v1/apps/bascn1/tables/tbl1/records/batch_create"
        );
    }

    #[test]
    fn test_batch_response_parsing() {
        let ok: BatchCreateResponse = serde_json::from_str(
            r#"{"code":0,"msg":"success","data":{"records":[{"record_id":"rec1"},{"record_id":"rec2"}]}}"#,
        )
        .unwrap();
        assert_eq!(ok.code, 0);
        assert_eq!(ok.data.unwrap().records.len(), 2);

        let failed: BatchCreateResponse =
            serde_json::from_str(r#"{"code":91402,"msg":"NOTEXIST"}"#).unwrap();
        assert_eq!(failed.code, 91402);
        assert_eq!(failed.msg, "NOTEXIST");
        assert!(failed.data.is_none());
    }

    #[test]
    fn test_inserted_count() {
        let created: BatchCreateResponse = serde_json::from_str(
            r#"{"code":0,"data":{"records":[{"record_id":"rec1"}]}}"#,
        )
        .unwrap();
        assert_eq!(created.inserted(3), 1);

        // Present but empty means nothing was created
        let empty: BatchCreateResponse =
            serde_json::from_str(r#"{"code":0,"data":{"records":[]}}"#).unwrap();
        assert_eq!(empty.inserted(3), 0);

        let missing: BatchCreateResponse = serde_json::from_str(r#"{"code":0}"#).unwrap();
        assert_eq!(missing.inserted(3), 3);
    }

    #[tokio::test]
    async fn test_submit_dedupes_before_upload() {
        let store = FakeStore::default();
        let sink = LogBuffer::new();
        let records = vec![record("a", 5000), record("b", 3000), record("a", 5000)];

        let submission = submit(&store, records, &sink).await.unwrap();

        assert_eq!(
            submission,
            Submission {
                inserted: 2,
                duplicates_removed: 1
            }
        );
        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        assert!(sink.contains("Removed 1 duplicate"));
    }

    #[tokio::test]
    async fn test_submit_skips_empty_batch() {
        let store = FakeStore::default();
        let sink = LogBuffer::new();

        let submission = submit(&store, Vec::new(), &sink).await.unwrap();

        assert_eq!(submission.inserted, 0);
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_propagates_store_failure_once() {
        let store = FakeStore {
            reject: true,
            ..FakeStore::default()
        };
        let sink = LogBuffer::new();

        let err = submit(&store, vec![record("a", 5000)], &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, HarvestError::Store { code: 1254045, .. }));
        assert_eq!(store.batches.lock().unwrap().len(), 1);
    }
}
