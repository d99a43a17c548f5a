use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{MentorProfile, ParticipantProfile};
use crate::services::store::{MentorDirectory, MentorFilter, ParticipantDirectory, StoreError};

/// Documents requested per page when reading a whole collection
const PAGE_SIZE: usize = 100;

/// Errors that can occur when reading from the document store
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct DocumentCollections {
    pub mentors: String,
    pub participants: String,
}

/// REST client for the program's document store
///
/// Reads mentor profiles and participant profiles. Collections are read page
/// by page until the store's reported total is reached. Documents that fail
/// to deserialize are skipped, so scorers only ever see well-typed records.
pub struct DocumentStoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: DocumentCollections,
}

impl DocumentStoreClient {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: DocumentCollections,
    ) -> Result<Self, DocumentStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    /// Fetch every mentor, optionally narrowed to one mentor type
    pub async fn list_mentors(
        &self,
        filter: &MentorFilter,
    ) -> Result<Vec<MentorProfile>, DocumentStoreError> {
        let mut queries = Vec::new();
        if let Some(mentor_type) = filter.mentor_type {
            queries.push(equal_query("mentorType", mentor_type.as_str()));
        }

        let documents = self.list_all_documents(&self.collections.mentors, &queries).await?;
        let total = documents.len();

        let mentors: Vec<MentorProfile> = parse_documents::<MentorProfile>(documents, "mentor")
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect();

        tracing::debug!("Fetched {} mentors ({} documents)", mentors.len(), total);

        Ok(mentors)
    }

    /// Fetch a participant's profile
    pub async fn get_participant(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantProfile, DocumentStoreError> {
        let queries = vec![equal_query("participantId", participant_id), "limit(1)".to_string()];
        let page = self
            .list_documents(&self.collections.participants, &queries)
            .await?;

        let doc = page.documents.into_iter().next().ok_or_else(|| {
            DocumentStoreError::NotFound(format!("Participant {} not found", participant_id))
        })?;

        parse_document(doc).map_err(|e| {
            DocumentStoreError::InvalidResponse(format!("Failed to parse participant: {}", e))
        })
    }

    /// Read every document matching `queries`, one page at a time
    ///
    /// Fails rather than returning a partial collection when the pages
    /// collected do not add up to the total the store reports.
    async fn list_all_documents(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<Vec<Value>, DocumentStoreError> {
        let mut documents: Vec<Value> = Vec::new();
        let mut total = None;

        loop {
            let mut page_queries = queries.to_vec();
            page_queries.push(format!("limit({})", PAGE_SIZE));
            page_queries.push(format!("offset({})", documents.len()));

            let page = self.list_documents(collection, &page_queries).await?;
            let page_len = page.documents.len();
            total = page.total.or(total);
            documents.extend(page.documents);

            if page_len < PAGE_SIZE || total.is_some_and(|t| documents.len() >= t) {
                break;
            }
        }

        if let Some(total) = total {
            if documents.len() != total {
                return Err(DocumentStoreError::InvalidResponse(format!(
                    "Read {} of {} documents from {}",
                    documents.len(),
                    total,
                    collection
                )));
            }
        }

        Ok(documents)
    }

    async fn list_documents(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<DocumentPage, DocumentStoreError> {
        let mut url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        );

        if !queries.is_empty() {
            let queries_json = serde_json::to_string(queries)
                .map_err(|e| DocumentStoreError::InvalidResponse(e.to_string()))?;
            url = format!("{}?query={}", url, urlencoding::encode(&queries_json));
        }

        tracing::debug!("Listing documents from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DocumentStoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to list {}: {} - {}", collection, status, body);
            return Err(DocumentStoreError::ApiError(format!(
                "Failed to list {}: {}",
                collection, status
            )));
        }

        let mut json: Value = response.json().await?;
        let total = json
            .get("total")
            .and_then(Value::as_u64)
            .and_then(|t| usize::try_from(t).ok());

        match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => Ok(DocumentPage { documents, total }),
            _ => Err(DocumentStoreError::InvalidResponse(
                "Missing documents array".into(),
            )),
        }
    }
}

/// One page of a document listing
struct DocumentPage {
    documents: Vec<Value>,
    total: Option<usize>,
}

/// `equal` query with the value quoted and escaped as a JSON string
fn equal_query(attribute: &str, value: &str) -> String {
    format!("equal(\"{}\", {})", attribute, Value::from(value))
}

#[async_trait]
impl MentorDirectory for DocumentStoreClient {
    async fn find_mentors(&self, filter: &MentorFilter) -> Result<Vec<MentorProfile>, StoreError> {
        Ok(self.list_mentors(filter).await?)
    }
}

#[async_trait]
impl ParticipantDirectory for DocumentStoreClient {
    async fn find_participant_profile(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantProfile, StoreError> {
        Ok(self.get_participant(participant_id).await?)
    }
}

/// Document payload lives under `data` in some store versions
fn parse_document<T: DeserializeOwned>(mut doc: Value) -> Result<T, serde_json::Error> {
    if doc.get("data").is_some_and(Value::is_object) {
        doc = doc["data"].take();
    }
    serde_json::from_value(doc)
}

fn parse_documents<T: DeserializeOwned>(documents: Vec<Value>, kind: &str) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match parse_document(doc) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed {} document: {}", kind, e);
                None
            }
        })
        .collect()
}
