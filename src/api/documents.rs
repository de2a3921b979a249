//! Client for the `/documents` collection

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::api::{ApiClient, ApiError, RemoteResource};
use crate::models::{Document, DocumentEdit, NewDocument, Record};

#[derive(Debug, Clone)]
pub struct DocumentsApi {
    client: ApiClient,
}

impl DocumentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn item_path(id: u64) -> String {
        format!("{}/{}", Document::COLLECTION, id)
    }

    fn upload_form(draft: NewDocument) -> Form {
        let part = Part::bytes(draft.file.bytes).file_name(draft.file.file_name);
        Form::new()
            .text("name", draft.name)
            .text("description", draft.description)
            .part("file", part)
    }

    fn edit_form(changes: DocumentEdit) -> Form {
        Form::new()
            .text("name", changes.name)
            .text("description", changes.description)
    }
}

#[async_trait]
impl RemoteResource for DocumentsApi {
    type Record = Document;
    type Draft = NewDocument;
    type Changes = DocumentEdit;

    async fn list(&self) -> Result<Vec<Document>, ApiError> {
        self.client.fetch_json(self.client.get(Document::COLLECTION)).await
    }

    async fn create(&self, draft: NewDocument) -> Result<Document, ApiError> {
        let request = self
            .client
            .post(Document::COLLECTION)
            .multipart(Self::upload_form(draft));
        self.client.fetch_json(request).await
    }

    async fn update(&self, id: u64, changes: DocumentEdit) -> Result<Document, ApiError> {
        let request = self
            .client
            .put(&Self::item_path(id))
            .multipart(Self::edit_form(changes));
        self.client.fetch_json(request).await
    }

    async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.fetch_empty(self.client.delete(&Self::item_path(id))).await
    }
}
