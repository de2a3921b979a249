//! Client for the `/employees` collection

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::api::{ApiClient, ApiError, RemoteResource};
use crate::models::{Employee, NewEmployee, Record};

#[derive(Debug, Clone)]
pub struct EmployeesApi {
    client: ApiClient,
}

impl EmployeesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn item_path(id: u64) -> String {
        format!("{}/{}", Employee::COLLECTION, id)
    }
}

#[async_trait]
impl RemoteResource for EmployeesApi {
    type Record = Employee;
    type Draft = NewEmployee;
    /// Edits always send the full record
    type Changes = Employee;

    async fn list(&self) -> Result<Vec<Employee>, ApiError> {
        self.client.fetch_json(self.client.get(Employee::COLLECTION)).await
    }

    async fn create(&self, draft: NewEmployee) -> Result<Employee, ApiError> {
        let request = self
            .client
            .post(Employee::COLLECTION)
            .header(CONTENT_TYPE, "application/json")
            .json(&draft);
        self.client.fetch_json(request).await
    }

    async fn update(&self, id: u64, changes: Employee) -> Result<Employee, ApiError> {
        let request = self
            .client
            .put(&Self::item_path(id))
            .header(CONTENT_TYPE, "application/json")
            .json(&changes);
        self.client.fetch_json(request).await
    }

    async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.fetch_empty(self.client.delete(&Self::item_path(id))).await
    }
}
