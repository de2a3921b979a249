//! Drives a [`ResourceMirror`] against a [`RemoteResource`]

use tracing::warn;

use crate::api::RemoteResource;
use crate::sync::filter::Filterable;
use crate::sync::mirror::{DeleteConfirmation, ResourceMirror, SyncEvent, SyncOutcome};

/// A remote collection paired with the mirror that reflects it.
///
/// Each call awaits the remote service and folds the result into the mirror,
/// so the mirror only ever holds acknowledged state.
pub struct ResourceSync<R>
where
    R: RemoteResource,
    R::Record: Filterable,
{
    remote: R,
    mirror: ResourceMirror<R::Record>,
}

impl<R> ResourceSync<R>
where
    R: RemoteResource,
    R::Record: Filterable,
{
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            mirror: ResourceMirror::new(),
        }
    }

    pub fn mirror(&self) -> &ResourceMirror<R::Record> {
        &self.mirror
    }

    pub fn mirror_mut(&mut self) -> &mut ResourceMirror<R::Record> {
        &mut self.mirror
    }

    pub async fn load(&mut self) -> SyncOutcome {
        if !self.mirror.begin_load() {
            return SyncOutcome::Busy;
        }
        let result = self.remote.list().await;
        self.mirror.apply(SyncEvent::Loaded(result))
    }

    pub async fn create(&mut self, draft: R::Draft) -> SyncOutcome {
        if self.mirror.begin_write().is_err() {
            return SyncOutcome::Busy;
        }
        let result = self.remote.create(draft).await;
        self.mirror.apply(SyncEvent::Created(result))
    }

    pub async fn edit(&mut self, id: u64, changes: R::Changes) -> SyncOutcome {
        if self.mirror.begin_write().is_err() {
            return SyncOutcome::Busy;
        }
        let result = self.remote.update(id, changes).await;
        self.mirror.apply(SyncEvent::Updated { id, result })
    }

    pub async fn delete(&mut self, confirmation: DeleteConfirmation) -> SyncOutcome {
        if self.mirror.begin_write().is_err() {
            warn!("Delete of {} skipped, another write is in progress", confirmation.id());
            return SyncOutcome::Busy;
        }
        let id = confirmation.id();
        let result = self.remote.remove(id).await;
        self.mirror.apply(SyncEvent::Removed { id, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, DocumentsApi, EmployeesApi, Operation};
    use crate::config::Config;
    use crate::models::{AccessLevel, DocumentEdit, EmployeeFacets, EmployeeStatus, NewEmployee};

    const STAFF: &str = r#"[
        {"id": 1, "name": "Alice", "email": "alice@corp.io", "status": "approved", "access": "edit"},
        {"id": 2, "name": "Bob", "email": "bob@corp.io", "status": "blocked", "access": "view"}
    ]"#;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(&Config::default().with_api_url(Some(server.url()))).unwrap()
    }

    #[tokio::test]
    async fn test_employee_round_trip_against_remote() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/employees")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STAFF)
            .create_async()
            .await;
        let _delete = server
            .mock("DELETE", "/employees/1")
            .with_status(200)
            .with_body(r#"{"message": "Employee deleted"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut sync = ResourceSync::new(EmployeesApi::new(client_for(&server)));
        assert_eq!(sync.load().await, SyncOutcome::Loaded(2));

        sync.mirror_mut().set_query("ali");
        let visible: Vec<_> = sync.mirror().filtered().map(|e| e.name.as_str()).collect();
        assert_eq!(visible, vec!["Alice"]);

        sync.mirror_mut().set_query("");
        sync.mirror_mut().update_facets(|f: &mut EmployeeFacets| f.status = Some(EmployeeStatus::Blocked));
        let visible: Vec<_> = sync.mirror().filtered().map(|e| e.name.as_str()).collect();
        assert_eq!(visible, vec!["Bob"]);

        assert!(sync.mirror_mut().request_delete(1));
        let confirmation = sync.mirror_mut().confirm_delete().unwrap();
        assert_eq!(sync.delete(confirmation).await, SyncOutcome::Removed(1));
        assert_eq!(sync.mirror().items().len(), 1);
        assert_eq!(sync.mirror().items()[0].name, "Bob");
    }

    #[tokio::test]
    async fn test_rejected_create_does_not_touch_mirror() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/employees")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STAFF)
            .create_async()
            .await;
        let _create = server
            .mock("POST", "/employees")
            .with_status(400)
            .with_body(r#"{"error": "Name and Email are required"}"#)
            .create_async()
            .await;

        let mut sync = ResourceSync::new(EmployeesApi::new(client_for(&server)));
        sync.load().await;

        let outcome = sync
            .create(NewEmployee {
                name: String::new(),
                email: String::new(),
                status: EmployeeStatus::Approved,
                access: AccessLevel::View,
            })
            .await;

        assert_eq!(
            outcome,
            SyncOutcome::Failed {
                operation: Operation::Create,
                message: "Failed to add employee".to_string(),
            }
        );
        assert_eq!(sync.mirror().items().len(), 2);
        assert!(!sync.mirror().is_writing());
    }

    #[tokio::test]
    async fn test_document_edit_replaces_entry_with_acknowledged_record() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/documents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "name": "Handbook", "description": "v1", "status": "Active"},
                    {"id": 2, "name": "Policy", "description": "v1", "status": "Active"}
                ]"#,
            )
            .create_async()
            .await;
        let _put = server
            .mock("PUT", "/documents/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1, "name": "Handbook 2025", "description": "v2", "status": "Active"}"#)
            .create_async()
            .await;

        let mut sync = ResourceSync::new(DocumentsApi::new(client_for(&server)));
        sync.load().await;

        let outcome = sync
            .edit(
                1,
                DocumentEdit {
                    name: "Handbook 2025".to_string(),
                    description: "v2".to_string(),
                },
            )
            .await;

        assert_eq!(outcome, SyncOutcome::Updated(1));
        let items = sync.mirror().items();
        assert_eq!(items[0].name, "Handbook 2025");
        assert_eq!(items[0].description, "v2");
        assert_eq!(items[1].name, "Policy");
    }

    #[tokio::test]
    async fn test_failed_load_reports_error_state() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/documents")
            .with_status(503)
            .create_async()
            .await;

        let mut sync = ResourceSync::new(DocumentsApi::new(client_for(&server)));
        let outcome = sync.load().await;

        assert!(!outcome.is_success());
        assert!(sync.mirror().items().is_empty());
        assert_eq!(sync.mirror().error(), Some("Failed to fetch documents"));
        assert!(!sync.mirror().is_loading());
    }
}
