//! Local mirror of a remote collection with a derived filtered view

use tracing::{info, warn};

use crate::api::{ApiError, Operation};
use crate::models::Record;
use crate::sync::filter::{filter_indices, FilterState, Filterable};
use crate::sync::submission::{StatusMessage, SubmitError, Submission};

/// Completion of a remote call, delivered back to the view that issued it
#[derive(Debug)]
pub enum SyncEvent<T> {
    Loaded(Result<Vec<T>, ApiError>),
    Created(Result<T, ApiError>),
    Updated { id: u64, result: Result<T, ApiError> },
    Removed { id: u64, result: Result<(), ApiError> },
}

/// What applying a [`SyncEvent`] did to the mirror
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Loaded(usize),
    Created(u64),
    Updated(u64),
    Removed(u64),
    Failed { operation: Operation, message: String },
    /// The call was not issued because another one is outstanding
    Busy,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SyncOutcome::Loaded(_) | SyncOutcome::Created(_) | SyncOutcome::Updated(_) | SyncOutcome::Removed(_)
        )
    }
}

/// Proof that the user confirmed deleting a record
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: u64,
}

impl DeleteConfirmation {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// In-memory copy of a remote collection.
///
/// Only acknowledged results change `items`; the filtered view is kept as
/// positions into `items` and recomputed after every change.
pub struct ResourceMirror<T: Record + Filterable> {
    items: Vec<T>,
    visible: Vec<usize>,
    filter: FilterState<T::Facets>,
    loading: bool,
    error: Option<String>,
    pending_delete: Option<u64>,
    writes: Submission,
}

impl<T: Record + Filterable> Default for ResourceMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + Filterable> ResourceMirror<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            filter: FilterState::default(),
            loading: false,
            error: None,
            pending_delete: None,
            writes: Submission::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Records passing the current filter, in mirror order
    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(move |&i| &self.items[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Record at a position of the filtered view
    pub fn filtered_get(&self, index: usize) -> Option<&T> {
        self.visible.get(index).and_then(|&i| self.items.get(i))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    pub fn facets(&self) -> &T::Facets {
        &self.filter.facets
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.refilter();
    }

    pub fn set_facets(&mut self, facets: T::Facets) {
        self.filter.facets = facets;
        self.refilter();
    }

    pub fn update_facets(&mut self, update: impl FnOnce(&mut T::Facets)) {
        update(&mut self.filter.facets);
        self.refilter();
    }

    /// Mark a load as started. Returns false when one is already running.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Claim the write path for a create, edit or delete
    pub fn begin_write(&mut self) -> Result<(), SubmitError> {
        self.writes.begin()
    }

    pub fn is_writing(&self) -> bool {
        self.writes.is_in_flight()
    }

    /// Outcome message of the last write
    pub fn write_message(&self) -> Option<&StatusMessage> {
        self.writes.message()
    }

    /// Ask for confirmation before deleting `id`. Returns false for unknown ids.
    pub fn request_delete(&mut self, id: u64) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<u64> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Option<DeleteConfirmation> {
        self.pending_delete.take().map(|id| DeleteConfirmation { id })
    }

    /// Fold a completed remote call into the mirror
    pub fn apply(&mut self, event: SyncEvent<T>) -> SyncOutcome {
        match event {
            SyncEvent::Loaded(result) => self.finish_load(result),
            SyncEvent::Created(Ok(record)) => {
                let id = record.id();
                info!("Created {} {}", T::NOUN, id);
                self.items.push(record);
                self.refilter();
                self.writes.succeed(format!("{} added", capitalized(T::NOUN)));
                SyncOutcome::Created(id)
            }
            SyncEvent::Created(Err(e)) => self.write_failed(Operation::Create, e),
            SyncEvent::Updated { id, result: Ok(record) } => {
                match self.items.iter_mut().find(|item| item.id() == id) {
                    Some(slot) => *slot = record,
                    None => warn!("Updated {} {} is no longer in the list", T::NOUN, id),
                }
                info!("Updated {} {}", T::NOUN, id);
                self.refilter();
                self.writes.succeed(format!("{} updated", capitalized(T::NOUN)));
                SyncOutcome::Updated(id)
            }
            SyncEvent::Updated { result: Err(e), .. } => self.write_failed(Operation::Update, e),
            SyncEvent::Removed { id, result: Ok(()) } => {
                self.items.retain(|item| item.id() != id);
                info!("Deleted {} {}", T::NOUN, id);
                self.refilter();
                self.writes.succeed(format!("{} deleted", capitalized(T::NOUN)));
                SyncOutcome::Removed(id)
            }
            SyncEvent::Removed { result: Err(e), .. } => self.write_failed(Operation::Delete, e),
        }
    }

    fn finish_load(&mut self, result: Result<Vec<T>, ApiError>) -> SyncOutcome {
        self.loading = false;
        match result {
            Ok(records) => {
                info!("Loaded {} {}", records.len(), T::COLLECTION);
                let count = records.len();
                self.items = records;
                self.error = None;
                self.refilter();
                SyncOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("Loading {} failed: {}", T::COLLECTION, e);
                let message = Operation::Load.failure_message::<T>();
                self.items.clear();
                self.error = Some(message.clone());
                self.refilter();
                SyncOutcome::Failed {
                    operation: Operation::Load,
                    message,
                }
            }
        }
    }

    fn write_failed(&mut self, operation: Operation, error: ApiError) -> SyncOutcome {
        warn!("{} {} failed: {}", capitalized(operation.as_str()), T::NOUN, error);
        let message = operation.failure_message::<T>();
        self.writes.fail(message.clone());
        SyncOutcome::Failed { operation, message }
    }

    fn refilter(&mut self) {
        self.visible = filter_indices(&self.items, &self.filter);
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
