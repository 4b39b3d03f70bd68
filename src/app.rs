use crate::domain::datetime::{self, combine};
use crate::domain::{
    parse_coordinate, validate, Draft, FieldEdit, InvalidReason, Location, NewTask, TaskId,
    TaskRecord, ValidationResult, ValidationRules,
};
use crate::persistence::BlobStore;
use crate::store::{StoreError, TaskListCache, TaskStore};
use thiserror::Error;

/// Which flow a form session commits through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

/// Where a form session is in the save pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Combining,
    Committing,
    /// Terminal: the record is stored and the cache refreshed
    Done,
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// User input problem; the draft is kept for correction
    #[error("{}", .0.message())]
    Invalid(InvalidReason),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("This form has already been saved")]
    AlreadyCommitted,
}

/// Result of a successful save; the caller should leave the form
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub record: TaskRecord,
    pub mode: FormMode,
}

/// One open create/edit form and the draft it holds.
///
/// The draft lives exactly as long as the session: it starts when the form
/// opens and ends at [`FormPhase::Done`] or when the session is dropped.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    draft: Draft,
    phase: FormPhase,
    rules: ValidationRules,
}

impl FormSession {
    /// Session for the create form, with its defaults filled in
    pub fn create(now: datetime::Timestamp, rules: ValidationRules) -> Self {
        Self::with_draft(FormMode::Create, Draft::for_new(now), rules)
    }

    /// Session for editing an existing record
    pub fn edit(record: &TaskRecord, rules: ValidationRules) -> Self {
        Self::with_draft(FormMode::Edit(record.id), Draft::from_record(record), rules)
    }

    pub fn with_draft(mode: FormMode, draft: Draft, rules: ValidationRules) -> Self {
        Self {
            mode,
            draft,
            phase: FormPhase::Editing,
            rules,
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), SaveError> {
        if self.phase == FormPhase::Done {
            return Err(SaveError::AlreadyCommitted);
        }
        self.draft.apply(edit);
        Ok(())
    }

    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = FieldEdit>) -> Result<(), SaveError> {
        for edit in edits {
            self.apply(edit)?;
        }
        Ok(())
    }

    /// Validate, combine and commit the draft, then refresh `cache`.
    ///
    /// On any failure the session goes back to editing with the draft intact
    /// and neither the store nor the cache has changed.
    pub fn submit<B: BlobStore>(
        &mut self,
        store: &TaskStore<B>,
        cache: &mut TaskListCache,
    ) -> Result<SaveOutcome, SaveError> {
        if self.phase == FormPhase::Done {
            return Err(SaveError::AlreadyCommitted);
        }

        self.phase = FormPhase::Submitting;
        if let ValidationResult::Invalid(reason) = validate(&self.draft, &self.rules) {
            return Err(self.reject(reason));
        }

        self.phase = FormPhase::Combining;
        let task = match combine_draft(&self.draft) {
            Ok(task) => task,
            Err(reason) => return Err(self.reject(reason)),
        };

        self.phase = FormPhase::Committing;
        let record = match self.commit(store, cache, task) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "task was not saved");
                self.phase = FormPhase::Editing;
                return Err(SaveError::Store(err));
            }
        };

        cache.refresh(store);
        self.phase = FormPhase::Done;
        Ok(SaveOutcome {
            record,
            mode: self.mode,
        })
    }

    fn reject(&mut self, reason: InvalidReason) -> SaveError {
        tracing::debug!(?reason, "draft rejected");
        self.phase = FormPhase::Editing;
        SaveError::Invalid(reason)
    }

    fn commit<B: BlobStore>(
        &self,
        store: &TaskStore<B>,
        cache: &mut TaskListCache,
        task: NewTask,
    ) -> Result<TaskRecord, StoreError> {
        match self.mode {
            FormMode::Create => store.create(task),
            FormMode::Edit(id) => {
                if cache.is_stale(store) {
                    cache.refresh(store);
                }
                // Existence check only; the store resolves the id again under its lock
                cache.find_index_by_id(id)?;
                store.update(id, task)
            }
        }
    }
}

/// Fold a validated draft into the canonical task shape
fn combine_draft(draft: &Draft) -> Result<NewTask, InvalidReason> {
    let missing = InvalidReason::MissingFields;
    let bad_coordinates = InvalidReason::InvalidCoordinates;

    Ok(NewTask {
        name: draft.name.trim().to_string(),
        description: draft.description.trim().to_string(),
        status: draft.status.ok_or(missing)?,
        priority: draft.priority.ok_or(missing)?,
        start_date: combine(draft.start_date, draft.start_time).ok_or(missing)?,
        due_date: combine(draft.due_date, draft.due_time).ok_or(missing)?,
        location: Location {
            latitude: parse_coordinate(&draft.latitude).ok_or(bad_coordinates)?,
            longitude: parse_coordinate(&draft.longitude).ok_or(bad_coordinates)?,
        },
    })
}

/// Task store plus the cached list screens render from
pub struct App<B> {
    pub store: TaskStore<B>,
    pub cache: TaskListCache,
    rules: ValidationRules,
}

impl<B: BlobStore> App<B> {
    /// Load the store and build an in-sync cache
    pub fn open(backend: B, key: impl Into<String>, rules: ValidationRules) -> Result<Self, StoreError> {
        let store = TaskStore::open(backend, key)?;
        let cache = TaskListCache::load(&store);
        Ok(Self { store, cache, rules })
    }

    /// Tasks as last refreshed
    pub fn tasks(&self) -> &[TaskRecord] {
        self.cache.list()
    }

    pub fn find(&self, id: TaskId) -> Result<&TaskRecord, StoreError> {
        self.cache.get(id).ok_or(StoreError::NotFound(id))
    }

    pub fn start_create(&self) -> FormSession {
        FormSession::create(datetime::now(), self.rules)
    }

    pub fn start_edit(&self, id: TaskId) -> Result<FormSession, StoreError> {
        Ok(FormSession::edit(self.find(id)?, self.rules))
    }

    pub fn save(&mut self, session: &mut FormSession) -> Result<SaveOutcome, SaveError> {
        session.submit(&self.store, &mut self.cache)
    }

    /// Delete through the store, then refresh the cache
    pub fn delete(&mut self, id: TaskId) -> Result<TaskRecord, StoreError> {
        let removed = self.store.delete(id)?;
        self.cache.refresh(&self.store);
        Ok(removed)
    }
}
