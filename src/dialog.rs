//! Create/edit form dialog
//!
//! The dialog is closed, or open in create or edit mode. It keeps a draft of
//! the form (the resource's update schema), one preview per file field and the
//! field errors of the last submission.

use crate::crud::CrudModule;
use crate::error::{unsupported, AdminError, AdminResult};
use crate::models::Upload;
use crate::resource::Resource;
use crate::validation::FieldErrors;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// What a file input currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePreview {
    Empty,
    /// URL of the file already stored on the server
    Remote(String),
    /// `data:` URL of a newly selected file
    Local(String),
}

#[derive(Debug, Clone)]
pub enum DialogMode<T> {
    Create,
    Edit(T),
}

pub struct FormDialog<R: Resource> {
    mode: Option<DialogMode<R::Record>>,
    draft: R::Update,
    previews: BTreeMap<&'static str, FilePreview>,
    /// Files picked through `select_file`; never serialized with the draft
    files: BTreeMap<&'static str, Upload>,
    errors: FieldErrors,
}

impl<R: Resource> Default for FormDialog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> FormDialog<R> {
    pub fn new() -> Self {
        Self {
            mode: None,
            draft: R::Update::default(),
            previews: BTreeMap::new(),
            files: BTreeMap::new(),
            errors: FieldErrors::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<&DialogMode<R::Record>> {
        self.mode.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Some(DialogMode::Edit(_)))
    }

    pub fn title(&self) -> String {
        match self.mode {
            Some(DialogMode::Edit(_)) => format!("Edit {}", R::LABEL),
            _ => format!("Create {}", R::LABEL),
        }
    }

    pub fn draft(&self) -> &R::Update {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Update {
        &mut self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn preview(&self, field: &str) -> &FilePreview {
        self.previews.get(field).unwrap_or(&FilePreview::Empty)
    }

    pub fn open_create(&mut self) {
        self.reset();
        self.mode = Some(DialogMode::Create);
    }

    pub fn open_edit(&mut self, record: R::Record) {
        self.reset();
        self.draft = R::edit_draft(&record);
        for &field in R::FILE_FIELDS {
            if let Some(url) = R::remote_file(&record, field) {
                self.previews.insert(field, FilePreview::Remote(url));
            }
        }
        self.mode = Some(DialogMode::Edit(record));
    }

    pub fn close(&mut self) {
        self.reset();
        self.mode = None;
    }

    fn reset(&mut self) {
        self.draft = R::Update::default();
        self.previews.clear();
        self.files.clear();
        self.errors = FieldErrors::new();
    }

    fn file_field(field: &str) -> AdminResult<&'static str> {
        R::FILE_FIELDS
            .iter()
            .find(|f| **f == field)
            .copied()
            .ok_or_else(|| unsupported(format!("{} has no file field '{}'", R::LABEL, field)))
    }

    /// Attach a file to the draft and preview it locally.
    pub fn select_file(&mut self, field: &str, file: Upload) -> AdminResult<()> {
        let field = Self::file_field(field)?;
        let preview = FilePreview::Local(file.to_data_url());
        if !R::set_file(&mut self.draft, field, Some(file.clone())) {
            return Err(unsupported(format!("{} cannot store file '{}'", R::LABEL, field)));
        }
        self.files.insert(field, file);
        self.previews.insert(field, preview);
        Ok(())
    }

    /// Drop the selected file; the preview falls back to the stored one.
    pub fn remove_file(&mut self, field: &str) -> AdminResult<()> {
        let field = Self::file_field(field)?;
        R::set_file(&mut self.draft, field, None);
        self.files.remove(field);
        let remote = match &self.mode {
            Some(DialogMode::Edit(record)) => R::remote_file(record, field),
            _ => None,
        };
        match remote {
            Some(url) => self.previews.insert(field, FilePreview::Remote(url)),
            None => self.previews.remove(field),
        };
        Ok(())
    }

    /// The part of the draft that differs from what `open_edit` pre-filled,
    /// plus any newly selected files. Cleared fields are left out.
    pub fn changed_fields(&self, record: &R::Record) -> AdminResult<R::Update> {
        let original = serde_json::to_value(R::edit_draft(record))?;
        let changed: Map<String, Value> = match serde_json::to_value(&self.draft)? {
            Value::Object(fields) => fields
                .into_iter()
                .filter(|(name, value)| !value.is_null() && original.get(name) != Some(value))
                .collect(),
            _ => Map::new(),
        };
        let mut update: R::Update = serde_json::from_value(Value::Object(changed))?;
        for (field, file) in &self.files {
            R::set_file(&mut update, field, Some(file.clone()));
        }
        Ok(update)
    }

    /// Validate and send the draft. On success the dialog closes.
    /// Edits only carry the fields that changed.
    pub async fn submit(&mut self, module: &CrudModule<R>) -> AdminResult<R::Record> {
        let edit = match &self.mode {
            None => return Err(unsupported("The dialog is not open")),
            Some(DialogMode::Create) => None,
            Some(DialogMode::Edit(record)) => Some((R::id(record), self.changed_fields(record)?)),
        };
        if module.is_saving() {
            return Err(AdminError::Busy);
        }

        self.errors = FieldErrors::new();
        let result = match edit {
            Some((id, changes)) => module.update(id, changes).await,
            None => module.create(R::Create::from(self.draft.clone())).await,
        };

        match result {
            Ok(record) => {
                self.close();
                Ok(record)
            }
            Err(AdminError::Validation(errors)) => {
                debug!(resource = R::NAME, %errors, "Form has invalid fields");
                self.errors = errors.clone();
                Err(AdminError::Validation(errors))
            }
            Err(err) => Err(err),
        }
    }
}
