//! Resource pages
//!
//! A page wires a table, a form dialog and a delete confirmation to one
//! [`CrudModule`]. Collections use [`ResourcePage`]; resources with a single
//! record use [`SingletonPage`].

use crate::crud::CrudModule;
use crate::dialog::FormDialog;
use crate::error::{unsupported, AdminResult};
use crate::models::{ListPage, PageRequest, Pagination};
use crate::query::Query;
use crate::resource::Resource;
use tracing::info;
use uuid::Uuid;

/// Table column: header text and a cell renderer
pub struct Column<T> {
    pub header: &'static str,
    cell: fn(&T) -> String,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, cell: fn(&T) -> String) -> Self {
        Self { header, cell }
    }

    pub fn render(&self, row: &T) -> String {
        (self.cell)(row)
    }
}

/// Rendered table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn build<T>(columns: &[Column<T>], records: &[T]) -> Self {
        Self {
            headers: columns.iter().map(|c| c.header).collect(),
            rows: records
                .iter()
                .map(|r| columns.iter().map(|c| c.render(r)).collect())
                .collect(),
        }
    }

    /// Plain text rendition with padded columns.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let mut out = vec![
            text_line(&self.headers, &widths),
            rule.join("  "),
        ];
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            out.push(text_line(&cells, &widths));
        }
        out.join("\n")
    }
}

fn text_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Toggle,
    Delete,
}

/// Delete confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmModal {
    target: Option<(Uuid, String)>,
}

impl ConfirmModal {
    pub fn open(&mut self, id: Uuid, name: String) {
        self.target = Some((id, name));
    }

    pub fn close(&mut self) -> Option<Uuid> {
        self.target.take().map(|(id, _)| id)
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<Uuid> {
        self.target.as_ref().map(|(id, _)| *id)
    }

    pub fn message(&self) -> Option<String> {
        self.target.as_ref().map(|(_, name)| {
            format!("Are you sure you want to delete \"{}\"? This cannot be undone.", name)
        })
    }
}

pub struct ResourcePage<R: Resource> {
    module: CrudModule<R>,
    query: Query<ListPage<R::Record>>,
    page: PageRequest,
    pub dialog: FormDialog<R>,
    pub confirm: ConfirmModal,
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(module: CrudModule<R>, page_size: u32) -> Self {
        Self {
            query: module.observer(),
            module,
            page: PageRequest::new(1, page_size),
            dialog: FormDialog::new(),
            confirm: ConfirmModal::default(),
        }
    }

    pub fn module(&self) -> &CrudModule<R> {
        &self.module
    }

    pub fn query(&self) -> &Query<ListPage<R::Record>> {
        &self.query
    }

    fn page_param(&self) -> Option<PageRequest> {
        R::CAPABILITIES.paginated.then_some(self.page)
    }

    pub async fn load(&self) -> AdminResult<()> {
        self.module
            .load_admin(&self.query, self.page_param())
            .await
            .map(|_| ())
    }

    pub fn rows(&self) -> Vec<R::Record> {
        self.query.data().map(ListPage::into_items).unwrap_or_default()
    }

    pub fn table(&self) -> Table {
        Table::build(&R::columns(), &self.rows())
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.query.data().and_then(|page| page.pagination())
    }

    pub fn current_page(&self) -> PageRequest {
        self.page
    }

    pub async fn go_to_page(&mut self, page: u32) -> AdminResult<()> {
        if !R::CAPABILITIES.paginated {
            return Err(unsupported(format!("{} list is not paginated", R::LABEL)));
        }
        self.page = PageRequest::new(page, self.page.limit);
        self.load().await
    }

    pub async fn next_page(&mut self) -> AdminResult<bool> {
        match self.pagination() {
            Some(p) if p.has_next() => {
                self.go_to_page(self.page.next().page).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn prev_page(&mut self) -> AdminResult<bool> {
        match self.pagination() {
            Some(p) if p.has_prev() => {
                self.go_to_page(self.page.prev().page).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Row actions offered for this resource.
    pub fn actions(&self) -> Vec<RowAction> {
        let caps = R::CAPABILITIES;
        let mut actions = vec![RowAction::Edit];
        if caps.toggle {
            actions.push(RowAction::Toggle);
        }
        if caps.delete {
            actions.push(RowAction::Delete);
        }
        actions
    }

    pub fn open_create(&mut self) {
        self.dialog.open_create();
    }

    /// Edit opens the dialog, Toggle runs at once, Delete asks first.
    pub async fn trigger(&mut self, action: RowAction, id: Uuid) -> AdminResult<()> {
        if !self.actions().contains(&action) {
            return Err(unsupported(format!("{:?} is not available for {}", action, R::LABEL)));
        }
        match action {
            RowAction::Edit => {
                let record = match self.rows().into_iter().find(|r| R::id(r) == id) {
                    Some(record) => record,
                    None => self.module.fetch_detail(id).await?,
                };
                self.dialog.open_edit(record);
                Ok(())
            }
            RowAction::Toggle => {
                self.module.toggle(id).await?;
                self.load().await
            }
            RowAction::Delete => {
                let name = self
                    .rows()
                    .iter()
                    .find(|r| R::id(r) == id)
                    .map(R::display_name)
                    .unwrap_or_else(|| id.to_string());
                self.confirm.open(id, name);
                Ok(())
            }
        }
    }

    pub async fn confirm_delete(&mut self) -> AdminResult<()> {
        let Some(id) = self.confirm.close() else {
            return Ok(());
        };
        info!(resource = R::NAME, %id, "Deleting record");
        self.module.delete(id).await?;
        self.load().await
    }

    pub fn cancel_delete(&mut self) {
        self.confirm.close();
    }

    pub async fn submit_dialog(&mut self) -> AdminResult<R::Record> {
        let record = self.dialog.submit(&self.module).await?;
        self.load().await?;
        Ok(record)
    }

    pub async fn reorder(&self, ids: &[Uuid]) -> AdminResult<()> {
        self.module.reorder(ids).await?;
        self.load().await
    }
}

pub struct SingletonPage<R: Resource> {
    module: CrudModule<R>,
    query: Query<Option<R::Record>>,
    record: Option<R::Record>,
    pub dialog: FormDialog<R>,
}

impl<R: Resource> SingletonPage<R> {
    pub fn new(module: CrudModule<R>) -> Self {
        Self {
            query: module.observer(),
            module,
            record: None,
            dialog: FormDialog::new(),
        }
    }

    pub fn query(&self) -> &Query<Option<R::Record>> {
        &self.query
    }

    pub fn record(&self) -> Option<&R::Record> {
        self.record.as_ref()
    }

    /// Fetch the record; `None` means it has not been created yet.
    pub async fn load(&mut self) -> AdminResult<Option<&R::Record>> {
        self.record = self.module.load_current(&self.query).await?;
        Ok(self.record.as_ref())
    }

    /// Abort a load still in flight.
    pub fn cancel(&self) {
        self.query.cancel();
    }

    /// Edit the existing record, or create it when there is none.
    pub fn open_editor(&mut self) {
        match self.record.clone() {
            Some(record) => self.dialog.open_edit(record),
            None => self.dialog.open_create(),
        }
    }

    pub async fn submit(&mut self) -> AdminResult<R::Record> {
        let record = self.dialog.submit(&self.module).await?;
        self.record = Some(record.clone());
        Ok(record)
    }

    pub async fn toggle(&mut self) -> AdminResult<R::Record> {
        let id = self
            .record
            .as_ref()
            .map(R::id)
            .ok_or_else(|| unsupported(format!("There is no {} to toggle yet", R::LABEL)))?;
        let record = self.module.toggle(id).await?;
        self.record = Some(record.clone());
        Ok(record)
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match &self.record {
            Some(record) => R::columns()
                .iter()
                .map(|c| (c.header, c.render(record)))
                .collect(),
            None => Vec::new(),
        }
    }
}
