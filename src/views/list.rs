use log::warn;

use super::router::Route;
use super::LoadState;
use crate::client::{BushoClient, GraphqlTransport};
use crate::errors::ClientError;
use crate::models::department::Department;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Confirmation shown before a row is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: String,
    pub name: String,
}

impl DeletePrompt {
    pub fn message(&self) -> String {
        format!(
            "Department ID: {}\nDepartment name: {}\nDelete this department?",
            self.id, self.name
        )
    }
}

/// The department table with its search box.
///
/// `filter_input` is what the user typed; it only reaches the query once
/// `search` commits it to `search_cond`.
#[derive(Debug, Clone)]
pub struct ListView {
    filter_input: String,
    search_cond: String,
    rows: Vec<Department>,
    table_filter: String,
    sort: Option<(SortColumn, SortOrder)>,
    state: LoadState,
}

impl Default for ListView {
    fn default() -> Self {
        ListView {
            filter_input: String::new(),
            search_cond: String::new(),
            rows: Vec::new(),
            table_filter: String::new(),
            sort: None,
            state: LoadState::Loading,
        }
    }
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter_input(&self) -> &str {
        &self.filter_input
    }

    pub fn set_filter_input(&mut self, value: impl Into<String>) {
        self.filter_input = value.into();
    }

    pub fn search(&mut self) {
        self.search_cond = self.filter_input.clone();
    }

    pub fn search_cond(&self) -> &str {
        &self.search_cond
    }

    /// Id sent with the list query; an empty condition fetches everything.
    pub fn query_id(&self) -> Option<&str> {
        if self.search_cond.is_empty() {
            None
        } else {
            Some(&self.search_cond)
        }
    }

    /// Re-issues the list query. Rows from the previous fetch stay in place
    /// until the new result arrives.
    pub async fn refresh<T: GraphqlTransport>(&mut self, client: &BushoClient<T>) {
        self.state = LoadState::Loading;
        let fetched = client.fetch(self.query_id()).await;
        match fetched {
            Ok(rows) => {
                self.rows = rows;
                self.state = LoadState::Ready;
            }
            Err(err) => {
                warn!("list refresh failed: {}", err);
                self.state = LoadState::Failed(err.to_string());
            }
        }
    }

    pub fn set_table_filter(&mut self, value: impl Into<String>) {
        self.table_filter = value.into();
    }

    /// Clicking a column header: first ascending, then it flips.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortOrder::Ascending)) if current == column => {
                Some((column, SortOrder::Descending))
            }
            _ => Some((column, SortOrder::Ascending)),
        };
    }

    pub fn sort(&self) -> Option<(SortColumn, SortOrder)> {
        self.sort
    }

    /// Rows as displayed: table filter applied, then sorted.
    pub fn visible_rows(&self) -> Vec<&Department> {
        let needle = self.table_filter.to_lowercase();
        let mut rows: Vec<&Department> = self
            .rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || row.id.to_lowercase().contains(&needle)
                    || row.name.to_lowercase().contains(&needle)
            })
            .collect();

        if let Some((column, order)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = match column {
                    SortColumn::Id => a.id.cmp(&b.id),
                    SortColumn::Name => a.name.cmp(&b.name),
                };
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn row(&self, index: usize) -> Option<&Department> {
        self.visible_rows().get(index).copied()
    }

    pub fn prompt_delete(&self, index: usize) -> Option<DeletePrompt> {
        self.row(index).map(|row| DeletePrompt {
            id: row.id.clone(),
            name: row.name.clone(),
        })
    }

    /// Deletes the prompted row when confirmed, then refreshes the table.
    /// A declined prompt changes nothing.
    pub async fn confirm_delete<T: GraphqlTransport>(
        &mut self,
        client: &BushoClient<T>,
        prompt: &DeletePrompt,
        confirmed: bool,
    ) -> Result<(), ClientError> {
        if !confirmed {
            return Ok(());
        }
        client.delete(&prompt.id).await?;
        self.refresh(client).await;
        Ok(())
    }

    pub fn edit_route(&self, index: usize) -> Option<Route> {
        self.row(index).map(|row| Route::Update(row.id.clone()))
    }

    pub fn new_route(&self) -> Route {
        Route::Create
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(rows: &[(&str, &str)]) -> ListView {
        ListView {
            rows: rows.iter().map(|(id, name)| Department::new(*id, *name)).collect(),
            state: LoadState::Ready,
            ..ListView::default()
        }
    }

    fn ids(view: &ListView) -> Vec<&str> {
        view.visible_rows().iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn typing_does_not_change_query_until_search() {
        let mut view = ListView::new();
        view.set_filter_input("10");
        assert_eq!(view.query_id(), None);
        view.search();
        assert_eq!(view.query_id(), Some("10"));
        view.set_filter_input("");
        view.search();
        assert_eq!(view.query_id(), None);
    }

    #[test]
    fn sort_toggles_between_orders() {
        let mut view = loaded(&[("20", "Legal"), ("10", "Sales"), ("30", "IT")]);
        assert_eq!(ids(&view), vec!["20", "10", "30"]);
        view.toggle_sort(SortColumn::Id);
        assert_eq!(ids(&view), vec!["10", "20", "30"]);
        view.toggle_sort(SortColumn::Id);
        assert_eq!(ids(&view), vec!["30", "20", "10"]);
        view.toggle_sort(SortColumn::Name);
        assert_eq!(ids(&view), vec!["30", "20", "10"]);
        assert_eq!(view.sort(), Some((SortColumn::Name, SortOrder::Ascending)));
    }

    #[test]
    fn table_filter_matches_id_or_name() {
        let mut view = loaded(&[("10", "Sales"), ("20", "Legal"), ("31", "IT")]);
        view.set_table_filter("sal");
        assert_eq!(ids(&view), vec!["10"]);
        view.set_table_filter("1");
        assert_eq!(ids(&view), vec!["10", "31"]);
    }

    #[test]
    fn row_actions_follow_visible_order() {
        let mut view = loaded(&[("20", "Legal"), ("10", "Sales")]);
        view.toggle_sort(SortColumn::Id);
        assert_eq!(view.edit_route(0), Some(Route::Update("10".into())));
        let prompt = view.prompt_delete(1).unwrap();
        assert_eq!(prompt.id, "20");
        assert!(prompt.message().contains("Legal"));
        assert_eq!(view.prompt_delete(5), None);
        assert_eq!(view.new_route(), Route::Create);
    }
}
