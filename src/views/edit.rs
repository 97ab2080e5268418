use log::warn;

use super::router::Route;
use crate::client::{BushoClient, GraphqlTransport};
use crate::models::department::Department;

/// Id queried when creating. Whatever the query returns, a create form
/// starts blank.
pub const SENTINEL_ID: &str = "^";

pub const REQUIRED_MESSAGE: &str = "Please enter a value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    /// Id field is locked.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPhase {
    Loading,
    Editing(EditMode),
    Submitting(EditMode),
    Done,
    Failed {
        mode: Option<EditMode>,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct EditView {
    route_id: Option<String>,
    id: String,
    name: String,
    id_error: Option<&'static str>,
    name_error: Option<&'static str>,
    phase: EditPhase,
}

impl EditView {
    pub fn new(route_id: Option<String>) -> Self {
        EditView {
            route_id,
            id: String::new(),
            name: String::new(),
            id_error: None,
            name_error: None,
            phase: EditPhase::Loading,
        }
    }

    pub fn for_route(route: &Route) -> Self {
        Self::new(route.edit_id().map(str::to_string))
    }

    pub fn phase(&self) -> &EditPhase {
        &self.phase
    }

    pub fn mode(&self) -> Option<EditMode> {
        match &self.phase {
            EditPhase::Editing(mode) | EditPhase::Submitting(mode) => Some(*mode),
            EditPhase::Failed { mode, .. } => *mode,
            EditPhase::Loading | EditPhase::Done => None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_error(&self) -> Option<&'static str> {
        self.id_error
    }

    pub fn name_error(&self) -> Option<&'static str> {
        self.name_error
    }

    pub fn id_locked(&self) -> bool {
        self.mode() == Some(EditMode::Update)
    }

    pub fn query_id(&self) -> &str {
        self.route_id.as_deref().unwrap_or(SENTINEL_ID)
    }

    /// Fetches the record named by the route. A hit pre-fills the form in
    /// update mode; no hit leaves it blank in create mode.
    pub async fn load<T: GraphqlTransport>(&mut self, client: &BushoClient<T>) {
        self.phase = EditPhase::Loading;
        let fetched = client.fetch(Some(self.query_id())).await;
        match fetched {
            Ok(records) => self.apply_loaded(records),
            Err(err) => {
                warn!("loading busho {} failed: {}", self.query_id(), err);
                self.phase = EditPhase::Failed {
                    mode: None,
                    message: err.to_string(),
                };
            }
        }
    }

    /// Without a route id the form is always a blank create form, even if a
    /// record happens to be stored under the sentinel id.
    fn apply_loaded(&mut self, records: Vec<Department>) {
        if self.route_id.is_none() {
            self.phase = EditPhase::Editing(EditMode::Create);
            return;
        }
        match records.into_iter().next() {
            Some(found) => {
                self.id = found.id;
                self.name = found.name;
                self.phase = EditPhase::Editing(EditMode::Update);
            }
            None => self.phase = EditPhase::Editing(EditMode::Create),
        }
    }

    /// Ignored once the id is locked.
    pub fn set_id(&mut self, value: impl Into<String>) {
        if !self.id_locked() {
            self.id = value.into();
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    /// Clears previous field errors, then flags every empty field.
    pub fn validate(&mut self) -> bool {
        self.id_error = self.id.is_empty().then_some(REQUIRED_MESSAGE);
        self.name_error = self.name.is_empty().then_some(REQUIRED_MESSAGE);
        self.id_error.is_none() && self.name_error.is_none()
    }

    /// Sends the add or update mutation for the current mode. Returns the
    /// route to navigate to, or `None` when the view stays on screen
    /// (validation failed, request failed, or nothing to submit yet).
    pub async fn submit<T: GraphqlTransport>(&mut self, client: &BushoClient<T>) -> Option<Route> {
        let mode = match &self.phase {
            EditPhase::Editing(mode) => *mode,
            EditPhase::Failed { mode: Some(mode), .. } => *mode,
            _ => return None,
        };
        if !self.validate() {
            self.phase = EditPhase::Editing(mode);
            return None;
        }

        self.phase = EditPhase::Submitting(mode);
        let result = match mode {
            EditMode::Create => client.add(&self.id, &self.name).await,
            EditMode::Update => client.update(&self.id, &self.name).await,
        };
        match result {
            Ok(_) => {
                self.phase = EditPhase::Done;
                Some(Route::List)
            }
            Err(err) => {
                warn!("saving busho {} failed: {}", self.id, err);
                self.phase = EditPhase::Failed {
                    mode: Some(mode),
                    message: err.to_string(),
                };
                None
            }
        }
    }

    pub fn back(&self) -> Route {
        Route::List
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_route_queries_with_sentinel() {
        let view = EditView::for_route(&Route::Create);
        assert_eq!(view.query_id(), SENTINEL_ID);
        let view = EditView::for_route(&Route::Update("10".into()));
        assert_eq!(view.query_id(), "10");
    }

    #[test]
    fn found_record_locks_id() {
        let mut view = EditView::new(Some("10".into()));
        view.apply_loaded(vec![Department::new("10", "Sales")]);
        assert_eq!(view.phase(), &EditPhase::Editing(EditMode::Update));
        assert!(view.id_locked());
        view.set_id("99");
        assert_eq!(view.id(), "10");
        view.set_name("Marketing");
        assert_eq!(view.name(), "Marketing");
    }

    #[test]
    fn empty_result_starts_blank_create() {
        let mut view = EditView::new(None);
        view.apply_loaded(Vec::new());
        assert_eq!(view.mode(), Some(EditMode::Create));
        assert!(!view.id_locked());
        assert_eq!(view.id(), "");
    }

    #[test]
    fn create_route_ignores_record_under_sentinel() {
        let mut view = EditView::new(None);
        view.apply_loaded(vec![Department::new(SENTINEL_ID, "Caret")]);
        assert_eq!(view.phase(), &EditPhase::Editing(EditMode::Create));
        assert!(!view.id_locked());
        assert_eq!(view.id(), "");
        assert_eq!(view.name(), "");
    }

    #[test]
    fn validation_flags_each_empty_field() {
        let mut view = EditView::new(None);
        view.apply_loaded(Vec::new());
        assert!(!view.validate());
        assert_eq!(view.id_error(), Some(REQUIRED_MESSAGE));
        assert_eq!(view.name_error(), Some(REQUIRED_MESSAGE));

        view.set_id("10");
        assert!(!view.validate());
        assert_eq!(view.id_error(), None);
        assert_eq!(view.name_error(), Some(REQUIRED_MESSAGE));

        view.set_name("Sales");
        assert!(view.validate());
        assert_eq!(view.name_error(), None);
    }
}
