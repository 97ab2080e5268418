use log::debug;

use super::edit::EditView;
use super::list::{DeletePrompt, ListView};
use super::router::Route;
use crate::client::{BushoClient, GraphqlTransport};
use crate::errors::ClientError;

#[derive(Debug, Clone)]
pub enum Screen {
    List(ListView),
    Edit(EditView),
}

/// Owns the client and the current screen.
///
/// The list screen is kept while the edit screen is shown, so returning to
/// it shows the previous rows and search condition while it refetches.
pub struct App<T> {
    client: BushoClient<T>,
    route: Route,
    screen: Screen,
    parked_list: Option<ListView>,
}

impl<T: GraphqlTransport> App<T> {
    /// Starts on `/` and loads the list.
    pub async fn start(client: BushoClient<T>) -> Self {
        let mut app = App {
            client,
            route: Route::List,
            screen: Screen::List(ListView::new()),
            parked_list: None,
        };
        app.go(Route::List).await;
        app
    }

    pub fn client(&self) -> &BushoClient<T> {
        &self.client
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub async fn navigate(&mut self, path: &str) {
        self.go(Route::parse(path)).await;
    }

    pub async fn go(&mut self, route: Route) {
        debug!("navigate to {}", route);
        let next = match &route {
            Route::List => {
                let mut list = match std::mem::replace(&mut self.screen, Screen::List(ListView::new())) {
                    Screen::List(list) => list,
                    Screen::Edit(_) => self.parked_list.take().unwrap_or_default(),
                };
                list.refresh(&self.client).await;
                Screen::List(list)
            }
            Route::Create | Route::Update(_) => {
                if let Screen::List(list) = std::mem::replace(&mut self.screen, Screen::List(ListView::new())) {
                    self.parked_list = Some(list);
                }
                let mut edit = EditView::for_route(&route);
                edit.load(&self.client).await;
                Screen::Edit(edit)
            }
        };
        self.screen = next;
        self.route = route;
    }

    pub fn list_mut(&mut self) -> Option<&mut ListView> {
        match &mut self.screen {
            Screen::List(list) => Some(list),
            Screen::Edit(_) => None,
        }
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditView> {
        match &mut self.screen {
            Screen::Edit(edit) => Some(edit),
            Screen::List(_) => None,
        }
    }

    /// Commits the typed filter and refetches.
    pub async fn search(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            list.search();
            list.refresh(&self.client).await;
        }
    }

    pub async fn delete_row(&mut self, prompt: &DeletePrompt, confirmed: bool) -> Result<(), ClientError> {
        match &mut self.screen {
            Screen::List(list) => list.confirm_delete(&self.client, prompt, confirmed).await,
            Screen::Edit(_) => Ok(()),
        }
    }

    pub async fn edit_row(&mut self, index: usize) -> bool {
        let route = match &self.screen {
            Screen::List(list) => list.edit_route(index),
            Screen::Edit(_) => None,
        };
        match route {
            Some(route) => {
                self.go(route).await;
                true
            }
            None => false,
        }
    }

    /// Submits the edit form and goes back to the list when it was saved.
    pub async fn submit(&mut self) -> bool {
        let next = match &mut self.screen {
            Screen::Edit(edit) => edit.submit(&self.client).await,
            Screen::List(_) => None,
        };
        match next {
            Some(route) => {
                self.go(route).await;
                true
            }
            None => false,
        }
    }

    pub async fn back(&mut self) {
        self.go(Route::List).await;
    }
}
