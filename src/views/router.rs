use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/edit`
    Create,
    /// `/edit/:id`
    Update(String),
}

impl Route {
    /// Anything that is not `/edit` or `/edit/:id` lands on the list.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
        match segments.as_slice() {
            ["edit"] => Route::Create,
            ["edit", id] => Route::Update((*id).to_string()),
            _ => Route::List,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Create => "/edit".to_string(),
            Route::Update(id) => format!("/edit/{}", id),
        }
    }

    pub fn edit_id(&self) -> Option<&str> {
        match self {
            Route::Update(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_routes() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse("/edit"), Route::Create);
        assert_eq!(Route::parse("/edit/"), Route::Create);
        assert_eq!(Route::parse("/edit/10"), Route::Update("10".into()));
        assert_eq!(Route::parse("/edit/10?tab=1"), Route::Update("10".into()));
    }

    #[test]
    fn unmatched_paths_redirect_to_list() {
        assert_eq!(Route::parse("/list"), Route::List);
        assert_eq!(Route::parse("/edit/10/extra"), Route::List);
        assert_eq!(Route::parse("nowhere"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
    }

    #[test]
    fn path_is_inverse_of_parse() {
        for route in [Route::List, Route::Create, Route::Update("A-1".into())] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
