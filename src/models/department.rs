use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of the store file.
#[derive(SimpleObject, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[graphql(name = "Busho")]
pub struct Department {
    pub id: String,
    pub name: String,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Department {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewDepartment {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct DepartmentUpdate {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct DepartmentKey {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
}

/// A validated change to the department list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BushoCommand {
    Add { id: String, name: String },
    Update { id: String, name: String },
    Delete { id: String },
}

/// What a command did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    AlreadyExists,
    NotFound,
}

impl From<NewDepartment> for BushoCommand {
    fn from(input: NewDepartment) -> Self {
        BushoCommand::Add {
            id: input.id,
            name: input.name,
        }
    }
}

impl From<DepartmentUpdate> for BushoCommand {
    fn from(input: DepartmentUpdate) -> Self {
        BushoCommand::Update {
            id: input.id,
            name: input.name,
        }
    }
}

impl From<DepartmentKey> for BushoCommand {
    fn from(input: DepartmentKey) -> Self {
        BushoCommand::Delete { id: input.id }
    }
}

impl BushoCommand {
    pub fn id(&self) -> &str {
        match self {
            BushoCommand::Add { id, .. }
            | BushoCommand::Update { id, .. }
            | BushoCommand::Delete { id } => id,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            BushoCommand::Add { .. } => "add",
            BushoCommand::Update { .. } => "update",
            BushoCommand::Delete { .. } => "delete",
        }
    }

    /// Applies the command in place. Insertion order is kept; update and
    /// delete touch every record with a matching id.
    pub fn apply(&self, records: &mut Vec<Department>) -> Outcome {
        match self {
            BushoCommand::Add { id, name } => {
                if records.iter().any(|item| &item.id == id) {
                    return Outcome::AlreadyExists;
                }
                records.push(Department::new(id.clone(), name.clone()));
                Outcome::Applied
            }
            BushoCommand::Update { id, name } => {
                let mut matched = false;
                for item in records.iter_mut().filter(|item| &item.id == id) {
                    item.name = name.clone();
                    matched = true;
                }
                if matched {
                    Outcome::Applied
                } else {
                    Outcome::NotFound
                }
            }
            BushoCommand::Delete { id } => {
                let before = records.len();
                records.retain(|item| &item.id != id);
                if records.len() < before {
                    Outcome::Applied
                } else {
                    Outcome::NotFound
                }
            }
        }
    }
}

pub fn filter_by_id(records: Vec<Department>, id: Option<&str>) -> Vec<Department> {
    match id {
        Some(id) => records.into_iter().filter(|item| item.id == id).collect(),
        None => records,
    }
}
