use std::io::{self, BufRead, Write};

use dotenv::dotenv;
use log::info;

use busho_master::client::{BushoClient, GraphqlTransport, HttpTransport};
use busho_master::utils::config::Config;
use busho_master::views::app::{App, Screen};
use busho_master::views::edit::{EditPhase, EditView};
use busho_master::views::list::{ListView, SortColumn};
use busho_master::views::LoadState;

const LIST_HELP: &str =
    "commands: list | search [id] | filter [text] | sort id|name | new | edit <row> | delete <row> | quit";
const EDIT_HELP: &str = "commands: id <value> | name <value> | submit | back | quit";

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!("using endpoint {}", config.endpoint);

    let client = BushoClient::new(HttpTransport::new(config.endpoint.clone()));
    let mut app = App::start(client).await;
    render(&app);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let (command, arg) = match line.trim().split_once(' ') {
            Some((command, arg)) => (command.to_string(), arg.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };
        if command == "quit" || command == "exit" {
            break;
        }

        let on_list = matches!(app.screen(), Screen::List(_));
        if on_list {
            match command.as_str() {
                "list" => app.navigate("/").await,
                "search" => {
                    if let Some(list) = app.list_mut() {
                        list.set_filter_input(arg);
                    }
                    app.search().await;
                }
                "filter" => {
                    if let Some(list) = app.list_mut() {
                        list.set_table_filter(arg);
                    }
                }
                "sort" => {
                    let column = match arg.as_str() {
                        "id" => Some(SortColumn::Id),
                        "name" => Some(SortColumn::Name),
                        _ => None,
                    };
                    match (column, app.list_mut()) {
                        (Some(column), Some(list)) => list.toggle_sort(column),
                        _ => println!("sort id|name"),
                    }
                }
                "new" => app.navigate("/edit").await,
                "edit" => {
                    let opened = match row_index(&arg) {
                        Some(index) => app.edit_row(index).await,
                        None => false,
                    };
                    if !opened {
                        println!("no such row: {}", arg);
                    }
                }
                "delete" => {
                    let prompt = match (row_index(&arg), app.list_mut()) {
                        (Some(index), Some(list)) => list.prompt_delete(index),
                        _ => None,
                    };
                    match prompt {
                        Some(prompt) => {
                            println!("{}", prompt.message());
                            print!("[y/N] ");
                            io::stdout().flush()?;
                            let answer = lines.next().transpose()?.unwrap_or_default();
                            let confirmed = answer.trim().eq_ignore_ascii_case("y");
                            if let Err(err) = app.delete_row(&prompt, confirmed).await {
                                println!("{}", err);
                            }
                        }
                        None => println!("no such row: {}", arg),
                    }
                }
                _ => println!("{}", LIST_HELP),
            }
        } else {
            match command.as_str() {
                "id" => {
                    if let Some(edit) = app.edit_mut() {
                        edit.set_id(arg);
                    }
                }
                "name" => {
                    if let Some(edit) = app.edit_mut() {
                        edit.set_name(arg);
                    }
                }
                "submit" => {
                    app.submit().await;
                }
                "back" => app.back().await,
                _ => println!("{}", EDIT_HELP),
            }
        }
        render(&app);
    }
    Ok(())
}

/// Rows are shown 1-based.
fn row_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

fn render<T: GraphqlTransport>(app: &App<T>) {
    println!();
    match app.screen() {
        Screen::List(list) => render_list(list),
        Screen::Edit(edit) => render_edit(edit),
    }
}

fn render_list(list: &ListView) {
    println!("== Departments ==");
    if !list.search_cond().is_empty() {
        println!("search: id = {}", list.search_cond());
    }
    if let LoadState::Failed(message) = list.state() {
        println!("Error: {}", message);
        return;
    }
    let rows = list.visible_rows();
    if rows.is_empty() {
        println!("(no departments)");
    }
    for (n, row) in rows.iter().enumerate() {
        println!("{:>3}  {:<12} {}", n + 1, row.id, row.name);
    }
    println!("{}", LIST_HELP);
}

fn render_edit(edit: &EditView) {
    println!("== Edit department ==");
    match edit.phase() {
        EditPhase::Loading => println!("Loading..."),
        EditPhase::Failed { message, .. } => println!("Error: {}", message),
        _ => {}
    }
    let lock = if edit.id_locked() { " (locked)" } else { "" };
    println!("id{}: {}", lock, edit.id());
    if let Some(message) = edit.id_error() {
        println!("  ! {}", message);
    }
    println!("name: {}", edit.name());
    if let Some(message) = edit.name_error() {
        println!("  ! {}", message);
    }
    println!("{}", EDIT_HELP);
}
