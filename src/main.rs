//! Bill Share terminal client
//!
//! Entry point: drives a [`Workspace`] from the terminal. Plain lines are
//! chat messages; slash commands operate the forms and the directory.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::print_stdout)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use billshare_client::Workspace;
use billshare_client::api::{Backend, Client, FriendId};
use billshare_client::config::ClientConfig;
use billshare_client::directory::FriendDirectory;
use billshare_client::forms::parse_int;
use billshare_client::messenger::Messenger;
use billshare_client::notify::Notifier;
use billshare_client::realtime;

const HELP: &str = "\
Commands:
  <text>                    send a chat message
  /friends                  list friends
  /friend                   add a friend
  /bill                     create a bill, or resubmit the open one
  /bill cancel              discard the open bill
  /delete <id>              delete a friend
  /report [<id>] <path>     download the overall or one friend's CSV report
  /html                     print the page HTML
  /help                     show this help
  /quit                     exit";

/// Alerts go to stdout; confirmations read y/N from stdin.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("! {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        prompt(&format!("{message} [y/N]"))
            .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
            .unwrap_or(false)
    }
}

/// Read one line from stdin after printing a label.
///
/// Only called while no background stdin read is pending.
fn prompt(label: &str) -> std::io::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    read_line().map(Option::unwrap_or_default)
}

/// Blocking read of one line; `None` at end of input.
fn read_line() -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let config = ClientConfig::load().context("Configuration error")?;

    info!(
        name: "client.config.loaded",
        server = %config.server.base_url,
        realtime = %config.realtime.url,
        bill_id = config.chat.bill_id,
        "Client configuration loaded"
    );

    let page_data = match &config.page.friends_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read friends file {path}"))?,
        ),
        None => None,
    };
    let directory = FriendDirectory::from_page_data(page_data.as_deref())?;

    let client = Client::new(&config.server.base_url)?
        .with_friends_path(config.server.friends_path.clone());
    let backend: Arc<dyn Backend> = Arc::new(client);

    let (outbound, mut inbound) = realtime::connect(&config.realtime.url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.realtime.url))?;

    let messenger = Messenger::new(Box::new(outbound), config.chat.bill_id);
    let mut workspace = Workspace::new(backend, Arc::new(TerminalNotifier), messenger, directory);

    println!("{HELP}");

    let mut pending = tokio::task::spawn_blocking(read_line);
    loop {
        tokio::select! {
            line = &mut pending => {
                let Some(line) = line?? else { break };
                if !run_command(&mut workspace, line.trim()).await {
                    break;
                }
                pending = tokio::task::spawn_blocking(read_line);
            }
            event = inbound.next() => {
                let Some(event) = event else {
                    println!("! Chat connection closed");
                    break;
                };
                println!("{}", workspace.handle_server_event(event).to_line());
            }
        }
    }

    info!(name: "client.stopped", "Client stopped");

    // A pending stdin read would otherwise keep the runtime alive.
    std::process::exit(0)
}

/// Run one command line. Returns `false` to exit.
async fn run_command(workspace: &mut Workspace, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("/quit") => return false,
        Some("/help") => println!("{HELP}"),
        Some("/html") => println!("{}", workspace.render()),
        Some("/friends") => {
            for friend in workspace.directory().friends() {
                println!(
                    "{:>4}  {}  {}  {}",
                    friend.id,
                    friend.name,
                    friend.email.as_deref().unwrap_or("-"),
                    friend.phone.as_deref().unwrap_or("-")
                );
            }
        }
        Some("/friend") => {
            if let Err(e) = fill_friend_form(workspace) {
                println!("! {e}");
                workspace.close_friend_form();
                return true;
            }
            workspace.submit_friend().await;
        }
        Some("/bill") => match parts.next() {
            None => {
                // A bill left open by a failed submit keeps its draft.
                let filled = if workspace.bill_form().is_open() {
                    resume_bill_form(workspace)
                } else {
                    fill_bill_form(workspace)
                };
                if let Err(e) = filled {
                    println!("! {e}");
                    return true;
                }
                workspace.submit_bill().await;
                if workspace.bill_form().is_open() {
                    println!(
                        "Bill still open: /bill to add participants and resubmit, /bill cancel to discard"
                    );
                }
            }
            Some("cancel") => workspace.close_bill_form(),
            Some(_) => println!("usage: /bill [cancel]"),
        },
        Some("/delete") => match parts.next().and_then(parse_int) {
            Some(id) => {
                workspace.delete_friend(id).await;
            }
            None => println!("usage: /delete <id>"),
        },
        Some("/report") => {
            let args: Vec<&str> = parts.collect();
            let (friend, path): (Option<FriendId>, &str) = match args.as_slice() {
                [path] => (None, *path),
                [id, path] => match parse_int(id) {
                    Some(id) => (Some(id), *path),
                    None => {
                        println!("usage: /report [<id>] <path>");
                        return true;
                    }
                },
                _ => {
                    println!("usage: /report [<id>] <path>");
                    return true;
                }
            };
            if workspace.download_report(friend, &PathBuf::from(path)).await {
                println!("Saved {path}");
            }
        }
        Some(_) => {
            workspace.messenger_mut().set_input(line);
            workspace.send_message();
        }
    }
    true
}

fn fill_friend_form(workspace: &mut Workspace) -> std::io::Result<()> {
    workspace.open_friend_form();
    let name = prompt("Name")?;
    let email = prompt("Email")?;
    let phone = prompt("Phone")?;
    let form = workspace.friend_form_mut();
    form.name = name;
    form.email = email;
    form.phone = phone;
    Ok(())
}

fn fill_bill_form(workspace: &mut Workspace) -> std::io::Result<()> {
    workspace.open_bill_form();

    let description = prompt("Description")?;
    let details = prompt("Visit details")?;
    let date = prompt("Visit date (YYYY-MM-DD)")?;
    let total = prompt("Total amount")?;
    let tax = prompt("Tax amount")?;
    let discount = prompt("Discount amount")?;
    {
        let form = workspace.bill_form_mut();
        form.set_description(description);
        form.set_visit_details(details);
        form.set_visit_date(date);
        form.set_total(total);
        form.set_tax(tax);
        form.set_discount(discount);
        println!("Final amount: {}", form.final_amount_display());
    }

    fill_participants(workspace)
}

fn resume_bill_form(workspace: &mut Workspace) -> std::io::Result<()> {
    let form = workspace.bill_form();
    println!(
        "Open bill: {} ({}), final amount {}",
        form.description(),
        form.visit_date(),
        form.final_amount_display()
    );
    for row in form.rows() {
        println!("  friend {:>4}  owes {}", row.friend, row.amount);
    }
    fill_participants(workspace)
}

/// Prompt for participant rows, filling the seeded empty row first.
fn fill_participants(workspace: &mut Workspace) -> std::io::Result<()> {
    for friend in workspace.directory().friends() {
        println!("{:>4}  {}", friend.id, friend.name);
    }

    let mut row = workspace
        .bill_form()
        .rows()
        .iter()
        .find(|row| row.friend.is_empty() && row.amount.is_empty())
        .map(|row| row.id());
    loop {
        let friend = prompt("Participant friend id (blank to finish)")?;
        if friend.trim().is_empty() {
            break;
        }
        let amount = prompt("Amount owed")?;
        let id = match row.take() {
            Some(id) => id,
            None => workspace.add_participant(),
        };
        if let Some(participant) = workspace.bill_form_mut().row_mut(id) {
            participant.friend = friend;
            participant.amount = amount;
        }
    }
    Ok(())
}
