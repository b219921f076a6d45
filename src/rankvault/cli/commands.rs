//! # CLI Layer
//!
//! One possible shell for rankvault. This is the only place that parses
//! arguments, writes to the terminal, and decides exit codes.
//!
//! - `run()`: dispatch (called by `main.rs`)
//! - `init_context()`: builds the API, loads the session
//! - `handle_*()`: per-command handlers that call the API and print the result
//!
//! The current server comes from `--server` when given, otherwise from the
//! session saved in the data directory.

use super::render::{
    print_messages, render_account_info, render_account_list, render_config,
    render_refresh_report, render_servers, render_targets, TermProgress,
};
use super::setup::{print_grouped_help, print_help_for_command, Cli, Commands, ServerAction};
use rankvault::api::{ConfigAction, VaultApi};
use rankvault::clipboard::copy_to_clipboard;
use rankvault::commands::SortKey;
use rankvault::error::{Result, VaultError};
use rankvault::init::initialize;
use rankvault::model::{Account, CopyField};
use rankvault::session::Session;
use rankvault::store::fs::FileStore;
use std::path::PathBuf;
use std::str::FromStr;

struct AppContext {
    api: VaultApi<FileStore>,
    session: Session,
    data_dir: PathBuf,
    server_flag: Option<String>,
}

impl AppContext {
    /// The server an account command operates on.
    fn server(&self) -> Result<String> {
        if let Some(server) = &self.server_flag {
            return Ok(server.clone());
        }
        self.api
            .current_server(&self.session)
            .map(str::to_string)
            .ok_or_else(|| {
                VaultError::Api(
                    "No server selected. Add one with `rankvault server add <name>`".to_string(),
                )
            })
    }

    fn save_session(&self) -> Result<()> {
        self.session.save(&self.data_dir)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command.name()),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    if let Some(Commands::Help { command }) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        None | Some(Commands::List) => handle_list(&ctx),
        Some(Commands::Add { name, id, password }) => handle_add(&mut ctx, name, id, password),
        Some(Commands::Remove { id }) => handle_remove(&mut ctx, &id),
        Some(Commands::Rename { id, name }) => handle_rename(&mut ctx, &id, &name.join(" ")),
        Some(Commands::Move { id, position }) => handle_move(&mut ctx, &id, &position),
        Some(Commands::Sort { key }) => handle_sort(&mut ctx, &key),
        Some(Commands::Copy { id, password }) => handle_copy(&mut ctx, &id, password),
        Some(Commands::Info { id }) => handle_info(&ctx, &id),
        Some(Commands::Server { action }) => handle_server(&mut ctx, action),
        Some(Commands::Use { server }) => handle_use(&mut ctx, &server),
        Some(Commands::Refresh) => handle_refresh(&mut ctx),
        Some(Commands::Urls) => handle_urls(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Help { .. }) => Ok(()),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let ctx = initialize(cli.data_dir.as_deref())?;
    Ok(AppContext {
        api: ctx.api.with_listener(Box::new(TermProgress::new())),
        session: ctx.session,
        data_dir: ctx.data_dir,
        server_flag: cli.server.clone(),
    })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_accounts(&ctx.server()?)?;
    let server = result.server.as_deref().unwrap_or_default();
    print!(
        "{}",
        render_account_list(server, &result.listed_accounts, ctx.api.mapping())
    );
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, name: String, id: String, password: String) -> Result<()> {
    let server = ctx.server()?;
    let result = ctx
        .api
        .add_account(&server, Account::new(name.trim(), id, password))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, id: &str) -> Result<()> {
    let server = ctx.server()?;
    let result = ctx.api.remove_account(&server, id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rename(ctx: &mut AppContext, id: &str, name: &str) -> Result<()> {
    let server = ctx.server()?;
    let result = ctx.api.rename_account(&server, id, name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, id: &str, position: &str) -> Result<()> {
    let server = ctx.server()?;
    let result = ctx.api.swap_accounts(&server, id, position)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_sort(ctx: &mut AppContext, key: &str) -> Result<()> {
    let key = SortKey::from_str(key).map_err(VaultError::Api)?;
    let server = ctx.server()?;
    let result = ctx.api.sort_accounts(&server, key)?;
    print_messages(&result.messages);
    Ok(())
}

/// Copies first and counts only a successful copy.
fn handle_copy(ctx: &mut AppContext, id: &str, password: bool) -> Result<()> {
    let server = ctx.server()?;
    let found = ctx.api.account(&server, id)?;
    let Some(account) = found.affected_accounts.first() else {
        return Ok(());
    };

    let field = if password {
        CopyField::Password
    } else {
        CopyField::Id
    };
    let text = match field {
        CopyField::Id => &account.id,
        CopyField::Password => &account.password,
    };
    copy_to_clipboard(text)?;

    let result = ctx.api.increment_usage(&server, id, field)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_info(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.account(&ctx.server()?, id)?;
    for account in &result.affected_accounts {
        print!("{}", render_account_info(account, ctx.api.mapping()));
    }
    Ok(())
}

fn handle_server(ctx: &mut AppContext, action: Option<ServerAction>) -> Result<()> {
    let result = match action {
        None | Some(ServerAction::List) => {
            let result = ctx.api.list_servers(&ctx.session)?;
            print!("{}", render_servers(&result.servers));
            result
        }
        Some(ServerAction::Add { name }) => {
            let result = ctx.api.add_server(&mut ctx.session, &name)?;
            ctx.save_session()?;
            result
        }
        Some(ServerAction::Remove { name }) => {
            let result = ctx.api.remove_server(&mut ctx.session, &name)?;
            ctx.save_session()?;
            result
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_use(ctx: &mut AppContext, server: &str) -> Result<()> {
    let result = ctx.api.select_server(&mut ctx.session, server)?;
    ctx.save_session()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_refresh(ctx: &mut AppContext) -> Result<()> {
    if ctx.api.refresh_targets().is_empty() {
        println!("No accounts to refresh.");
        return Ok(());
    }
    let report = ctx.api.refresh_ranks()?;
    print!("{}", render_refresh_report(&report));
    if report.persist_errors.is_empty() {
        Ok(())
    } else {
        Err(VaultError::Store(format!(
            "{} rank update(s) could not be saved",
            report.persist_errors.len()
        )))
    }
}

fn handle_urls(ctx: &AppContext) -> Result<()> {
    print!("{}", render_targets(&ctx.api.refresh_targets()));
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.run_config(&ctx.data_dir, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
