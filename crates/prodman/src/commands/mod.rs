//! Command handlers, one module per resource.
//!
//! Every handler drives the `CatalogController` and returns rendered output.
//! Notices queued by the controller are flushed to stderr before the output
//! is printed, whether or not the command succeeded.

pub mod config_cmd;
pub mod documents;
pub mod products;
pub mod util;

use tokio::sync::mpsc::UnboundedReceiver;

use prodman_core::{BackendConfig, CatalogController, Notice, Notifier};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// One CLI invocation's controller and its notice stream.
pub struct Session<'a> {
    pub catalog: CatalogController,
    pub global: &'a GlobalOpts,
    notices: UnboundedReceiver<Notice>,
}

impl<'a> Session<'a> {
    pub fn new(backend: &BackendConfig, global: &'a GlobalOpts) -> Result<Self, CliError> {
        let (notifier, notices) = Notifier::channel();
        Ok(Self {
            catalog: CatalogController::new(backend, notifier)?,
            global,
            notices,
        })
    }

    pub fn flush_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            output::print_notice(&notice, &self.global.color, self.global.quiet);
        }
    }
}

/// Route a backend command to its handler and print the result.
pub async fn dispatch(cmd: Command, session: &mut Session<'_>) -> Result<(), CliError> {
    let result = match cmd {
        Command::Products(args) => products::handle(session, args).await,
        Command::Documents(args) => documents::handle(session, args).await,
        Command::Ping => ping(session).await,
        // Handled in main before a session exists.
        Command::Config(_) | Command::Completions(_) => Ok(String::new()),
    };
    session.flush_notices();
    output::print_output(&result?, session.global.quiet);
    Ok(())
}

async fn ping(session: &Session<'_>) -> Result<String, CliError> {
    let message = session.catalog.ping().await?;
    let base = session.catalog.api().base_url().to_string();
    Ok(message.map_or_else(
        || format!("{base} is reachable"),
        |m| format!("{base}: {m}"),
    ))
}
