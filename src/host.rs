//! Terminal implementations of the view seams.

use std::io::{self, BufRead, Write};

use doclib_console_core::contract::{Notifier, ViewHost};
use doclib_console_core::effect::Navigation;
use doclib_console_core::notification::{Notification, NotificationKind, TracingNotifier};
use tracing::{info, warn};

/// Hosts the console in a terminal. Dialogs read from stdin.
#[derive(Debug, Clone, Default)]
pub struct TerminalHost {
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_line(prompt: &str) -> Option<String> {
        print!("{prompt} ");
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "Failed to flush stdout before reading input");
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

impl ViewHost for TerminalHost {
    fn navigate(&self, target: &Navigation) {
        info!(?target, "Navigation requested");
        match target {
            Navigation::Reload => println!("-> reload"),
            Navigation::Visit(path) => println!("-> {path}"),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            info!(message, "Confirmed by --yes");
            return true;
        }
        matches!(
            Self::read_line(&format!("{message} [y/N]")).as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }

    fn prompt(&self, message: &str) -> Option<String> {
        Self::read_line(message)
    }
}

/// Prints notifications for the user and mirrors them to the log.
#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier {
    log: TracingNotifier,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => eprintln!("[error] {}", notification.message),
            kind => println!("[{}] {}", kind.as_str(), notification.message),
        }
        self.log.notify(notification);
    }
}
