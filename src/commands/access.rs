//! Authorization gate inspection.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use resq_auth::gate::{self, Route, SessionState};
use resq_core::error::AppError;
use resq_core::types::id::UserId;
use resq_entity::time;
use resq_entity::user::{Principal, UserRole};

use crate::output::{self, OutputFormat};

/// Arguments for the access command
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Role of the signed-in principal; omit for a signed-out session
    #[arg(short, long)]
    pub role: Option<UserRole>,

    /// Treat the profile as still loading
    #[arg(long, conflicts_with = "role")]
    pub resolving: bool,

    /// Single path to check; all routes when omitted
    #[arg(short, long)]
    pub path: Option<String>,
}

/// One gate decision.
#[derive(Debug, Serialize, Tabled)]
pub struct AccessRow {
    /// Requested path.
    #[tabled(rename = "Path")]
    pub path: String,
    /// Gate decision.
    #[tabled(rename = "Decision")]
    pub decision: String,
    /// Where the client is sent instead, if anywhere.
    #[tabled(rename = "Redirect")]
    pub redirect: String,
}

fn session_for(args: &AccessArgs) -> SessionState {
    if args.resolving {
        return SessionState::Resolving(UserId::new());
    }
    match args.role {
        Some(role) => SessionState::Active(Principal {
            id: UserId::new(),
            display_name: format!("Sample {role}"),
            email: format!("{role}@resq.local"),
            phone: None,
            role,
            created_at: time::now(),
        }),
        None => SessionState::SignedOut,
    }
}

fn row(path: &str, session: &SessionState) -> AccessRow {
    let decision = gate::can_access_path(path, session);
    AccessRow {
        path: path.to_string(),
        decision: decision.to_string(),
        redirect: decision
            .redirect()
            .map(|r| r.path().to_string())
            .unwrap_or_default(),
    }
}

/// Execute the access command
pub fn execute(args: &AccessArgs, format: OutputFormat) -> Result<(), AppError> {
    let session = session_for(args);
    let rows: Vec<AccessRow> = match &args.path {
        Some(path) => vec![row(path, &session)],
        None => Route::ALL.iter().map(|r| row(r.path(), &session)).collect(),
    };
    output::print_list(&rows, format);
    Ok(())
}
