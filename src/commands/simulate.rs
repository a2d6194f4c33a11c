//! End-to-end lifecycle scenario against the in-memory backend.
//!
//! A citizen submits a medicine request, several volunteers race to claim
//! it, the winner completes it, and an admin's late delete is rejected. A
//! second request exercises the urgency flag.

use std::sync::Arc;

use clap::Args;
use futures::future::join_all;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use resq_auth::{AccountRegistry, MemoryAuthProvider};
use resq_core::config::AppConfig;
use resq_core::error::{AppError, ErrorKind};
use resq_entity::user::UserRole;
use resq_service::{ActorContext, CreateRequest, RegisterRequest, ResqApp, SessionService};
use resq_store::MemoryDocumentStore;

use crate::output::{self, OutputFormat};

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of volunteers racing to claim the request
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub volunteers: u16,
}

/// One step of the scenario.
#[derive(Debug, Serialize, Tabled)]
pub struct StepRow {
    /// Who acted.
    #[tabled(rename = "Actor")]
    pub actor: String,
    /// What they attempted.
    #[tabled(rename = "Action")]
    pub action: String,
    /// How it ended.
    #[tabled(rename = "Outcome")]
    pub outcome: String,
}

/// One notification delivered during the scenario.
#[derive(Debug, Serialize, Tabled)]
pub struct InboxRow {
    /// Recipient.
    #[tabled(rename = "To")]
    pub recipient: String,
    /// Notification kind.
    #[tabled(rename = "Type")]
    pub kind: String,
    /// Headline.
    #[tabled(rename = "Title")]
    pub title: String,
    /// Body.
    #[tabled(rename = "Message")]
    pub message: String,
}

struct Scenario {
    app: ResqApp,
    registry: Arc<AccountRegistry>,
    steps: Vec<StepRow>,
}

impl Scenario {
    fn new(config: AppConfig) -> Result<Self, AppError> {
        let registry = Arc::new(AccountRegistry::new(&config.auth)?);
        let store = MemoryDocumentStore::new(&config.store);
        Ok(Self {
            app: ResqApp::new(config, Arc::new(store)),
            registry,
            steps: Vec::new(),
        })
    }

    async fn register(&self, name: &str, role: UserRole) -> Result<SessionService, AppError> {
        let session = self
            .app
            .session(Arc::new(MemoryAuthProvider::new(Arc::clone(&self.registry))));
        session
            .register(RegisterRequest {
                display_name: name.to_string(),
                email: format!("{}@resq.local", name.to_lowercase().replace(' ', ".")),
                phone: None,
                password: "relief-2024".to_string(),
                confirm_password: "relief-2024".to_string(),
                role,
            })
            .await?;
        Ok(session)
    }

    fn record<T>(&mut self, actor: &ActorContext, action: &str, result: &Result<T, AppError>) {
        let outcome = match result {
            Ok(_) => "ok".to_string(),
            Err(e) if e.is(ErrorKind::Conflict) => format!("conflict: {}", e.user_message()),
            Err(e) => format!("{}: {}", e.kind, e.message),
        };
        self.steps.push(StepRow {
            actor: actor.display_name.clone(),
            action: action.to_string(),
            outcome,
        });
    }
}

/// Execute the simulate command
pub async fn execute(
    args: &SimulateArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut s = Scenario::new(config)?;

    let citizen = s.register("Carla Reyes", UserRole::Citizen).await?.actor()?;
    let admin = s.register("Ada Admin", UserRole::Admin).await?.actor()?;
    let mut volunteers = Vec::with_capacity(usize::from(args.volunteers));
    for n in 1..=args.volunteers {
        let session = s.register(&format!("Volunteer {n}"), UserRole::Volunteer).await?;
        volunteers.push(session.actor()?);
    }

    let created = s
        .app
        .requests
        .create(
            &citizen,
            CreateRequest {
                request_type: "medicine".to_string(),
                description: "Insulin for a diabetic neighbour".to_string(),
                location: "12 Elm St".to_string(),
                priority: "high".to_string(),
            },
        )
        .await;
    s.record(&citizen, "create medicine request", &created);
    let request = created?;

    let claims = join_all(
        volunteers
            .iter()
            .map(|v| s.app.requests.claim(v, request.id)),
    )
    .await;
    let mut winner = None;
    for (volunteer, result) in volunteers.iter().zip(&claims) {
        s.record(volunteer, "claim", result);
        if result.is_ok() {
            winner = Some(volunteer.clone());
        }
    }
    let winner =
        winner.ok_or_else(|| AppError::internal("No volunteer won the claim race"))?;
    info!(volunteer = %winner.display_name, "Claim race settled");

    let completed = s.app.requests.complete(&winner, request.id).await;
    s.record(&winner, "complete", &completed);

    let late_delete = s.app.requests.delete(&admin, request.id).await;
    s.record(&admin, "delete completed request", &late_delete);

    let low = s
        .app
        .requests
        .create(
            &citizen,
            CreateRequest {
                request_type: "food".to_string(),
                description: "Rice and canned goods for two adults".to_string(),
                location: "Barangay Hall".to_string(),
                priority: "low".to_string(),
            },
        )
        .await;
    s.record(&citizen, "create food request", &low);
    let low = low?;

    let flagged = s.app.requests.set_urgent(&admin, low.id, true).await;
    s.record(&admin, "mark urgent", &flagged);
    if let Ok(r) = &flagged {
        s.steps.push(StepRow {
            actor: String::new(),
            action: "  state".to_string(),
            outcome: format!("status={} priority={} urgent={}", r.status, r.priority, r.urgent),
        });
    }

    let mut inbox = Vec::new();
    for actor in std::iter::once(&citizen).chain(volunteers.iter()) {
        for n in s.app.notifications.list(actor).await? {
            inbox.push(InboxRow {
                recipient: actor.display_name.clone(),
                kind: n.notification_type.to_string(),
                title: n.title,
                message: n.message,
            });
        }
    }

    output::print_heading("Steps");
    output::print_list(&s.steps, format);
    output::print_heading("Notifications");
    output::print_list(&inbox, format);

    let wins = claims.iter().filter(|r| r.is_ok()).count();
    if wins == 1 {
        output::print_success(&format!(
            "Exactly one of {} claimers won ({})",
            volunteers.len(),
            winner.display_name
        ));
    } else {
        output::print_warning(&format!("{wins} claims succeeded"));
    }
    Ok(())
}
