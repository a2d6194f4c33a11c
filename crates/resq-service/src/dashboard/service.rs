//! Role-specific request views.
//!
//! Every view is ordered newest first. Citizens see what they authored,
//! volunteers see their assignments plus the open pool, admins see
//! everything with an optional status filter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use resq_auth::rbac::{RbacEnforcer, RequestPermission};
use resq_core::error::AppError;
use resq_core::types::query::Query;
use resq_entity::request::{HelpRequest, RequestStatus};
use resq_entity::user::Principal;
use resq_store::RequestRepository;

use super::feed::LiveFeed;
use super::stats::DashboardStats;
use crate::context::ActorContext;
use crate::directory::DirectoryService;

/// One-shot admin dashboard contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverview {
    /// Requests matching the status filter.
    pub requests: Vec<HelpRequest>,
    /// Counts over every request, ignoring the filter.
    pub stats: DashboardStats,
    /// Registered volunteers for the reassign picker.
    pub volunteers: Vec<Principal>,
}

/// Builds the per-role dashboard views.
#[derive(Debug, Clone)]
pub struct DashboardService {
    /// Request repository.
    request_repo: Arc<RequestRepository>,
    /// Directory for the volunteer list.
    directory: Arc<DirectoryService>,
    /// Role checks.
    rbac: RbacEnforcer,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(request_repo: Arc<RequestRepository>, directory: Arc<DirectoryService>) -> Self {
        Self {
            request_repo,
            directory,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Live view of the requests a citizen authored.
    pub async fn my_requests(&self, ctx: &ActorContext) -> Result<LiveFeed<HelpRequest>, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::ViewOwn)?;
        self.open(RequestRepository::by_requester(ctx.user_id)).await
    }

    /// Live view of the requests assigned to a volunteer.
    pub async fn assigned_requests(
        &self,
        ctx: &ActorContext,
    ) -> Result<LiveFeed<HelpRequest>, AppError> {
        self.rbac
            .require_permission(ctx.role, RequestPermission::ViewAssigned)?;
        self.open(RequestRepository::assigned_to(ctx.user_id)).await
    }

    /// Live view of every unclaimed request.
    pub async fn open_requests(&self, ctx: &ActorContext) -> Result<LiveFeed<HelpRequest>, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::ViewOpen)?;
        self.open(RequestRepository::open_pool()).await
    }

    /// Live view of every request, optionally narrowed to one status.
    pub async fn all_requests(
        &self,
        ctx: &ActorContext,
        status: Option<RequestStatus>,
    ) -> Result<LiveFeed<HelpRequest>, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::ViewAll)?;
        self.open(RequestRepository::all(status)).await
    }

    /// Admin dashboard snapshot: filtered requests, global counts, volunteers.
    pub async fn admin_overview(
        &self,
        ctx: &ActorContext,
        status: Option<RequestStatus>,
    ) -> Result<AdminOverview, AppError> {
        self.rbac.require_permission(ctx.role, RequestPermission::ViewAll)?;
        let everything = self.request_repo.list(&RequestRepository::all(None)).await?;
        let stats = DashboardStats::from_requests(&everything);
        let requests = match status {
            Some(status) => everything.into_iter().filter(|r| r.status == status).collect(),
            None => everything,
        };
        let volunteers = self.directory.list_volunteers().await?;
        Ok(AdminOverview {
            requests,
            stats,
            volunteers,
        })
    }

    async fn open(&self, query: Query) -> Result<LiveFeed<HelpRequest>, AppError> {
        let subscription = self.request_repo.subscribe(query.clone()).await?;
        LiveFeed::open(query, subscription).await
    }
}
