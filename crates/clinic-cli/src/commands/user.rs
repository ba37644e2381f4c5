//! User management commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use dialoguer::{Input, Password, Select};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use clinic_auth::password::{PasswordHasher, PasswordValidator};
use clinic_cache::CacheManager;
use clinic_core::config::AppConfig;
use clinic_core::error::AppError;
use clinic_core::types::pagination::PageRequest;
use clinic_database::repositories::UserRepository;
use clinic_entity::user::{User, UserRole};
use clinic_service::RequestContext;
use clinic_service::user::AccountStatuses;
use clinic_service::user::admin::{AdminUserService, CreateStaffRequest};

use crate::output::{self, OutputFormat};

const ROLES: [UserRole; 6] = [
    UserRole::Student,
    UserRole::AcademicStaff,
    UserRole::Doctor,
    UserRole::ClinicalStaff,
    UserRole::Admin,
    UserRole::Superadmin,
];

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account; missing values are prompted for
    Create {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        /// One of student, academic_staff, doctor, clinical_staff, admin, superadmin
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// List accounts
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    full_name: String,
    role: String,
    status: String,
    verified: bool,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            role: u.role.to_string(),
            status: u.status.to_string(),
            verified: u.email_verified,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let user_repo = Arc::new(UserRepository::new(pool));
    // A running server picks up status changes once its own cached entry expires
    let statuses = AccountStatuses::new(
        CacheManager::new(&config.cache),
        Duration::from_secs(config.cache.account_status_ttl_seconds),
    );
    let service = AdminUserService::new(
        Arc::clone(&user_repo),
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        statuses,
    );

    match &args.command {
        UserCommand::Create {
            email,
            full_name,
            role,
            department,
        } => {
            let email = match email {
                Some(e) => e.clone(),
                None => Input::<String>::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(prompt_error)?,
            };
            let full_name = match full_name {
                Some(n) => n.clone(),
                None => Input::<String>::new()
                    .with_prompt("Full name")
                    .interact_text()
                    .map_err(prompt_error)?,
            };
            let role = match role {
                Some(r) => r.parse::<UserRole>()?,
                None => {
                    let labels: Vec<&str> = ROLES.iter().map(|r| r.as_str()).collect();
                    let idx = Select::new()
                        .with_prompt("Role")
                        .items(&labels)
                        .default(0)
                        .interact()
                        .map_err(prompt_error)?;
                    ROLES[idx]
                }
            };
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(prompt_error)?;

            // The CLI acts with full authority, so every role may be created.
            let operator = RequestContext::new(Uuid::nil(), UserRole::Superadmin, "cli".to_string());
            let user = service
                .create_user(
                    &operator,
                    CreateStaffRequest {
                        email,
                        password,
                        full_name,
                        institution_number: None,
                        phone: None,
                        department: department.clone(),
                        role,
                    },
                )
                .await?;

            output::print_success(&format!("Created {} account {}", user.role, user.email));
            output::print_kv("ID", &user.id.to_string());
        }
        UserCommand::List {
            role,
            page,
            per_page,
        } => {
            let role = role.as_deref().map(str::parse::<UserRole>).transpose()?;
            let result = service
                .list_users(role, PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = result.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} users)",
                    result.page, result.total_pages, result.total_items
                );
            }
        }
    }

    Ok(())
}
