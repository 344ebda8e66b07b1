use rbac_console_application::{
    AuditFilters, CreateUserInput, LoginCredentials, RoleFilters, SessionService,
    UpdateUserInput, UserFilters,
};
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::User;
use rbac_console_infrastructure::{ApiClients, DEMO_EMAIL, DEMO_PASSWORD};
use tracing::{info, warn};

fn describe_user(user: &User) -> String {
    let role = user.role.as_ref().map_or("no role", |role| role.name.as_str());
    let status = if user.is_active { "active" } else { "inactive" };
    format!(
        "#{} {} <{}> [{role}, {status}]",
        user.id,
        user.full_name(),
        user.email
    )
}

async fn demo_login(session: &SessionService) -> AppResult<()> {
    session
        .login(LoginCredentials {
            email: DEMO_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        })
        .await
}

/// Runs a scripted tour of every admin API namespace.
///
/// A stored session is resumed and kept; otherwise the tour signs in with
/// the demo credentials and signs out at the end.
pub async fn walkthrough(clients: &ApiClients, session: &SessionService) -> AppResult<()> {
    session.check_auth().await?;
    let resumed = session.state().await.is_authenticated;
    if resumed {
        info!("resuming stored session");
    } else {
        demo_login(session).await?;
    }

    let users = clients.users.list_users(UserFilters::default()).await?;
    info!(total = users.total, pages = users.pages, "listed users");
    for user in &users.items {
        info!("{}", describe_user(user));
    }

    let roles = clients.roles.list_roles(RoleFilters::default()).await?;
    for role in &roles.items {
        info!(
            role = %role.name,
            permissions = role.permissions.len(),
            "role"
        );
    }

    let grouped = clients.permissions.get_grouped_permissions().await?.data;
    for (resource, permissions) in &grouped {
        let names: Vec<&str> = permissions
            .iter()
            .map(|permission| permission.action.as_str())
            .collect();
        info!(resource = %resource, actions = ?names, "permission group");
    }

    let created = clients
        .users
        .create_user(CreateUserInput {
            first_name: "Camille".to_owned(),
            last_name: "Bernard".to_owned(),
            email: "camille.bernard@demo.com".to_owned(),
            password: None,
            role_id: Some("4".to_owned()),
        })
        .await?
        .data;
    info!(user = %describe_user(&created), "created user");

    let updated = clients
        .users
        .update_user(
            created.id.as_str(),
            UpdateUserInput {
                role_id: Some("3".to_owned()),
                ..UpdateUserInput::default()
            },
        )
        .await?
        .data;
    info!(user = %describe_user(&updated), "reassigned user");

    let deactivated = clients
        .users
        .toggle_user_status(updated.id.as_str(), false)
        .await?
        .data;
    info!(user = %describe_user(&deactivated), "deactivated user");

    match clients.users.get_user("999").await {
        Err(AppError::NotFound(detail)) => info!(detail, "missing user is reported"),
        Err(error) => return Err(error),
        Ok(response) => warn!(user_id = %response.data.id, "unexpected user '999'"),
    }

    let recent = clients.audit.get_recent_activity(Some(3)).await?.data;
    for entry in &recent {
        info!(
            action = %entry.action,
            resource = %entry.resource,
            user = %entry.user_email,
            timestamp = %entry.timestamp,
            "recent activity"
        );
    }

    stats(clients, 7).await?;

    if !session.refresh_access_token().await {
        return Ok(());
    }
    info!("access token refreshed");
    if !resumed {
        session.logout().await;
    }

    Ok(())
}

/// Signs in with the demo credentials and leaves the session stored.
pub async fn login(session: &SessionService) -> AppResult<()> {
    session.check_auth().await?;
    if !session.state().await.is_authenticated {
        demo_login(session).await?;
    }

    let state = session.state().await;
    match state.user {
        Some(user) => println!("signed in as {}", describe_user(&user)),
        None => println!("signed in"),
    }
    Ok(())
}

/// Ends the stored session, if any.
pub async fn logout(session: &SessionService) -> AppResult<()> {
    session.check_auth().await?;
    if session.state().await.is_authenticated {
        session.logout().await;
        println!("signed out");
    } else {
        println!("no stored session");
    }
    Ok(())
}

/// Prints audit statistics for the trailing `days` days.
pub async fn stats(clients: &ApiClients, days: u32) -> AppResult<()> {
    let stats = clients.audit.get_audit_stats(Some(days)).await?.data;
    info!(
        days,
        total_actions = stats.total_actions,
        unique_users = stats.unique_users,
        "audit statistics"
    );

    for (action, count) in &stats.actions_by_type {
        println!("action   {action:<12} {count}");
    }
    for (resource, count) in &stats.actions_by_resource {
        println!("resource {resource:<12} {count}");
    }
    for day in &stats.daily_activity {
        println!("day      {} {}", day.date, day.count);
    }
    Ok(())
}

/// Writes the audit CSV export to standard output.
pub async fn export_audit(clients: &ApiClients) -> AppResult<()> {
    let export = clients.audit.export_logs(AuditFilters::default()).await?;
    info!(content_type = %export.content_type, bytes = export.body.len(), "audit export ready");
    println!("{}", export.body);
    Ok(())
}

/// Lists users matching the joined search terms.
pub async fn users(clients: &ApiClients, terms: &[String]) -> AppResult<()> {
    let search = Some(terms.join(" ")).filter(|search| !search.trim().is_empty());
    let page = clients
        .users
        .list_users(UserFilters {
            search,
            limit: Some(100),
            ..UserFilters::default()
        })
        .await?;

    info!(total = page.total, "matching users");
    for user in &page.items {
        println!("{}", describe_user(user));
    }
    Ok(())
}
