//! Locale role assignment and resolution.
//!
//! A member's support language is carried by a guild role named after the
//! locale tag. The `/language` command offers a select menu; picking an entry
//! swaps the member's locale role. The request lifecycle receives the locale
//! resolved from the member's roles.

use crate::gateway::{GatewayError, SupportGateway};

/// Languages the assistant pools are organized by.
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "pt-BR", "de", "fr", "es-ES"];

/// Resolves a member's support language from their roles.
///
/// # Arguments
/// - `gateway` - Gateway used to resolve the locale roles by name
/// - `guild_id` - Guild the member belongs to
/// - `role_ids` - Roles the member currently holds
///
/// # Returns
/// - `Ok(Some(locale))` - The first supported locale whose role the member holds
/// - `Ok(None)` - The member holds no locale role
/// - `Err(GatewayError)` - Role resolution failed
pub async fn resolve_member_locale(
    gateway: &dyn SupportGateway,
    guild_id: u64,
    role_ids: &[u64],
) -> Result<Option<String>, GatewayError> {
    for locale in SUPPORTED_LOCALES {
        if let Some(role_id) = gateway.find_role_by_name(guild_id, locale).await? {
            if role_ids.contains(&role_id) {
                return Ok(Some((*locale).to_string()));
            }
        }
    }

    Ok(None)
}

/// Assigns a locale role to a member, replacing any other locale role.
///
/// # Arguments
/// - `gateway` - Gateway used to resolve and mutate roles
/// - `guild_id` - Guild the member belongs to
/// - `user_id` - The member picking a language
/// - `role_ids` - Roles the member currently holds
/// - `locale` - The picked locale; must be one of [`SUPPORTED_LOCALES`]
///
/// # Returns
/// - `Ok(true)` - Locale role assigned
/// - `Ok(false)` - No role named after the locale exists in the guild
/// - `Err(GatewayError)` - Role mutation failed
pub async fn assign_locale_role(
    gateway: &dyn SupportGateway,
    guild_id: u64,
    user_id: u64,
    role_ids: &[u64],
    locale: &str,
) -> Result<bool, GatewayError> {
    let Some(target_role) = gateway.find_role_by_name(guild_id, locale).await? else {
        return Ok(false);
    };

    for other in SUPPORTED_LOCALES.iter().filter(|other| **other != locale) {
        if let Some(role_id) = gateway.find_role_by_name(guild_id, other).await? {
            if role_ids.contains(&role_id) {
                gateway.remove_role(guild_id, user_id, role_id).await?;
            }
        }
    }

    if !role_ids.contains(&target_role) {
        gateway.add_role(guild_id, user_id, target_role).await?;
    }

    Ok(true)
}
