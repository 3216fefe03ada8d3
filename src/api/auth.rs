//! Signup, login and dealership registration handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{email_looks_valid, password};
use crate::metrics;
use crate::model::{Dealership, User, UserRole};
use crate::storage::{NewDealership, NewUser};

use super::error::ApiError;
use super::response::{created, ok};
use super::AppState;

/// `POST /api/auth/signup` body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    pub dealership_id: Option<String>,
    pub license_number: Option<String>,
    pub radius_miles: Option<i64>,
}

/// Handles user signup for salesperson and driver roles.
///
/// Creates the user record plus the role-specific profile in the same
/// request, mirroring how accounts are onboarded from the signup form.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() || req.role.is_empty()
    {
        return Err(ApiError::missing_fields("email, password, name, role"));
    }
    if !email_looks_valid(&req.email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    let role: UserRole = req
        .role
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", req.role)))?;

    // Role-specific requirements checked before any row is written.
    let dealership_id = match role {
        UserRole::Salesperson => {
            let id = req.dealership_id.clone().ok_or_else(|| {
                ApiError::BadRequest("Dealership ID required for salesperson".to_string())
            })?;
            if state.db.get_dealership(&id).await?.is_none() {
                return Err(ApiError::NotFound(format!("Dealership {} not found", id)));
            }
            Some(id)
        }
        _ => None,
    };

    if role == UserRole::Driver && (req.license_number.is_none() || req.radius_miles.is_none()) {
        return Err(ApiError::BadRequest(
            "License number and radius required for driver".to_string(),
        ));
    }

    if state.db.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = state
        .db
        .create_user(&NewUser {
            email: req.email,
            password_hash,
            name: req.name,
            phone: req.phone,
            role,
        })
        .await?;

    match role {
        UserRole::Salesperson => {
            // Checked above; dealership_id is present here.
            if let Some(ref id) = dealership_id {
                state.db.create_salesperson(&user.id, id).await?;
            }
        }
        UserRole::Driver => {
            let license = req.license_number.unwrap_or_default();
            let radius = req.radius_miles.unwrap_or_default();
            state.db.create_driver(&user.id, &license, radius).await?;
        }
        _ => {}
    }

    metrics::record_signup(role.as_str());
    tracing::info!(user_id = %user.id, role = %role, "account created");

    Ok(created("Account created successfully", user))
}

/// `POST /api/auth/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Verifies credentials and returns the account profile.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::missing_fields("email, password"));
    }

    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid email or password".to_string()))?;

    password::verify_password(&req.password, &user.password_hash)?;

    Ok(ok(user))
}

/// `POST /api/auth/dealership-register` body.
#[derive(Debug, Deserialize)]
pub struct DealershipRegisterRequest {
    #[serde(default)]
    pub dealership_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub contact_person_name: String,
    #[serde(default)]
    pub admin_password: String,
}

/// Response payload for a dealership registration.
#[derive(Debug, Serialize)]
pub struct DealershipRegistered {
    pub dealership: Dealership,
    pub admin: User,
}

/// Registers a dealership and auto-creates its admin account.
///
/// The dealership starts PENDING and stays invisible to salespeople until a
/// platform admin approves it.
pub async fn dealership_register(
    State(state): State<AppState>,
    Json(req): Json<DealershipRegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.dealership_name.is_empty()
        || req.address.is_empty()
        || req.contact_email.is_empty()
        || req.contact_person_name.is_empty()
        || req.admin_password.is_empty()
    {
        return Err(ApiError::missing_fields(
            "dealership_name, address, contact_email, contact_person_name, admin_password",
        ));
    }
    if !email_looks_valid(&req.contact_email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    if state
        .db
        .find_user_by_email(&req.contact_email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.admin_password)?;
    let admin = state
        .db
        .create_user(&NewUser {
            email: req.contact_email.clone(),
            password_hash,
            name: req.contact_person_name,
            phone: req.phone.clone(),
            role: UserRole::DealershipAdmin,
        })
        .await?;

    let dealership = state
        .db
        .create_dealership(&NewDealership {
            name: req.dealership_name,
            address: req.address,
            contact_email: req.contact_email,
            phone: req.phone,
            admin_id: admin.id.clone(),
        })
        .await?;

    metrics::record_signup(UserRole::DealershipAdmin.as_str());
    tracing::info!(dealership_id = %dealership.id, "dealership registered, awaiting approval");

    Ok(created(
        "Dealership registered successfully. Awaiting approval.",
        DealershipRegistered { dealership, admin },
    ))
}
