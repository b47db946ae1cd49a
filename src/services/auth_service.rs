use crate::{
    database::MongoDB,
    models::{Admin, User},
    utils::blacklist::TokenBlacklist,
    utils::error::AppError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT claims for student sessions
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserClaims {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "rollNumber")]
    pub roll_number: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

// JWT claims for admin sessions; `role` is what separates them from user
// tokens, so a user token decodes here with an empty role and fails the
// role check instead of the signature check.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub roll_number: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdminAuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub user_json_url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoggedInUser,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminInfo {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}

const TOKEN_LIFETIME_HOURS: i64 = 24;

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string())
}

// Generate a user JWT (24h)
pub fn generate_user_token(user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;

    let claims = UserClaims {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email.clone(),
        name: user.name.clone(),
        roll_number: user.roll_number.clone(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Generate an admin JWT (24h) with the role claim embedded
pub fn generate_admin_token(admin: &Admin) -> Result<String, AppError> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;

    let claims = AdminClaims {
        id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: admin.email.clone(),
        role: "admin".to_string(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a user token signature and expiry.
pub fn verify_token(token: &str) -> Result<UserClaims, AppError> {
    decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Authentication("Invalid token".to_string()))
}

/// Verifies an admin token: signature, expiry, and the role claim.
pub fn verify_admin_token(token: &str) -> Result<AdminClaims, AppError> {
    let claims = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Authentication("Invalid token".to_string()))?;

    if claims.role != "admin" {
        return Err(AppError::Authorization(
            "Not authorized as admin".to_string(),
        ));
    }

    Ok(claims)
}

// User signup
pub async fn signup(db: &MongoDB, request: &SignupRequest) -> Result<SignupResponse, AppError> {
    let collection = db.collection::<User>("users");

    let filter = doc! {
        "$or": [
            { "email": &request.email },
            { "rollNumber": &request.roll_number },
        ]
    };

    if let Some(existing) = collection
        .find_one(filter)
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
    {
        let message = if existing.email == request.email {
            "Email already registered"
        } else {
            "Roll number already registered"
        };
        return Err(AppError::Conflict(message.to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        name: request.name.clone(),
        email: request.email.clone(),
        roll_number: request.roll_number.clone(),
        password: Some(hashed_password),
        // Email ownership was already proven during the verify-email step
        is_verified: true,
        created_at: Some(BsonDateTime::now()),
        last_login: None,
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

    log::info!("✅ User registered: {}", request.email);

    Ok(SignupResponse {
        message: "Account created successfully".to_string(),
        user: PublicUser {
            name: new_user.name,
            email: new_user.email,
            roll_number: new_user.roll_number,
        },
    })
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;
    if !valid {
        return Err(AppError::Authentication(
            "Invalid email or password".to_string(),
        ));
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::Database("User record has no id".to_string()))?;

    collection
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": { "lastLogin": BsonDateTime::now() } },
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update last login: {}", e)))?;

    let token = generate_user_token(&user)?;

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: LoggedInUser {
            id: user_id.to_hex(),
            name: user.name,
            email: user.email,
            roll_number: user.roll_number,
        },
    })
}

/// Revokes the presented token until its natural expiry.
pub fn logout(blacklist: &TokenBlacklist, token: &str) {
    let expires_at = verify_token(token)
        .map(|claims| claims.exp as i64)
        .unwrap_or_else(|_| (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp());

    blacklist.revoke(token, expires_at);
}

/// Authenticated user's profile, without the password hash.
pub async fn profile(db: &MongoDB, user_id: &str) -> Result<User, AppError> {
    let object_id = ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Authentication("Invalid token".to_string()))?;

    let mut user = db
        .collection::<User>("users")
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.password = None;
    Ok(user)
}

// Admin signup
pub async fn admin_signup(db: &MongoDB, request: &AdminAuthRequest) -> Result<String, AppError> {
    let collection = db.collection::<Admin>("admins");

    if collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .is_some()
    {
        return Err(AppError::Conflict("Admin already exists".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let new_admin = Admin {
        id: None,
        email: request.email.clone(),
        password: Some(hashed_password),
        created_at: Some(BsonDateTime::now()),
        last_login: None,
    };

    collection
        .insert_one(&new_admin)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create admin: {}", e)))?;

    log::info!("✅ Admin registered: {}", request.email);

    Ok("Admin created successfully".to_string())
}

// Admin login
pub async fn admin_login(
    db: &MongoDB,
    request: &AdminAuthRequest,
) -> Result<AdminLoginResponse, AppError> {
    let collection = db.collection::<Admin>("admins");

    let admin = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    let stored_password = admin
        .password
        .as_ref()
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;
    if !valid {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let admin_id = admin
        .id
        .ok_or_else(|| AppError::Database("Admin record has no id".to_string()))?;

    collection
        .update_one(
            doc! { "_id": admin_id },
            doc! { "$set": { "lastLogin": BsonDateTime::now() } },
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update last login: {}", e)))?;

    let token = generate_admin_token(&admin)?;

    Ok(AdminLoginResponse {
        message: "Login successful".to_string(),
        token,
        admin: AdminInfo {
            id: admin_id.to_hex(),
            email: admin.email,
        },
    })
}

/// Looks up an admin by the id embedded in a token.
pub async fn find_admin(db: &MongoDB, admin_id: &str) -> Result<Option<Admin>, AppError> {
    let object_id = ObjectId::parse_str(admin_id)
        .map_err(|_| AppError::Authentication("Invalid token".to_string()))?;

    db.collection::<Admin>("admins")
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))
}

/// Full admin verification: token role claim plus an existence check, so a
/// token issued for a since-deleted admin stops working.
pub async fn admin_verify(db: &MongoDB, token: &str) -> Result<AdminInfo, AppError> {
    let claims = verify_admin_token(token)?;

    let admin = find_admin(db, &claims.id)
        .await?
        .ok_or_else(|| AppError::Authentication("Admin not found".to_string()))?;

    Ok(AdminInfo {
        id: claims.id,
        email: admin.email,
    })
}

/// Email verification passthrough: fetches the verification payload produced
/// by the external provider and extracts the verified address.
pub async fn fetch_verified_email(user_json_url: &str) -> Result<String, AppError> {
    let response = reqwest::get(user_json_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch email: {}", e)))?;

    let payload: serde_json::Value = response.json().await.map_err(|e| {
        AppError::Internal(format!(
            "Invalid response from email verification service: {}",
            e
        ))
    })?;

    payload["user_email_id"]
        .as_str()
        .map(|email| email.to_string())
        .ok_or_else(|| {
            AppError::Internal("Invalid response from email verification service".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            roll_number: "2105555".to_string(),
            password: None,
            is_verified: true,
            created_at: Some(BsonDateTime::now()),
            last_login: None,
        }
    }

    fn sample_admin() -> Admin {
        Admin {
            id: Some(ObjectId::new()),
            email: "admin@example.com".to_string(),
            password: None,
            created_at: Some(BsonDateTime::now()),
            last_login: None,
        }
    }

    #[test]
    fn test_user_token_roundtrip() {
        let user = sample_user();
        let token = generate_user_token(&user).unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.id, user.id.unwrap().to_hex());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.roll_number, user.roll_number);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = UserClaims {
            id: ObjectId::new().to_hex(),
            email: "asha@example.com".to_string(),
            name: "Asha Rao".to_string(),
            roll_number: "2105555".to_string(),
            iat: (Utc::now() - Duration::hours(25)).timestamp() as usize,
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_admin_token_carries_role() {
        let admin = sample_admin();
        let token = generate_admin_token(&admin).unwrap();

        let claims = verify_admin_token(&token).unwrap();
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.id, admin.id.unwrap().to_hex());
    }

    #[test]
    fn test_user_token_is_not_admin() {
        let token = generate_user_token(&sample_user()).unwrap();

        match verify_admin_token(&token) {
            Err(AppError::Authorization(_)) => {}
            other => panic!("expected Authorization error, got {:?}", other),
        }
    }

    #[test]
    fn test_logout_revokes_exact_token() {
        let blacklist = TokenBlacklist::new();
        let token = generate_user_token(&sample_user()).unwrap();

        logout(&blacklist, &token);
        assert!(blacklist.contains(&token));

        let other = generate_user_token(&sample_user()).unwrap();
        assert!(!blacklist.contains(&other));
    }
}
