use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Local};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};
use redis::ConnectionLike;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{model::usuario::Usuario, repository::usuario::get_usuario_by_id, settings::Config};

use super::session::get_session;

/// password hashing
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    // Argon2 with default params (Argon2id v19)
    let argon2 = Argon2::default();

    // Hash password to PHC string ($argon2id$v=19$...)
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    Ok(password_hash)
}

/// password hash verification
pub fn verify_hash_password(
    password: &str,
    password_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    let verify = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(verify)
}


pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub tipo: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(usuario: &Usuario, config: &Config) -> Self {
        let exp = (Local::now() + Duration::minutes(config.jwt_exp as i64)).timestamp();

        Self {
            id: usuario.id,
            email: usuario.email.clone().unwrap_or_default(),
            tipo: usuario.tipo.clone(),
            exp,
        }
    }
}

/// Generate token
pub fn encode_token(claims: &Claims, jwt_secret: &str) -> anyhow::Result<String> {
    let keys = Keys::new(jwt_secret.as_bytes());
    let token = encode(&Header::default(), &claims, &keys.encoding)?;
    Ok(token)
}

/// Extract payload and Validate token
pub fn decode_token(token: &str, jwt_secret: &str) -> anyhow::Result<Claims> {
    let keys = Keys::new(jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(token_data.claims)
}

pub fn generate_token_from_usuario(usuario: &Usuario, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(usuario, config);
    encode_token(&claims, &config.jwt_secret)
}

/// Resolves a bearer token to its user. A token that does not decode, has no
/// live session, or whose user is gone resolves to `None`.
pub async fn get_usuario_from_token<C: ConnectionLike>(
    tx: &mut Transaction<'_, Postgres>,
    redis_conn: &mut C,
    config: &Config,
    jwt_token: Option<String>,
) -> anyhow::Result<Option<Usuario>> {
    let Some(jwt_token) = jwt_token else {
        return Ok(None);
    };
    if let Err(err) = decode_token(&jwt_token, &config.jwt_secret) {
        debug!("rejected bearer token: {}", err);
        return Ok(None);
    }
    let Some(session) = get_session(redis_conn, jwt_token)? else {
        return Ok(None);
    };
    get_usuario_by_id(tx, session.usuario_id).await
}

pub enum Authorization {
    Granted(Usuario),
    Unauthenticated,
    Forbidden,
}

/// Role gate: the caller must hold a live session and its `tipo` must be one
/// of `allowed_roles`.
pub async fn authorize<C: ConnectionLike>(
    tx: &mut Transaction<'_, Postgres>,
    redis_conn: &mut C,
    config: &Config,
    jwt_token: Option<String>,
    allowed_roles: &[&str],
) -> anyhow::Result<Authorization> {
    let usuario = match get_usuario_from_token(tx, redis_conn, config, jwt_token).await? {
        Some(val) => val,
        None => return Ok(Authorization::Unauthenticated),
    };
    if !allowed_roles.contains(&usuario.tipo.as_str()) {
        debug!(
            "usuario {} with tipo {} is not one of {:?}",
            usuario.id, usuario.tipo, allowed_roles
        );
        return Ok(Authorization::Forbidden);
    }
    Ok(Authorization::Granted(usuario))
}


#[derive(Debug, Serialize, Deserialize)]
pub struct UserApiKey {
    pub token: Option<String>,
}

/// ApiKey authorization
#[derive(SecurityScheme)]
#[oai(ty = "bearer", checker = "bearer_checker")]
pub struct BearerAuthorization(pub UserApiKey);

pub async fn bearer_checker(_req: &Request, api_key: Bearer) -> Option<UserApiKey> {
    Some(UserApiKey {
        token: Some(api_key.token),
    })
}
