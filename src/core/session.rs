use redis::ConnectionLike;
use serde::{Deserialize, Serialize};

use crate::{model::usuario::Usuario, settings::Config};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub usuario_id: i32,
    pub tipo: String,
}

/// Stores the session under the token itself, expiring with the token.
pub fn add_session<C: ConnectionLike>(
    redis_conn: &mut C,
    usuario: &Usuario,
    config: &Config,
    token: String,
) -> anyhow::Result<()> {
    let session_data = SessionData {
        usuario_id: usuario.id,
        tipo: usuario.tipo.clone(),
    };
    let session_json = serde_json::to_string(&session_data)?;
    redis::Cmd::set_ex(token, session_json, config.jwt_exp as u64 * 60).exec(redis_conn)?;
    Ok(())
}

pub fn get_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<Option<SessionData>> {
    let res: Option<String> = redis::cmd("get").arg(token).query(redis_conn)?;
    match res {
        Some(val) => Ok(Some(serde_json::from_str(&val)?)),
        None => Ok(None),
    }
}

pub fn remove_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<bool> {
    let removed: i64 = redis::cmd("del").arg(token).query(redis_conn)?;
    Ok(removed > 0)
}
