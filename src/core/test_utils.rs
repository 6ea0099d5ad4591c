use std::sync::Arc;

use fake::{Fake, Faker};
use redis::ConnectionLike;
use sqlx::{pool::PoolConnection, PgPool, Postgres};

use super::security::generate_token_from_usuario;
use crate::core::security::hash_password;
use crate::core::session::add_session;
use crate::model::usuario::Usuario;
use crate::settings::{get_config, Config};
use crate::AppState;

pub fn generate_random<T: fake::Dummy<fake::Faker>>() -> T {
    Faker.fake()
}

/// Environment config with the `/api` prefix and a throwaway upload dir.
pub fn test_config() -> Config {
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    config.upload_dir = std::env::temp_dir()
        .join("empreendedores-test-uploads")
        .to_string_lossy()
        .to_string();
    config
}

pub fn test_app_state(pool: PgPool, config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = redis::Client::open(config.redis_url.clone())?;
    let redis_pool = r2d2::Pool::builder().build(client)?;
    Ok(Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
        config: config.clone(),
    }))
}

pub struct TestUsuario {
    pub usuario: Usuario,
    pub token: String,
}

pub async fn generate_test_usuario<C: ConnectionLike>(
    db: &mut PoolConnection<Postgres>,
    redis_conn: &mut C,
    config: &Config,
    email: &str,
    password: &str,
    tipo: &str,
) -> anyhow::Result<TestUsuario> {
    let hashed_password = hash_password(password)?;
    let usuario: Usuario = sqlx::query_as(
        r#"
        INSERT INTO public.usuario (nome, email, senha, tipo)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(format!("test {}", tipo))
    .bind(email)
    .bind(&hashed_password)
    .bind(tipo)
    .fetch_one(&mut **db)
    .await?;

    let token = generate_token_from_usuario(&usuario, config)?;
    add_session(redis_conn, &usuario, config, token.clone())?;

    Ok(TestUsuario { usuario, token })
}
