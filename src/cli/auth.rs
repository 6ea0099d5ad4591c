use chrono::Local;
use sqlx::PgPool;
use tracing::info;

use crate::{
    core::security::hash_password,
    model::usuario::{Usuario, TIPO_ADMINISTRADOR},
    repository,
};

/// Seeds an administrador account, the only role allowed to list and delete.
pub async fn create_admin(
    pool: &PgPool,
    email: &str,
    password: &str,
    nome: Option<String>,
) -> anyhow::Result<Usuario> {
    let mut tx = pool.begin().await?;

    let hashed_password = hash_password(password)?;
    let now = Local::now().fixed_offset();
    let usuario = Usuario {
        id: 0,
        nome,
        email: Some(email.to_string()),
        cpf: None,
        senha: hashed_password,
        telefone: None,
        endereco: None,
        descricao: None,
        foto: None,
        tipo: TIPO_ADMINISTRADOR.to_string(),
        created_date: Some(now),
        updated_date: Some(now),
    };
    let usuario = repository::usuario::create_usuario(&mut tx, &usuario).await?;
    tx.commit().await?;
    info!("administrador {} created", usuario.id);
    Ok(usuario)
}
