use chrono::{DateTime, FixedOffset};
use sqlx::{Postgres, Transaction};

use crate::{
    core::{
        pagination::Pagination,
        sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    },
    model::{
        endereco::Endereco,
        usuario::{Usuario, TABLE_NAME, TIPO_EMPREENDEDOR},
    },
    repository::endereco::get_endereco_by_id,
};

/// Empreendedores matching the optional name filter, with the total count of
/// the filter. `paging` of `None` returns every matching row.
pub async fn get_all_empreendedor(
    tx: &mut Transaction<'_, Postgres>,
    nome: Option<String>,
    paging: Option<&Pagination>,
) -> anyhow::Result<(Vec<Usuario>, u32)> {
    let mut binds: Vec<SqlxBinds> = vec![SqlxBinds::String(TIPO_EMPREENDEDOR.to_string())];
    let mut filters: Vec<String> = vec!["tipo = $1".to_string()];

    if let Some(nome) = nome {
        binds.push(SqlxBinds::String(format!("%{}%", nome)));
        filters.push(format!("nome LIKE ${}", binds.len()));
    }

    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec!["id ASC".to_string()],
        paging.map(|x| x.limit()),
        paging.map(|x| x.offset()),
    );
    let stmt_count = query_builder(
        Some("count(id)".to_string()),
        TABLE_NAME,
        &filters,
        vec![],
        None,
        None,
    );

    let q = binds_query_as::<Usuario>(&stmt, binds.clone());
    let q_count = binds_query_as::<(i64,)>(&stmt_count, binds);
    let data = q.fetch_all(&mut **tx).await?;
    let count = q_count.fetch_one(&mut **tx).await?;
    Ok((data, u32::try_from(count.0)?))
}

pub async fn get_usuario_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> anyhow::Result<Option<Usuario>> {
    let stmt = query_builder(None, TABLE_NAME, &["id = $1".to_string()], vec![], None, None);
    Ok(binds_query_as::<Usuario>(&stmt, vec![SqlxBinds::Int(id)])
        .fetch_optional(&mut **tx)
        .await?)
}

/// Usuario joined with its address.
pub async fn get_usuario_with_endereco(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> anyhow::Result<(Option<Usuario>, Option<Endereco>)> {
    let usuario = get_usuario_by_id(tx, id).await?;
    let endereco = match usuario.as_ref().and_then(|x| x.endereco) {
        Some(endereco_id) => get_endereco_by_id(tx, endereco_id).await?,
        None => None,
    };
    Ok((usuario, endereco))
}

pub async fn get_usuario_by_email(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
) -> anyhow::Result<Option<Usuario>> {
    Ok(sqlx::query_as(
        format!("SELECT * FROM {} WHERE email = $1", TABLE_NAME).as_str(),
    )
    .bind(email)
    .fetch_optional(&mut **tx)
    .await?)
}

pub async fn create_usuario(
    tx: &mut Transaction<'_, Postgres>,
    usuario: &Usuario,
) -> anyhow::Result<Usuario> {
    Ok(sqlx::query_as(
        format!(
            r#"
        INSERT INTO {} (nome, email, cpf, senha, telefone, endereco, descricao, foto, tipo, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&usuario.nome)
    .bind(&usuario.email)
    .bind(&usuario.cpf)
    .bind(&usuario.senha)
    .bind(&usuario.telefone)
    .bind(usuario.endereco)
    .bind(&usuario.descricao)
    .bind(&usuario.foto)
    .bind(&usuario.tipo)
    .bind(usuario.created_date)
    .bind(usuario.updated_date)
    .fetch_one(&mut **tx)
    .await?)
}

pub async fn update_senha(
    tx: &mut Transaction<'_, Postgres>,
    usuario: &mut Usuario,
    senha: String,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<()> {
    usuario.senha = senha;
    usuario.updated_date = Some(*now);
    sqlx::query(
        format!(
            "UPDATE {} SET senha = $1, updated_date = $2 WHERE id = $3",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&usuario.senha)
    .bind(now)
    .bind(usuario.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Writes every profile column of `usuario`, NULLs included.
pub async fn update_usuario(
    tx: &mut Transaction<'_, Postgres>,
    usuario: &mut Usuario,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<()> {
    usuario.updated_date = Some(*now);
    sqlx::query(
        format!(
            r#"UPDATE {}
            SET nome = $1, email = $2, cpf = $3, telefone = $4, endereco = $5,
            descricao = $6, foto = $7, updated_date = $8
            WHERE id = $9"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&usuario.nome)
    .bind(&usuario.email)
    .bind(&usuario.cpf)
    .bind(&usuario.telefone)
    .bind(usuario.endereco)
    .bind(&usuario.descricao)
    .bind(&usuario.foto)
    .bind(now)
    .bind(usuario.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete_usuario(
    tx: &mut Transaction<'_, Postgres>,
    usuario: &Usuario,
) -> anyhow::Result<()> {
    sqlx::query(format!("DELETE FROM {} WHERE id = $1", TABLE_NAME).as_str())
        .bind(usuario.id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
