use poem::{
    http::StatusCode,
    test::{TestClient, TestForm, TestFormField},
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::{
        security::verify_hash_password,
        test_utils::{generate_test_usuario, test_app_state, test_config},
    },
    factory::{endereco::EnderecoFactory, usuario::UsuarioFactory},
    init_openapi_route,
    model::usuario::{Usuario, TABLE_NAME, TIPO_ADMINISTRADOR, TIPO_EMPREENDEDOR},
};

async fn get_usuario(pool: &PgPool, id: i32) -> anyhow::Result<Option<Usuario>> {
    Ok(
        sqlx::query_as(format!("SELECT * FROM {} WHERE id = $1", TABLE_NAME).as_str())
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

#[sqlx::test]
async fn test_paginate_empreendedor_search_by_nome(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.search@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::<()>::new();
    factory.modified_many(|data, idx, _| Usuario {
        nome: Some(format!("Ana {}", idx)),
        ..data.clone()
    });
    factory.generate_many(&app_state.db, 3, ()).await?;
    factory.modified_many(|data, idx, _| Usuario {
        nome: Some(format!("Bruno {}", idx)),
        ..data.clone()
    });
    factory.generate_many(&app_state.db, 2, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("nome", &"Ana")
        .query("page", &0)
        .query("size", &2)
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("content").array().assert_len(2);
    body.get("totalPages").assert_i64(2);
    for idx in 0..2 {
        let item = body.get("content").array().get(idx).object();
        assert!(item.get("nome").string().starts_with("Ana"));
        assert!(item.get_opt("senha").is_none());
    }

    // When second page
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("nome", &"Ana")
        .query("page", &1)
        .query("size", &2)
        .send()
        .await;

    // Expect second page
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(1);
    Ok(())
}

#[sqlx::test]
async fn test_paginate_empreendedor_without_paging(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.all@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    factory.generate_many(&app_state.db, 8, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When no paging params
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .send()
        .await;

    // Expect every empreendedor, the admin excluded, counted with the default size
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(8);
    json.value().object().get("totalPages").assert_i64(2);

    // When only size is given
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("size", &3)
        .send()
        .await;

    // Expect still unpaged
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(8);
    json.value().object().get("totalPages").assert_i64(3);
    Ok(())
}

#[sqlx::test]
async fn test_paginate_empreendedor_size_out_of_range(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.range@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    factory.generate_many(&app_state.db, 8, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("page", &1)
        .query("size", &50)
        .send()
        .await;

    // Expect size falls back to 6, second page holds the remaining 2
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(2);
    json.value().object().get("totalPages").assert_i64(2);

    // When negative page
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("page", &-4)
        .query("size", &5)
        .send()
        .await;

    // Expect first page
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(5);
    json.value().object().get("totalPages").assert_i64(2);
    Ok(())
}

#[sqlx::test]
async fn test_paginate_empreendedor_requires_administrador(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let empreendedor = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "empreendedor.list@local.com",
        "password",
        TIPO_EMPREENDEDOR,
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When wrong role
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", empreendedor.token))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    // When unknown token
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", "Bearer unknown")
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    // When no token
    let resp = cli.get("/api/empreendedores").send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test]
async fn test_empreendedor_detail_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut endereco_factory = EnderecoFactory::new();
    let endereco = endereco_factory.generate_one(&app_state.db, ()).await?;
    let mut factory = UsuarioFactory::<i32>::new();
    factory.modified_one(|data, endereco_id| Usuario {
        endereco: Some(endereco_id),
        ..data.clone()
    });
    let usuario = factory.generate_one(&app_state.db, endereco.id).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get(format!("/api/empreendedores/{}", usuario.id))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("id").assert_i64(usuario.id as i64);
    body.get("nome").assert_string(usuario.nome.as_deref().unwrap_or_default());
    body.get("endereco").assert_i64(endereco.id as i64);
    body.get("dados_endereco")
        .object()
        .get("cidade")
        .assert_string(endereco.cidade.as_deref().unwrap_or_default());
    assert!(body.get_opt("senha").is_none());
    Ok(())
}

#[sqlx::test]
async fn test_empreendedor_detail_not_found(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When missing id
    let resp = cli.get("/api/empreendedores/999999").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    resp.assert_json(&json!({"message": "Empreendedor não encontrado"}))
        .await;

    // When non numeric id
    let resp = cli.get("/api/empreendedores/abc").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test]
async fn test_empreendedor_detail_leading_integer_id(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When trailing text after the id
    let resp = cli
        .get(format!("/api/empreendedores/{}abc", usuario.id))
        .send()
        .await;

    // Expect the leading integer is used
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("id").assert_i64(usuario.id as i64);
    Ok(())
}

#[sqlx::test]
async fn test_paginate_empreendedor_page_beyond_range(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.bigpage@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    factory.generate_many(&app_state.db, 3, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When page does not fit in 32 bits
    let resp = cli
        .get("/api/empreendedores")
        .header("authorization", format!("Bearer {}", admin.token))
        .query("page", &5_000_000_000_i64)
        .query("size", &2)
        .send()
        .await;

    // Expect an empty page, not the first one
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("content").array().assert_len(0);
    json.value().object().get("totalPages").assert_i64(2);
    Ok(())
}

#[sqlx::test]
async fn test_update_senha_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let empreendedor = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "empreendedor.senha@local.com",
        "password",
        TIPO_EMPREENDEDOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put(format!("/api/empreendedores/senha/{}", usuario.id))
        .header("authorization", format!("Bearer {}", empreendedor.token))
        .body_json(&json!({"senha": "abc123"}))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(&json!({"message": "Senha atualizada com sucesso!"}))
        .await;
    let updated = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_ne!(updated.senha, usuario.senha);
    assert_ne!(updated.senha, "abc123");
    assert!(verify_hash_password("abc123", &updated.senha)?);
    Ok(())
}

#[sqlx::test]
async fn test_update_senha_not_found(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.senha@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .put("/api/empreendedores/senha/999999")
        .header("authorization", format!("Bearer {}", admin.token))
        .body_json(&json!({"senha": "abc123"}))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);
    resp.assert_json(&json!({"message": "Empreendedor não encontrado"}))
        .await;
    Ok(())
}

#[sqlx::test]
async fn test_empreendedor_senha_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.getsenha@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get(format!("/api/empreendedores/senha/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("senha").assert_string(&usuario.senha);

    // When missing
    let resp = cli
        .get("/api/empreendedores/senha/999999")
        .header("authorization", format!("Bearer {}", admin.token))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    // When anonymous
    let resp = cli
        .get(format!("/api/empreendedores/senha/{}", usuario.id))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let empreendedor = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "empreendedor.update@local.com",
        "password",
        TIPO_EMPREENDEDOR,
    )
    .await?;
    let mut endereco_factory = EnderecoFactory::new();
    let endereco = endereco_factory.generate_one(&app_state.db, ()).await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let form = TestForm::new()
        .text("nome", "Ana Souza")
        .text("email", "ana.souza@local.com")
        .text("cpf", "123.456.789-09")
        .text("telefone", "81999990000")
        .text("endereco", endereco.id.to_string())
        .text("descricao", "Doces artesanais")
        .field(
            TestFormField::bytes(b"\x89PNG\r\n\x1a\n".to_vec())
                .name("foto")
                .filename("perfil.png")
                .content_type("image/png"),
        );
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", empreendedor.token))
        .multipart(form)
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(&json!({"message": "Empreendedor atualizado com sucesso"}))
        .await;
    let updated = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_eq!(updated.nome, Some("Ana Souza".to_string()));
    assert_eq!(updated.email, Some("ana.souza@local.com".to_string()));
    assert_eq!(updated.cpf, Some("123.456.789-09".to_string()));
    assert_eq!(updated.telefone, Some("81999990000".to_string()));
    assert_eq!(updated.endereco, Some(endereco.id));
    assert_eq!(updated.descricao, Some("Doces artesanais".to_string()));
    let foto = updated.foto.unwrap();
    assert!(foto.starts_with(&config.upload_dir));
    assert!(foto.ends_with(".png"));
    assert!(tokio::fs::metadata(&foto).await.is_ok());
    assert_eq!(updated.senha, usuario.senha);
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_clears_missing_fields(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.update@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When only cpf and a text foto reference are sent
    let form = TestForm::new()
        .text("cpf", "52998224725")
        .text("foto", "https://cdn.local/foto.jpg");
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .multipart(form)
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let updated = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_eq!(updated.cpf, Some("529.982.247-25".to_string()));
    assert_eq!(updated.foto, Some("https://cdn.local/foto.jpg".to_string()));
    assert_eq!(updated.nome, None);
    assert_eq!(updated.descricao, None);
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_normalizes_cpf(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.cpfshape@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    for cpf in ["  123.456.789-09  ", "1.2.3.4.5.6.7.8.9.0.9", "12345678909"] {
        // When
        let form = TestForm::new().text("nome", "Ana").text("cpf", cpf);
        let resp = cli
            .put(format!("/api/empreendedores/{}", usuario.id))
            .header("authorization", format!("Bearer {}", admin.token))
            .multipart(form)
            .send()
            .await;

        // Expect stored in the canonical form
        resp.assert_status_is_ok();
        let updated = get_usuario(&app_state.db, usuario.id).await?.unwrap();
        assert_eq!(updated.cpf, Some("123.456.789-09".to_string()), "cpf = {cpf:?}");
    }
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_failed_write_removes_upload(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = test_config();
    config.upload_dir = std::env::temp_dir()
        .join(format!("empreendedores-orphan-{}", Uuid::now_v7()))
        .to_string_lossy()
        .to_string();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.orphan@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When the email collides with another usuario, the update fails on write
    let form = TestForm::new()
        .text("email", "admin.orphan@local.com")
        .text("cpf", "52998224725")
        .field(
            TestFormField::bytes(b"\x89PNG\r\n\x1a\n".to_vec())
                .name("foto")
                .filename("perfil.png")
                .content_type("image/png"),
        );
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .multipart(form)
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let mut entries = tokio::fs::read_dir(&config.upload_dir).await?;
    assert!(entries.next_entry().await?.is_none());
    let stored = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_eq!(stored.email, usuario.email);
    assert_eq!(stored.foto, None);
    tokio::fs::remove_dir_all(&config.upload_dir).await?;
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_invalid_cpf(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let empreendedor = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "empreendedor.cpf@local.com",
        "password",
        TIPO_EMPREENDEDOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let form = TestForm::new()
        .text("nome", "Outro Nome")
        .text("cpf", "111.111.111-11");
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", empreendedor.token))
        .multipart(form)
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(&json!({"message": "CPF inválido"})).await;
    let stored = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_eq!(stored.nome, usuario.nome);
    assert_eq!(stored.cpf, usuario.cpf);
    assert_eq!(stored.updated_date, usuario.updated_date);
    Ok(())
}

#[sqlx::test]
async fn test_update_empreendedor_rejects_bad_references(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.refs@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When unknown endereco
    let form = TestForm::new()
        .text("cpf", "52998224725")
        .text("endereco", "999999");
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .multipart(form)
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(&json!({"message": "Endereço não encontrado"}))
        .await;

    // When foto is not an image
    let form = TestForm::new().text("cpf", "52998224725").field(
        TestFormField::bytes(b"hello".to_vec())
            .name("foto")
            .filename("notes.txt")
            .content_type("text/plain"),
    );
    let resp = cli
        .put(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .multipart(form)
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(&json!({"message": "Formato de imagem inválido"}))
        .await;

    // When missing usuario
    let form = TestForm::new().text("cpf", "52998224725");
    let resp = cli
        .put("/api/empreendedores/999999")
        .header("authorization", format!("Bearer {}", admin.token))
        .multipart(form)
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let stored = get_usuario(&app_state.db, usuario.id).await?.unwrap();
    assert_eq!(stored.nome, usuario.nome);
    Ok(())
}

#[sqlx::test]
async fn test_delete_empreendedor_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let admin = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "admin.delete@local.com",
        "password",
        TIPO_ADMINISTRADOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .delete(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(&json!({"message": "Empreendedor deletado com sucesso"}))
        .await;
    assert!(get_usuario(&app_state.db, usuario.id).await?.is_none());

    // When deleted twice
    let resp = cli
        .delete(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", admin.token))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);
    resp.assert_json(&json!({"message": "Empreendedor não encontrado"}))
        .await;
    Ok(())
}

#[sqlx::test]
async fn test_delete_empreendedor_requires_administrador(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app_state = test_app_state(pool, &config)?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let empreendedor = generate_test_usuario(
        &mut db,
        &mut redis_conn,
        &config,
        "empreendedor.delete@local.com",
        "password",
        TIPO_EMPREENDEDOR,
    )
    .await?;
    let mut factory = UsuarioFactory::new();
    let usuario = factory.generate_one(&app_state.db, ()).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .delete(format!("/api/empreendedores/{}", usuario.id))
        .header("authorization", format!("Bearer {}", empreendedor.token))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::FORBIDDEN);
    assert!(get_usuario(&app_state.db, usuario.id).await?.is_some());
    Ok(())
}
