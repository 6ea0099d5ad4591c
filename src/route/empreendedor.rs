use std::sync::Arc;

use chrono::Local;
use poem::web::Data;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use tracing::{info, warn};

use crate::{
    core::{
        cpf::normalize_cpf,
        pagination::Pagination,
        security::{authorize, hash_password, Authorization, BearerAuthorization},
        upload::{image_extension, remove_image, store_image},
        utils::parse_leading_int,
    },
    model::usuario::{TIPO_ADMINISTRADOR, TIPO_EMPREENDEDOR},
    repository::{
        endereco::get_endereco_by_id,
        usuario::{
            delete_usuario, get_all_empreendedor, get_usuario_by_id, get_usuario_with_endereco,
            update_senha, update_usuario,
        },
    },
    schema::{
        common::{
            BadRequestResponse, ForbiddenResponse, InternalServerErrorResponse, MessageResponse,
            NotFoundResponse, UnauthorizedResponse,
        },
        empreendedor::{
            DeleteEmpreendedorResponses, DetailEmpreendedor, EmpreendedorDetailResponse,
            EmpreendedorDetailResponses, EmpreendedorPageResponse, EmpreendedorSenhaResponse,
            EmpreendedorSenhaResponses, GetPaginateEmpreendedorResponses, UpdateEmpreendedorForm,
            UpdateEmpreendedorResponses, UpdateSenhaRequest, UpdateSenhaResponses, CPF_INVALIDO,
            EMPREENDEDOR_ATUALIZADO, EMPREENDEDOR_DELETADO, EMPREENDEDOR_NOT_FOUND,
            ENDERECO_NOT_FOUND, IMAGEM_INVALIDA, SENHA_ATUALIZADA,
        },
    },
    AppState,
};

const ADMIN_ONLY: &[&str] = &[TIPO_ADMINISTRADOR];
const OWNER_OR_ADMIN: &[&str] = &[TIPO_EMPREENDEDOR, TIPO_ADMINISTRADOR];

/// Leading integer of the path segment; ids without one address nothing.
fn parse_id(id: &str) -> Option<i32> {
    parse_leading_int(id).and_then(|x| i32::try_from(x).ok())
}

fn not_found() -> NotFoundResponse {
    NotFoundResponse {
        message: EMPREENDEDOR_NOT_FOUND.to_string(),
    }
}

#[derive(Tags)]
enum ApiEmpreendedorTags {
    Empreendedor,
}

pub struct ApiEmpreendedor;

#[OpenApi]
impl ApiEmpreendedor {
    #[oai(
        path = "/empreendedores",
        method = "get",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn get_paginate_empreendedor_api(
        &self,
        Query(page): Query<Option<String>>,
        Query(size): Query<Option<String>>,
        Query(nome): Query<Option<String>>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> GetPaginateEmpreendedorResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return GetPaginateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "get_paginate_empreendedor_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return GetPaginateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "get_paginate_empreendedor_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token and role
        match authorize(
            &mut tx,
            &mut redis_conn,
            &state.config,
            auth.0.token,
            ADMIN_ONLY,
        )
        .await
        {
            Ok(Authorization::Granted(_)) => {}
            Ok(Authorization::Unauthenticated) => {
                return GetPaginateEmpreendedorResponses::Unauthorized(Json(
                    UnauthorizedResponse::default(),
                ))
            }
            Ok(Authorization::Forbidden) => {
                return GetPaginateEmpreendedorResponses::Forbidden(Json(
                    ForbiddenResponse::default(),
                ))
            }
            Err(err) => {
                return GetPaginateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "get_paginate_empreendedor_api",
                        "authorize",
                        &err.to_string(),
                    ),
                ))
            }
        }

        // name search is always paged, otherwise only when both page and size are given
        let pagination = Pagination::from_query(page.as_deref(), size.as_deref());
        let nome = nome.filter(|x| !x.is_empty());
        let paging = if nome.is_some() || pagination.explicit {
            Some(&pagination)
        } else {
            None
        };
        let (data, count) = match get_all_empreendedor(&mut tx, nome, paging).await {
            Ok(val) => val,
            Err(err) => {
                return GetPaginateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "get_paginate_empreendedor_api",
                        "get_all_empreendedor",
                        &err.to_string(),
                    ),
                ))
            }
        };

        GetPaginateEmpreendedorResponses::Ok(Json(EmpreendedorPageResponse {
            content: data.into_iter().map(DetailEmpreendedor::from).collect(),
            total_pages: pagination.total_pages(count),
        }))
    }

    #[oai(
        path = "/empreendedores/:id",
        method = "get",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn empreendedor_detail_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> EmpreendedorDetailResponses {
        let Some(id) = parse_id(&id) else {
            return EmpreendedorDetailResponses::NotFound(Json(not_found()));
        };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return EmpreendedorDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_detail_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        let (usuario, endereco) = match get_usuario_with_endereco(&mut tx, id).await {
            Ok(val) => val,
            Err(err) => {
                return EmpreendedorDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_detail_api",
                        "get_usuario_with_endereco",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match usuario {
            Some(usuario) => EmpreendedorDetailResponses::Ok(Json(
                EmpreendedorDetailResponse::new(usuario, endereco),
            )),
            None => EmpreendedorDetailResponses::NotFound(Json(not_found())),
        }
    }

    #[oai(
        path = "/empreendedores/senha/:id",
        method = "put",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn update_senha_api(
        &self,
        Path(id): Path<String>,
        Json(json): Json<UpdateSenhaRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> UpdateSenhaResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return UpdateSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_senha_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return UpdateSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_senha_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token and role
        match authorize(
            &mut tx,
            &mut redis_conn,
            &state.config,
            auth.0.token,
            OWNER_OR_ADMIN,
        )
        .await
        {
            Ok(Authorization::Granted(_)) => {}
            Ok(Authorization::Unauthenticated) => {
                return UpdateSenhaResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
            Ok(Authorization::Forbidden) => {
                return UpdateSenhaResponses::Forbidden(Json(ForbiddenResponse::default()))
            }
            Err(err) => {
                return UpdateSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_senha_api",
                        "authorize",
                        &err.to_string(),
                    ),
                ))
            }
        }

        // get usuario on db
        let Some(id) = parse_id(&id) else {
            return UpdateSenhaResponses::NotFound(Json(not_found()));
        };
        let usuario = match get_usuario_by_id(&mut tx, id).await {
            Ok(val) => val,
            Err(err) => {
                return UpdateSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_senha_api",
                        "get_usuario_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let Some(mut usuario) = usuario else {
            return UpdateSenhaResponses::NotFound(Json(not_found()));
        };

        let senha = match hash_password(&json.senha) {
            Ok(val) => val,
            Err(err) => {
                return UpdateSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_senha_api",
                        "hash_password",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let now = Local::now().fixed_offset();
        if let Err(err) = update_senha(&mut tx, &mut usuario, senha, &now).await {
            return UpdateSenhaResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.empreendedor",
                    "update_senha_api",
                    "update_senha",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return UpdateSenhaResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.empreendedor",
                    "update_senha_api",
                    "commit to database",
                    &err.to_string(),
                ),
            ));
        }

        info!("senha updated for usuario {}", usuario.id);
        UpdateSenhaResponses::Ok(Json(MessageResponse::new(SENHA_ATUALIZADA)))
    }

    #[oai(
        path = "/empreendedores/senha/:id",
        method = "get",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn empreendedor_senha_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> EmpreendedorSenhaResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return EmpreendedorSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_senha_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return EmpreendedorSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_senha_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token and role
        match authorize(
            &mut tx,
            &mut redis_conn,
            &state.config,
            auth.0.token,
            OWNER_OR_ADMIN,
        )
        .await
        {
            Ok(Authorization::Granted(_)) => {}
            Ok(Authorization::Unauthenticated) => {
                return EmpreendedorSenhaResponses::Unauthorized(Json(
                    UnauthorizedResponse::default(),
                ))
            }
            Ok(Authorization::Forbidden) => {
                return EmpreendedorSenhaResponses::Forbidden(Json(ForbiddenResponse::default()))
            }
            Err(err) => {
                return EmpreendedorSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_senha_api",
                        "authorize",
                        &err.to_string(),
                    ),
                ))
            }
        }

        let Some(id) = parse_id(&id) else {
            return EmpreendedorSenhaResponses::NotFound(Json(not_found()));
        };
        let (usuario, endereco) = match get_usuario_with_endereco(&mut tx, id).await {
            Ok(val) => val,
            Err(err) => {
                return EmpreendedorSenhaResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "empreendedor_senha_api",
                        "get_usuario_with_endereco",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match usuario {
            Some(usuario) => EmpreendedorSenhaResponses::Ok(Json(EmpreendedorSenhaResponse::new(
                usuario, endereco,
            ))),
            None => EmpreendedorSenhaResponses::NotFound(Json(not_found())),
        }
    }

    #[oai(
        path = "/empreendedores/:id",
        method = "put",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn update_empreendedor_api(
        &self,
        Path(id): Path<String>,
        form: UpdateEmpreendedorForm,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> UpdateEmpreendedorResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return UpdateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_empreendedor_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return UpdateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_empreendedor_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token and role
        match authorize(
            &mut tx,
            &mut redis_conn,
            &state.config,
            auth.0.token,
            OWNER_OR_ADMIN,
        )
        .await
        {
            Ok(Authorization::Granted(_)) => {}
            Ok(Authorization::Unauthenticated) => {
                return UpdateEmpreendedorResponses::Unauthorized(Json(
                    UnauthorizedResponse::default(),
                ))
            }
            Ok(Authorization::Forbidden) => {
                return UpdateEmpreendedorResponses::Forbidden(Json(ForbiddenResponse::default()))
            }
            Err(err) => {
                return UpdateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_empreendedor_api",
                        "authorize",
                        &err.to_string(),
                    ),
                ))
            }
        }

        // get usuario on db
        let Some(id) = parse_id(&id) else {
            return UpdateEmpreendedorResponses::NotFound(Json(not_found()));
        };
        let usuario = match get_usuario_by_id(&mut tx, id).await {
            Ok(val) => val,
            Err(err) => {
                return UpdateEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "update_empreendedor_api",
                        "get_usuario_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let Some(mut usuario) = usuario else {
            return UpdateEmpreendedorResponses::NotFound(Json(not_found()));
        };

        // validate form, nothing is written before this passes
        let Some(cpf) = form.cpf.as_deref().and_then(normalize_cpf) else {
            return UpdateEmpreendedorResponses::BadRequest(Json(BadRequestResponse {
                message: CPF_INVALIDO.to_string(),
            }));
        };
        if let Some(endereco_id) = form.endereco {
            match get_endereco_by_id(&mut tx, endereco_id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return UpdateEmpreendedorResponses::BadRequest(Json(BadRequestResponse {
                        message: ENDERECO_NOT_FOUND.to_string(),
                    }))
                }
                Err(err) => {
                    return UpdateEmpreendedorResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.empreendedor",
                            "update_empreendedor_api",
                            "get_endereco_by_id",
                            &err.to_string(),
                        ),
                    ))
                }
            }
        }

        // foto: uploaded image or plain text reference
        let mut stored_foto: Option<String> = None;
        let foto = match form.foto {
            Some(upload) if upload.file_name().is_some() => {
                let Some(extension) = image_extension(upload.file_name(), upload.content_type())
                else {
                    return UpdateEmpreendedorResponses::BadRequest(Json(BadRequestResponse {
                        message: IMAGEM_INVALIDA.to_string(),
                    }));
                };
                let bytes = match upload.into_vec().await {
                    Ok(val) => val,
                    Err(err) => {
                        return UpdateEmpreendedorResponses::InternalServerError(Json(
                            InternalServerErrorResponse::new(
                                "route.empreendedor",
                                "update_empreendedor_api",
                                "read foto upload",
                                &err.to_string(),
                            ),
                        ))
                    }
                };
                match store_image(&state.config.upload_dir, &extension, &bytes).await {
                    Ok(path) => {
                        stored_foto = Some(path.clone());
                        Some(path)
                    }
                    Err(err) => {
                        return UpdateEmpreendedorResponses::InternalServerError(Json(
                            InternalServerErrorResponse::new(
                                "route.empreendedor",
                                "update_empreendedor_api",
                                "store_image",
                                &err.to_string(),
                            ),
                        ))
                    }
                }
            }
            Some(upload) => match upload.into_string().await {
                Ok(val) => Some(val).filter(|x| !x.is_empty()),
                Err(err) => {
                    return UpdateEmpreendedorResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.empreendedor",
                            "update_empreendedor_api",
                            "read foto field",
                            &err.to_string(),
                        ),
                    ))
                }
            },
            None => None,
        };

        // full update, absent fields are cleared
        usuario.nome = form.nome;
        usuario.email = form.email;
        usuario.cpf = Some(cpf);
        usuario.telefone = form.telefone;
        usuario.endereco = form.endereco;
        usuario.descricao = form.descricao;
        usuario.foto = foto;
        let now = Local::now().fixed_offset();
        let saved = match update_usuario(&mut tx, &mut usuario, &now).await {
            Ok(()) => tx
                .commit()
                .await
                .map_err(|err| ("commit to database", anyhow::Error::from(err))),
            Err(err) => Err(("update_usuario", err)),
        };
        if let Err((step, err)) = saved {
            // the row was not written, drop the image stored for it
            if let Some(path) = stored_foto {
                if let Err(remove_err) = remove_image(&path).await {
                    warn!("could not remove orphan upload {}: {}", path, remove_err);
                }
            }
            return UpdateEmpreendedorResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.empreendedor",
                    "update_empreendedor_api",
                    step,
                    &err.to_string(),
                ),
            ));
        }

        info!("usuario {} updated", usuario.id);
        UpdateEmpreendedorResponses::Ok(Json(MessageResponse::new(EMPREENDEDOR_ATUALIZADO)))
    }

    #[oai(
        path = "/empreendedores/:id",
        method = "delete",
        tag = "ApiEmpreendedorTags::Empreendedor"
    )]
    async fn delete_empreendedor_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> DeleteEmpreendedorResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return DeleteEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "delete_empreendedor_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return DeleteEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "delete_empreendedor_api",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token and role
        match authorize(
            &mut tx,
            &mut redis_conn,
            &state.config,
            auth.0.token,
            ADMIN_ONLY,
        )
        .await
        {
            Ok(Authorization::Granted(_)) => {}
            Ok(Authorization::Unauthenticated) => {
                return DeleteEmpreendedorResponses::Unauthorized(Json(
                    UnauthorizedResponse::default(),
                ))
            }
            Ok(Authorization::Forbidden) => {
                return DeleteEmpreendedorResponses::Forbidden(Json(ForbiddenResponse::default()))
            }
            Err(err) => {
                return DeleteEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "delete_empreendedor_api",
                        "authorize",
                        &err.to_string(),
                    ),
                ))
            }
        }

        // get usuario on db
        let Some(id) = parse_id(&id) else {
            return DeleteEmpreendedorResponses::NotFound(Json(not_found()));
        };
        let usuario = match get_usuario_by_id(&mut tx, id).await {
            Ok(val) => val,
            Err(err) => {
                return DeleteEmpreendedorResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.empreendedor",
                        "delete_empreendedor_api",
                        "get_usuario_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let Some(usuario) = usuario else {
            return DeleteEmpreendedorResponses::NotFound(Json(not_found()));
        };

        if let Err(err) = delete_usuario(&mut tx, &usuario).await {
            return DeleteEmpreendedorResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.empreendedor",
                    "delete_empreendedor_api",
                    "delete_usuario",
                    &err.to_string(),
                ),
            ));
        }
        if let Err(err) = tx.commit().await {
            return DeleteEmpreendedorResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.empreendedor",
                    "delete_empreendedor_api",
                    "commit to database",
                    &err.to_string(),
                ),
            ));
        }

        info!("usuario {} deleted", usuario.id);
        DeleteEmpreendedorResponses::Ok(Json(MessageResponse::new(EMPREENDEDOR_DELETADO)))
    }
}
