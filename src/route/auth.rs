use std::sync::Arc;

use chrono::{Duration, Local};
use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};
use tracing::info;

use crate::{
    core::{
        security::{
            generate_token_from_usuario, get_usuario_from_token, verify_hash_password,
            BearerAuthorization,
        },
        session::{add_session, remove_session},
        utils::datetime_to_string,
    },
    repository::usuario::get_usuario_by_email,
    schema::{
        auth::{LoginRequest, LoginResponse, LoginResponses, LogoutResponses},
        common::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
    },
    AppState,
};

const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

#[derive(Tags)]
enum ApiAuthTags {
    Auth,
}

pub struct ApiAuth;

#[OpenApi]
impl ApiAuth {
    #[oai(path = "/auth/login", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_login(
        &self,
        json: Json<LoginRequest>,
        state: Data<&Arc<AppState>>,
    ) -> LoginResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_login",
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
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "get redis pool connection",
                    &err.to_string(),
                )))
            }
        };

        // get usuario on db
        let usuario = match get_usuario_by_email(&mut tx, &json.email).await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_login",
                        "check usuario on database",
                        &err.to_string(),
                    ),
                ));
            }
        };
        let Some(usuario) = usuario else {
            return LoginResponses::BadRequest(Json(BadRequestResponse {
                message: INVALID_CREDENTIALS.to_string(),
            }));
        };

        // validate password
        let is_valid = match verify_hash_password(&json.senha, &usuario.senha) {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "validate usuario password",
                    &err.to_string(),
                )))
            }
        };
        if !is_valid {
            return LoginResponses::BadRequest(Json(BadRequestResponse {
                message: INVALID_CREDENTIALS.to_string(),
            }));
        }

        let config = &state.config;
        let token = match generate_token_from_usuario(&usuario, config) {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "generate token",
                    &err.to_string(),
                )))
            }
        };

        if let Err(err) = add_session(&mut redis_conn, &usuario, config, token.clone()) {
            return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_login",
                "add_session to redis",
                &err.to_string(),
            )));
        }
        info!("usuario {} logged in", usuario.id);
        let exp = Local::now().fixed_offset() + Duration::minutes(config.jwt_exp as i64);
        LoginResponses::Ok(Json(LoginResponse {
            exp: datetime_to_string(exp),
            token,
            token_type: "Bearer".to_string(),
        }))
    }

    #[oai(path = "/auth/logout", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_logout(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> LogoutResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
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
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Validate user token
        let jwt_token = auth.0.token;
        let usuario = match get_usuario_from_token(
            &mut tx,
            &mut redis_conn,
            &state.config,
            jwt_token.clone(),
        )
        .await
        {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "get usuario from token",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let (Some(_), Some(jwt_token)) = (usuario, jwt_token) else {
            return LogoutResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        if let Err(err) = remove_session(&mut redis_conn, jwt_token) {
            return LogoutResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_logout",
                "remove session",
                &err.to_string(),
            )));
        }
        LogoutResponses::NoContent
    }
}
