use poem_openapi::Object;
use serde::Deserialize;
use tracing::error;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Erro interno do servidor";

#[derive(Object, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Object, Deserialize)]
pub struct BadRequestResponse {
    pub message: String,
}

#[derive(Object, Deserialize)]
pub struct NotFoundResponse {
    pub message: String,
}

#[derive(Object, Deserialize)]
pub struct UnauthorizedResponse {
    pub message: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            message: "Não autorizado".to_string(),
        }
    }
}

#[derive(Object, Deserialize)]
pub struct ForbiddenResponse {
    pub message: String,
}

impl Default for ForbiddenResponse {
    fn default() -> Self {
        Self {
            message: "Acesso negado".to_string(),
        }
    }
}

/// The failure detail goes to the server log only; the client gets the
/// generic message.
#[derive(Object, Deserialize)]
pub struct InternalServerErrorResponse {
    pub message: String,
}

impl InternalServerErrorResponse {
    pub fn new(location: &str, function: &str, step: &str, err: &str) -> Self {
        error!("{}.{} failed on {}: {}", location, function, step, err);
        Self {
            message: INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}
