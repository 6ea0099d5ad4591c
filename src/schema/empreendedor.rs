use poem_openapi::{payload::Json, types::multipart::Upload, ApiResponse, Multipart, Object};
use serde::Deserialize;

use crate::{
    core::utils::datetime_to_string_opt,
    model::{endereco::Endereco, usuario::Usuario},
};

use super::common::{
    BadRequestResponse, ForbiddenResponse, InternalServerErrorResponse, MessageResponse,
    NotFoundResponse, UnauthorizedResponse,
};

pub const EMPREENDEDOR_NOT_FOUND: &str = "Empreendedor não encontrado";
pub const CPF_INVALIDO: &str = "CPF inválido";
pub const ENDERECO_NOT_FOUND: &str = "Endereço não encontrado";
pub const IMAGEM_INVALIDA: &str = "Formato de imagem inválido";
pub const SENHA_ATUALIZADA: &str = "Senha atualizada com sucesso!";
pub const EMPREENDEDOR_ATUALIZADO: &str = "Empreendedor atualizado com sucesso";
pub const EMPREENDEDOR_DELETADO: &str = "Empreendedor deletado com sucesso";

#[derive(Object, Deserialize)]
pub struct DetailEndereco {
    pub id: i32,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
}

impl From<Endereco> for DetailEndereco {
    fn from(x: Endereco) -> Self {
        Self {
            id: x.id,
            cep: x.cep,
            logradouro: x.logradouro,
            numero: x.numero,
            complemento: x.complemento,
            bairro: x.bairro,
            cidade: x.cidade,
            estado: x.estado,
        }
    }
}

#[derive(Object, Deserialize)]
pub struct DetailEmpreendedor {
    pub id: i32,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<i32>,
    pub descricao: Option<String>,
    pub foto: Option<String>,
    pub tipo: String,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

impl From<Usuario> for DetailEmpreendedor {
    fn from(x: Usuario) -> Self {
        Self {
            id: x.id,
            nome: x.nome,
            email: x.email,
            cpf: x.cpf,
            telefone: x.telefone,
            endereco: x.endereco,
            descricao: x.descricao,
            foto: x.foto,
            tipo: x.tipo,
            created_date: datetime_to_string_opt(x.created_date),
            updated_date: datetime_to_string_opt(x.updated_date),
        }
    }
}

#[derive(Object, Deserialize)]
pub struct EmpreendedorPageResponse {
    pub content: Vec<DetailEmpreendedor>,
    #[oai(rename = "totalPages")]
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(ApiResponse)]
pub enum GetPaginateEmpreendedorResponses {
    #[oai(status = 200)]
    Ok(Json<EmpreendedorPageResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct EmpreendedorDetailResponse {
    pub id: i32,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<i32>,
    pub descricao: Option<String>,
    pub foto: Option<String>,
    pub tipo: String,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub dados_endereco: Option<DetailEndereco>,
}

impl EmpreendedorDetailResponse {
    pub fn new(usuario: Usuario, endereco: Option<Endereco>) -> Self {
        Self {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            cpf: usuario.cpf,
            telefone: usuario.telefone,
            endereco: usuario.endereco,
            descricao: usuario.descricao,
            foto: usuario.foto,
            tipo: usuario.tipo,
            created_date: datetime_to_string_opt(usuario.created_date),
            updated_date: datetime_to_string_opt(usuario.updated_date),
            dados_endereco: endereco.map(DetailEndereco::from),
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(ApiResponse)]
pub enum EmpreendedorDetailResponses {
    #[oai(status = 200)]
    Ok(Json<EmpreendedorDetailResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

/// Same as the detail, plus the stored password hash.
#[derive(Object, Deserialize)]
pub struct EmpreendedorSenhaResponse {
    pub id: i32,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub senha: String,
    pub telefone: Option<String>,
    pub endereco: Option<i32>,
    pub descricao: Option<String>,
    pub foto: Option<String>,
    pub tipo: String,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub dados_endereco: Option<DetailEndereco>,
}

impl EmpreendedorSenhaResponse {
    pub fn new(usuario: Usuario, endereco: Option<Endereco>) -> Self {
        Self {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            cpf: usuario.cpf,
            senha: usuario.senha,
            telefone: usuario.telefone,
            endereco: usuario.endereco,
            descricao: usuario.descricao,
            foto: usuario.foto,
            tipo: usuario.tipo,
            created_date: datetime_to_string_opt(usuario.created_date),
            updated_date: datetime_to_string_opt(usuario.updated_date),
            dados_endereco: endereco.map(DetailEndereco::from),
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(ApiResponse)]
pub enum EmpreendedorSenhaResponses {
    #[oai(status = 200)]
    Ok(Json<EmpreendedorSenhaResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct UpdateSenhaRequest {
    pub senha: String,
}

#[derive(ApiResponse)]
pub enum UpdateSenhaResponses {
    #[oai(status = 200)]
    Ok(Json<MessageResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

/// Profile update form. A `foto` part with a filename is an uploaded image,
/// without one its text is kept as the photo reference.
#[derive(Multipart)]
pub struct UpdateEmpreendedorForm {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<i32>,
    pub descricao: Option<String>,
    pub foto: Option<Upload>,
}

#[derive(ApiResponse)]
pub enum UpdateEmpreendedorResponses {
    #[oai(status = 200)]
    Ok(Json<MessageResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum DeleteEmpreendedorResponses {
    #[oai(status = 200)]
    Ok(Json<MessageResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ForbiddenResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
