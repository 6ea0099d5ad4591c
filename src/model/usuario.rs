use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::prelude::FromRow;

pub const TABLE_NAME: &str = "public.usuario";

pub const TIPO_EMPREENDEDOR: &str = "empreendedor";
pub const TIPO_ADMINISTRADOR: &str = "administrador";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Usuario {
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
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
}
