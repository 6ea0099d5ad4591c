use serde::Deserialize;
use sqlx::FromRow;

pub const TABLE_NAME: &str = "public.endereco";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Endereco {
    pub id: i32,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
}
