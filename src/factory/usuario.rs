use chrono::{DateTime, FixedOffset};
use fake::{
    faker::{
        internet::en::SafeEmail, lorem::en::Sentence, name::en::Name, phone_number::en::PhoneNumber,
    },
    Dummy, Fake, Faker,
};
use sqlx::PgPool;

use crate::model::usuario::{Usuario, TIPO_EMPREENDEDOR};

const INSERT_USUARIO: &str = r#"
INSERT INTO public.usuario (nome, email, cpf, senha, telefone, endereco, descricao, foto, tipo, created_date, updated_date)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
RETURNING *"#;

pub struct UsuarioFactory<T: Clone> {
    modifier_one: fn(x: &Usuario, ext: T) -> Usuario,
    modifier_many: fn(x: &Usuario, idx: usize, ext: T) -> Usuario,
}

impl<T: Clone> Default for UsuarioFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UsuarioFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Usuario, ext: T) -> Usuario) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Usuario, idx: usize, ext: T) -> Usuario) {
        self.modifier_many = modifier
    }

    /// Inserts one row; the returned value carries the database id.
    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Usuario> {
        let data = (self.modifier_one)(&UsuarioDummy::generate(), ext);
        let mut tx = db.begin().await?;
        let inserted = insert(&mut tx, &data).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Usuario>> {
        let mut tx = db.begin().await?;
        let mut result: Vec<Usuario> = vec![];
        for idx in 0..num as usize {
            let data = (self.modifier_many)(&UsuarioDummy::generate(), idx, ext.clone());
            result.push(insert(&mut tx, &data).await?);
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    data: &Usuario,
) -> anyhow::Result<Usuario> {
    Ok(sqlx::query_as(INSERT_USUARIO)
        .bind(&data.nome)
        .bind(&data.email)
        .bind(&data.cpf)
        .bind(&data.senha)
        .bind(&data.telefone)
        .bind(data.endereco)
        .bind(&data.descricao)
        .bind(&data.foto)
        .bind(&data.tipo)
        .bind(data.created_date)
        .bind(data.updated_date)
        .fetch_one(&mut **tx)
        .await?)
}

#[derive(Debug, Dummy, Clone)]
struct UsuarioDummy {
    #[dummy(faker = "Name()")]
    pub nome: String,
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    pub senha: String,
    #[dummy(faker = "PhoneNumber()")]
    pub telefone: String,
    #[dummy(faker = "Sentence(3..8)")]
    pub descricao: String,
    pub created_date: DateTime<FixedOffset>,
}

impl UsuarioDummy {
    pub fn generate() -> Usuario {
        let dummy = Faker.fake::<Self>();
        Usuario {
            id: 0,
            nome: Some(dummy.nome),
            email: Some(dummy.email),
            cpf: Some("529.982.247-25".to_string()),
            senha: dummy.senha,
            telefone: Some(dummy.telefone),
            endereco: None,
            descricao: Some(dummy.descricao),
            foto: None,
            tipo: TIPO_EMPREENDEDOR.to_string(),
            created_date: Some(dummy.created_date),
            updated_date: Some(dummy.created_date),
        }
    }
}
