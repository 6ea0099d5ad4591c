use fake::{
    faker::address::en::{CityName, StateAbbr, StreetName, ZipCode},
    Dummy, Fake, Faker,
};
use sqlx::PgPool;

use crate::model::endereco::Endereco;

pub struct EnderecoFactory<T: Clone> {
    modifier_one: fn(x: &Endereco, ext: T) -> Endereco,
}

impl<T: Clone> Default for EnderecoFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> EnderecoFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Endereco, ext: T) -> Endereco) {
        self.modifier_one = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Endereco> {
        let data = (self.modifier_one)(&EnderecoDummy::generate(), ext);
        Ok(sqlx::query_as(
            r#"
        INSERT INTO public.endereco (cep, logradouro, numero, complemento, bairro, cidade, estado)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *"#,
        )
        .bind(&data.cep)
        .bind(&data.logradouro)
        .bind(&data.numero)
        .bind(&data.complemento)
        .bind(&data.bairro)
        .bind(&data.cidade)
        .bind(&data.estado)
        .fetch_one(db)
        .await?)
    }
}

#[derive(Debug, Dummy, Clone)]
struct EnderecoDummy {
    #[dummy(faker = "ZipCode()")]
    pub cep: String,
    #[dummy(faker = "StreetName()")]
    pub logradouro: String,
    #[dummy(faker = "1..9999")]
    pub numero: u16,
    #[dummy(faker = "CityName()")]
    pub bairro: String,
    #[dummy(faker = "CityName()")]
    pub cidade: String,
    #[dummy(faker = "StateAbbr()")]
    pub estado: String,
}

impl EnderecoDummy {
    pub fn generate() -> Endereco {
        let dummy = Faker.fake::<Self>();
        Endereco {
            id: 0,
            cep: Some(dummy.cep.chars().take(9).collect()),
            logradouro: Some(dummy.logradouro),
            numero: Some(dummy.numero.to_string()),
            complemento: None,
            bairro: Some(dummy.bairro),
            cidade: Some(dummy.cidade),
            estado: Some(dummy.estado.chars().take(2).collect()),
        }
    }
}
