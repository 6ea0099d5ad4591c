pub mod endereco;
pub mod usuario;
