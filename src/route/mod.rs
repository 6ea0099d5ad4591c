pub mod auth;
pub mod empreendedor;
#[cfg(test)]
mod empreendedor_test;
