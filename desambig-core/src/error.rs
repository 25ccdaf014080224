//! # Erros do Crate
//!
//! A política geral dos motores é fail-safe: entrada malformada dentro do
//! corpus (palavra sem análise utilizável, vizinho fora da sentença, par
//! estatístico nunca visto) vira no-op ou suavização, nunca erro. O que sobra
//! para o tipo de erro é a fronteira com o mundo externo: texto de regras
//! vindo de arquivo.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisambigError {
    /// Linha de regra de transformação que não segue o formato
    /// `de\tpara\tdeslocamento\ttipo\tcontexto`.
    #[error("regra de transformação malformada: {0:?}")]
    MalformedRule(String),
}
