//! # desambig-core — Desambiguação Morfológica Automática
//!
//! Este crate implementa a resolução automática de ambiguidade de categoria
//! gramatical (POS) sobre corpora **já analisados morfologicamente**: cada
//! palavra chega com uma ou mais análises candidatas, e o sistema escolhe,
//! para as palavras ambíguas, a(s) análise(s) mais provável(is) dado o
//! contexto. Foi projetado para ser didático, modular e comparável — três
//! motores alternativos operam sobre o mesmo modelo de dados.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: sentenças estruturadas ([`corpus`]) vindas da camada de
//!     I/O externa (o crate não lê nem grava arquivos de corpus).
//! 2.  **Normalização de tags** ([`tagger`]): redução das tags completas,
//!     tags compostas (classes de ambiguidade) e os casos especiais de fusão
//!     (verbo+advérbio, preposição+pronome, verbo+clítico).
//! 3.  **Motores de desambiguação**, independentes entre si:
//!     *   **Bigramas** ([`bigram`]): coocorrência de tags aprendida em
//!         contextos inequívocos.
//!     *   **Brill** ([`brill`]): lista ordenada de regras de transformação
//!         induzidas por ganho líquido.
//!     *   **HMM + Viterbi** ([`hmm`], [`viterbi`]): sequência de tags
//!         globalmente mais provável, com suavização add-one.
//! 4.  **Saída**: o mesmo corpus, com os conjuntos de análises estreitados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use desambig_core::bigram::{self, BigramRules};
//! use desambig_core::corpus::{Analysis, Sentence, Word};
//!
//! // corpus de treino: bigramas inequívocos PREP → N
//! let train = vec![Sentence::new(vec![
//!     Word::new("de", vec![Analysis::new("de", "PREP")]),
//!     Word::new("casa", vec![Analysis::new("casa", "N")]),
//! ])];
//! let rules = BigramRules::train(&train);
//!
//! // alvo: "casa" ambígua entre substantivo e verbo depois de "de"
//! let mut target = vec![Sentence::new(vec![
//!     Word::new("de", vec![Analysis::new("de", "PREP")]),
//!     Word::new("casa", vec![
//!         Analysis::new("casa", "N"),
//!         Analysis::new("casar", "V,fin,pres,3sg"),
//!     ]),
//! ])];
//! let changes = bigram::apply(&mut target, &rules);
//! assert_eq!(changes, 1);
//! assert_eq!(target[0].words[1].analyses.len(), 1);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador que expõe os três motores à camada de I/O.
//! - [`corpus`]: modelo de dados (sentença, palavra, análise) + corpus demo.
//! - [`tagger`]: vocabulário de tags sobre o qual tudo opera.

pub mod bigram;
pub mod brill;
pub mod corpus;
pub mod error;
pub mod hmm;
pub mod pipeline;
pub mod tagger;
pub mod viterbi;

pub use corpus::{Analysis, Sentence, Word};
pub use error::DisambigError;
pub use pipeline::{EngineMode, EngineReport, PipelineConfig};
