//! # Pipeline de Desambiguação — Orquestrador
//!
//! Conecta os três motores sob uma interface única para a camada externa de
//! I/O: escolhe-se o motor via [`EngineMode`], treina-se sobre um corpus de
//! referência e aplica-se ao corpus alvo, que é mutado em lugar. Os motores
//! são estratégias **alternativas** sobre o mesmo modelo de dados — cada
//! passada usa exatamente um deles, não há encadeamento implícito.
//!
//! O progresso (sentenças processadas, alterações, regras aprendidas) sai
//! como eventos `tracing` e volta resumido no [`EngineReport`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bigram::{self, BigramRules};
use crate::brill::{self, BrillConfig};
use crate::corpus::Sentence;
use crate::hmm::{Hmm, TrainingMode};
use crate::viterbi;

/// Qual motor usar na passada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// **Bigramas**: ranking de tags seguintes por frequência em contextos
    /// inequívocos. Rápido e conservador.
    Bigram,
    /// **Brill**: lista ordenada de regras de transformação induzidas por
    /// ganho líquido. Interpretável — as regras têm forma textual.
    Brill,
    /// **Viterbi**: decodificação da sequência de tags globalmente mais
    /// provável com um HMM suavizado.
    Viterbi,
}

impl Default for EngineMode {
    fn default() -> Self {
        EngineMode::Bigram
    }
}

/// Configuração de uma passada de desambiguação.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub mode: EngineMode,
    /// Configuração do aprendizado de transformações (modo Brill).
    pub brill: BrillConfig,
    /// Estratégia de extração de verdade do HMM (modo Viterbi).
    pub hmm_mode: TrainingMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            brill: BrillConfig::default(),
            hmm_mode: TrainingMode::AmbiguityAware,
        }
    }
}

/// Contadores de progresso de uma passada.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineReport {
    /// Sentenças do corpus alvo.
    pub sentences: usize,
    /// Palavras cujo conjunto de análises foi estreitado.
    pub changes: usize,
    /// Regras aprendidas (bigramas: entradas da tabela; Viterbi: 0).
    pub rules_learned: usize,
}

/// Treina o motor escolhido sobre `train` e aplica ao corpus `target`.
pub fn train_and_apply(
    train: &[Sentence],
    target: &mut [Sentence],
    config: &PipelineConfig,
) -> EngineReport {
    let sentences = target.len();
    let report = match config.mode {
        EngineMode::Bigram => {
            let rules = BigramRules::train(train);
            info!(rules = rules.len(), "tabela de bigramas treinada");
            let changes = bigram::apply(target, &rules);
            EngineReport {
                sentences,
                changes,
                rules_learned: rules.len(),
            }
        }
        EngineMode::Brill => {
            let rules = brill::learn(train, &config.brill);
            let changes = brill::apply(target, &rules);
            EngineReport {
                sentences,
                changes,
                rules_learned: rules.len(),
            }
        }
        EngineMode::Viterbi => {
            let mut hmm = Hmm::estimate(train, config.hmm_mode);
            let changes = viterbi::apply(&mut hmm, target);
            EngineReport {
                sentences,
                changes,
                rules_learned: 0,
            }
        }
    };
    info!(
        mode = ?config.mode,
        sentences = report.sentences,
        changes = report.changes,
        "passada de desambiguação concluída"
    );
    report
}
