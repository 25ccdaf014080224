//! # Hidden Markov Model (HMM) para Desambiguação Morfológica
//!
//! Modelo clássico de HMM onde:
//! - **Estados Ocultos**: tags reduzidas (N, V:fin, PRON:A, ...)
//! - **Observações**: formas de superfície (palavras)
//!
//! O modelo aprende, por contagem sobre o corpus:
//! 1. Probabilidade de Emissão: P(palavra | tag)
//! 2. Probabilidade de Transição: P(tag_seguinte | tag_corrente)
//! 3. Probabilidade Inicial: P(tag_inicial)
//!
//! ## Suavização (Add-1 / Laplace)
//!
//! Contagens brutas deixariam probabilidade zero para qualquer par nunca
//! visto, e um único zero anula o produto inteiro no Viterbi. Cada contagem
//! ganha +1 e o denominador cresce pelo tamanho do vocabulário:
//!
//! ```text
//! P(palavra | tag) = (c + 1) / (freq(tag) + |observações|)
//! P(tag' | tag)    = (c + 1) / (freq(tag) + |estados|)
//! P_inicial(tag)   = (c + 1) / (inícios + |estados|)
//! ```
//!
//! Pares nunca vistos durante o treino são suavizados **sob demanda** na
//! decodificação, com a mesma fórmula (c = 0), e o valor entra na tabela —
//! recalcular dá sempre o mesmo resultado, pois os denominadores usam as
//! contagens congeladas do treino.
//!
//! Todos os mapas preservam a ordem de primeira aparição, que é a ordem de
//! iteração dos estados usada pelo decodificador para desempates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::{Analysis, Sentence, Word};
use crate::tagger::{reduce_tag, safe_analysis};

/// Como extrair a tag "verdadeira" de uma palavra durante o treino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Só conta a tag de palavras seguras (inequívocas ou fusões conhecidas).
    /// Permite treinar diretamente sobre um corpus ainda ambíguo.
    AmbiguityAware,
    /// Confia na última análise anotada de cada palavra como verdade —
    /// para corpora já desambiguados (manualmente ou por outro motor).
    PreDisambiguated,
}

fn ground_truth(word: &Word, mode: TrainingMode) -> Option<&Analysis> {
    match mode {
        TrainingMode::AmbiguityAware => safe_analysis(word),
        TrainingMode::PreDisambiguated => word.annotated().last().copied(),
    }
}

/// Modelo HMM estimado a partir de um corpus.
///
/// Depois do treino o modelo é de leitura, exceto pelas inserções de
/// suavização sob demanda — por isso os acessores de probabilidade tomam
/// `&mut self`: quem decodifica é o dono único do modelo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hmm {
    /// Frequência de cada estado (tag reduzida).
    states: IndexMap<String, u32>,
    /// Frequência de cada observação (forma de superfície).
    observations: IndexMap<String, u32>,
    /// P(observação | estado), já suavizada.
    emission: IndexMap<String, IndexMap<String, f64>>,
    /// P(estado_seguinte | estado), já suavizada. Chave externa: estado de origem.
    transition: IndexMap<String, IndexMap<String, f64>>,
    /// P(estado inicial), já suavizada — uniforme quando nenhum início foi visto.
    start: IndexMap<String, f64>,
    /// Total de inícios de sentença observados.
    starts_total: u32,
}

impl Hmm {
    /// Estima o modelo varrendo o corpus uma única vez.
    ///
    /// Cada palavra conta como observação; estados e emissões contam apenas
    /// para palavras cuja tag verdadeira é extraível no modo escolhido;
    /// transições contam apenas entre vizinhos imediatos ambos extraíveis;
    /// inícios contam quando a primeira palavra da sentença é extraível.
    pub fn estimate(corpus: &[Sentence], mode: TrainingMode) -> Self {
        let mut states: IndexMap<String, u32> = IndexMap::new();
        let mut observations: IndexMap<String, u32> = IndexMap::new();
        let mut emission_counts: IndexMap<String, IndexMap<String, u32>> = IndexMap::new();
        let mut transition_counts: IndexMap<String, IndexMap<String, u32>> = IndexMap::new();
        let mut start_counts: IndexMap<String, u32> = IndexMap::new();
        let mut starts_total = 0u32;

        for sentence in corpus {
            let mut prev_tag: Option<String> = None;
            for (i, word) in sentence.words.iter().enumerate() {
                if word.surface.is_empty() {
                    prev_tag = None;
                    continue;
                }
                *observations.entry(word.surface.clone()).or_insert(0) += 1;

                match ground_truth(word, mode) {
                    Some(ana) => {
                        let tag = reduce_tag(&ana.tag);
                        *states.entry(tag.clone()).or_insert(0) += 1;
                        *emission_counts
                            .entry(tag.clone())
                            .or_default()
                            .entry(word.surface.clone())
                            .or_insert(0) += 1;
                        if i == 0 {
                            *start_counts.entry(tag.clone()).or_insert(0) += 1;
                            starts_total += 1;
                        }
                        if let Some(prev) = prev_tag.take() {
                            *transition_counts
                                .entry(prev)
                                .or_default()
                                .entry(tag.clone())
                                .or_insert(0) += 1;
                        }
                        prev_tag = Some(tag);
                    }
                    // palavra ambígua quebra a cadeia de transições
                    None => prev_tag = None,
                }
            }
        }

        info!(
            states = states.len(),
            observations = observations.len(),
            "estatísticas do HMM coletadas"
        );

        let n_states = states.len() as f64;
        let n_observations = observations.len() as f64;

        let mut emission: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
        let mut transition: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
        let mut start: IndexMap<String, f64> = IndexMap::new();

        for (state, freq) in &states {
            let state_freq = *freq as f64;

            let emission_row = emission.entry(state.clone()).or_default();
            if let Some(counts) = emission_counts.get(state) {
                for (observation, count) in counts {
                    emission_row.insert(
                        observation.clone(),
                        (*count as f64 + 1.0) / (state_freq + n_observations),
                    );
                }
            }

            let transition_row = transition.entry(state.clone()).or_default();
            if let Some(counts) = transition_counts.get(state) {
                for (next_state, count) in counts {
                    transition_row.insert(
                        next_state.clone(),
                        (*count as f64 + 1.0) / (state_freq + n_states),
                    );
                }
            }

            // com zero inícios observados isto degenera no uniforme 1/|estados|
            let start_count = *start_counts.get(state).unwrap_or(&0) as f64;
            start.insert(
                state.clone(),
                (start_count + 1.0) / (starts_total as f64 + n_states),
            );
        }

        Self {
            states,
            observations,
            emission,
            transition,
            start,
            starts_total,
        }
    }

    /// Os estados na ordem de primeira aparição — a ordem de iteração
    /// canônica do decodificador.
    pub fn state_list(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Frequência de treino de um estado (0 para desconhecidos).
    pub fn state_freq(&self, state: &str) -> u32 {
        self.states.get(state).copied().unwrap_or(0)
    }

    /// P(estado inicial).
    pub fn start_prob(&self, state: &str) -> f64 {
        self.start.get(state).copied().unwrap_or(0.0)
    }

    /// P(observação | estado), suavizando e memorizando pares nunca vistos.
    pub fn emission_prob(&mut self, state: &str, observation: &str) -> f64 {
        let state_freq = self.state_freq(state) as f64;
        let denominator = state_freq + self.observations.len() as f64;
        let row = self.emission.entry(state.to_string()).or_default();
        if let Some(p) = row.get(observation) {
            return *p;
        }
        let p = 1.0 / denominator;
        row.insert(observation.to_string(), p);
        p
    }

    /// P(estado_seguinte | estado), suavizando e memorizando pares nunca
    /// vistos. O denominador é ancorado na frequência do estado de origem.
    pub fn transition_prob(&mut self, from: &str, to: &str) -> f64 {
        let from_freq = self.state_freq(from) as f64;
        let denominator = from_freq + self.states.len() as f64;
        let row = self.transition.entry(from.to_string()).or_default();
        if let Some(p) = row.get(to) {
            return *p;
        }
        let p = 1.0 / denominator;
        row.insert(to.to_string(), p);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Word;

    fn tiny_corpus() -> Vec<Sentence> {
        vec![Sentence::new(vec![
            Word::new("Maria", vec![Analysis::new("Maria", "N,prop,f,sg")]),
            Word::new("viajou", vec![Analysis::new("viajar", "V,fin,perf,3sg")]),
        ])]
    }

    #[test]
    fn test_estimate_counts_and_smoothing() {
        let mut hmm = Hmm::estimate(&tiny_corpus(), TrainingMode::AmbiguityAware);
        assert_eq!(hmm.state_count(), 2);
        assert_eq!(hmm.observation_count(), 2);
        assert_eq!(hmm.state_freq("N"), 1);
        assert_eq!(hmm.state_freq("V:fin"), 1);

        // emissão vista: (1 + 1) / (1 + 2)
        let p = hmm.emission_prob("N", "Maria");
        assert!((p - 2.0 / 3.0).abs() < 1e-12);
        // transição vista: (1 + 1) / (1 + 2)
        let p = hmm.transition_prob("N", "V:fin");
        assert!((p - 2.0 / 3.0).abs() < 1e-12);
        // início: N começou a única sentença → (1 + 1) / (1 + 2)
        assert!((hmm.start_prob("N") - 2.0 / 3.0).abs() < 1e-12);
        assert!((hmm.start_prob("V:fin") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lazy_smoothing_is_idempotent() {
        let mut hmm = Hmm::estimate(&tiny_corpus(), TrainingMode::AmbiguityAware);
        // par (estado, observação) nunca visto: (0 + 1) / (1 + 2)
        let first = hmm.emission_prob("N", "viajou");
        let second = hmm.emission_prob("N", "viajou");
        assert!((first - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(first, second);

        let first = hmm.transition_prob("V:fin", "V:fin");
        let second = hmm.transition_prob("V:fin", "V:fin");
        assert!((first - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ambiguity_aware_skips_ambiguous_words() {
        let corpus = vec![Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new(
                "casa",
                vec![
                    Analysis::new("casa", "N,f,sg"),
                    Analysis::new("casar", "V,fin,pres,3sg"),
                ],
            ),
        ])];
        let hmm = Hmm::estimate(&corpus, TrainingMode::AmbiguityAware);
        // "casa" é ambígua: só PREP vira estado, mas as duas palavras contam
        // como observações
        assert_eq!(hmm.state_count(), 1);
        assert_eq!(hmm.observation_count(), 2);

        let hmm = Hmm::estimate(&corpus, TrainingMode::PreDisambiguated);
        // confiando na última análise, "casa" conta como V:fin
        assert_eq!(hmm.state_count(), 2);
        assert_eq!(hmm.state_freq("V:fin"), 1);
    }

    #[test]
    fn test_fusion_counts_as_safe_state() {
        let corpus = vec![Sentence::new(vec![Word::new(
            "dele",
            vec![Analysis::new("de", "PREP"), Analysis::new("ele", "PRON,A")],
        )])];
        let hmm = Hmm::estimate(&corpus, TrainingMode::AmbiguityAware);
        // fusão resolvida: a última análise (PRON,A) fornece o estado
        assert_eq!(hmm.state_freq("PRON:A"), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let hmm = Hmm::estimate(&tiny_corpus(), TrainingMode::AmbiguityAware);
        let json = serde_json::to_string(&hmm).expect("serialização");
        let mut restored: Hmm = serde_json::from_str(&json).expect("desserialização");
        assert_eq!(restored.state_count(), hmm.state_count());
        assert!((restored.emission_prob("N", "Maria") - 2.0 / 3.0).abs() < 1e-12);
    }
}
