//! # Algoritmo de Viterbi — Decodificação da Sequência de Tags
//!
//! Dado um [`Hmm`] treinado, encontra a sequência de tags globalmente mais
//! provável para cada sentença via **programação dinâmica** em
//! `O(N × T²)`, em vez dos `O(T^N)` da busca exaustiva:
//!
//! ```text
//! Inicialização: V[0][s] = P_inicial(s) · P(obs_0 | s)
//!
//! Recursão:      V[t][s] = max_{s'} V[t-1][s'] · P(s | s') · P(obs_t | s)
//!
//! Backtracking:  reconstrói o caminho ótimo de trás para frente
//! ```
//!
//! Pares (estado, observação) ou (estado, estado) nunca vistos no treino são
//! suavizados sob demanda pelo próprio modelo. Empates no `max` ficam com o
//! primeiro candidato na ordem de iteração dos estados, que é fixa
//! (primeira aparição no treino) — decodificar duas vezes dá o mesmo caminho.
//!
//! Depois de decodificar, [`apply`] filtra as análises de cada palavra para
//! as compatíveis com a tag decodificada; se nenhuma for compatível, a
//! palavra fica intacta — a decodificação nunca apaga todas as candidatas.

use tracing::info;

use crate::corpus::{Analysis, Sentence};
use crate::hmm::Hmm;
use crate::tagger::reduce_tag;

/// Decodifica a sequência de tags mais provável para uma sequência de
/// observações (formas de superfície).
///
/// Devolve uma tag por observação; vazio se não há observações ou se o
/// modelo não tem estados.
pub fn decode(hmm: &mut Hmm, observations: &[String]) -> Vec<String> {
    if observations.is_empty() {
        return Vec::new();
    }
    let states = hmm.state_list();
    let n_states = states.len();
    if n_states == 0 {
        return Vec::new();
    }
    let n_obs = observations.len();

    // v[t][s] = probabilidade do melhor caminho terminando no tempo t com o
    // estado s; backptr[t][s] = estado anterior que maximizou v[t][s]
    let mut v = vec![vec![0.0f64; n_states]; n_obs];
    let mut backptr = vec![vec![0usize; n_states]; n_obs];

    // 1. Inicialização (t = 0)
    for (s, state) in states.iter().enumerate() {
        v[0][s] = hmm.start_prob(state) * hmm.emission_prob(state, &observations[0]);
    }

    // 2. Recursão (t = 1..N)
    for t in 1..n_obs {
        for (s, state) in states.iter().enumerate() {
            let emit = hmm.emission_prob(state, &observations[t]);
            let mut best_prob = f64::NEG_INFINITY;
            let mut best_prev = 0usize;
            for (prev_s, prev_state) in states.iter().enumerate() {
                let trans = hmm.transition_prob(prev_state, state);
                let prob = v[t - 1][prev_s] * trans * emit;
                if prob > best_prob {
                    best_prob = prob;
                    best_prev = prev_s;
                }
            }
            v[t][s] = best_prob;
            backptr[t][s] = best_prev;
        }
    }

    // 3. Terminação: melhor estado final
    let mut best_last = 0usize;
    let mut best_prob = f64::NEG_INFINITY;
    for s in 0..n_states {
        if v[n_obs - 1][s] > best_prob {
            best_prob = v[n_obs - 1][s];
            best_last = s;
        }
    }

    // 4. Backtracking: reconstrução do caminho
    let mut path = vec![String::new(); n_obs];
    let mut current = best_last;
    path[n_obs - 1] = states[current].clone();
    for t in (1..n_obs).rev() {
        current = backptr[t][current];
        path[t - 1] = states[current].clone();
    }
    path
}

/// Decodifica cada sentença do corpus e estreita as análises das palavras
/// para as compatíveis com a tag decodificada. Devolve o número de palavras
/// alteradas.
///
/// Uma análise é compatível quando sua tag reduzida é igual à tag decodificada
/// para aquela posição. Se nenhuma análise for compatível, o conjunto
/// original fica intacto (fail-safe).
pub fn apply(hmm: &mut Hmm, corpus: &mut [Sentence]) -> usize {
    let mut changes = 0;
    for sentence in corpus.iter_mut() {
        let observations: Vec<String> = sentence
            .words
            .iter()
            .map(|word| word.surface.clone())
            .collect();
        let decoded = decode(hmm, &observations);
        if decoded.len() != sentence.words.len() {
            continue;
        }
        for (word, tag) in sentence.words.iter_mut().zip(&decoded) {
            let kept: Vec<Analysis> = word
                .analyses
                .iter()
                .filter(|a| a.is_annotated() && reduce_tag(&a.tag) == *tag)
                .cloned()
                .collect();
            if kept.is_empty() {
                // fail-safe: a decodificação nunca apaga todas as candidatas
                continue;
            }
            if kept.len() < word.analyses.len() {
                word.analyses = kept;
                changes += 1;
            }
        }
    }
    info!(changes, "decodificação de Viterbi aplicada");
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Word;
    use crate::hmm::TrainingMode;

    fn train_corpus() -> Vec<Sentence> {
        vec![
            Sentence::new(vec![
                Word::new("Maria", vec![Analysis::new("Maria", "N,prop,f,sg")]),
                Word::new("viajou", vec![Analysis::new("viajar", "V,fin,perf,3sg")]),
            ]),
            Sentence::new(vec![
                Word::new("Pedro", vec![Analysis::new("Pedro", "N,prop,m,sg")]),
                Word::new("viajou", vec![Analysis::new("viajar", "V,fin,perf,3sg")]),
            ]),
        ]
    }

    #[test]
    fn test_decode_recovers_training_sequence() {
        let mut hmm = Hmm::estimate(&train_corpus(), TrainingMode::AmbiguityAware);
        let observations = vec!["Maria".to_string(), "viajou".to_string()];
        assert_eq!(decode(&mut hmm, &observations), vec!["N", "V:fin"]);
    }

    #[test]
    fn test_decode_empty_sentence() {
        let mut hmm = Hmm::estimate(&train_corpus(), TrainingMode::AmbiguityAware);
        assert!(decode(&mut hmm, &[]).is_empty());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let mut hmm = Hmm::estimate(&train_corpus(), TrainingMode::AmbiguityAware);
        let observations: Vec<String> =
            ["Maria", "viajou", "ontem"].iter().map(|s| s.to_string()).collect();
        let first = decode(&mut hmm, &observations);
        let second = decode(&mut hmm, &observations);
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_narrows_ambiguous_word() {
        let mut hmm = Hmm::estimate(&train_corpus(), TrainingMode::AmbiguityAware);
        let mut target = vec![Sentence::new(vec![
            Word::new("Maria", vec![Analysis::new("Maria", "N,prop,f,sg")]),
            Word::new(
                "viajou",
                vec![
                    Analysis::new("viajar", "V,fin,perf,3sg"),
                    Analysis::new("viajou", "N,m,sg"),
                ],
            ),
        ])];
        let changes = apply(&mut hmm, &mut target);
        assert_eq!(changes, 1);
        assert_eq!(target[0].words[1].analyses.len(), 1);
        assert_eq!(target[0].words[1].analyses[0].tag, "V,fin,perf,3sg");
    }

    #[test]
    fn test_apply_fail_safe_keeps_original_set() {
        let mut hmm = Hmm::estimate(&train_corpus(), TrainingMode::AmbiguityAware);
        // nenhuma análise de "depressa" é compatível com os estados N/V:fin
        let mut target = vec![Sentence::new(vec![
            Word::new("Maria", vec![Analysis::new("Maria", "N,prop,f,sg")]),
            Word::new(
                "depressa",
                vec![
                    Analysis::new("depressa", "ADV"),
                    Analysis::new("depressa", "INTERJ"),
                ],
            ),
        ])];
        let before = target[0].words[1].analyses.clone();
        apply(&mut hmm, &mut target);
        assert_eq!(target[0].words[1].analyses, before);
        assert_eq!(target[0].words[1].analyses.len(), 2);
    }
}
