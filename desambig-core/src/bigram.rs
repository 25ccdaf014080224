//! # Modelo de Bigramas — Coocorrência de Tags em Contextos Inequívocos
//!
//! A primeira das três estratégias de desambiguação. A ideia: pares de
//! palavras vizinhas em que **ambas** já são seguras (inequívocas ou fusões
//! conhecidas) revelam quais sequências de tags a língua de fato produz.
//! Contando esses "bons bigramas" obtemos, para cada tag corrente, um ranking
//! de tags seguintes por frequência — e usamos esse ranking para escolher a
//! análise de uma palavra ambígua a partir da tag da palavra anterior.
//!
//! ## Fluxo
//!
//! 1. [`collect_good_bigrams`]: varre o corpus e emite os pares seguros.
//! 2. [`count_frequencies`]: conta cada par `(tag_corrente, tag_seguinte)`.
//! 3. [`BigramRules::from_frequencies`]: reorganiza em tabela de regras.
//! 4. [`apply`]: revarre um corpus e estreita as análises das palavras
//!    ambíguas — conservador: sem sugestão aplicável, a palavra fica intacta.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::{Analysis, Sentence};
use crate::tagger::{safe_analysis, special_case};

/// Um bigrama em que as duas palavras são seguras. As tags registradas são as
/// tags **completas** das análises sobreviventes, não as reduzidas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodBigram {
    pub next_surface: String,
    pub next_tag: String,
    pub cur_surface: String,
    pub cur_tag: String,
}

/// Varre o corpus e coleta todos os bigramas seguros.
///
/// Sentenças são independentes entre si, então a varredura é paralelizada
/// com rayon; a ordem dos resultados segue a ordem do corpus.
pub fn collect_good_bigrams(corpus: &[Sentence]) -> Vec<GoodBigram> {
    let bigrams: Vec<GoodBigram> = corpus
        .par_iter()
        .flat_map_iter(sentence_bigrams)
        .collect();
    info!(total = bigrams.len(), "bigramas seguros coletados");
    bigrams
}

fn sentence_bigrams(sentence: &Sentence) -> Vec<GoodBigram> {
    let mut out = Vec::new();
    for pair in sentence.words.windows(2) {
        let (cur, next) = (&pair[0], &pair[1]);
        let cur_ana = match safe_analysis(cur) {
            Some(a) => a,
            None => continue,
        };
        let next_ana = match safe_analysis(next) {
            Some(a) => a,
            None => continue,
        };
        out.push(GoodBigram {
            next_surface: next.surface.clone(),
            next_tag: next_ana.tag.clone(),
            cur_surface: cur.surface.clone(),
            cur_tag: cur_ana.tag.clone(),
        });
    }
    out
}

/// Conta a frequência de cada par `(tag_corrente, tag_seguinte)`.
///
/// A chave é ordenada (corrente, seguinte) — a mesma orientação usada na
/// consulta durante a aplicação. O mapa preserva a ordem de primeira
/// aparição, o que mantém os empates determinísticos mais adiante.
pub fn count_frequencies(bigrams: &[GoodBigram]) -> IndexMap<(String, String), u32> {
    let mut freqs: IndexMap<(String, String), u32> = IndexMap::new();
    for bigram in bigrams {
        *freqs
            .entry((bigram.cur_tag.clone(), bigram.next_tag.clone()))
            .or_insert(0) += 1;
    }
    freqs
}

/// Tabela de regras do modelo: para cada tag corrente, as tags seguintes
/// observadas, ordenadas por frequência decrescente (empates preservam a
/// ordem de primeira aparição).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BigramRules {
    rules: IndexMap<String, Vec<(String, u32)>>,
}

impl BigramRules {
    /// Reorganiza o mapa de frequências em tabela de regras ranqueadas.
    pub fn from_frequencies(freqs: &IndexMap<(String, String), u32>) -> Self {
        let mut rules: IndexMap<String, Vec<(String, u32)>> = IndexMap::new();
        for ((cur_tag, next_tag), freq) in freqs {
            rules
                .entry(cur_tag.clone())
                .or_default()
                .push((next_tag.clone(), *freq));
        }
        for suggestions in rules.values_mut() {
            // sort estável: empates ficam na ordem de inserção
            suggestions.sort_by(|a, b| b.1.cmp(&a.1));
        }
        Self { rules }
    }

    /// Treina a tabela a partir de um corpus: coleta, conta e ranqueia.
    pub fn train(corpus: &[Sentence]) -> Self {
        let bigrams = collect_good_bigrams(corpus);
        let freqs = count_frequencies(&bigrams);
        Self::from_frequencies(&freqs)
    }

    /// As tags seguintes sugeridas para uma tag corrente, com frequências.
    pub fn suggestions(&self, cur_tag: &str) -> Option<&[(String, u32)]> {
        self.rules.get(cur_tag).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Aplica a tabela de regras a um corpus, estreitando palavras ambíguas.
/// Devolve o número de palavras alteradas.
pub fn apply(corpus: &mut [Sentence], rules: &BigramRules) -> usize {
    let mut changes = 0;
    for sentence in corpus.iter_mut() {
        for i in 0..sentence.words.len() {
            if disambiguate_at(sentence, i, rules) {
                changes += 1;
            }
        }
    }
    info!(changes, "modelo de bigramas aplicado");
    changes
}

/// Tenta desambiguar a palavra na posição `i` da sentença.
///
/// Primeiro consulta o caso especial (análises da âncora sempre sobrevivem;
/// fusões resolvidas não precisam de mais nada). Depois, se a palavra
/// anterior tem exatamente uma análise anotada, cruza as sugestões da tabela
/// com as candidatas restantes e mantém as de frequência máxima (empates
/// mantêm todas). Sem sugestão aplicável, a palavra fica como está.
fn disambiguate_at(sentence: &mut Sentence, i: usize, rules: &BigramRules) -> bool {
    let word = &sentence.words[i];
    if word.annotated().len() <= 1 {
        return false;
    }

    let (sure, candidates): (Vec<Analysis>, Vec<Analysis>) = match special_case(word) {
        Some(case) => {
            if case.resolved {
                // fusão conhecida: as duas leituras coexistem
                return false;
            }
            (case.sure, case.ambiguous)
        }
        None => (
            Vec::new(),
            word.annotated().into_iter().cloned().collect(),
        ),
    };

    // contexto: a tag da palavra anterior, se ela for inequívoca
    let prev_tag = match i.checked_sub(1).map(|p| &sentence.words[p]) {
        Some(prev) => {
            let prev_annotated = prev.annotated();
            if prev_annotated.len() != 1 {
                return false;
            }
            prev_annotated[0].tag.clone()
        }
        None => return false,
    };

    let suggestions = match rules.suggestions(&prev_tag) {
        Some(s) => s,
        None => return false,
    };

    // interseção entre as tags sugeridas e as candidatas da palavra
    let mut matched: Vec<(&Analysis, u32)> = Vec::new();
    for (next_tag, freq) in suggestions {
        for candidate in &candidates {
            if candidate.tag == *next_tag {
                matched.push((candidate, *freq));
            }
        }
    }
    if matched.is_empty() {
        // no-op conservador: a palavra permanece ambígua
        return false;
    }

    let max_freq = matched.iter().map(|(_, f)| *f).max().unwrap_or(0);
    let mut new_set = sure;
    new_set.extend(
        matched
            .iter()
            .filter(|(_, f)| *f == max_freq)
            .map(|(a, _)| (*a).clone()),
    );

    if new_set.len() < sentence.words[i].analyses.len() {
        sentence.words[i].analyses = new_set;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Word;

    fn bigram(next_surface: &str, next_tag: &str, cur_surface: &str, cur_tag: &str) -> GoodBigram {
        GoodBigram {
            next_surface: next_surface.to_string(),
            next_tag: next_tag.to_string(),
            cur_surface: cur_surface.to_string(),
            cur_tag: cur_tag.to_string(),
        }
    }

    fn prep_noun_sentence(noun: &str) -> Sentence {
        Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new(noun, vec![Analysis::new(noun, "N")]),
        ])
    }

    #[test]
    fn test_count_frequencies_key_order() {
        let bigrams = vec![
            bigram("ADV", "nextT1", "V", "curT1"),
            bigram("ADV", "nextT1", "V", "curT1"),
        ];
        let freqs = count_frequencies(&bigrams);
        assert_eq!(
            freqs.get(&("curT1".to_string(), "nextT1".to_string())),
            Some(&2)
        );
    }

    #[test]
    fn test_collect_skips_ambiguous_pairs() {
        let corpus = vec![Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new(
                "casa",
                vec![
                    Analysis::new("casa", "N,f,sg"),
                    Analysis::new("casar", "V,fin,pres,3sg"),
                ],
            ),
            Word::new("velha", vec![Analysis::new("velho", "A,f,sg")]),
        ])];
        // "casa" é ambígua: nenhum dos dois pares é seguro
        assert!(collect_good_bigrams(&corpus).is_empty());
    }

    #[test]
    fn test_collect_accepts_fusions_as_safe() {
        let corpus = vec![Sentence::new(vec![
            Word::new("Gosto", vec![Analysis::new("gostar", "V,fin,pres,1sg")]),
            Word::new(
                "dele",
                vec![Analysis::new("de", "PREP"), Analysis::new("ele", "PRON,A")],
            ),
        ])];
        let bigrams = collect_good_bigrams(&corpus);
        assert_eq!(bigrams.len(), 1);
        // a tag registrada para a fusão é a da última análise
        assert_eq!(bigrams[0].next_tag, "PRON,A");
        assert_eq!(bigrams[0].cur_tag, "V,fin,pres,1sg");
    }

    #[test]
    fn test_rule_table_ranking() {
        let bigrams = vec![
            bigram("casa", "N", "de", "PREP"),
            bigram("casa", "N", "de", "PREP"),
            bigram("com", "PREP", "de", "PREP"),
            bigram("velha", "A", "de", "PREP"),
            bigram("velha", "A", "de", "PREP"),
        ];
        let rules = BigramRules::from_frequencies(&count_frequencies(&bigrams));
        let suggestions = rules.suggestions("PREP").unwrap();
        // ordenado por frequência; empate N/A mantém a ordem de aparição
        assert_eq!(suggestions[0], ("N".to_string(), 2));
        assert_eq!(suggestions[1], ("A".to_string(), 2));
        assert_eq!(suggestions[2], ("PREP".to_string(), 1));
    }

    #[test]
    fn test_apply_resolves_with_previous_tag() {
        // treino: PREP → N com frequência 5, PREP → PREP com frequência 1
        let mut train: Vec<Sentence> = (0..5)
            .map(|i| prep_noun_sentence(&format!("casa{i}")))
            .collect();
        train.push(Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new("sob", vec![Analysis::new("sob", "PREP")]),
        ]));
        let rules = BigramRules::train(&train);

        // alvo: PREP inequívoca seguida de palavra ambígua {N, PREP}
        let mut target = vec![Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new(
                "baixo",
                vec![Analysis::new("baixo", "N"), Analysis::new("baixo", "PREP")],
            ),
        ])];
        let changes = apply(&mut target, &rules);
        assert_eq!(changes, 1);
        assert_eq!(target[0].words[1].analyses.len(), 1);
        assert_eq!(target[0].words[1].analyses[0].tag, "N");
    }

    #[test]
    fn test_apply_without_suggestion_is_noop() {
        let rules = BigramRules::train(&[prep_noun_sentence("casa")]);
        let mut target = vec![Sentence::new(vec![
            Word::new("ontem", vec![Analysis::new("ontem", "ADV")]),
            Word::new(
                "canto",
                vec![
                    Analysis::new("canto", "N,m,sg"),
                    Analysis::new("cantar", "V,fin,pres,1sg"),
                ],
            ),
        ])];
        let before = target.clone();
        assert_eq!(apply(&mut target, &rules), 0);
        assert_eq!(target, before);
    }

    #[test]
    fn test_apply_keeps_anchor_and_narrows_rest() {
        // treino ensina que depois de PRON,pers vem V,inf
        let train = vec![Sentence::new(vec![
            Word::new("ele", vec![Analysis::new("ele", "PRON,pers")]),
            Word::new("ver", vec![Analysis::new("ver", "V,inf")]),
        ])];
        let rules = BigramRules::train(&train);

        // alvo: palavra com âncora ADV e duas leituras verbais em disputa
        let mut target = vec![Sentence::new(vec![
            Word::new("ele", vec![Analysis::new("ele", "PRON,pers")]),
            Word::new(
                "fora",
                vec![
                    Analysis::new("fora", "ADV"),
                    Analysis::new("ser", "V,fin,mqp,3sg"),
                    Analysis::new("ir", "V,inf"),
                ],
            ),
        ])];
        let changes = apply(&mut target, &rules);
        assert_eq!(changes, 1);
        let tags: Vec<&str> = target[0].words[1]
            .analyses
            .iter()
            .map(|a| a.tag.as_str())
            .collect();
        // âncora sobrevive; entre as leituras verbais fica só a sugerida
        assert_eq!(tags, vec!["ADV", "V,inf"]);
    }

    #[test]
    fn test_apply_skips_resolved_fusion() {
        let rules = BigramRules::train(&[prep_noun_sentence("casa")]);
        let mut target = vec![Sentence::new(vec![
            Word::new("de", vec![Analysis::new("de", "PREP")]),
            Word::new(
                "dele",
                vec![Analysis::new("de", "PREP"), Analysis::new("ele", "PRON,A")],
            ),
        ])];
        let before = target.clone();
        assert_eq!(apply(&mut target, &rules), 0);
        assert_eq!(target, before);
    }
}
