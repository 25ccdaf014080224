//! # Aprendizado de Transformações (método de Brill)
//!
//! A segunda estratégia de desambiguação: **Transformation-Based Learning**.
//! Em vez de probabilidades, o motor induz uma lista **ordenada** de regras
//! de reescrita `de → para se contexto`, cada uma escolhida gulosamente por
//! maximizar o ganho líquido de desambiguação sobre o corpus inteiro.
//!
//! ## Representação
//!
//! O aprendizado trabalha sobre uma versão achatada do corpus: cada palavra
//! vira um [`PosToken`] com sua **tag composta** (classe de ambiguidade, ex:
//! `N_V:fin`). Uma tag composta com `_` é uma palavra ainda ambígua; a regra
//! aprendida a reescreve para uma de suas partes atômicas.
//!
//! ## Moldes de contexto
//!
//! Quatro moldes, todos sobre o vizinho imediato: palavra anterior, palavra
//! seguinte, tag anterior, tag seguinte.
//!
//! ## Pontuação
//!
//! Para um candidato `de → para se contexto`:
//!
//! ```text
//! ganho = inContexto(para, ctx) − max_{z ≠ para} freq(para)/freq(z) · inContexto(z, ctx)
//! ```
//!
//! onde `inContexto(t, ctx)` conta ocorrências **inequívocas** de `t` naquele
//! contexto. O primeiro termo estima os acertos da reescrita; o segundo, os
//! erros que ela causaria onde outra parte atômica era a correta.
//!
//! Todos os máximos desempatam pela ordem de primeira aparição nos mapas
//! (contêineres ordenados por inserção) — o aprendizado é reprodutível.
//!
//! A lista aprendida tem forma textual de intercâmbio (uma regra por linha,
//! campos separados por tabulação) que faz ida-e-volta exata — ver
//! [`Transformation::to_line`] e [`Transformation::from_line`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::{Analysis, Sentence};
use crate::error::DisambigError;
use crate::tagger::compound_tag;

/// O que a regra inspeciona no vizinho: a forma de superfície ou a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Word,
    Tag,
}

impl ContextKind {
    fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Word => "word",
            ContextKind::Tag => "tag",
        }
    }
}

/// Os quatro moldes de contexto, na ordem fixa de avaliação.
pub const TEMPLATES: [(i8, ContextKind); 4] = [
    (-1, ContextKind::Tag),
    (1, ContextKind::Tag),
    (-1, ContextKind::Word),
    (1, ContextKind::Word),
];

/// Uma regra de transformação aprendida: reescreve `from_tag` para `to_tag`
/// quando o vizinho em `offset` (−1 ou +1) tem a palavra/tag `context`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub from_tag: String,
    pub to_tag: String,
    pub offset: i8,
    pub kind: ContextKind,
    pub context: String,
}

impl Transformation {
    /// Forma textual de intercâmbio: `de\tpara\tdeslocamento\ttipo\tcontexto`.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.from_tag,
            self.to_tag,
            self.offset,
            self.kind.as_str(),
            self.context
        )
    }

    /// Reconstrói uma regra a partir da forma textual. Ida-e-volta exata com
    /// [`Transformation::to_line`].
    pub fn from_line(line: &str) -> Result<Self, DisambigError> {
        let malformed = || DisambigError::MalformedRule(line.to_string());
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 5 {
            return Err(malformed());
        }
        let offset: i8 = fields[2].parse().map_err(|_| malformed())?;
        if offset != -1 && offset != 1 {
            return Err(malformed());
        }
        let kind = match fields[3] {
            "word" => ContextKind::Word,
            "tag" => ContextKind::Tag,
            _ => return Err(malformed()),
        };
        Ok(Self {
            from_tag: fields[0].to_string(),
            to_tag: fields[1].to_string(),
            offset,
            kind,
            context: fields[4].to_string(),
        })
    }
}

/// Interpreta uma lista de regras em forma textual, uma por linha.
/// Linhas em branco são ignoradas.
pub fn parse_rules(text: &str) -> Result<Vec<Transformation>, DisambigError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Transformation::from_line)
        .collect()
}

/// Uma palavra do corpus achatado: superfície + tag composta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosToken {
    pub surface: String,
    pub tag: String,
}

/// Achata o corpus estruturado na representação de tokens etiquetados.
pub fn make_pos_corpus(corpus: &[Sentence]) -> Vec<Vec<PosToken>> {
    corpus
        .iter()
        .map(|sentence| {
            sentence
                .words
                .iter()
                .map(|word| PosToken {
                    surface: word.surface.clone(),
                    tag: compound_tag(word.analyses.iter().map(|a| a.tag.as_str())),
                })
                .collect()
        })
        .collect()
}

/// Configuração do aprendizado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrillConfig {
    /// Teto de regras aprendidas; o laço também para sozinho quando o melhor
    /// ganho deixa de ser positivo.
    pub max_rules: usize,
}

impl Default for BrillConfig {
    fn default() -> Self {
        Self { max_rules: 500 }
    }
}

/// Estatísticas de uma passada sobre o corpus achatado: frequência de cada
/// tag e os quatro mapas direcionais de coocorrência.
#[derive(Debug, Default)]
struct ContextStats {
    tag_freq: IndexMap<String, u32>,
    word_next: IndexMap<String, IndexMap<String, u32>>,
    tag_next: IndexMap<String, IndexMap<String, u32>>,
    word_prev: IndexMap<String, IndexMap<String, u32>>,
    tag_prev: IndexMap<String, IndexMap<String, u32>>,
}

impl ContextStats {
    fn collect(corpus: &[Vec<PosToken>]) -> Self {
        let mut stats = ContextStats::default();
        for sentence in corpus {
            for (i, token) in sentence.iter().enumerate() {
                *stats.tag_freq.entry(token.tag.clone()).or_insert(0) += 1;
                if i + 1 < sentence.len() {
                    let next = &sentence[i + 1];
                    *stats
                        .word_next
                        .entry(token.tag.clone())
                        .or_default()
                        .entry(next.surface.clone())
                        .or_insert(0) += 1;
                    *stats
                        .tag_next
                        .entry(token.tag.clone())
                        .or_default()
                        .entry(next.tag.clone())
                        .or_insert(0) += 1;
                }
                if i > 0 {
                    let prev = &sentence[i - 1];
                    *stats
                        .word_prev
                        .entry(token.tag.clone())
                        .or_default()
                        .entry(prev.surface.clone())
                        .or_insert(0) += 1;
                    *stats
                        .tag_prev
                        .entry(token.tag.clone())
                        .or_default()
                        .entry(prev.tag.clone())
                        .or_insert(0) += 1;
                }
            }
        }
        stats
    }

    fn context_map(&self, offset: i8, kind: ContextKind) -> &IndexMap<String, IndexMap<String, u32>> {
        match (offset, kind) {
            (1, ContextKind::Word) => &self.word_next,
            (-1, ContextKind::Word) => &self.word_prev,
            (1, ContextKind::Tag) => &self.tag_next,
            _ => &self.tag_prev,
        }
    }

    /// Ocorrências de `tag` (como tag completa do token, logo inequívocas
    /// quando `tag` é atômica) com o valor `value` no vizinho do molde.
    fn in_context(&self, tag: &str, offset: i8, kind: ContextKind, value: &str) -> u32 {
        self.context_map(offset, kind)
            .get(tag)
            .and_then(|contexts| contexts.get(value))
            .copied()
            .unwrap_or(0)
    }

    fn freq(&self, tag: &str) -> u32 {
        self.tag_freq.get(tag).copied().unwrap_or(0)
    }

    /// Erros estimados da reescrita para `to_tag` onde a parte atômica
    /// concorrente `other` era a correta: `freq(para)/freq(z) · inContexto(z)`.
    fn estimate(&self, to_tag: &str, other: &str, offset: i8, kind: ContextKind, value: &str) -> f64 {
        let other_freq = self.freq(other);
        if other_freq == 0 {
            return 0.0;
        }
        let to_freq = self.freq(to_tag) as f64;
        to_freq / other_freq as f64 * self.in_context(other, offset, kind, value) as f64
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    rule: Transformation,
    score: f64,
}

/// Busca a transformação de maior ganho no estado corrente do corpus.
/// Devolve `None` quando nenhum candidato tem ganho estritamente positivo.
fn best_transformation(stats: &ContextStats) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    // toda tag composta com '_' é uma classe de ambiguidade ainda aberta
    let from_tags: Vec<&String> = stats
        .tag_freq
        .keys()
        .filter(|tag| tag.contains('_'))
        .collect();

    for &(offset, kind) in TEMPLATES.iter() {
        for from_tag in &from_tags {
            let contexts = match stats.context_map(offset, kind).get(*from_tag) {
                Some(c) => c,
                None => continue,
            };
            let to_tags: Vec<&str> = from_tag.split('_').collect();
            for to_tag in &to_tags {
                for context in contexts.keys() {
                    let mut worst_rival = 0.0f64;
                    for other in &to_tags {
                        if other == to_tag {
                            continue;
                        }
                        let estimated = stats.estimate(to_tag, other, offset, kind, context);
                        if estimated > worst_rival {
                            worst_rival = estimated;
                        }
                    }
                    let score =
                        stats.in_context(to_tag, offset, kind, context) as f64 - worst_rival;
                    let improves = match &best {
                        Some(b) => score > b.score,
                        None => score > 0.0,
                    };
                    if improves {
                        best = Some(Candidate {
                            rule: Transformation {
                                from_tag: (*from_tag).clone(),
                                to_tag: to_tag.to_string(),
                                offset,
                                kind,
                                context: context.clone(),
                            },
                            score,
                        });
                    }
                }
            }
        }
    }
    best
}

fn neighbor_index(i: usize, len: usize, offset: i8) -> Option<usize> {
    if offset == -1 {
        i.checked_sub(1)
    } else if i + 1 < len {
        Some(i + 1)
    } else {
        None
    }
}

/// Reescreve em lugar todos os tokens que casam com a regra.
fn apply_to_tokens(corpus: &mut [Vec<PosToken>], rule: &Transformation) {
    for sentence in corpus.iter_mut() {
        for i in 0..sentence.len() {
            if sentence[i].tag != rule.from_tag {
                continue;
            }
            let neighbor = match neighbor_index(i, sentence.len(), rule.offset) {
                Some(j) => j,
                None => continue,
            };
            let matches = match rule.kind {
                ContextKind::Word => sentence[neighbor].surface == rule.context,
                ContextKind::Tag => sentence[neighbor].tag == rule.context,
            };
            if matches {
                sentence[i].tag = rule.to_tag.clone();
            }
        }
    }
}

/// Induz a lista ordenada de transformações.
///
/// A cada iteração: recomputa as estatísticas do corpus, escolhe a regra de
/// maior ganho entre todos os moldes, aplica-a ao corpus e a registra. Para
/// quando o melhor ganho deixa de ser positivo, quando a vencedora já foi
/// aprendida (nenhum progresso possível) ou ao atingir `max_rules`. A
/// aplicação de cada regra termina antes da recontagem seguinte — o laço é
/// estritamente sequencial.
pub fn learn(corpus: &[Sentence], config: &BrillConfig) -> Vec<Transformation> {
    let mut tagged = make_pos_corpus(corpus);
    let mut learned: Vec<Transformation> = Vec::new();
    loop {
        let stats = ContextStats::collect(&tagged);
        let candidate = match best_transformation(&stats) {
            Some(c) => c,
            None => break,
        };
        if learned.contains(&candidate.rule) {
            break;
        }
        apply_to_tokens(&mut tagged, &candidate.rule);
        debug!(
            score = candidate.score,
            rule = %candidate.rule.to_line(),
            "transformação aprendida"
        );
        learned.push(candidate.rule);
        if learned.len() >= config.max_rules {
            break;
        }
    }
    info!(total = learned.len(), "aprendizado de transformações concluído");
    learned
}

/// Aplica uma lista ordenada de regras ao corpus estruturado. Devolve o
/// número de estreitamentos efetuados.
///
/// As regras são repassadas na ordem aprendida e cada efeito fica visível
/// para as regras seguintes. Uma palavra casa quando sua tag composta é igual
/// a `from_tag` e o vizinho indicado tem o valor de contexto esperado
/// (vizinho fora da sentença = não casa). As análises sobreviventes são as
/// cujas tags completas começam com `to_tag` (com `:` de volta a `,`); se
/// nenhuma sobra, o conjunto original fica intacto.
pub fn apply(corpus: &mut [Sentence], rules: &[Transformation]) -> usize {
    let mut changes = 0;
    for rule in rules {
        for sentence in corpus.iter_mut() {
            for i in 0..sentence.words.len() {
                if apply_rule_at(sentence, i, rule) {
                    changes += 1;
                }
            }
        }
    }
    info!(changes, rules = rules.len(), "transformações aplicadas");
    changes
}

fn apply_rule_at(sentence: &mut Sentence, i: usize, rule: &Transformation) -> bool {
    let word = &sentence.words[i];
    if word.analyses.len() <= 1 {
        return false;
    }
    let current = compound_tag(word.analyses.iter().map(|a| a.tag.as_str()));
    if current != rule.from_tag {
        return false;
    }
    let neighbor = match neighbor_index(i, sentence.words.len(), rule.offset) {
        Some(j) => j,
        None => return false,
    };
    let observed = match rule.kind {
        ContextKind::Word => sentence.words[neighbor].surface.clone(),
        ContextKind::Tag => compound_tag(
            sentence.words[neighbor]
                .analyses
                .iter()
                .map(|a| a.tag.as_str()),
        ),
    };
    if observed != rule.context {
        return false;
    }
    let raw_prefix = rule.to_tag.replace(':', ",");
    let kept: Vec<Analysis> = word
        .analyses
        .iter()
        .filter(|a| a.tag.starts_with(&raw_prefix))
        .cloned()
        .collect();
    if kept.is_empty() || kept.len() == word.analyses.len() {
        // fail-safe: reescrita sem análise compatível deixa a palavra intacta
        return false;
    }
    sentence.words[i].analyses = kept;
    true
}
