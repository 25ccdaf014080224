//! # Corpus Morfologicamente Anotado
//!
//! Estruturas que representam um corpus já processado por um analisador
//! morfológico: cada palavra carrega uma ou mais análises candidatas
//! ("anas"), e a tarefa dos motores deste crate é escolher a(s) análise(s)
//! mais provável(is) para as palavras ambíguas.
//!
//! ## Hierarquia
//!
//! - [`Sentence`]: sequência ordenada de palavras — a ordem define o contexto
//!   usado por bigramas, transformações e Viterbi.
//! - [`Word`]: forma de superfície + conjunto de análises candidatas.
//! - [`Analysis`]: um lema e uma tag gramatical propostos pelo analisador.
//!
//! A leitura e a persistência dos arquivos do corpus ficam a cargo da camada
//! de I/O externa; os motores recebem e devolvem fatias de [`Sentence`].

use serde::{Deserialize, Serialize};

/// Uma análise morfológica candidata para uma palavra.
///
/// Produzida pelo analisador morfológico e imutável a partir daí: os motores
/// de desambiguação descartam ou reordenam análises, mas nunca inventam novas.
///
/// A tag é uma lista de campos separados por vírgula, onde o primeiro campo é
/// a categoria gramatical. Exemplos: `"N,f,sg"`, `"V,fin,pres,1sg"`,
/// `"PRON,A"` (pronome átono), `"PREP"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Lema proposto. Vazio quando a análise é apenas um marcador deixado
    /// pelo analisador para uma palavra desconhecida.
    pub lemma: String,
    /// Tag gramatical completa.
    pub tag: String,
}

impl Analysis {
    pub fn new(lemma: &str, tag: &str) -> Self {
        Self {
            lemma: lemma.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Uma análise "de verdade" tem lema e tag; marcadores vazios não contam
    /// para a ambiguidade de uma palavra.
    pub fn is_annotated(&self) -> bool {
        !self.lemma.is_empty() && !self.tag.is_empty()
    }
}

/// Uma palavra do corpus: forma de superfície + análises candidatas.
///
/// A forma de superfície é um campo próprio da palavra, independente das
/// análises — qualquer análise pode ser descartada sem perder o texto.
///
/// Invariante: uma palavra viva tem sempre ≥ 1 análise. Os motores trocam o
/// conjunto de análises por atribuição única (`word.analyses = novo`), nunca
/// por esvaziar-e-repovoar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub surface: String,
    pub analyses: Vec<Analysis>,
}

impl Word {
    pub fn new(surface: &str, analyses: Vec<Analysis>) -> Self {
        Self {
            surface: surface.to_string(),
            analyses,
        }
    }

    /// Somente as análises anotadas (com lema e tag).
    pub fn annotated(&self) -> Vec<&Analysis> {
        self.analyses.iter().filter(|a| a.is_annotated()).collect()
    }

    /// Uma palavra está resolvida quando resta exatamente uma análise anotada.
    pub fn is_resolved(&self) -> bool {
        self.annotated().len() == 1
    }
}

/// Uma sentença: sequência ordenada de palavras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

fn w(surface: &str, analyses: &[(&str, &str)]) -> Word {
    Word::new(
        surface,
        analyses
            .iter()
            .map(|(lemma, tag)| Analysis::new(lemma, tag))
            .collect(),
    )
}

fn s(words: &[(&str, &[(&str, &str)])]) -> Sentence {
    Sentence::new(
        words
            .iter()
            .map(|(surface, analyses)| w(surface, analyses))
            .collect(),
    )
}

/// Corpus de demonstração em PT-BR, com a saída típica de um analisador
/// morfológico antes da desambiguação.
///
/// Cobre os três padrões de fusão tratados pelo caso especial:
/// - homógrafos advérbio/verbo: *cedo* (ADV × ceder), *fora* (ADV × ser);
/// - contrações preposição+pronome: *dele* (de + ele);
/// - grupos verbo+clítico: *vê-lo* (ver + o);
///
/// além de homonímia genuína N/V (*casa*, *canto*, *gosto*) e palavras com
/// três leituras (*seca*, *a*). Usado em testes e exemplos de documentação.
pub fn demo_corpus() -> Vec<Sentence> {
    vec![
        s(&[
            ("Eu", &[("eu", "PRON,pers")]),
            ("cedo", &[("cedo", "ADV"), ("ceder", "V,fin,pres,1sg")]),
            ("o", &[("o", "ART"), ("o", "PRON,A")]),
            ("lugar", &[("lugar", "N,m,sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Ele", &[("ele", "PRON,pers")]),
            ("chegou", &[("chegar", "V,fin,perf,3sg")]),
            ("cedo", &[("cedo", "ADV"), ("ceder", "V,fin,pres,1sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Gosto", &[("gosto", "N,m,sg"), ("gostar", "V,fin,pres,1sg")]),
            ("dele", &[("de", "PREP"), ("ele", "PRON,A")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Quero", &[("querer", "V,fin,pres,1sg")]),
            ("vê-lo", &[("ver", "V,inf"), ("o", "PRON,A")]),
            ("amanhã", &[("amanhã", "ADV")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("A", &[("a", "ART"), ("a", "PREP"), ("a", "PRON,A")]),
            ("casa", &[("casa", "N,f,sg"), ("casar", "V,fin,pres,3sg")]),
            ("seca", &[("seco", "A,f,sg"), ("seca", "N,f,sg"), ("secar", "V,fin,pres,3sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("O", &[("o", "ART"), ("o", "PRON,A")]),
            ("canto", &[("canto", "N,m,sg"), ("cantar", "V,fin,pres,1sg")]),
            ("da", &[("de", "PREP"), ("a", "ART")]),
            ("casa", &[("casa", "N,f,sg"), ("casar", "V,fin,pres,3sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Maria", &[("Maria", "N,prop,f,sg")]),
            ("viajou", &[("viajar", "V,fin,perf,3sg")]),
            ("ontem", &[("ontem", "ADV")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Ela", &[("ela", "PRON,pers")]),
            ("fora", &[("fora", "ADV"), ("ser", "V,fin,mqp,3sg")]),
            ("vista", &[("ver", "V,part"), ("vista", "N,f,sg")]),
            ("fora", &[("fora", "ADV"), ("ser", "V,fin,mqp,3sg")]),
            ("da", &[("de", "PREP"), ("a", "ART")]),
            ("cidade", &[("cidade", "N,f,sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("O", &[("o", "ART"), ("o", "PRON,A")]),
            ("tempo", &[("tempo", "N,m,sg")]),
            ("seca", &[("secar", "V,fin,pres,3sg"), ("seco", "A,f,sg"), ("seca", "N,f,sg")]),
            ("a", &[("a", "ART"), ("a", "PREP"), ("a", "PRON,A")]),
            ("roupa", &[("roupa", "N,f,sg")]),
            (".", &[(".", "PUNCT")]),
        ]),
        s(&[
            ("Maria", &[("Maria", "N,prop,f,sg")]),
            ("viajou", &[("viajar", "V,fin,perf,3sg")]),
            ("para", &[("para", "PREP"), ("parar", "V,fin,pres,3sg")]),
            ("Xingu", &[("", "")]),
            (".", &[(".", "PUNCT")]),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_corpus_words_have_analyses() {
        let corpus = demo_corpus();
        assert!(!corpus.is_empty());
        for sentence in &corpus {
            assert!(!sentence.words.is_empty());
            for word in &sentence.words {
                assert!(!word.analyses.is_empty());
            }
        }
    }

    #[test]
    fn test_demo_corpus_has_fusions() {
        let corpus = demo_corpus();
        let dele = corpus
            .iter()
            .flat_map(|s| &s.words)
            .find(|w| w.surface == "dele")
            .expect("demo corpus deve conter 'dele'");
        assert_eq!(dele.analyses.len(), 2);
    }

    #[test]
    fn test_is_resolved() {
        let resolved = Word::new("lugar", vec![Analysis::new("lugar", "N,m,sg")]);
        assert!(resolved.is_resolved());

        let ambiguous = Word::new(
            "casa",
            vec![
                Analysis::new("casa", "N,f,sg"),
                Analysis::new("casar", "V,fin,pres,3sg"),
            ],
        );
        assert!(!ambiguous.is_resolved());
    }

    #[test]
    fn test_placeholder_is_not_annotated() {
        let unknown = Word::new("Xingu", vec![Analysis::new("", "")]);
        assert!(unknown.annotated().is_empty());
        assert!(!unknown.is_resolved());
    }
}
