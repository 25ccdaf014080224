//! # Modelo de Tags — Redução, Tags Compostas e Casos Especiais
//!
//! As tags completas do analisador morfológico (`"V,fin,pres,1sg"`) são ricas
//! demais para servir de vocabulário estatístico. Este módulo define as três
//! operações de normalização usadas por todos os motores:
//!
//! 1. **Redução** ([`reduce_tag`]): corta a tag para a granularidade em que a
//!    desambiguação acontece. Tags verbais e pronominais guardam categoria e
//!    subtipo (`"V:fin"`, `"PRON:A"`); as demais guardam só a categoria.
//! 2. **Tag composta** ([`compound_tag`]): combina as tags de todas as
//!    análises de uma palavra em uma única string canônica, independente de
//!    ordem — é a classe de ambiguidade da palavra (`"N_V:fin"`).
//! 3. **Caso especial** ([`special_case`]): reconhece três padrões de fusão
//!    em que duas categorias coexistem legitimamente em uma palavra:
//!
//! | Categorias   | Âncora | Exemplo                               |
//! |--------------|--------|---------------------------------------|
//! | V + ADV      | ADV    | *cedo* (advérbio × "eu cedo")         |
//! | PREP + PRON  | PREP   | *dele* (contração de + ele)           |
//! | V + PRON     | PRON   | *vê-lo* (verbo + clítico)             |
//!
//! A análise da categoria âncora sempre sobrevive; a disputa, se houver,
//! fica restrita às demais análises.

use crate::corpus::{Analysis, Word};

/// Tag reservada para análises sem anotação utilizável.
pub const PLACEHOLDER_TAG: &str = "ND";

/// Reduz uma tag completa à granularidade de desambiguação.
///
/// Tags verbais e pronominais retêm os dois primeiros campos unidos por `:`
/// (o subtipo distingue `V:fin` de `V:inf`, `PRON:A` de `PRON:pers`); as
/// demais retêm apenas a categoria. O marcador de incerteza `?` é removido.
///
/// # Exemplo
/// ```
/// use desambig_core::tagger::reduce_tag;
/// assert_eq!(reduce_tag("V,fin,pres,1sg"), "V:fin");
/// assert_eq!(reduce_tag("PRON,A"), "PRON:A");
/// assert_eq!(reduce_tag("N,f,sg"), "N");
/// assert_eq!(reduce_tag("ADV?"), "ADV");
/// ```
pub fn reduce_tag(raw: &str) -> String {
    let reduced = if raw.starts_with("PRON") || raw.starts_with('V') {
        raw.split(',').take(2).collect::<Vec<_>>().join(":")
    } else {
        raw.split(',').next().unwrap_or(raw).to_string()
    };
    let reduced: String = reduced.chars().filter(|&c| c != '?').collect();
    if reduced.is_empty() {
        PLACEHOLDER_TAG.to_string()
    } else {
        reduced
    }
}

/// A categoria gramatical (primeiro campo) de uma tag, sem o marcador `?`.
pub fn reduce_category(raw: &str) -> String {
    let category = raw.split(',').next().unwrap_or(raw);
    category.chars().filter(|&c| c != '?').collect()
}

/// Constrói a tag composta de uma palavra a partir das tags de suas análises.
///
/// Reduz cada tag, deduplica, ordena lexicamente e une com `_`; em seguida
/// aplica as três substituições literais que marcam fusões conhecidas como um
/// único token conjunto (`+` em vez de `_`). O resultado é determinístico e
/// independente da ordem das análises.
///
/// # Exemplo
/// ```
/// use desambig_core::tagger::compound_tag;
/// assert_eq!(compound_tag(["N,f,sg", "V,fin,pres,3sg"]), "N_V:fin");
/// assert_eq!(compound_tag(["PREP", "PRON,A"]), "PREP+PRON:A");
/// ```
pub fn compound_tag<'a, I>(raw_tags: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut reduced: Vec<String> = raw_tags.into_iter().map(reduce_tag).collect();
    reduced.sort();
    reduced.dedup();
    reduced
        .join("_")
        .replace("PREP_PRON:A", "PREP+PRON:A")
        .replace("ADV_V", "ADV+V")
        .replace("PRON_V", "PRON+V")
}

/// Resultado do reconhecimento de um padrão de fusão em uma palavra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialCase {
    /// Categoria que sempre sobrevive à desambiguação.
    pub anchor: &'static str,
    /// Análises da categoria âncora — mantidas incondicionalmente.
    pub sure: Vec<Analysis>,
    /// Análises ainda em disputa (das demais categorias).
    pub ambiguous: Vec<Analysis>,
    /// `true` quando resta exatamente uma análise em disputa: a palavra é uma
    /// fusão conhecida, as duas leituras coexistem e não há o que decidir.
    pub resolved: bool,
}

/// Reconhece os três padrões de fusão de duas categorias.
///
/// A palavra precisa ter ≥ 2 análises anotadas cujo conjunto de categorias
/// seja exatamente um dos pares conhecidos; qualquer outra forma devolve
/// `None`. A partição separa as análises da âncora (`sure`) das contestadas
/// (`ambiguous`). Esta rotina é consultada tanto pelo caminho de bigramas
/// quanto pelo de Viterbi — a política é uma só.
pub fn special_case(word: &Word) -> Option<SpecialCase> {
    let annotated = word.annotated();
    if annotated.len() < 2 {
        return None;
    }
    let mut categories: Vec<String> = annotated
        .iter()
        .map(|a| reduce_category(&a.tag))
        .collect();
    categories.sort();
    categories.dedup();
    if categories.len() != 2 {
        return None;
    }
    let anchor = match (categories[0].as_str(), categories[1].as_str()) {
        ("ADV", "V") => "ADV",
        ("PREP", "PRON") => "PREP",
        ("PRON", "V") => "PRON",
        _ => return None,
    };
    let (sure, ambiguous): (Vec<Analysis>, Vec<Analysis>) = annotated
        .into_iter()
        .cloned()
        .partition(|a| reduce_category(&a.tag) == anchor);
    let resolved = ambiguous.len() == 1;
    Some(SpecialCase {
        anchor,
        sure,
        ambiguous,
        resolved,
    })
}

/// A análise "segura" de uma palavra, se existir.
///
/// Uma palavra é segura quando tem exatamente uma análise anotada, ou quando
/// o caso especial reporta uma fusão resolvida (uma única análise em disputa
/// — ambas as leituras valem). No segundo caso a tag registrada é a da última
/// análise anotada. Palavras genuinamente ambíguas devolvem `None`.
pub fn safe_analysis(word: &Word) -> Option<&Analysis> {
    let annotated = word.annotated();
    match annotated.len() {
        0 => None,
        1 => Some(annotated[0]),
        _ => match special_case(word) {
            Some(case) if case.resolved => annotated.last().copied(),
            _ => None,
        },
    }
}
