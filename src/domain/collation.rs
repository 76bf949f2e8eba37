// src/domain/collation.rs
//! Title collation shared by the sort and the duplicate engines.
//!
//! Both engines receive the same `Collator`, so the ordering used to sort a
//! folder and the key used to call two titles "the same" are configured in
//! one place.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

static TITLE_PUNCTUATION: OnceLock<Regex> = OnceLock::new();

fn title_punctuation() -> &'static Regex {
    TITLE_PUNCTUATION.get_or_init(|| {
        Regex::new(r"[.,/#!$%\^&*;:{}=\-_`~()]").expect("compile title punctuation regex")
    })
}

/// Lower-cases the title and strips `. , / # ! $ % ^ & * ; : { } = - _ ` ~ ( )`.
///
/// Whitespace is kept, so `"Hello, World!"` and `"hello world"` share a key.
pub fn normalize_title(title: &str) -> String {
    title_punctuation()
        .replace_all(&title.to_lowercase(), "")
        .into_owned()
}

pub trait Collator: Send + Sync + Debug {
    /// Orders two titles. `Equal` lets a stable sort keep the store's order.
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Key under which two bookmark titles count as duplicates
    fn title_key(&self, title: &str) -> String {
        normalize_title(title)
    }
}

/// Primary strength comparison: case, accents, whitespace and punctuation
/// are ignored, only base letters and digits decide the order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryCollator;

impl PrimaryCollator {
    fn is_ignorable(c: char) -> bool {
        c.is_whitespace()
            || c.is_ascii_punctuation()
            || matches!(
                c,
                '\u{2018}'
                    | '\u{2019}'
                    | '\u{201C}'
                    | '\u{201D}'
                    | '\u{2013}'
                    | '\u{2014}'
                    | '\u{2026}'
                    | '\u{00A1}'
                    | '\u{00BF}'
                    | '\u{00AB}'
                    | '\u{00BB}'
                    | '\u{00B7}'
                    | '\u{2022}'
            )
    }

    /// Maps accented latin letters onto their base letter
    fn fold_accent(c: char) -> char {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
            'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
            'ď' | 'đ' => 'd',
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
            'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
            'ĥ' | 'ħ' => 'h',
            'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
            'ĵ' => 'j',
            'ķ' => 'k',
            'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
            'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
            'ŕ' | 'ŗ' | 'ř' => 'r',
            'ś' | 'ŝ' | 'ş' | 'š' => 's',
            'ţ' | 'ť' | 'ŧ' => 't',
            'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
            'ŵ' => 'w',
            'ý' | 'ÿ' | 'ŷ' => 'y',
            'ź' | 'ż' | 'ž' => 'z',
            other => other,
        }
    }

    fn primary_key(title: &str) -> impl Iterator<Item = char> + '_ {
        title
            .chars()
            .filter(|c| !Self::is_ignorable(*c))
            .flat_map(char::to_lowercase)
            .map(Self::fold_accent)
    }
}

impl Collator for PrimaryCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        Self::primary_key(a).cmp(Self::primary_key(b))
    }
}

/// Plain code point order, case and punctuation significant
#[derive(Debug, Default, Clone, Copy)]
pub struct OrdinalCollator;

impl Collator for OrdinalCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Configurable choice of collator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collation {
    #[default]
    Primary,
    Ordinal,
}

impl Collation {
    pub fn collator(self) -> Arc<dyn Collator> {
        match self {
            Collation::Primary => Arc::new(PrimaryCollator),
            Collation::Ordinal => Arc::new(OrdinalCollator),
        }
    }
}
