//! Text normalization before speech synthesis.
//!
//! Answers arrive as markdown. Before they are spoken, markup is stripped,
//! symbols are spelled out in the answer's language, and a short pause mark
//! (a comma) is inserted after sentence-initial discourse particles.

use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]*`").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*•►▸]|\d+\.)[ \t]+").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)#{1,6}[ \t]*").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*{1,3}(.*?)\*{1,3}").unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{1F300}-\x{1FAFF}\x{2600}-\x{27BF}\x{FE0F}]").unwrap());

static DIGIT_MINUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)[ \t]*-[ \t]*(\d)").unwrap());
static RUPEE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"₹[ \t]*(\d[\d,]*(?:\.\d+)?)").unwrap());
static DOLLAR_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[ \t]*(\d[\d,]*(?:\.\d+)?)").unwrap());

fn particle_regex(words: &[&str]) -> Regex {
    let alternatives = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(^|[.!?।][ \t\n]+)({})([ \t\n])", alternatives)).unwrap()
}

static PARTICLES_EN: Lazy<Regex> = Lazy::new(|| {
    particle_regex(&[
        "so", "well", "now", "okay", "actually", "basically", "first", "next", "finally",
    ])
});
static PARTICLES_HI: Lazy<Regex> = Lazy::new(|| particle_regex(&["तो", "अब", "पहले"]));
static PARTICLES_TE: Lazy<Regex> = Lazy::new(|| particle_regex(&["అయితే", "ఇప్పుడు", "మొదట"]));
static PARTICLES_UR: Lazy<Regex> = Lazy::new(|| particle_regex(&["تو", "اب"]));

fn particles(language: Language) -> &'static Regex {
    match language {
        Language::English => &PARTICLES_EN,
        Language::Hindi => &PARTICLES_HI,
        Language::Telugu => &PARTICLES_TE,
        Language::Urdu => &PARTICLES_UR,
    }
}

struct SymbolWords {
    percent: &'static str,
    rupees: &'static str,
    dollars: &'static str,
    plus: &'static str,
    minus: &'static str,
    equals: &'static str,
    times: &'static str,
    divided_by: &'static str,
    less_than: &'static str,
    greater_than: &'static str,
    and: &'static str,
    degrees: &'static str,
}

fn symbol_words(language: Language) -> &'static SymbolWords {
    const EN: SymbolWords = SymbolWords {
        percent: "percent",
        rupees: "rupees",
        dollars: "dollars",
        plus: "plus",
        minus: "minus",
        equals: "equals",
        times: "times",
        divided_by: "divided by",
        less_than: "less than",
        greater_than: "greater than",
        and: "and",
        degrees: "degrees",
    };
    const HI: SymbolWords = SymbolWords {
        percent: "प्रतिशत",
        rupees: "रुपये",
        dollars: "डॉलर",
        plus: "जमा",
        minus: "घटा",
        equals: "बराबर",
        times: "गुणा",
        divided_by: "भाग",
        less_than: "से कम",
        greater_than: "से अधिक",
        and: "और",
        degrees: "डिग्री",
    };
    const TE: SymbolWords = SymbolWords {
        percent: "శాతం",
        rupees: "రూపాయలు",
        dollars: "డాలర్లు",
        plus: "ప్లస్",
        minus: "మైనస్",
        equals: "సమానం",
        times: "ఇంటూ",
        divided_by: "భాగహారం",
        less_than: "కంటే తక్కువ",
        greater_than: "కంటే ఎక్కువ",
        and: "మరియు",
        degrees: "డిగ్రీలు",
    };
    const UR: SymbolWords = SymbolWords {
        percent: "فیصد",
        rupees: "روپے",
        dollars: "ڈالر",
        plus: "جمع",
        minus: "منفی",
        equals: "برابر",
        times: "ضرب",
        divided_by: "تقسیم",
        less_than: "سے کم",
        greater_than: "سے زیادہ",
        and: "اور",
        degrees: "ڈگری",
    };
    match language {
        Language::English => &EN,
        Language::Hindi => &HI,
        Language::Telugu => &TE,
        Language::Urdu => &UR,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markdown so it is not read aloud.
pub fn strip_markdown(text: &str) -> String {
    let t = FENCED_CODE.replace_all(text, " ");
    let t = INLINE_CODE.replace_all(&t, " ");
    let t = BULLET.replace_all(&t, "");
    let t = HEADING.replace_all(&t, "");
    let t = EMPHASIS.replace_all(&t, "$1");
    let t = STRIKE.replace_all(&t, "$1");
    let t = LINK.replace_all(&t, "$1");
    let t = EMOJI.replace_all(&t, "");
    let t = t.replace('|', " ");
    collapse_whitespace(&t)
}

/// Replace symbols and currency amounts with words in `language`.
pub fn spell_out_symbols(text: &str, language: Language) -> String {
    let w = symbol_words(language);
    let t = DIGIT_MINUS.replace_all(text, format!("$1 {} $2", w.minus).as_str());
    let t = RUPEE_AMOUNT.replace_all(&t, format!("$1 {}", w.rupees).as_str());
    let t = DOLLAR_AMOUNT.replace_all(&t, format!("$1 {}", w.dollars).as_str());

    let mut out = String::with_capacity(t.len() + 16);
    for c in t.chars() {
        let word = match c {
            '%' => Some(w.percent),
            '₹' => Some(w.rupees),
            '$' => Some(w.dollars),
            '+' => Some(w.plus),
            '=' => Some(w.equals),
            '×' => Some(w.times),
            '÷' => Some(w.divided_by),
            '<' => Some(w.less_than),
            '>' => Some(w.greater_than),
            '&' => Some(w.and),
            '°' => Some(w.degrees),
            _ => None,
        };
        match word {
            Some(word) => {
                out.push(' ');
                out.push_str(word);
                out.push(' ');
            }
            None => out.push(c),
        }
    }
    collapse_whitespace(&out)
}

/// Insert a pause mark after sentence-initial discourse particles.
pub fn insert_pauses(text: &str, language: Language) -> String {
    let re = particles(language);
    // Matches overlap on the separating whitespace, so run until stable.
    let mut current = text.to_string();
    loop {
        let next = re.replace_all(&current, "$1$2,$3").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Remove the pause marks [`insert_pauses`] adds.
pub fn strip_pause_marks(text: &str, language: Language) -> String {
    let words = match language {
        Language::English => &PARTICLES_EN_MARKED,
        Language::Hindi => &PARTICLES_HI_MARKED,
        Language::Telugu => &PARTICLES_TE_MARKED,
        Language::Urdu => &PARTICLES_UR_MARKED,
    };
    let mut current = text.to_string();
    loop {
        let next = words.replace_all(&current, "$1$2$3").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn marked_regex(plain: &Regex) -> Regex {
    // `...(words)([ \t\n])` becomes `...(words),([ \t\n])`
    let pattern = plain.as_str().replacen(")([ \\t\\n])", "),([ \\t\\n])", 1);
    Regex::new(&pattern).unwrap()
}

static PARTICLES_EN_MARKED: Lazy<Regex> = Lazy::new(|| marked_regex(&PARTICLES_EN));
static PARTICLES_HI_MARKED: Lazy<Regex> = Lazy::new(|| marked_regex(&PARTICLES_HI));
static PARTICLES_TE_MARKED: Lazy<Regex> = Lazy::new(|| marked_regex(&PARTICLES_TE));
static PARTICLES_UR_MARKED: Lazy<Regex> = Lazy::new(|| marked_regex(&PARTICLES_UR));

/// Full pipeline: strip markup, spell out symbols, insert pauses.
pub fn normalize_for_speech(text: &str, language: Language) -> String {
    let stripped = strip_markdown(text);
    let spelled = spell_out_symbols(&stripped, language);
    insert_pauses(&spelled, language)
}
