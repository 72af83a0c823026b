use once_cell::sync::Lazy;
use regex::Regex;

// @module: Text normalization for speech synthesis

// @const: Spacing fix after a period swallowed by extraction
static PERIOD_SPACING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([A-Z])").unwrap());

// @const: Spacing fix after a comma
static COMMA_SPACING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",([A-Za-z])").unwrap());

// @const: Concatenated-word split (camelCase accidents from extraction)
static CAMEL_CASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

// @const: Letter/digit boundary splits
static LETTER_DIGIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])(\d)").unwrap());
static DIGIT_LETTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)([a-z])").unwrap());

// @const: Whitespace collapse
static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TAB_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

// @const: Repeated punctuation collapse
static MULTI_PERIOD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static MULTI_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r",{2,}").unwrap());

/// Abbreviations expanded for better TTS pronunciation.
/// Longer forms first so "w/o" is not clobbered by "w/".
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Dr.", "Doctor"),
    ("Mr.", "Mister"),
    ("Mrs.", "Misses"),
    ("Ms.", "Miss"),
    ("Prof.", "Professor"),
    ("vs.", "versus"),
    ("etc.", "etcetera"),
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    ("w/o", "without"),
    ("w/", "with"),
    ("govt.", "government"),
    ("dept.", "department"),
    ("approx.", "approximately"),
    ("min.", "minutes"),
    ("max.", "maximum"),
    ("avg.", "average"),
];

/// Ordinal expansions, case-insensitive and word-bounded.
static ORDINAL_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\b1st\b", "first"),
        (r"(?i)\b2nd\b", "second"),
        (r"(?i)\b3rd\b", "third"),
        (r"(?i)\b4th\b", "fourth"),
        (r"(?i)\b5th\b", "fifth"),
    ]
    .iter()
    .map(|(pattern, word)| (Regex::new(pattern).unwrap(), *word))
    .collect()
});

/// Acronym pronunciations: spelled out or expanded so the synthesizer does not
/// read them as words.
static ACRONYM_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bAI\b", "A.I."),
        (r"\bAPI\b", "A.P.I."),
        (r"\bUI\b", "U.I."),
        (r"\bURL\b", "U.R.L."),
        (r"\bPDF\b", "P.D.F."),
        (r"\bTTS\b", "text to speech"),
        (r"\bLLM\b", "large language model"),
    ]
    .iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
    .collect()
});

/// Preprocess extracted slide text into speech-synthesis-ready narration.
pub struct TextProcessor;

impl TextProcessor {
    /// Clean text to prevent unnatural pauses in TTS output.
    ///
    /// Joins mid-sentence line breaks, fixes punctuation spacing, splits
    /// concatenated words, converts dashes to comma pauses, expands
    /// abbreviations, ordinals and acronyms, and guarantees terminal
    /// punctuation.
    pub fn clean_for_tts(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = TAB_SPACE_REGEX.replace_all(text, " ").to_string();

        // Join line breaks that fall mid-sentence; keep breaks that follow
        // sentence punctuation as separate chunks.
        let mut processed: Vec<String> = Vec::new();
        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match processed.last_mut() {
                Some(prev) if !ends_with_sentence_punctuation(prev) => {
                    prev.push(' ');
                    prev.push_str(line);
                }
                _ => processed.push(line.to_string()),
            }
        }
        let mut text = processed.join(" ");

        text = PERIOD_SPACING_REGEX.replace_all(&text, ". $1").to_string();
        text = COMMA_SPACING_REGEX.replace_all(&text, ", $1").to_string();

        // Ordinals must expand before the digit-boundary splits below, or
        // "1st" becomes "1 st" and never matches.
        for (regex, word) in ORDINAL_REGEXES.iter() {
            text = regex.replace_all(&text, *word).to_string();
        }

        text = CAMEL_CASE_REGEX.replace_all(&text, "$1 $2").to_string();
        text = LETTER_DIGIT_REGEX.replace_all(&text, "$1 $2").to_string();
        text = DIGIT_LETTER_REGEX.replace_all(&text, "$1 $2").to_string();

        // Dashes become commas for natural pauses
        text = text.replace('\u{2014}', ", ");
        text = text.replace('\u{2013}', ", ");
        text = text.replace(" - ", ", ");

        for (abbreviation, expansion) in ABBREVIATIONS {
            text = text.replace(abbreviation, expansion);
        }

        for (regex, replacement) in ACRONYM_REGEXES.iter() {
            text = regex.replace_all(&text, *replacement).to_string();
        }

        text = MULTI_SPACE_REGEX.replace_all(&text, " ").to_string();
        text = MULTI_PERIOD_REGEX.replace_all(&text, ".").to_string();
        text = MULTI_COMMA_REGEX.replace_all(&text, ",").to_string();

        let mut text = text.trim().to_string();
        if !text.is_empty() && !text.ends_with(['.', '!', '?']) {
            text.push('.');
        }

        text
    }

    /// Split narration text into sentences for subtitle timing.
    ///
    /// Splits after runs of sentence-ending punctuation followed by
    /// whitespace. The regex crate has no lookbehind, so this is a plain
    /// scanner over char boundaries.
    pub fn split_into_sentences(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                // Consume any further closing punctuation before deciding
                while let Some(&next) = chars.peek() {
                    if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')') {
                        current.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if chars.peek().is_none_or(|c| c.is_whitespace()) {
                    let sentence = current.trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    current.clear();
                }
            }
        }

        let trailing = current.trim();
        if !trailing.is_empty() {
            sentences.push(trailing.to_string());
        }

        sentences
    }
}

fn ends_with_sentence_punctuation(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?', ':'])
}
