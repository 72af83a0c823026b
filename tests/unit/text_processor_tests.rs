/*!
 * Tests for narration text normalization and sentence splitting
 */

use lectern::text_processor::TextProcessor;

/// Test joining of mid-sentence line breaks
#[test]
fn test_clean_for_tts_withWrappedLine_shouldJoinLines() {
    let cleaned = TextProcessor::clean_for_tts("This is a\nwrapped line.");
    assert_eq!(cleaned, "This is a wrapped line.");
}

/// Test that lines after sentence punctuation stay separate sentences
#[test]
fn test_clean_for_tts_withCompleteSentences_shouldKeepSentenceBreaks() {
    let cleaned = TextProcessor::clean_for_tts("First line.\nSecond line");
    assert_eq!(cleaned, "First line. Second line.");
}

/// Test missing space after a period
#[test]
fn test_clean_for_tts_withMissingSpaceAfterPeriod_shouldInsertSpace() {
    let cleaned = TextProcessor::clean_for_tts("End of sentence.Next one starts.");
    assert_eq!(cleaned, "End of sentence. Next one starts.");
}

/// Test concatenated word splitting
#[test]
fn test_clean_for_tts_withCamelCaseAccident_shouldSplitWords() {
    let cleaned = TextProcessor::clean_for_tts("HelloWorld");
    assert_eq!(cleaned, "Hello World.");
}

/// Test letter/digit boundary splitting
#[test]
fn test_clean_for_tts_withLetterDigitRun_shouldSplitBoundaries() {
    let cleaned = TextProcessor::clean_for_tts("chapter2begins");
    assert_eq!(cleaned, "chapter 2 begins.");
}

/// Test dash to pause conversion
#[test]
fn test_clean_for_tts_withDashes_shouldConvertToCommaPauses() {
    let cleaned = TextProcessor::clean_for_tts("fast - very fast");
    assert_eq!(cleaned, "fast, very fast.");
}

/// Test abbreviation expansion including the w/o before w/ ordering
#[test]
fn test_clean_for_tts_withAbbreviations_shouldExpandThem() {
    let cleaned = TextProcessor::clean_for_tts("Dr. Smith works w/o breaks w/ students.");
    assert_eq!(cleaned, "Doctor Smith works without breaks with students.");
}

/// Test ordinal expansion
#[test]
fn test_clean_for_tts_withOrdinals_shouldSpellThemOut() {
    let cleaned = TextProcessor::clean_for_tts("The 1st and 3rd steps matter.");
    assert_eq!(cleaned, "The first and third steps matter.");
}

/// Test acronym pronunciation rewrites
#[test]
fn test_clean_for_tts_withAcronyms_shouldRewriteForSpeech() {
    let cleaned = TextProcessor::clean_for_tts("An LLM behind an API");
    assert_eq!(cleaned, "An large language model behind an A.P.I.");
}

/// Test terminal punctuation is added when missing
#[test]
fn test_clean_for_tts_withNoTerminalPunctuation_shouldAddPeriod() {
    let cleaned = TextProcessor::clean_for_tts("Hello there");
    assert_eq!(cleaned, "Hello there.");
}

/// Test whitespace collapse
#[test]
fn test_clean_for_tts_withExtraWhitespace_shouldCollapse() {
    let cleaned = TextProcessor::clean_for_tts("too   many\t spaces.");
    assert_eq!(cleaned, "too many spaces.");
}

/// Test empty input
#[test]
fn test_clean_for_tts_withEmptyInput_shouldReturnEmpty() {
    assert_eq!(TextProcessor::clean_for_tts(""), "");
}

/// Test basic sentence splitting on the three terminators
#[test]
fn test_split_into_sentences_withMixedTerminators_shouldSplitAll() {
    let sentences = TextProcessor::split_into_sentences("One. Two! Three?");
    assert_eq!(sentences, vec!["One.", "Two!", "Three?"]);
}

/// Test that closing punctuation after the terminator stays attached
#[test]
fn test_split_into_sentences_withQuotedSentence_shouldKeepClosingQuote() {
    let sentences = TextProcessor::split_into_sentences("He said \"Stop.\" Then left.");
    assert_eq!(sentences, vec!["He said \"Stop.\"", "Then left."]);
}

/// Test that text without terminal punctuation becomes one sentence
#[test]
fn test_split_into_sentences_withNoTerminator_shouldReturnWholeText() {
    let sentences = TextProcessor::split_into_sentences("no punctuation here");
    assert_eq!(sentences, vec!["no punctuation here"]);
}

/// Test ellipsis handling
#[test]
fn test_split_into_sentences_withEllipsis_shouldSplitAfterRun() {
    let sentences = TextProcessor::split_into_sentences("Wait... now go.");
    assert_eq!(sentences, vec!["Wait...", "now go."]);
}

/// Test empty input yields no sentences
#[test]
fn test_split_into_sentences_withEmptyInput_shouldReturnEmpty() {
    assert!(TextProcessor::split_into_sentences("").is_empty());
}
