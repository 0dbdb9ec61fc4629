//! The `Engine` trait and its implementations
//!
//! One engine sits behind each agent worker. The builtin engines are fully
//! deterministic: they reproduce the deployed agents' visible behavior
//! (directive parsing, output framing, guidance messages) with plain text
//! processing, so the whole marketplace loop runs offline with no model
//! weights. `RemoteEngine` speaks the same `/predict` contract over HTTP for
//! deployments that attach a real model server.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use polka_types::AgentKind;

use crate::types::{EngineError, Result};

/// A text inference engine behind one agent worker
#[async_trait]
pub trait Engine: Send + Sync {
    /// Agent kind this engine serves
    fn kind(&self) -> AgentKind;

    /// Short description of what actually runs the inference
    fn model_info(&self) -> &'static str;

    /// Whether the engine can serve requests right now
    async fn ready(&self) -> bool {
        true
    }

    /// Produce the agent's output for one input
    async fn infer(&self, input: &str) -> Result<String>;
}

// ============================================================================
// Shared text helpers
// ============================================================================

/// Function words ignored when picking out the content of a text
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "than", "so", "of",
    "in", "on", "at", "to", "for", "from", "with", "without", "about", "as",
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does",
    "did", "have", "has", "had", "will", "would", "can", "could", "should",
    "shall", "may", "might", "must", "i", "you", "he", "she", "it", "we",
    "they", "me", "him", "her", "us", "them", "my", "your", "his", "its",
    "our", "their", "this", "that", "these", "those", "there", "here",
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how",
    "not", "no", "yes", "please", "very", "just", "also", "too", "some",
    "any", "all", "more", "most", "other", "into", "over", "under", "again",
    "each", "per", "up", "down", "out",
];

fn words_of(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn content_words(text: &str) -> Vec<String> {
    words_of(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Whitespace-separated word count, the measure the agents report
fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ============================================================================
// Chatbot
// ============================================================================

const CHATBOT_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response at this time. Please try again later.";

/// Template-based conversational agent
pub struct ChatbotEngine;

impl ChatbotEngine {
    pub fn new() -> Self {
        Self
    }

    /// Up to four content words of the prompt, used to keep answers on topic
    fn subject_of(prompt: &str) -> String {
        let words = content_words(prompt);
        if words.is_empty() {
            "your question".to_string()
        } else {
            words.into_iter().take(4).collect::<Vec<_>>().join(" ")
        }
    }

    fn answer(prompt: &str) -> String {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return CHATBOT_FALLBACK.to_string();
        }

        let lower = trimmed.to_lowercase();
        let first = words_of(&lower).into_iter().next().unwrap_or_default();

        if matches!(first.as_str(), "hello" | "hi" | "hey" | "greetings") {
            return "Hello! I'm the chatbot agent. Ask me anything and I'll do my best to answer."
                .to_string();
        }
        if lower.contains("how are you") {
            return "I'm doing well, thank you for asking. What would you like to talk about?"
                .to_string();
        }
        if lower.contains("thank") {
            return "You're welcome! Let me know if there is anything else I can help with."
                .to_string();
        }
        if matches!(first.as_str(), "bye" | "goodbye") {
            return "Goodbye! Come back whenever you have more questions.".to_string();
        }

        let subject = Self::subject_of(trimmed);
        match first.as_str() {
            "what" | "which" => format!(
                "That depends on the details, but in short: {} is best understood by looking at \
                 what it does in practice. Narrowing the question down helps me give a sharper \
                 answer.",
                subject
            ),
            "why" => format!(
                "There is rarely a single reason, but with {} it usually comes down to the \
                 trade-offs that were made along the way.",
                subject
            ),
            "how" => format!(
                "A good way to approach {} is step by step: start small, check the result, and \
                 build from there.",
                subject
            ),
            "when" => format!(
                "The timing depends on context I don't have, but for {} the honest answer is \
                 that it varies case by case.",
                subject
            ),
            "where" => format!(
                "I can't point to an exact place, but for {} the usual starting points are the \
                 official documentation and community resources.",
                subject
            ),
            "who" => format!(
                "I can't name specific people, but {} is usually the work of many contributors \
                 over time.",
                subject
            ),
            _ if trimmed.ends_with('?') => format!(
                "I can't answer that definitively, but regarding {} I'd say it depends on the \
                 situation. Feel free to rephrase with more detail.",
                subject
            ),
            _ => format!(
                "Thanks for sharing that. If you have a question about {}, ask away and I'll do \
                 my best to answer.",
                subject
            ),
        }
    }
}

impl Default for ChatbotEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for ChatbotEngine {
    fn kind(&self) -> AgentKind {
        AgentKind::Chatbot
    }

    fn model_info(&self) -> &'static str {
        "Template chat responder (offline)"
    }

    async fn infer(&self, input: &str) -> Result<String> {
        Ok(Self::answer(input))
    }
}

// ============================================================================
// Translation
// ============================================================================

/// Language names accepted in translation directives, mapped to ISO codes.
/// Unknown tokens pass through unchanged, so bare codes like `en` also work.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("spanish", "es"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("russian", "ru"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("arabic", "ar"),
    ("hindi", "hi"),
    ("dutch", "nl"),
    ("swedish", "sv"),
    ("finnish", "fi"),
    ("polish", "pl"),
    ("turkish", "tr"),
    ("czech", "cs"),
    ("greek", "el"),
    ("danish", "da"),
    ("norwegian", "no"),
    ("romanian", "ro"),
    ("ukrainian", "uk"),
    ("vietnamese", "vi"),
];

const EN_ES: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("goodbye", "adiós"),
    ("welcome", "bienvenido"),
    ("please", "por favor"),
    ("thanks", "gracias"),
    ("yes", "sí"),
    ("no", "no"),
    ("good", "bueno"),
    ("bad", "malo"),
    ("morning", "mañana"),
    ("night", "noche"),
    ("day", "día"),
    ("today", "hoy"),
    ("tomorrow", "mañana"),
    ("yesterday", "ayer"),
    ("the", "el"),
    ("and", "y"),
    ("or", "o"),
    ("but", "pero"),
    ("not", "no"),
    ("very", "muy"),
    ("all", "todo"),
    ("one", "uno"),
    ("two", "dos"),
    ("three", "tres"),
    ("i", "yo"),
    ("you", "tú"),
    ("we", "nosotros"),
    ("they", "ellos"),
    ("he", "él"),
    ("she", "ella"),
    ("it", "eso"),
    ("is", "es"),
    ("are", "son"),
    ("have", "tener"),
    ("my", "mi"),
    ("your", "tu"),
    ("this", "esto"),
    ("that", "eso"),
    ("with", "con"),
    ("for", "para"),
    ("from", "de"),
    ("to", "a"),
    ("in", "en"),
    ("friend", "amigo"),
    ("house", "casa"),
    ("water", "agua"),
    ("food", "comida"),
    ("bread", "pan"),
    ("coffee", "café"),
    ("milk", "leche"),
    ("tea", "té"),
    ("cat", "gato"),
    ("dog", "perro"),
    ("book", "libro"),
    ("city", "ciudad"),
    ("world", "mundo"),
    ("time", "tiempo"),
    ("man", "hombre"),
    ("woman", "mujer"),
    ("child", "niño"),
    ("love", "amar"),
    ("want", "querer"),
    ("need", "necesitar"),
    ("go", "ir"),
    ("come", "venir"),
    ("see", "ver"),
    ("speak", "hablar"),
    ("eat", "comer"),
    ("drink", "beber"),
    ("big", "grande"),
    ("small", "pequeño"),
    ("new", "nuevo"),
    ("old", "viejo"),
    ("beautiful", "hermoso"),
    ("happy", "feliz"),
    ("money", "dinero"),
    ("work", "trabajo"),
    ("name", "nombre"),
    ("how", "cómo"),
    ("what", "qué"),
    ("where", "dónde"),
    ("when", "cuándo"),
    ("who", "quién"),
    ("why", "por qué"),
];

const EN_FR: &[(&str, &str)] = &[
    ("hello", "bonjour"),
    ("goodbye", "au revoir"),
    ("welcome", "bienvenue"),
    ("please", "s'il vous plaît"),
    ("thanks", "merci"),
    ("yes", "oui"),
    ("no", "non"),
    ("good", "bon"),
    ("bad", "mauvais"),
    ("morning", "matin"),
    ("night", "nuit"),
    ("day", "jour"),
    ("today", "aujourd'hui"),
    ("tomorrow", "demain"),
    ("yesterday", "hier"),
    ("the", "le"),
    ("and", "et"),
    ("or", "ou"),
    ("but", "mais"),
    ("not", "pas"),
    ("very", "très"),
    ("all", "tout"),
    ("one", "un"),
    ("two", "deux"),
    ("three", "trois"),
    ("i", "je"),
    ("you", "tu"),
    ("we", "nous"),
    ("they", "ils"),
    ("he", "il"),
    ("she", "elle"),
    ("it", "ce"),
    ("is", "est"),
    ("are", "sont"),
    ("have", "avoir"),
    ("my", "mon"),
    ("your", "ton"),
    ("this", "ceci"),
    ("that", "cela"),
    ("with", "avec"),
    ("for", "pour"),
    ("from", "de"),
    ("to", "à"),
    ("in", "dans"),
    ("friend", "ami"),
    ("house", "maison"),
    ("water", "eau"),
    ("food", "nourriture"),
    ("bread", "pain"),
    ("coffee", "café"),
    ("milk", "lait"),
    ("tea", "thé"),
    ("cat", "chat"),
    ("dog", "chien"),
    ("book", "livre"),
    ("city", "ville"),
    ("world", "monde"),
    ("time", "temps"),
    ("man", "homme"),
    ("woman", "femme"),
    ("child", "enfant"),
    ("love", "aimer"),
    ("want", "vouloir"),
    ("need", "besoin"),
    ("go", "aller"),
    ("come", "venir"),
    ("see", "voir"),
    ("speak", "parler"),
    ("eat", "manger"),
    ("drink", "boire"),
    ("big", "grand"),
    ("small", "petit"),
    ("new", "nouveau"),
    ("old", "vieux"),
    ("beautiful", "beau"),
    ("happy", "heureux"),
    ("money", "argent"),
    ("work", "travail"),
    ("name", "nom"),
    ("how", "comment"),
    ("what", "quoi"),
    ("where", "où"),
    ("when", "quand"),
    ("who", "qui"),
    ("why", "pourquoi"),
];

const EN_DE: &[(&str, &str)] = &[
    ("hello", "hallo"),
    ("goodbye", "auf Wiedersehen"),
    ("welcome", "willkommen"),
    ("please", "bitte"),
    ("thanks", "danke"),
    ("yes", "ja"),
    ("no", "nein"),
    ("good", "gut"),
    ("bad", "schlecht"),
    ("morning", "Morgen"),
    ("night", "Nacht"),
    ("day", "Tag"),
    ("today", "heute"),
    ("tomorrow", "morgen"),
    ("yesterday", "gestern"),
    ("the", "der"),
    ("and", "und"),
    ("or", "oder"),
    ("but", "aber"),
    ("not", "nicht"),
    ("very", "sehr"),
    ("all", "alle"),
    ("one", "eins"),
    ("two", "zwei"),
    ("three", "drei"),
    ("i", "ich"),
    ("you", "du"),
    ("we", "wir"),
    ("they", "sie"),
    ("he", "er"),
    ("she", "sie"),
    ("it", "es"),
    ("is", "ist"),
    ("are", "sind"),
    ("have", "haben"),
    ("my", "mein"),
    ("your", "dein"),
    ("this", "dies"),
    ("that", "das"),
    ("with", "mit"),
    ("for", "für"),
    ("from", "von"),
    ("to", "zu"),
    ("in", "in"),
    ("friend", "Freund"),
    ("house", "Haus"),
    ("water", "Wasser"),
    ("food", "Essen"),
    ("bread", "Brot"),
    ("coffee", "Kaffee"),
    ("milk", "Milch"),
    ("tea", "Tee"),
    ("cat", "Katze"),
    ("dog", "Hund"),
    ("book", "Buch"),
    ("city", "Stadt"),
    ("world", "Welt"),
    ("time", "Zeit"),
    ("man", "Mann"),
    ("woman", "Frau"),
    ("child", "Kind"),
    ("love", "lieben"),
    ("want", "wollen"),
    ("need", "brauchen"),
    ("go", "gehen"),
    ("come", "kommen"),
    ("see", "sehen"),
    ("speak", "sprechen"),
    ("eat", "essen"),
    ("drink", "trinken"),
    ("big", "groß"),
    ("small", "klein"),
    ("new", "neu"),
    ("old", "alt"),
    ("beautiful", "schön"),
    ("happy", "glücklich"),
    ("money", "Geld"),
    ("work", "Arbeit"),
    ("name", "Name"),
    ("how", "wie"),
    ("what", "was"),
    ("where", "wo"),
    ("when", "wann"),
    ("who", "wer"),
    ("why", "warum"),
];

/// Phrasebook translator for the preloaded language pairs
pub struct TranslationEngine;

impl TranslationEngine {
    pub fn new() -> Self {
        Self
    }

    fn directive_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?i)translate\s+from\s+(\w+)\s+to\s+(\w+)\s*:?\s*(.*)")
                .expect("valid directive pattern")
        })
    }

    fn language_code(token: &str) -> String {
        let lower = token.to_lowercase();
        LANGUAGE_MAP
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, code)| (*code).to_string())
            .unwrap_or(lower)
    }

    /// Split a query into (source code, target code, text to translate).
    /// Queries without a directive default to English to Spanish.
    fn parse_request(query: &str) -> (String, String, String) {
        match Self::directive_re().captures(query) {
            Some(caps) => {
                let source = Self::language_code(&caps[1]);
                let target = Self::language_code(&caps[2]);
                let text = caps[3].trim().to_string();
                (source, target, text)
            }
            None => ("en".to_string(), "es".to_string(), query.to_string()),
        }
    }

    fn phrasebook(source: &str, target: &str) -> Option<&'static [(&'static str, &'static str)]> {
        match (source, target) {
            ("en", "es") => Some(EN_ES),
            ("en", "fr") => Some(EN_FR),
            ("en", "de") => Some(EN_DE),
            _ => None,
        }
    }

    /// Carry the source word's casing over to its translation
    fn recase(source: &str, translated: &str) -> String {
        let letters: Vec<char> = source.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
            return translated.to_uppercase();
        }
        if letters.first().map_or(false, |c| c.is_uppercase()) {
            let mut chars = translated.chars();
            return match chars.next() {
                Some(head) => head.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            };
        }
        translated.to_string()
    }

    fn flush_word(out: &mut String, word: &mut String, book: &[(&str, &str)]) {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        match book.iter().find(|(english, _)| *english == lower) {
            Some((_, translated)) => out.push_str(&Self::recase(word, translated)),
            None => out.push_str(word),
        }
        word.clear();
    }

    /// Word-by-word translation with pass-through for unknown words,
    /// preserving punctuation and capitalization
    fn translate_words(text: &str, book: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();
        for ch in text.chars() {
            if ch.is_alphabetic() || ch == '\'' {
                word.push(ch);
            } else {
                Self::flush_word(&mut out, &mut word, book);
                out.push(ch);
            }
        }
        Self::flush_word(&mut out, &mut word, book);
        out
    }

    fn translate(query: &str) -> String {
        let (source, target, text) = Self::parse_request(query);
        let book = match Self::phrasebook(&source, &target) {
            Some(book) => book,
            None => {
                return format!(
                    "I'm sorry, translation from {} to {} is not currently supported. Please \
                     try another language pair.",
                    source, target
                );
            }
        };
        if text.trim().is_empty() {
            return "I'm sorry, I couldn't translate the text at this time. Please check your \
                    input format and try again."
                .to_string();
        }
        Self::translate_words(&text, book)
    }
}

impl Default for TranslationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for TranslationEngine {
    fn kind(&self) -> AgentKind {
        AgentKind::Translation
    }

    fn model_info(&self) -> &'static str {
        "Phrasebook translation (en-es, en-fr, en-de)"
    }

    async fn infer(&self, input: &str) -> Result<String> {
        Ok(Self::translate(input))
    }
}

// ============================================================================
// Sentiment
// ============================================================================

const SENTIMENT_FALLBACK: &str =
    "I'm sorry, I couldn't analyze the sentiment at this time. Please try again later.";

const POSITIVE_EXPLANATION: &str = "The text expresses a positive sentiment. This indicates \
     satisfaction, happiness, or approval. Such content is generally associated with good \
     experiences or favorable opinions.";

const NEGATIVE_EXPLANATION: &str = "The text expresses a negative sentiment. This indicates \
     dissatisfaction, unhappiness, or disapproval. Such content is generally associated with \
     bad experiences or unfavorable opinions.";

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "better", "brilliant", "delightful", "easy",
    "enjoy", "enjoyable", "enjoyed", "excellent", "fantastic", "fast", "friendly", "glad",
    "good", "great", "happy", "helpful", "impressive", "like", "liked", "likes", "love",
    "loved", "loves", "nice", "perfect", "pleasant", "pleased", "positive", "recommend",
    "recommended", "reliable", "satisfied", "smooth", "success", "successful", "superb",
    "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "annoying", "awful", "bad", "boring", "broken", "crash", "crashed", "defective",
    "difficult", "disappointed", "disappointing", "dislike", "dreadful", "fail", "failed",
    "failure", "frustrating", "hate", "hated", "hates", "horrible", "negative", "poor",
    "problem", "problems", "rude", "sad", "scam", "slow", "terrible", "ugly", "unhappy",
    "unreliable", "useless", "waste", "worse", "worst", "wrong",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "can't", "won't", "don't", "doesn't",
    "didn't", "isn't", "wasn't", "aren't", "weren't", "couldn't", "wouldn't", "shouldn't",
    "hardly", "barely", "without",
];

/// A negation flips the polarity of a sentiment word this many tokens ahead
const NEGATION_WINDOW: usize = 3;

/// Lexicon sentiment classifier with negation handling
pub struct SentimentEngine;

impl SentimentEngine {
    pub fn new() -> Self {
        Self
    }

    fn scores(text: &str) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;
        let mut negated_until: Option<usize> = None;

        for (index, word) in words_of(text).iter().enumerate() {
            if NEGATION_WORDS.contains(&word.as_str()) {
                negated_until = Some(index + NEGATION_WINDOW);
                continue;
            }
            let negated = negated_until.map_or(false, |until| index <= until);
            if POSITIVE_WORDS.contains(&word.as_str()) {
                if negated {
                    negative += 1;
                    negated_until = None;
                } else {
                    positive += 1;
                }
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                if negated {
                    positive += 1;
                    negated_until = None;
                } else {
                    negative += 1;
                }
            }
        }

        (positive, negative)
    }

    fn analyze(text: &str) -> String {
        if text.trim().is_empty() {
            return SENTIMENT_FALLBACK.to_string();
        }

        let (positive, negative) = Self::scores(text);
        let total = positive + negative;

        // Ties and signal-free text lean positive at the 50% floor
        let (label, explanation) = if negative > positive {
            ("Negative", NEGATIVE_EXPLANATION)
        } else {
            ("Positive", POSITIVE_EXPLANATION)
        };
        let confidence = if total == 0 {
            50.0
        } else {
            50.0 + 50.0 * positive.abs_diff(negative) as f64 / total as f64
        };

        format!(
            "Sentiment Analysis Result:\n\nSentiment: {}\nConfidence: {:.2}%\n\n{}",
            label, confidence, explanation
        )
    }
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for SentimentEngine {
    fn kind(&self) -> AgentKind {
        AgentKind::Sentiment
    }

    fn model_info(&self) -> &'static str {
        "Lexicon sentiment scorer (offline)"
    }

    async fn infer(&self, input: &str) -> Result<String> {
        Ok(Self::analyze(input))
    }
}

// ============================================================================
// Summarization
// ============================================================================

const SUMMARY_TOO_SHORT: &str =
    "The text is too short to summarize. Please provide a longer text.";

/// Inputs below this word count are refused
const SUMMARY_MIN_INPUT_WORDS: usize = 30;

/// Target bounds for the produced summary, in words
const SUMMARY_MIN_WORDS: usize = 30;
const SUMMARY_MAX_WORDS: usize = 150;

/// Frequency-based extractive summarizer
pub struct SummarizationEngine;

impl SummarizationEngine {
    pub fn new() -> Self {
        Self
    }

    fn directive_patterns() -> &'static Vec<Regex> {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        PATTERNS.get_or_init(|| {
            [
                r"(?is)^summarize:\s*(.*)",
                r"(?is)^please\s+summarize:\s*(.*)",
                r"(?is)^summarize\s+this\s+text:\s*(.*)",
                r"(?is)^summarize\s+the\s+following:\s*(.*)",
            ]
            .iter()
            .map(|pattern| Regex::new(pattern).expect("valid summarize pattern"))
            .collect()
        })
    }

    /// Strip a leading summarize directive, if any
    fn extract_text(query: &str) -> &str {
        for pattern in Self::directive_patterns() {
            if let Some(m) = pattern.captures(query).and_then(|caps| caps.get(1)) {
                return m.as_str().trim();
            }
        }
        query
    }

    /// Sentence splitting on terminal punctuation followed by whitespace
    fn split_sentences(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?')
                && chars.peek().map_or(true, |next| next.is_whitespace())
            {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
        let tail = current.trim().to_string();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }

    fn summarize(query: &str) -> String {
        let text = Self::extract_text(query);
        let original_words = word_count(text);
        if original_words < SUMMARY_MIN_INPUT_WORDS {
            return SUMMARY_TOO_SHORT.to_string();
        }

        let sentences = Self::split_sentences(text);

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for word in content_words(text) {
            *frequency.entry(word).or_insert(0) += 1;
        }

        // Rank sentences by mean content word frequency, ties to earlier text
        let mut ranked: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let words = content_words(sentence);
                let score = if words.is_empty() {
                    0.0
                } else {
                    let total: usize = words
                        .iter()
                        .map(|w| frequency.get(w).copied().unwrap_or(0))
                        .sum();
                    total as f64 / words.len() as f64
                };
                (index, score)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        // Greedy pick within the word budget, never below the minimum
        let mut picked: Vec<usize> = Vec::new();
        let mut picked_words = 0usize;
        for (index, _score) in ranked {
            let length = word_count(&sentences[index]);
            if picked_words + length <= SUMMARY_MAX_WORDS || picked_words < SUMMARY_MIN_WORDS {
                picked.push(index);
                picked_words += length;
            }
            if picked_words >= SUMMARY_MAX_WORDS {
                break;
            }
        }
        picked.sort_unstable();

        let summary = picked
            .iter()
            .map(|index| sentences[*index].as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let summary_words = word_count(&summary);

        format!(
            "Summary:\n\n{}\n\nOriginal Text Length: {} words\nSummary Length: {} words\n",
            summary, original_words, summary_words
        )
    }
}

impl Default for SummarizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for SummarizationEngine {
    fn kind(&self) -> AgentKind {
        AgentKind::Summarization
    }

    fn model_info(&self) -> &'static str {
        "Extractive summarizer (offline)"
    }

    async fn infer(&self, input: &str) -> Result<String> {
        Ok(Self::summarize(input))
    }
}

// ============================================================================
// Job application
// ============================================================================

const MISSING_RESUME: &str =
    "I couldn't identify your resume in the query. Please provide your resume details.";

const MISSING_JOB_DESCRIPTION: &str = "I couldn't identify the job description in the query. \
     Please provide the job description details.";

/// Cover letter writer working from a resume and a job description
pub struct JobApplicationEngine;

impl JobApplicationEngine {
    pub fn new() -> Self {
        Self
    }

    fn resume_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?is)resume:\s*(.*?)(?:job description:|$)")
                .expect("valid resume pattern")
        })
    }

    fn job_description_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?is)job description:\s*(.*)").expect("valid job description pattern")
        })
    }

    /// Extract resume and job description, first by the labeled sections,
    /// then by splitting the query on a blank line
    fn parse_request(query: &str) -> (Option<String>, Option<String>) {
        let mut resume = Self::resume_re()
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let mut job_description = Self::job_description_re()
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());

        if resume.is_none() || job_description.is_none() {
            let parts: Vec<&str> = query.split("\n\n").collect();
            if parts.len() >= 2 {
                resume = Some(parts[0].trim().to_string()).filter(|s| !s.is_empty());
                job_description = Some(parts[1].trim().to_string()).filter(|s| !s.is_empty());
            }
        }

        (resume, job_description)
    }

    /// Terms appearing in both the resume and the job description, in the
    /// description's order, capped at five
    fn shared_terms(resume: &str, job_description: &str) -> Vec<String> {
        let resume_terms: HashSet<String> = content_words(resume)
            .into_iter()
            .filter(|w| w.len() >= 4)
            .collect();

        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for word in content_words(job_description) {
            if word.len() >= 4 && resume_terms.contains(&word) && seen.insert(word.clone()) {
                terms.push(word);
                if terms.len() == 5 {
                    break;
                }
            }
        }
        terms
    }

    fn join_terms(terms: &[String]) -> String {
        match terms {
            [] => String::new(),
            [one] => one.clone(),
            [first, second] => format!("{} and {}", first, second),
            [head @ .., last] => format!("{}, and {}", head.join(", "), last),
        }
    }

    fn write_letter(resume: &str, job_description: &str) -> String {
        let terms = Self::shared_terms(resume, job_description);

        let mut letter = String::from("Professional Cover Letter\n\n");
        letter.push_str("Dear Hiring Manager,\n\n");
        if terms.is_empty() {
            letter.push_str(
                "I am writing to apply for the position described in your job posting. \
                 Reviewing the requirements, I believe my background is a strong match for the \
                 role.",
            );
        } else {
            letter.push_str(&format!(
                "I am writing to apply for the position described in your job posting. \
                 Reviewing the requirements, I believe my background is a strong match, in \
                 particular my experience with {}.",
                Self::join_terms(&terms)
            ));
        }
        letter.push_str("\n\n");
        letter.push_str(
            "My resume covers the relevant experience in more detail. I am confident the \
             skills it describes would let me contribute to your team from day one.",
        );
        letter.push_str("\n\n");
        letter.push_str(
            "I would welcome the opportunity to discuss the role further. Thank you for your \
             time and consideration.",
        );
        letter.push_str("\n\nSincerely,\n[Your Name]");
        letter
    }

    fn generate(query: &str) -> String {
        let (resume, job_description) = Self::parse_request(query);
        let resume = match resume {
            Some(resume) => resume,
            None => return MISSING_RESUME.to_string(),
        };
        let job_description = match job_description {
            Some(job_description) => job_description,
            None => return MISSING_JOB_DESCRIPTION.to_string(),
        };
        Self::write_letter(&resume, &job_description)
    }
}

impl Default for JobApplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for JobApplicationEngine {
    fn kind(&self) -> AgentKind {
        AgentKind::JobApplication
    }

    fn model_info(&self) -> &'static str {
        "Template cover letter writer (offline)"
    }

    async fn infer(&self, input: &str) -> Result<String> {
        Ok(Self::generate(input))
    }
}

// ============================================================================
// Remote model server
// ============================================================================

/// Connection settings for an external model server
#[derive(Debug, Clone)]
pub struct RemoteEngineConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteEngineConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("POLKA_MODEL_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            timeout_secs: 120,
        }
    }
}

/// Engine that forwards inference to an external model server speaking the
/// worker `/predict` contract
pub struct RemoteEngine {
    kind: AgentKind,
    config: RemoteEngineConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct RemotePredictRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemotePredictResponse {
    result: String,
}

impl RemoteEngine {
    pub fn new(kind: AgentKind, config: RemoteEngineConfig) -> Self {
        Self {
            kind,
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env(kind: AgentKind) -> Self {
        Self::new(kind, RemoteEngineConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl Engine for RemoteEngine {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    fn model_info(&self) -> &'static str {
        "Remote model server"
    }

    async fn ready(&self) -> bool {
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn infer(&self, input: &str) -> Result<String> {
        let url = format!("{}/predict", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&RemotePredictRequest { input })
            .send()
            .await
            .map_err(|e| EngineError::Upstream {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(EngineError::Upstream {
                message: format!("model server returned {}", response.status()),
            });
        }

        let parsed: RemotePredictResponse =
            response.json().await.map_err(|e| EngineError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(parsed.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chatbot_empty_prompt_yields_guidance() {
        let engine = ChatbotEngine::new();
        let out = engine.infer("   ").await.unwrap();
        assert_eq!(
            out,
            "I'm sorry, I couldn't generate a response at this time. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_chatbot_greets_back() {
        let engine = ChatbotEngine::new();
        let out = engine.infer("Hello there!").await.unwrap();
        assert!(out.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn test_chatbot_reflects_the_subject() {
        let engine = ChatbotEngine::new();
        let out = engine.infer("What is the Polkadot relay chain?").await.unwrap();
        assert!(out.contains("polkadot relay chain"));
    }

    #[tokio::test]
    async fn test_chatbot_statement_invites_a_question() {
        let engine = ChatbotEngine::new();
        let out = engine.infer("Staking rewards dropped last month").await.unwrap();
        assert!(out.contains("staking rewards dropped"));
        assert!(out.starts_with("Thanks for sharing"));
    }

    #[tokio::test]
    async fn test_translation_defaults_to_spanish() {
        let engine = TranslationEngine::new();
        let out = engine.infer("hello world").await.unwrap();
        assert_eq!(out, "hola mundo");
    }

    #[tokio::test]
    async fn test_translation_directive_selects_pair() {
        let engine = TranslationEngine::new();
        let out = engine
            .infer("Translate from English to French: good morning friend")
            .await
            .unwrap();
        assert_eq!(out, "bon matin ami");
    }

    #[tokio::test]
    async fn test_translation_directive_matches_mid_sentence() {
        let engine = TranslationEngine::new();
        let out = engine
            .infer("Please translate from english to german: thanks friend")
            .await
            .unwrap();
        assert_eq!(out, "danke Freund");
    }

    #[tokio::test]
    async fn test_translation_keeps_casing_and_unknown_words() {
        let engine = TranslationEngine::new();
        let out = engine.infer("Hello Kusama").await.unwrap();
        assert_eq!(out, "Hola Kusama");
    }

    #[tokio::test]
    async fn test_translation_unsupported_pair_message() {
        let engine = TranslationEngine::new();
        let out = engine
            .infer("translate from english to japanese: hi")
            .await
            .unwrap();
        assert_eq!(
            out,
            "I'm sorry, translation from en to ja is not currently supported. Please try \
             another language pair."
        );
    }

    #[tokio::test]
    async fn test_translation_accepts_bare_language_codes() {
        let engine = TranslationEngine::new();
        let out = engine.infer("translate from en to de: good night").await.unwrap();
        assert_eq!(out, "gut Nacht");
    }

    #[tokio::test]
    async fn test_translation_empty_text_guidance() {
        let engine = TranslationEngine::new();
        let out = engine.infer("translate from english to spanish:").await.unwrap();
        assert_eq!(
            out,
            "I'm sorry, I couldn't translate the text at this time. Please check your input \
             format and try again."
        );
    }

    #[tokio::test]
    async fn test_sentiment_positive_framing() {
        let engine = SentimentEngine::new();
        let out = engine
            .infer("I love this product, it works great and the support is excellent")
            .await
            .unwrap();
        assert!(out.starts_with("Sentiment Analysis Result:\n\n"));
        assert!(out.contains("Sentiment: Positive"));
        assert!(out.contains("Confidence: 100.00%"));
        assert!(out.contains("satisfaction, happiness, or approval"));
    }

    #[tokio::test]
    async fn test_sentiment_negative_framing() {
        let engine = SentimentEngine::new();
        let out = engine
            .infer("Terrible experience, the app is broken and support was rude")
            .await
            .unwrap();
        assert!(out.contains("Sentiment: Negative"));
        assert!(out.contains("dissatisfaction, unhappiness, or disapproval"));
    }

    #[tokio::test]
    async fn test_sentiment_negation_flips_polarity() {
        let engine = SentimentEngine::new();
        let out = engine.infer("The food was not good").await.unwrap();
        assert!(out.contains("Sentiment: Negative"));
    }

    #[tokio::test]
    async fn test_sentiment_neutral_text_is_low_confidence() {
        let engine = SentimentEngine::new();
        let out = engine.infer("The meeting is on Tuesday").await.unwrap();
        assert!(out.contains("Confidence: 50.00%"));
    }

    #[tokio::test]
    async fn test_sentiment_mixed_text_scales_confidence() {
        let engine = SentimentEngine::new();
        // Three positive hits against one negative (margin 2 of 4)
        let out = engine
            .infer("Great screen, great battery, great keyboard, terrible touchpad")
            .await
            .unwrap();
        assert!(out.contains("Sentiment: Positive"));
        assert!(out.contains("Confidence: 75.00%"));
    }

    #[tokio::test]
    async fn test_summarization_short_text_guidance() {
        let engine = SummarizationEngine::new();
        let out = engine.infer("Summarize: too short").await.unwrap();
        assert_eq!(
            out,
            "The text is too short to summarize. Please provide a longer text."
        );
    }

    #[tokio::test]
    async fn test_summarization_counts_words_after_stripping_directive() {
        let engine = SummarizationEngine::new();
        // 29 words once the directive is stripped, one below the threshold
        let input = format!("Summarize this text: {}", "lorem ".repeat(29).trim_end());
        let out = engine.infer(&input).await.unwrap();
        assert_eq!(
            out,
            "The text is too short to summarize. Please provide a longer text."
        );
    }

    #[tokio::test]
    async fn test_summarization_frames_and_reduces_long_text() {
        let engine = SummarizationEngine::new();
        let text = "The reading room on the ground floor holds journals, maps, and daily \
             papers from three countries. Visitors may reserve a desk in the reading room for \
             up to four hours each day. The archive below the reading room stores manuscripts \
             that researchers request a day in advance. Rules in the archive limit every \
             visitor to five manuscripts per session. A small cafe near the entrance serves \
             tea and pastries through the afternoon. Guided tours of the building begin every \
             hour from the main hall beside the stairs. The garden behind the building closes \
             early in winter because the paths freeze over. Lockers by the cloakroom take \
             coins that the front desk exchanges on request. Lectures run on weekday evenings \
             in the long gallery above the entrance. Membership cards renew by post or at the \
             front desk during opening hours. School groups visit on Thursday mornings and \
             follow a shorter route through the halls. Donations of rare books go through a \
             review panel that meets once a month. Exhibit cases along the corridor change \
             their displays at the start of each season. Maps of the building hang beside \
             both staircases and at the cloakroom door.";
        let out = engine.infer(&format!("Please summarize: {}", text)).await.unwrap();

        assert!(out.starts_with("Summary:\n\n"));
        let expected = format!(
            "Original Text Length: {} words",
            text.split_whitespace().count()
        );
        assert!(out.contains(&expected));
        assert!(out.ends_with(" words\n"));

        // The summary keeps the dominant reading room material and shrinks the text
        let parts: Vec<&str> = out.split("\n\n").collect();
        let summary = parts[1];
        assert!(summary.contains("reading room"));
        assert!(summary.split_whitespace().count() < text.split_whitespace().count());
    }

    #[tokio::test]
    async fn test_job_application_labeled_sections() {
        let engine = JobApplicationEngine::new();
        let query = "Resume: Five years building distributed systems in Rust, focusing on \
             networking and storage. Job Description: We need an engineer experienced with \
             Rust networking services and distributed storage.";
        let out = engine.infer(query).await.unwrap();
        assert!(out.starts_with("Professional Cover Letter\n\n"));
        assert!(out.contains("Dear Hiring Manager,"));
        assert!(out.contains("experience with rust, networking, distributed, and storage"));
        assert!(out.ends_with("Sincerely,\n[Your Name]"));
    }

    #[tokio::test]
    async fn test_job_application_blank_line_fallback() {
        let engine = JobApplicationEngine::new();
        let query = "Rust developer with ledger experience.\n\nMarketplace startup hiring a \
             ledger developer.";
        let out = engine.infer(query).await.unwrap();
        assert!(out.starts_with("Professional Cover Letter\n\n"));
        assert!(out.contains("ledger and developer"));
    }

    #[tokio::test]
    async fn test_job_application_missing_resume_guidance() {
        let engine = JobApplicationEngine::new();
        let out = engine
            .infer("Job Description: Rust engineer wanted")
            .await
            .unwrap();
        assert_eq!(
            out,
            "I couldn't identify your resume in the query. Please provide your resume details."
        );
    }

    #[tokio::test]
    async fn test_job_application_missing_description_guidance() {
        let engine = JobApplicationEngine::new();
        let out = engine.infer("Resume: Ten years of engineering.").await.unwrap();
        assert_eq!(
            out,
            "I couldn't identify the job description in the query. Please provide the job \
             description details."
        );
    }

    #[tokio::test]
    async fn test_remote_engine_reports_unreachable_server() {
        let engine = RemoteEngine::new(
            AgentKind::Chatbot,
            RemoteEngineConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 2,
            },
        );
        assert!(!engine.ready().await);
        let err = engine.infer("hi").await.unwrap_err();
        assert!(matches!(err, EngineError::Upstream { .. }));
    }
}
