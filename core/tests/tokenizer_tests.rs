use newsscope_core::tokenizer::{preprocess, tokenize, Preprocessor};
use std::fs;
use tempfile::tempdir;

#[test]
fn it_lowercases_and_normalizes() {
    let words = preprocess("Running Runners RUN! The ｃａｆé's menu.");
    assert!(words.contains(&"running".to_string()));
    assert!(words.contains(&"run".to_string()));
    // NFKC folds fullwidth letters
    assert!(words.contains(&"café".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = preprocess("The quick brown fox and the lazy dog");
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn tokens_are_alphabetic_and_not_stopwords() {
    let text = "On 3rd May, the RBI's repo-rate hike (25bps) hit markets; Sensex fell 1.2% — analysts aren't sure.";
    let english = Preprocessor::english();
    let words = preprocess(text);
    assert!(!words.is_empty());
    for w in &words {
        assert!(w.chars().all(char::is_alphabetic), "{w}");
        assert!(!english.is_stopword(w), "{w}");
    }
}

#[test]
fn it_is_deterministic() {
    let text = "Heavy rain lashed Mumbai on Tuesday, disrupting local trains.";
    assert_eq!(preprocess(text), preprocess(text));
}

#[test]
fn empty_input_gives_no_tokens() {
    assert!(preprocess("").is_empty());
    assert!(tokenize("   ").is_empty());
}

#[test]
fn custom_stopword_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stop.txt");
    fs::write(&path, "# newsroom filler\nsaid\n\nREPORTED\n").unwrap();
    let p = Preprocessor::from_stopword_file(&path).unwrap();
    assert_eq!(p.preprocess("Officials said the flood was reported"), vec!["officials", "the", "flood", "was"]);
}

#[test]
fn missing_or_empty_stopword_file_fails() {
    let dir = tempdir().unwrap();
    assert!(Preprocessor::from_stopword_file(&dir.path().join("nope.txt")).is_err());
    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "# nothing\n").unwrap();
    assert!(Preprocessor::from_stopword_file(&empty).is_err());
}
