//! Tests for the IME engine

use super::*;
use crate::core::keycode::{KeyModifiers, Keysym};
use tabime_engine::{TableDb, TableEntry};

mod errors;

fn press(ch: char) -> KeyEvent {
    KeyEvent::press(Keysym(ch as u32))
}

fn press_key(keysym: Keysym) -> KeyEvent {
    KeyEvent::press(keysym)
}

fn release_key(keysym: Keysym) -> KeyEvent {
    KeyEvent::new(keysym, KeyModifiers::default(), false)
}

fn press_ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(
        Keysym(ch as u32),
        KeyModifiers::new().with_control(true),
        true,
    )
}

/// Phrases registered under "shi", ranks 50 down to 37
const SHI: [&str; 14] = [
    "是", "十", "时", "事", "市", "使", "式", "石", "师", "世", "诗", "施", "实", "试",
];

fn entries() -> Vec<TableEntry> {
    let mut rows: Vec<(&str, &str, u32)> = vec![
        ("hao", "好", 100),
        ("hao", "号", 80),
        ("hao", "豪", 60),
        ("hao", "毫", 40),
        ("hao", "浩", 35),
        ("hao", "耗", 20),
        ("ha", "哈", 70),
        ("ni", "你", 100),
        ("nihao", "你好", 95),
    ];
    for (i, phrase) in SHI.iter().enumerate() {
        rows.push(("shi", *phrase, 50 - i as u32));
    }
    rows.into_iter()
        .map(|(code, phrase, rank)| TableEntry {
            code: code.to_string(),
            phrase: phrase.to_string(),
            rank,
        })
        .collect()
}

fn test_table() -> Arc<TableDb> {
    Arc::new(TableDb::from_entries("pinyin", entries()))
}

fn make_engine() -> (InputMethodEngine, Arc<TableDb>) {
    let table = test_table();
    let engine = InputMethodEngine::new(table.clone(), EditorConfig::default());
    (engine, table)
}

/// Type each character of `s`, returning the last result
fn type_str(engine: &mut InputMethodEngine, s: &str) -> EngineResult {
    let mut result = EngineResult::not_consumed();
    for ch in s.chars() {
        result = engine.process_key(&press(ch));
    }
    result
}

fn shown_candidates(result: &EngineResult) -> Option<&CandidateView> {
    result.actions.iter().find_map(|a| match a {
        EngineAction::ShowCandidates(view) => Some(view),
        _ => None,
    })
}

fn page_texts(engine: &mut InputMethodEngine) -> Vec<String> {
    engine
        .candidates()
        .page_candidates()
        .iter()
        .map(|c| c.text.clone())
        .collect()
}
