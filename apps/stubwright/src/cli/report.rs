//! Output formatting for command results

use serde::Serialize;
use stubwright_lang_java::{EditResult, NavigationTarget};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentReport<'a> {
    pub file: &'a str,
    pub status: &'static str,
    pub changed: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<&'a NavigationTarget>,
    pub written: bool,
    /// New text, only reported for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
}

impl<'a> AugmentReport<'a> {
    pub fn new(file: &'a str, result: &'a EditResult, written: bool, dry_run: bool) -> Self {
        match result {
            EditResult::NoChanges => Self {
                file,
                status: "noChanges",
                changed: &[],
                navigation: None,
                written,
                text: None,
            },
            EditResult::Changed(changed) => Self {
                file,
                status: "changed",
                changed: &changed.changed,
                navigation: Some(&changed.navigation),
                written,
                text: dry_run.then_some(changed.text.as_str()),
            },
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize report: {}", e),
    }
}

pub fn print_pretty(file: &str, result: &EditResult, dry_run: bool) {
    match result {
        EditResult::NoChanges => println!("{}: no changes", file),
        EditResult::Changed(changed) => {
            for name in &changed.changed {
                println!("augmented {}", name);
            }
            let navigation = &changed.navigation;
            match navigation.position {
                Some(position) => println!(
                    "{}:{}:{}: {}",
                    file,
                    position.line + 1,
                    position.column + 1,
                    navigation.name
                ),
                None => println!("{}: {}", file, navigation.name),
            }
            if dry_run {
                println!("--- dry run, file not written ---");
                print!("{}", changed.text);
            }
        }
    }
}
