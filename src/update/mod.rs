//! Interactive update application
//!
//! This module provides:
//! - Decision: one answer to an update prompt (yes/no/all/quit)
//! - PromptState: explicit state machine for the confirmation loop
//! - InteractiveUpdater: walks the actionable resolutions in manifest
//!   order, prompts per package, and applies confirmed rewrites

use crate::domain::{Resolution, ResolutionStatus};
use crate::manifest::ManifestWriter;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// One answer to an update prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Apply this update
    Yes,
    /// Skip this update
    No,
    /// Apply this and every remaining update without prompting
    All,
    /// Stop; remaining updates stay untouched
    Quit,
}

impl Decision {
    /// Parses a prompt answer; empty input means yes
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => Some(Decision::Yes),
            "n" | "no" => Some(Decision::No),
            "a" | "all" => Some(Decision::All),
            "q" | "quit" => Some(Decision::Quit),
            _ => None,
        }
    }
}

/// State of the confirmation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// Ask before each update
    Prompting,
    /// "all" was chosen; apply the rest without asking
    ApplyAll,
    /// "quit" was chosen; leave the rest untouched
    SkipAll,
}

/// Result of one updater run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Updates written into the manifest text
    pub applied: usize,
    /// Updates declined by the user
    pub declined: usize,
    /// Rewrites that failed (bad line, vanished token)
    pub failed: Vec<String>,
    /// True when the loop ended on "quit"
    pub quit: bool,
}

/// Interactive confirmation loop over the outdated requirements
pub struct InteractiveUpdater<R, W> {
    input: R,
    output: W,
    state: PromptState,
    boring: bool,
}

impl InteractiveUpdater<io::BufReader<io::Stdin>, io::Stdout> {
    /// Create an updater reading answers from stdin
    pub fn from_stdin(boring: bool) -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout(), boring)
    }
}

impl<R: BufRead, W: Write> InteractiveUpdater<R, W> {
    /// Create an updater over arbitrary streams
    pub fn new(input: R, output: W, boring: bool) -> Self {
        Self {
            input,
            output,
            state: PromptState::Prompting,
            boring,
        }
    }

    /// Start in ApplyAll, as if the user had answered "all" up front
    pub fn apply_all(mut self) -> Self {
        self.state = PromptState::ApplyAll;
        self
    }

    /// Current loop state
    pub fn state(&self) -> PromptState {
        self.state
    }

    /// Walks the actionable resolutions and applies confirmed updates to
    /// the writer's in-memory content. The caller persists the file.
    pub fn run(
        &mut self,
        writer: &mut ManifestWriter,
        resolutions: &[&Resolution],
    ) -> io::Result<UpdateOutcome> {
        let mut outcome = UpdateOutcome::default();

        for resolution in resolutions {
            let Some(new_version) = resolution.latest.as_deref() else {
                continue;
            };

            match self.state {
                PromptState::SkipAll => break,
                PromptState::ApplyAll => {
                    self.show_proposal(resolution, new_version)?;
                    self.note("applying (all)")?;
                }
                PromptState::Prompting => {
                    self.show_proposal(resolution, new_version)?;
                    match self.ask()? {
                        Decision::Yes => {}
                        Decision::No => {
                            outcome.declined += 1;
                            continue;
                        }
                        Decision::All => {
                            self.state = PromptState::ApplyAll;
                        }
                        Decision::Quit => {
                            self.state = PromptState::SkipAll;
                            outcome.quit = true;
                            break;
                        }
                    }
                }
            }

            match writer.apply(&resolution.requirement, new_version) {
                Ok(()) => outcome.applied += 1,
                Err(err) => outcome.failed.push(err.to_string()),
            }
        }

        Ok(outcome)
    }

    fn show_proposal(&mut self, resolution: &Resolution, new_version: &str) -> io::Result<()> {
        let requirement = &resolution.requirement;
        let current = requirement
            .specifier
            .as_ref()
            .map(|s| s.raw.clone())
            .unwrap_or_else(|| "(unpinned)".to_string());

        if self.boring {
            writeln!(
                self.output,
                "\n{} {} -> {}",
                requirement.name, current, new_version
            )?;
        } else {
            writeln!(
                self.output,
                "\n{} {} {} {}",
                requirement.name.bold(),
                current.red(),
                "→".dimmed(),
                new_version.green().bold()
            )?;
        }

        if let Some(url) = &resolution.info_url {
            writeln!(self.output, "   {}", url)?;
        }
        Ok(())
    }

    fn ask(&mut self) -> io::Result<Decision> {
        loop {
            if self.boring {
                write!(self.output, "Apply this update? [Y/n/a/q]: ")?;
            } else {
                write!(self.output, "{}", "Apply this update? [Y/n/a/q]: ".bold())?;
            }
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                // End of input is a quit, not an error
                return Ok(Decision::Quit);
            }

            match Decision::parse(&answer) {
                Some(decision) => return Ok(decision),
                None => {
                    writeln!(self.output, "Please answer y(es), n(o), a(ll) or q(uit).")?;
                }
            }
        }
    }

    fn note(&mut self, message: &str) -> io::Result<()> {
        if self.boring {
            writeln!(self.output, "{}", message)
        } else {
            writeln!(self.output, "{}", message.dimmed())
        }
    }
}

/// Resolutions the updater should act on, in manifest order: every
/// outdated requirement, plus unpinned ones with a known latest version
/// when pinning is requested
pub fn actionable<'a>(resolutions: &'a [Resolution], pin_unpinned: bool) -> Vec<&'a Resolution> {
    resolutions
        .iter()
        .filter(|r| {
            r.is_outdated()
                || (pin_unpinned
                    && matches!(r.status, ResolutionStatus::Unpinned)
                    && r.latest.is_some())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeKind, Requirement, Specifier};
    use std::io::Cursor;

    fn pinned(name: &str, version: &str, line: usize) -> Requirement {
        Requirement::new(name, Some(Specifier::exact(version)), line)
    }

    fn outdated(name: &str, current: &str, latest: &str, line: usize) -> Resolution {
        Resolution::outdated(pinned(name, current, line), latest, ChangeKind::Minor)
    }

    fn run_with_input(
        input: &str,
        content: &str,
        resolutions: Vec<Resolution>,
    ) -> (UpdateOutcome, String, PromptState) {
        let mut writer = ManifestWriter::from_content("requirements.txt", content);
        let mut updater = InteractiveUpdater::new(Cursor::new(input.to_string()), Vec::new(), true);
        let refs: Vec<&Resolution> = resolutions.iter().collect();
        let outcome = updater.run(&mut writer, &refs).unwrap();
        let state = updater.state();
        (outcome, writer.content(), state)
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse(""), Some(Decision::Yes));
        assert_eq!(Decision::parse("y"), Some(Decision::Yes));
        assert_eq!(Decision::parse("YES"), Some(Decision::Yes));
        assert_eq!(Decision::parse("n"), Some(Decision::No));
        assert_eq!(Decision::parse("no"), Some(Decision::No));
        assert_eq!(Decision::parse("a"), Some(Decision::All));
        assert_eq!(Decision::parse("all"), Some(Decision::All));
        assert_eq!(Decision::parse("q"), Some(Decision::Quit));
        assert_eq!(Decision::parse("quit"), Some(Decision::Quit));
        assert_eq!(Decision::parse("maybe"), None);
    }

    #[test]
    fn test_yes_applies_update() {
        let (outcome, content, _) = run_with_input(
            "y\n",
            "requests==2.25.0\n",
            vec![outdated("requests", "2.25.0", "2.31.0", 1)],
        );
        assert_eq!(outcome.applied, 1);
        assert_eq!(content, "requests==2.31.0\n");
    }

    #[test]
    fn test_empty_answer_means_yes() {
        let (outcome, content, _) = run_with_input(
            "\n",
            "requests==2.25.0\n",
            vec![outdated("requests", "2.25.0", "2.31.0", 1)],
        );
        assert_eq!(outcome.applied, 1);
        assert!(content.contains("2.31.0"));
    }

    #[test]
    fn test_no_skips_update() {
        let (outcome, content, _) = run_with_input(
            "n\n",
            "requests==2.25.0\n",
            vec![outdated("requests", "2.25.0", "2.31.0", 1)],
        );
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.declined, 1);
        assert_eq!(content, "requests==2.25.0\n");
    }

    #[test]
    fn test_all_applies_remaining_without_prompting() {
        // Answer "all" on the first of three; the remaining two are
        // rewritten with no further input available
        let content = "aaa==1.0.0\nbbb==1.0.0\nccc==1.0.0\n";
        let (outcome, rewritten, state) = run_with_input(
            "a\n",
            content,
            vec![
                outdated("aaa", "1.0.0", "1.1.0", 1),
                outdated("bbb", "1.0.0", "1.2.0", 2),
                outdated("ccc", "1.0.0", "1.3.0", 3),
            ],
        );
        assert_eq!(outcome.applied, 3);
        assert_eq!(state, PromptState::ApplyAll);
        assert_eq!(rewritten, "aaa==1.1.0\nbbb==1.2.0\nccc==1.3.0\n");
    }

    #[test]
    fn test_quit_leaves_remaining_untouched() {
        let content = "aaa==1.0.0\nbbb==1.0.0\n";
        let (outcome, rewritten, state) = run_with_input(
            "y\nq\n",
            content,
            vec![
                outdated("aaa", "1.0.0", "1.1.0", 1),
                outdated("bbb", "1.0.0", "1.2.0", 2),
            ],
        );
        assert_eq!(outcome.applied, 1);
        assert!(outcome.quit);
        assert_eq!(state, PromptState::SkipAll);
        assert_eq!(rewritten, "aaa==1.1.0\nbbb==1.0.0\n");
    }

    #[test]
    fn test_invalid_answer_reprompts() {
        let (outcome, content, _) = run_with_input(
            "maybe\ny\n",
            "requests==2.25.0\n",
            vec![outdated("requests", "2.25.0", "2.31.0", 1)],
        );
        assert_eq!(outcome.applied, 1);
        assert!(content.contains("2.31.0"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let content = "aaa==1.0.0\nbbb==1.0.0\n";
        let (outcome, rewritten, _) = run_with_input(
            "",
            content,
            vec![
                outdated("aaa", "1.0.0", "1.1.0", 1),
                outdated("bbb", "1.0.0", "1.2.0", 2),
            ],
        );
        assert_eq!(outcome.applied, 0);
        assert!(outcome.quit);
        assert_eq!(rewritten, content);
    }

    #[test]
    fn test_apply_all_start_state() {
        let content = "aaa==1.0.0\nbbb==1.0.0\n";
        let mut writer = ManifestWriter::from_content("requirements.txt", content);
        let resolutions = vec![
            outdated("aaa", "1.0.0", "1.1.0", 1),
            outdated("bbb", "1.0.0", "1.2.0", 2),
        ];
        let refs: Vec<&Resolution> = resolutions.iter().collect();
        let mut updater =
            InteractiveUpdater::new(Cursor::new(String::new()), Vec::new(), true).apply_all();
        let outcome = updater.run(&mut writer, &refs).unwrap();
        assert_eq!(outcome.applied, 2);
    }

    #[test]
    fn test_failed_rewrite_is_collected_not_fatal() {
        // Line number points outside the manifest
        let bad = Resolution::outdated(pinned("ghost", "1.0.0", 42), "2.0.0", ChangeKind::Major);
        let (outcome, content, _) =
            run_with_input("y\ny\n", "real==1.0.0\n", vec![
                bad,
                outdated("real", "1.0.0", "1.1.0", 1),
            ]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.applied, 1);
        assert!(content.contains("real==1.1.0"));
    }

    #[test]
    fn test_actionable_includes_outdated_only_by_default() {
        let resolutions = vec![
            outdated("aaa", "1.0.0", "1.1.0", 1),
            Resolution::unpinned(Requirement::new("flask", None, 2), Some("3.0.0".to_string())),
            Resolution::up_to_date(pinned("click", "8.1.7", 3), "8.1.7"),
        ];
        let selected = actionable(&resolutions, false);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].requirement.name, "aaa");
    }

    #[test]
    fn test_actionable_includes_unpinned_when_pinning() {
        let resolutions = vec![
            outdated("aaa", "1.0.0", "1.1.0", 1),
            Resolution::unpinned(Requirement::new("flask", None, 2), Some("3.0.0".to_string())),
            Resolution::unpinned(Requirement::new("mystery", None, 3), None),
        ];
        let selected = actionable(&resolutions, true);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_pinning_unpinned_requirement() {
        let resolutions = vec![Resolution::unpinned(
            Requirement::new("flask", None, 1),
            Some("3.0.0".to_string()),
        )];
        let (outcome, content, _) = run_with_input("y\n", "flask\n", resolutions);
        assert_eq!(outcome.applied, 1);
        assert_eq!(content, "flask==3.0.0\n");
    }
}
