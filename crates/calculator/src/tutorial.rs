//! First-run walkthrough of where each input comes from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::form::Field;

pub struct TutorialStep {
    pub title: &'static str,
    pub content: &'static str,
    /// Input the step explains, if any
    pub field: Option<Field>,
    pub links: &'static [(&'static str, &'static str)],
}

const DATA_SOURCES: &[(&str, &str)] = &[
    ("Investidor10", "https://investidor10.com.br"),
    ("StatusInvest", "https://statusinvest.com.br"),
];

pub static STEPS: [TutorialStep; 8] = [
    TutorialStep {
        title: "Welcome to the valuation calculator!",
        content: "This walkthrough shows how to fill in each field correctly, even without a finance \
                  background. Let's see where the data comes from.",
        field: None,
        links: &[],
    },
    TutorialStep {
        title: "EPS (earnings per share)",
        content: "EPS shows how much profit each share generated. Fundamentals portals list it under \
                  the company's key indicators; look for \"EPS\" or \"earnings per share\".",
        field: Some(Field::EarningsPerShare),
        links: DATA_SOURCES,
    },
    TutorialStep {
        title: "BVPS (book value per share)",
        content: "BVPS is the accounting value behind each share: shareholders' equity divided by the \
                  number of shares. It sits next to EPS in the same indicator tables.",
        field: Some(Field::BookValuePerShare),
        links: &[],
    },
    TutorialStep {
        title: "Growth rate (%)",
        content: "The expected yearly growth of earnings. The average growth (CAGR) of the last five \
                  years is a good starting point; 5% to 15% is common for mature companies.",
        field: Some(Field::GrowthRate),
        links: &[],
    },
    TutorialStep {
        title: "Current price",
        content: "The stock's latest quote. Your broker's app, Google Finance or Yahoo Finance show it \
                  in real time; just search for the ticker.",
        field: Some(Field::CurrentPrice),
        links: &[],
    },
    TutorialStep {
        title: "Supplementary indicators (optional)",
        content: "EV/EBITDA, net debt/EBITDA, ROE and the other extra fields are optional but make the \
                  analysis much richer. Anything left blank is skipped or estimated automatically.",
        field: None,
        links: &[],
    },
    TutorialStep {
        title: "Tip: FCF (free cash flow)",
        content: "Free cash flow is published on the company's investor relations site. If you can't \
                  find it, leave it blank and the analysis will estimate it as 80% of earnings.",
        field: Some(Field::FreeCashFlow),
        links: &[],
    },
    TutorialStep {
        title: "You're all set! 🎉",
        content: "You now know where every figure comes from. Run `tutorial` at any time to see this \
                  again. Happy investing!",
        field: None,
        links: &[],
    },
];

/// Position inside [`STEPS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TutorialCursor {
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Step(TutorialCursor),
    Finished,
}

impl TutorialCursor {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> &'static TutorialStep {
        &STEPS[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == STEPS.len()
    }

    /// Advancing past the last step finishes the tutorial
    pub fn next(self) -> CursorMove {
        if self.is_last() {
            CursorMove::Finished
        } else {
            CursorMove::Step(Self {
                index: self.index + 1,
            })
        }
    }

    /// Stays on the first step
    pub fn previous(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
        }
    }

    /// "Step 3 of 8"
    pub fn progress(&self) -> String {
        format!("Step {} of {}", self.index + 1, STEPS.len())
    }
}

/// Marker file recording that the tutorial was closed or finished once
#[derive(Debug, Clone)]
pub struct TutorialFlag {
    path: PathBuf,
}

const MARKER_FILE: &str = "tutorial_seen";

impl TutorialFlag {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(MARKER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_seen(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|content| content.trim() == "true")
            .unwrap_or(false)
    }

    pub fn mark_seen(&self) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, "true")?;
        debug!("Tutorial marked as seen at {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
