// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// The identifier of a single vote inside a division, formatted as
/// `{division:04}_{row:03}` (rows start at 1).
pub type VoteId = String;

/// The decision recorded for one legislator in one division.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Decision {
    Aye,
    No,
    /// Anything else that the portal records (tellers, proxies, ...).
    Other(String),
}

impl Decision {
    /// Decisions are compared without regard to case.
    pub fn from_raw(raw: &str) -> Decision {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("aye") {
            Decision::Aye
        } else if s.eq_ignore_ascii_case("no") {
            Decision::No
        } else {
            Decision::Other(s.to_string())
        }
    }
}

/// One row of a division record: how a single legislator voted.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: VoteId,
    pub name: String,
    pub party: String,
    pub constituency: String,
    pub decision: String,
    pub extra: String,
}

impl VoteRecord {
    pub fn decision(&self) -> Decision {
        Decision::from_raw(&self.decision)
    }

    pub fn is_aye(&self) -> bool {
        self.decision() == Decision::Aye
    }

    /// The raw 5-tuple, in file order.
    pub fn fields(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.party.as_str(),
            self.constituency.as_str(),
            self.decision.as_str(),
            self.extra.as_str(),
        ]
    }
}

/// A recorded vote event of the chamber.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub division_nr: u32,
    pub date: NaiveDate,
    pub title: String,
    pub aye_count: u32,
    pub noes_count: u32,
    /// The votes, in the order of the source file.
    pub votes: Vec<VoteRecord>,
}

impl Division {
    pub fn vote(&self, id: &str) -> Option<&VoteRecord> {
        self.votes.iter().find(|v| v.id == id)
    }

    /// The votes keyed by their identifier.
    pub fn votes_by_id(&self) -> BTreeMap<&str, &VoteRecord> {
        self.votes.iter().map(|v| (v.id.as_str(), v)).collect()
    }

    pub fn passed(&self) -> bool {
        self.aye_count > self.noes_count
    }
}

/// An entry of the selection menu: the title of a division and its number.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOption {
    pub label: String,
    pub value: u32,
}

// ******** Graph data structures *********

pub type NodeId = u64;

/// Legislator nodes are numbered from this offset so that they never
/// collide with division nodes.
pub const LEGISLATOR_ID_OFFSET: NodeId = 1_000_000;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DivisionNode {
    pub division_nr: u32,
    pub date: NaiveDate,
    pub title: String,
    pub aye_count: u32,
    pub noes_count: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LegislatorNode {
    pub name: String,
    pub party: String,
    pub constituency: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Division(DivisionNode),
    Legislator(LegislatorNode),
}

impl NodeData {
    pub fn is_division(&self) -> bool {
        matches!(self, NodeData::Division(_))
    }
}

// ********* Errors **********

/// Errors that make a division record unusable.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    #[snafu(display("missing line {lineno} ({what})"))]
    MissingLine { lineno: usize, what: String },
    #[snafu(display("no division number in line {line:?}"))]
    MissingDivisionNumber { line: String },
    #[snafu(display("division number out of range in line {line:?}"))]
    DivisionNumberRange {
        line: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("could not read the date in line {line:?}"))]
    InvalidDate {
        line: String,
        source: chrono::ParseError,
    },
    #[snafu(display("could not read the count in line {lineno}: {line:?}"))]
    InvalidCount {
        lineno: usize,
        line: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("could not read the vote rows"))]
    VoteRow { source: csv::Error },
    #[snafu(display("vote row in line {lineno} has {found} fields instead of 5: {content}"))]
    VoteFieldCount {
        lineno: usize,
        found: usize,
        content: String,
    },
}

/// Errors while loading a full voting history.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HistoryError {
    #[snafu(display("malformed division record {name}"))]
    MalformedSource { name: String, source: ParseError },
}

/// Errors from the network construction and rendering steps.
#[derive(Eq, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NetworkError {
    #[snafu(display("unknown layout option: {name} (expected one of circular, random, shell, spring, spectral)"))]
    UnknownLayout { name: String },
    #[snafu(display("no colour configured for party {party:?} (legislator {name})"))]
    UnknownParty { party: String, name: String },
    #[snafu(display("{count} divisions do not fit below the legislator node offset"))]
    TooManyDivisions { count: usize },
    #[snafu(display("no position computed for node {node}"))]
    MissingPosition { node: NodeId },
}

// ********* Configuration **********

/// What to do when one file of a directory cannot be parsed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MalformedPolicy {
    /// The whole load fails.
    Abort,
    /// The file is skipped with a warning.
    Skip,
}

/// The graph drawing algorithms that can place the nodes.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LayoutAlgorithm {
    Circular,
    Random,
    Shell,
    Spring,
    Spectral,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 5] = [
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Random,
        LayoutAlgorithm::Shell,
        LayoutAlgorithm::Spring,
        LayoutAlgorithm::Spectral,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Random => "random",
            LayoutAlgorithm::Shell => "shell",
            LayoutAlgorithm::Spring => "spring",
            LayoutAlgorithm::Spectral => "spectral",
        }
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutAlgorithm::ALL
            .iter()
            .find(|l| l.name() == s)
            .cloned()
            .context(UnknownLayoutSnafu { name: s })
    }
}

impl Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The colour of each party, as used for the legislator markers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PartyColors {
    colors: BTreeMap<String, String>,
}

impl PartyColors {
    pub fn empty() -> PartyColors {
        PartyColors {
            colors: BTreeMap::new(),
        }
    }

    pub fn get(&self, party: &str) -> Option<&str> {
        self.colors.get(party).map(|s| s.as_str())
    }

    /// Adds or replaces the colour of a party.
    pub fn insert(&mut self, party: &str, color: &str) {
        self.colors.insert(party.to_string(), color.to_string());
    }

    pub fn extend(&mut self, other: &BTreeMap<String, String>) {
        for (party, color) in other.iter() {
            self.insert(party, color);
        }
    }

    /// The parties of a list that have no colour.
    pub fn missing<'a>(&self, parties: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
        parties
            .into_iter()
            .filter(|p| !self.colors.contains_key(p.as_str()))
            .map(|p| p.as_str())
            .collect()
    }
}

impl Default for PartyColors {
    /// The parties that sit in the House of Commons.
    fn default() -> Self {
        let mut pc = PartyColors::empty();
        for (party, color) in [
            ("Labour", "#ff00ff"),
            ("Deputy Speaker", "#e5e500"),
            ("Speaker", "#ffff00"),
            ("Conservative", "#0000ff"),
            ("Independent", "#ffa500"),
            ("Green Party", "#00cd00"),
            ("Liberal Democrat", "#800080"),
            ("Scottish National Party", "#E56914"),
            ("Democratic Unionist Party", "#00ffff"),
            ("Plaid Cymru", "#ffffff"),
            // The portal exports the accent as a question mark.
            ("Sinn F?in", "#000000"),
            ("Sinn Féin", "#000000"),
        ] {
            pc.insert(party, color);
        }
        pc
    }
}

/// How a network is turned into a figure.
#[derive(PartialEq, Debug, Clone)]
pub struct RenderOptions {
    /// Drop the nodes without any edge (legislators that did not vote
    /// for any of the selected divisions) before placing the nodes.
    pub remove_empty_nodes: bool,
    pub layout: LayoutAlgorithm,
    /// Seed for the layouts that use randomness (random, spring).
    pub seed: u64,
    pub title: String,
}

impl RenderOptions {
    pub const DEFAULT_TITLE: &'static str = "Network graph for votes at uk parliament.";
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            remove_empty_nodes: true,
            layout: LayoutAlgorithm::Spring,
            seed: 0,
            title: RenderOptions::DEFAULT_TITLE.to_string(),
        }
    }
}
