//! A scatter-plot figure in the JSON layout understood by plotly.js.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::config::*;
use crate::layout::Position;
use crate::network::VoteGraph;

const DIVISION_SIZE: u32 = 15;
const LEGISLATOR_SIZE: u32 = 10;
const PASSED_COLOR: &str = "green";
const REJECTED_COLOR: &str = "red";

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    /// Coordinates. Line traces use `None` to separate the segments.
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    pub hoverinfo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub width: f64,
    pub color: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub color: Vec<String>,
    pub size: Vec<u32>,
    pub line: MarkerLine,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MarkerLine {
    pub width: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FigureLayout {
    pub title: Title,
    pub showlegend: bool,
    pub hovermode: String,
    pub margin: Margin,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Font {
    pub size: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub showgrid: bool,
    pub zeroline: bool,
    pub showticklabels: bool,
}

impl Axis {
    pub const HIDDEN: Axis = Axis {
        showgrid: false,
        zeroline: false,
        showticklabels: false,
    };
}

impl FigureLayout {
    pub fn new(title: &str) -> FigureLayout {
        FigureLayout {
            title: Title {
                text: title.to_string(),
                font: Font { size: 16 },
            },
            showlegend: false,
            hovermode: "closest".to_string(),
            margin: Margin {
                b: 20,
                l: 5,
                r: 5,
                t: 40,
            },
            xaxis: Axis::HIDDEN,
            yaxis: Axis::HIDDEN,
        }
    }
}

fn position(
    positions: &BTreeMap<NodeId, Position>,
    node: NodeId,
) -> Result<Position, NetworkError> {
    positions
        .get(&node)
        .cloned()
        .context(MissingPositionSnafu { node })
}

/// One line segment per edge, separated by gaps.
pub fn edge_trace(
    graph: &VoteGraph,
    positions: &BTreeMap<NodeId, Position>,
) -> Result<Trace, NetworkError> {
    let edges = graph.edges();
    let mut x: Vec<Option<f64>> = Vec::with_capacity(3 * edges.len());
    let mut y: Vec<Option<f64>> = Vec::with_capacity(3 * edges.len());
    for (a, b) in edges {
        let (x0, y0) = position(positions, a)?;
        let (x1, y1) = position(positions, b)?;
        x.extend([Some(x0), Some(x1), None]);
        y.extend([Some(y0), Some(y1), None]);
    }
    Ok(Trace {
        kind: "scatter".to_string(),
        mode: "lines".to_string(),
        x,
        y,
        text: None,
        hoverinfo: "none".to_string(),
        line: Some(Line {
            width: 0.5,
            color: "black".to_string(),
        }),
        marker: None,
    })
}

/// The color, size and hover text of a node.
pub fn node_style(data: &NodeData, colors: &PartyColors) -> Result<(String, u32, String), NetworkError> {
    match data {
        NodeData::Division(d) => {
            let color = if d.aye_count > d.noes_count {
                PASSED_COLOR
            } else {
                REJECTED_COLOR
            };
            let text = format!(
                "Vote: {} - Ayes count: {} - Noes count: {}",
                d.title, d.aye_count, d.noes_count
            );
            Ok((color.to_string(), DIVISION_SIZE, text))
        }
        NodeData::Legislator(l) => {
            let color = colors.get(&l.party).context(UnknownPartySnafu {
                party: l.party.clone(),
                name: l.name.clone(),
            })?;
            let text = format!("{} - {} - {}", l.name, l.party, l.constituency);
            Ok((color.to_string(), LEGISLATOR_SIZE, text))
        }
    }
}

/// One marker per node.
pub fn node_trace(
    graph: &VoteGraph,
    positions: &BTreeMap<NodeId, Position>,
    colors: &PartyColors,
) -> Result<Trace, NetworkError> {
    let n = graph.node_count();
    let mut x: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut y: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut text: Vec<String> = Vec::with_capacity(n);
    let mut color: Vec<String> = Vec::with_capacity(n);
    let mut size: Vec<u32> = Vec::with_capacity(n);
    for (id, data) in graph.nodes() {
        let (px, py) = position(positions, *id)?;
        let (c, s, t) = node_style(data, colors)?;
        x.push(Some(px));
        y.push(Some(py));
        color.push(c);
        size.push(s);
        text.push(t);
    }
    Ok(Trace {
        kind: "scatter".to_string(),
        mode: "markers".to_string(),
        x,
        y,
        text: Some(text),
        hoverinfo: "text".to_string(),
        line: None,
        marker: Some(Marker {
            color,
            size,
            line: MarkerLine { width: 2.0 },
        }),
    })
}

/// Assembles the edge and node traces of a placed graph.
pub fn build_figure(
    graph: &VoteGraph,
    positions: &BTreeMap<NodeId, Position>,
    colors: &PartyColors,
    title: &str,
) -> Result<Figure, NetworkError> {
    let edges = edge_trace(graph, positions)?;
    let nodes = node_trace(graph, positions, colors)?;
    debug!(
        "build_figure: {} edges, {} nodes",
        graph.edge_count(),
        graph.node_count()
    );
    Ok(Figure {
        data: vec![edges, nodes],
        layout: FigureLayout::new(title),
    })
}
