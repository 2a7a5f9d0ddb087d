mod config;
pub mod figure;
pub mod history;
pub mod layout;
pub mod manual;
pub mod matrix;
pub mod network;
pub mod parser;

use log::{info, warn};

pub use crate::config::*;
pub use crate::figure::Figure;
pub use crate::history::VotingHistory;
pub use crate::matrix::VotingMatrix;
pub use crate::network::{build_network, Network, VoteGraph};

/// Turns a network into a figure.
///
/// Arguments:
/// * `graph` the network to draw. When `options.remove_empty_nodes` is set,
/// the nodes without edges are removed before the positions are computed.
/// * `options` the layout and presentation choices
/// * `colors` the colour of each party. Every legislator of the (pruned)
/// graph must belong to a party of this table.
pub fn visualize(
    mut graph: VoteGraph,
    options: &RenderOptions,
    colors: &PartyColors,
) -> Result<Figure, NetworkError> {
    if options.remove_empty_nodes {
        let removed = graph.remove_isolated_nodes();
        info!("Removed {} nodes without edges", removed.len());
    }
    if graph.node_count() == 0 {
        warn!("visualize: the graph is empty");
    }
    info!(
        "Calculating positions of {} nodes with the {} layout",
        graph.node_count(),
        options.layout
    );
    let positions = layout::compute_layout(&graph, options.layout, options.seed);
    info!("Creating the figure with {} edges", graph.edge_count());
    figure::build_figure(&graph, &positions, colors, &options.title)
}

/// Parses a layout name and draws the network with it.
///
/// Unknown layout names are rejected before any work is done.
pub fn visualize_with_layout(
    graph: VoteGraph,
    layout_name: &str,
    options: &RenderOptions,
    colors: &PartyColors,
) -> Result<Figure, NetworkError> {
    let layout: LayoutAlgorithm = layout_name.parse()?;
    let opts = RenderOptions {
        layout,
        ..options.clone()
    };
    visualize(graph, &opts, colors)
}
