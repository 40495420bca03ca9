use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::NodeSelection;

pub type NodeId = u32;

static SOCKET_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Socket(\d+)$").expect("static regex"));

/// Resolve the node ids to plot, scanning the main header row when asked for all.
pub fn discover_nodes(selection: &NodeSelection, main_header: &[String]) -> Vec<NodeId> {
    match selection {
        NodeSelection::Explicit(ids) => ids.clone(),
        NodeSelection::All => {
            let mut nodes: Vec<NodeId> = Vec::new();
            for title in main_header {
                let Some(caps) = SOCKET_TOKEN.captures(title.trim()) else {
                    continue;
                };
                // ids too large for u32 cannot name a real socket
                let Ok(id) = caps[1].parse::<NodeId>() else {
                    continue;
                };
                if !nodes.contains(&id) {
                    nodes.push(id);
                }
            }
            debug!(?nodes, "discovered nodes from header");
            nodes
        }
    }
}
