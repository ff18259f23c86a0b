//! # Tension Graph
//! Sparse "fault-line" graph over themes: two themes are linked only when their net
//! sentiments are far apart. Settling is delegated to a [`ForceSimulation`]; this
//! module builds its input and folds ticks into a [`TensionFrame`].

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::force::{ForceSimulation, Forces, Point, SimLink, SimulationInput};
use crate::schema::Theme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensionNode {
    pub id: String,
    /// 1 = positive > negative, 2 otherwise.
    pub group: u8,
    pub color: &'static str,
    pub net_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensionLink {
    pub source: String,
    pub target: String,
    /// `|Δ net| / 10`.
    pub value: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TensionGraph {
    pub nodes: Vec<TensionNode>,
    pub links: Vec<TensionLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensionParams {
    pub width: f64,
    pub height: f64,
    /// Pairs link only when `|Δ net| > threshold`.
    pub threshold: f64,
    pub link_distance: f64,
    pub charge_strength: f64,
}

impl Default for TensionParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 450.0,
            threshold: 50.0,
            link_distance: 150.0,
            charge_strength: -400.0,
        }
    }
}

/// Build nodes in theme order and links for every `i < j` pair over the threshold.
pub fn build_graph(themes: &[Theme], threshold: f64) -> TensionGraph {
    let nodes = themes
        .iter()
        .map(|t| {
            let polarity = t.polarity();
            TensionNode {
                id: t.name.clone(),
                group: polarity.group(),
                color: polarity.color(),
                net_sentiment: t.net_sentiment(),
            }
        })
        .collect();

    let mut links = Vec::new();
    for (i, a) in themes.iter().enumerate() {
        for b in &themes[i + 1..] {
            let diff = (a.net_sentiment() - b.net_sentiment()).abs();
            if diff > threshold {
                let value = diff / 10.0;
                links.push(TensionLink {
                    source: a.name.clone(),
                    target: b.name.clone(),
                    value,
                    stroke_width: value.sqrt(),
                });
            }
        }
    }

    TensionGraph { nodes, links }
}

/// Translate the graph into index-based simulation input.
///
/// Link endpoints resolve to the first node carrying that id; names are expected to be
/// unique within a report.
pub fn simulation_input(graph: &TensionGraph, params: &TensionParams) -> SimulationInput {
    let index_of = |id: &str| graph.nodes.iter().position(|n| n.id == id);
    let links = graph
        .links
        .iter()
        .filter_map(|l| {
            Some(SimLink {
                source: index_of(&l.source)?,
                target: index_of(&l.target)?,
            })
        })
        .collect();

    SimulationInput {
        node_count: graph.nodes.len(),
        links,
        forces: Forces {
            link_distance: params.link_distance,
            charge_strength: params.charge_strength,
            center: Point::new(params.width / 2.0, params.height / 2.0),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    #[serde(flatten)]
    pub node: TensionNode,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLink {
    #[serde(flatten)]
    pub link: TensionLink,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Latest coordinates for every node and link endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensionFrame {
    pub width: f64,
    pub height: f64,
    pub ticks: usize,
    pub nodes: Vec<PlacedNode>,
    pub links: Vec<PlacedLink>,
    #[serde(skip)]
    endpoints: Vec<Option<(usize, usize)>>,
}

impl TensionFrame {
    fn new(graph: &TensionGraph, params: &TensionParams) -> Self {
        let index_of = |id: &str| graph.nodes.iter().position(|n| n.id == id);
        Self {
            width: params.width,
            height: params.height,
            ticks: 0,
            nodes: graph
                .nodes
                .iter()
                .map(|n| PlacedNode {
                    node: n.clone(),
                    x: f64::NAN,
                    y: f64::NAN,
                })
                .collect(),
            links: graph
                .links
                .iter()
                .map(|l| PlacedLink {
                    link: l.clone(),
                    x1: f64::NAN,
                    y1: f64::NAN,
                    x2: f64::NAN,
                    y2: f64::NAN,
                })
                .collect(),
            endpoints: graph
                .links
                .iter()
                .map(|l| Some((index_of(&l.source)?, index_of(&l.target)?)))
                .collect(),
        }
    }

    /// Overwrite every coordinate from `positions`. Applying the same tick twice is a no-op.
    pub fn apply_tick(&mut self, tick: usize, positions: &[Point]) {
        for (node, p) in self.nodes.iter_mut().zip(positions) {
            node.x = p.x;
            node.y = p.y;
        }
        for (placed, ends) in self.links.iter_mut().zip(&self.endpoints) {
            let Some((s, t)) = *ends else { continue };
            if let (Some(s), Some(t)) = (positions.get(s), positions.get(t)) {
                placed.x1 = s.x;
                placed.y1 = s.y;
                placed.x2 = t.x;
                placed.y2 = t.y;
            }
        }
        self.ticks = tick + 1;
    }
}

/// Run `sim` over `graph` and return the settled frame.
///
/// `is_live` is consulted on every tick; once it reports false the run stops and
/// `None` is returned so that a stale layout never reaches the caller.
pub fn settle<S, L>(graph: &TensionGraph, params: &TensionParams, sim: &mut S, is_live: L) -> Option<TensionFrame>
where
    S: ForceSimulation + ?Sized,
    L: Fn() -> bool,
{
    let input = simulation_input(graph, params);
    let mut frame = TensionFrame::new(graph, params);
    let mut stale = false;

    sim.run(&input, &mut |tick, positions| {
        if !is_live() {
            stale = true;
            return ControlFlow::Break(());
        }
        frame.apply_tick(tick, positions);
        ControlFlow::Continue(())
    });

    if stale {
        tracing::debug!(ticks = frame.ticks, "tension settle discarded: report changed");
        None
    } else {
        Some(frame)
    }
}
