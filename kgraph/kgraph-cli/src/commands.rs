//! Command implementations for the kgraph CLI.

use crate::output::{self, format_score, short_id, OutputFormat, TableBuilder};
use crate::service::KnowledgeGraphService;
use anyhow::Result;
use kgraph_core::{GraphNeighborhood, SearchPage};
use std::collections::BTreeMap;

pub async fn neighborhood(
    service: &KnowledgeGraphService,
    node: &str,
    hops: Option<usize>,
    centrality: bool,
    format: OutputFormat,
) -> Result<()> {
    let node_id = service.resolve_node(node).await?;
    let result = service.get_neighborhood(node_id, hops, centrality).await?;
    if format.is_json() {
        return output::json(&result);
    }

    output::header(format!("Neighborhood of {}", node));
    output::kv(
        "Hops",
        format!(
            "{} requested, {} reached",
            result.requested_hops.unwrap_or_default(),
            result.actual_hops.unwrap_or_default()
        ),
    );
    for (level, count) in &result.nodes_per_hop {
        output::kv(format!("Level {}", level), count);
    }
    print_graph(&result);
    Ok(())
}

pub async fn path(
    service: &KnowledgeGraphService,
    from: &str,
    to: &str,
    max_hops: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let from_id = service.resolve_node(from).await?;
    let to_id = service.resolve_node(to).await?;
    let result = service.find_shortest_path(from_id, to_id, max_hops).await?;
    if format.is_json() {
        return output::json(&result);
    }

    if !result.found {
        output::warning(format!("No path from {} to {}", from, to));
        return Ok(());
    }
    output::success(format!("Path of length {}", result.distance));
    let hops: Vec<String> = result.path.iter().map(short_id).collect();
    println!("  {}", hops.join(" → "));
    Ok(())
}

pub async fn component(service: &KnowledgeGraphService, node: &str, format: OutputFormat) -> Result<()> {
    let node_id = service.resolve_node(node).await?;
    let result = service.get_connected_component(node_id).await?;
    if format.is_json() {
        return output::json(&result);
    }

    output::header(format!("Component of {}", node));
    output::kv("Size", result.component_size);
    result
        .node_ids
        .iter()
        .fold(TableBuilder::new().header(vec!["Node"]), |table, id| table.row(vec![id.to_string()]))
        .print();
    Ok(())
}

pub async fn centrality(service: &KnowledgeGraphService, nodes: &[String], format: OutputFormat) -> Result<()> {
    let mut ids = Vec::with_capacity(nodes.len());
    for node in nodes {
        ids.push(service.resolve_node(node).await?);
    }
    let scores = service.calculate_centrality(&ids).await?;
    if format.is_json() {
        return output::json(&scores);
    }

    let mut ranked: Vec<_> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .fold(TableBuilder::new().header(vec!["Node", "Centrality"]), |table, (id, score)| {
            table.row(vec![id.to_string(), format_score(Some(score))])
        })
        .print();
    Ok(())
}

pub async fn subgraph(service: &KnowledgeGraphService, nodes: &[String], format: OutputFormat) -> Result<()> {
    let mut ids = Vec::with_capacity(nodes.len());
    for node in nodes {
        ids.push(service.resolve_node(node).await?);
    }
    let result = service.extract_subgraph(&ids).await?;
    if format.is_json() {
        return output::json(&result);
    }

    output::header(format!("Subgraph of {} requested nodes", ids.len()));
    if result.total_nodes < ids.len() {
        output::warning(format!("{} requested nodes were not found", ids.len() - result.total_nodes));
    }
    print_graph(&result);
    Ok(())
}

pub async fn stats(service: &KnowledgeGraphService, format: OutputFormat) -> Result<()> {
    let stats = service.graph_statistics().await?;
    if format.is_json() {
        return output::json(&stats);
    }

    output::header("Graph Statistics");
    output::kv("Nodes", stats.total_nodes);
    output::kv("Edges", stats.total_edges);
    output::kv("Avg connections/node", format!("{:.2}", stats.avg_connections_per_node));
    if stats.dangling_edges > 0 {
        output::warning(format!("{} edges reference missing nodes", stats.dangling_edges));
    }

    print_counts("Node type", &stats.node_types);
    print_counts("Edge type", &stats.edge_types);
    Ok(())
}

pub async fn search(
    service: &KnowledgeGraphService,
    query: &str,
    lexical_weight: Option<f64>,
    vector_weight: Option<f64>,
    page: Option<usize>,
    size: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let result = service.hybrid_search(query, lexical_weight, vector_weight, page, size).await?;
    if format.is_json() {
        return output::json(&result);
    }
    print_search_page(&result);
    Ok(())
}

pub async fn adaptive_search(
    service: &KnowledgeGraphService,
    query: &str,
    page: Option<usize>,
    size: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let result = service.adaptive_hybrid_search(query, page, size).await?;
    if format.is_json() {
        return output::json(&result);
    }
    print_search_page(&result);
    Ok(())
}

fn print_graph(graph: &GraphNeighborhood) {
    let show_centrality = graph.nodes.iter().any(|n| n.centrality.is_some());
    let mut header = vec!["Node", "Name", "Type", "Hop"];
    if show_centrality {
        header.push("Centrality");
    }

    let mut nodes = TableBuilder::new().header(header);
    for node in &graph.nodes {
        let mut row = vec![
            short_id(node.id),
            node.name.clone(),
            node.node_type.to_string(),
            node.hop_level.map(|h| h.to_string()).unwrap_or_default(),
        ];
        if show_centrality {
            row.push(format_score(node.centrality));
        }
        nodes = nodes.row(row);
    }
    nodes.print();

    if graph.edges.is_empty() {
        output::info("No edges");
        return;
    }
    graph
        .edges
        .iter()
        .fold(TableBuilder::new().header(vec!["Edge", "Source", "Target", "Type", "Hop"]), |table, edge| {
            table.row(vec![
                short_id(edge.id),
                short_id(edge.source_id),
                short_id(edge.target_id),
                edge.edge_type.to_string(),
                edge.hop_level.map(|h| h.to_string()).unwrap_or_default(),
            ])
        })
        .print();
}

fn print_search_page(page: &SearchPage) {
    output::header(format!("Results for \"{}\"", page.query));
    output::kv("Mode", format!("{:?}", page.search_type));
    output::kv(
        "Weights",
        format!("lexical {:.2}, vector {:.2}", page.weights.lexical, page.weights.vector),
    );
    output::kv(
        "Page",
        format!(
            "{} of {} ({} results)",
            page.current_page + 1,
            page.total_pages.max(1),
            page.total_elements
        ),
    );

    if page.results.is_empty() {
        output::info("No results");
        return;
    }
    page.results
        .iter()
        .fold(
            TableBuilder::new().header(vec!["Rank", "Entity", "Kind", "Score", "Lexical", "Vector"]),
            |table, r| {
                table.row(vec![
                    r.rank.to_string(),
                    r.entity_id.to_string(),
                    r.entity_kind.to_string(),
                    format_score(Some(r.score)),
                    format_score(r.raw_lexical_score),
                    format_score(r.raw_vector_score),
                ])
            },
        )
        .print();
}

fn print_counts<K: ToString>(label: &str, counts: &BTreeMap<K, usize>) {
    if counts.is_empty() {
        return;
    }
    counts
        .iter()
        .fold(TableBuilder::new().header(vec![label, "Count"]), |table, (kind, count)| {
            table.row(vec![kind.to_string(), count.to_string()])
        })
        .print();
}
