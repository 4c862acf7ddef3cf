use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use indicatif::ProgressIterator;
use thiserror::Error;

use super::{
    dynamic_graph::DirectedDynamicGraph, edge::Direction, GraphError, VertexId, Weight,
};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unable to read graph file")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unsupported graph file extension {0:?}")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Clone)]
pub struct GraphFactory {}

impl GraphFactory {
    pub fn from_file(path: &Path) -> Result<DirectedDynamicGraph, ReadError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        match extension {
            "fmi" => Self::from_fmi_file(path),
            "gr" => Self::from_gr_file(path),
            other => Err(ReadError::UnsupportedExtension(other.to_string())),
        }
    }

    pub fn from_fmi_file(path: &Path) -> Result<DirectedDynamicGraph, ReadError> {
        Self::from_fmi_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_gr_file(path: &Path) -> Result<DirectedDynamicGraph, ReadError> {
        Self::from_gr_reader(BufReader::new(File::open(path)?))
    }

    /// Reads the FMI text format: `#` comment lines, the vertex count, the
    /// edge count, one line per vertex and one line per one-way edge
    /// (`srcIDX trgIDX cost ...`).
    pub fn from_fmi_reader(reader: impl BufRead) -> Result<DirectedDynamicGraph, ReadError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|line| (index + 1, line)))
            .filter(|line| match line {
                Ok((_, line)) => !line.starts_with('#') && !line.trim().is_empty(),
                Err(_) => true,
            });

        let (line, number_of_vertices) = next_value::<u32>(&mut lines, "number of vertices")?;
        let (_, number_of_edges) = next_value::<usize>(&mut lines, "number of edges")?;

        for _ in 0..number_of_vertices {
            if lines.next().transpose()?.is_none() {
                return Err(parse_error(line, "file ends before all vertices are listed"));
            }
        }

        let mut graph = DirectedDynamicGraph::new(number_of_vertices);
        for _ in (0..number_of_edges).progress_count(number_of_edges as u64) {
            let (line, content) = lines
                .next()
                .transpose()?
                .ok_or_else(|| parse_error(line, "file ends before all edges are listed"))?;
            let mut values = content.split_whitespace();
            let tail: VertexId = parse_field(values.next(), line, "tail")?;
            let head: VertexId = parse_field(values.next(), line, "head")?;
            let weight: Weight = parse_field(values.next(), line, "weight")?;
            add_one_way(&mut graph, tail, head, weight)?;
        }

        Ok(graph)
    }

    /// Reads the DIMACS shortest path format (`p sp n m` header, `a u v w`
    /// arc lines, 1-based vertex ids).
    pub fn from_gr_reader(reader: impl BufRead) -> Result<DirectedDynamicGraph, ReadError> {
        let mut graph = DirectedDynamicGraph::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let mut values = line.split_whitespace();
            match values.next() {
                Some("p") => {
                    values.next();
                    let number_of_vertices = parse_field(values.next(), line_number, "vertices")?;
                    graph = DirectedDynamicGraph::new(number_of_vertices);
                }
                Some("a") => {
                    let tail: VertexId = parse_field(values.next(), line_number, "tail")?;
                    let head: VertexId = parse_field(values.next(), line_number, "head")?;
                    let weight: Weight = parse_field(values.next(), line_number, "weight")?;
                    if tail == 0 || head == 0 {
                        return Err(parse_error(line_number, "vertex ids are 1-based"));
                    }
                    add_one_way(&mut graph, tail - 1, head - 1, weight)?;
                }
                _ => {}
            }
        }

        Ok(graph)
    }
}

fn add_one_way(
    graph: &mut DirectedDynamicGraph,
    tail: VertexId,
    head: VertexId,
    weight: Weight,
) -> Result<(), GraphError> {
    // road files occasionally contain loops, they never matter for routing
    if tail == head {
        return Ok(());
    }
    graph.try_add_or_update_edge(tail, head, weight, Direction::Forward, None)?;
    graph.try_add_or_update_edge(head, tail, weight, Direction::Backward, None)?;
    Ok(())
}

fn next_value<T: std::str::FromStr>(
    lines: &mut impl Iterator<Item = std::io::Result<(usize, String)>>,
    what: &str,
) -> Result<(usize, T), ReadError> {
    let (line, content) = lines
        .next()
        .transpose()?
        .ok_or_else(|| parse_error(0, &format!("missing {}", what)))?;
    let value = parse_field(Some(content.as_str()), line, what)?;
    Ok((line, value))
}

fn parse_field<T: std::str::FromStr>(
    value: Option<&str>,
    line: usize,
    what: &str,
) -> Result<T, ReadError> {
    let value = value.ok_or_else(|| parse_error(line, &format!("no {} found", what)))?;
    value
        .trim()
        .parse()
        .map_err(|_| parse_error(line, &format!("unable to parse {} from {:?}", what, value)))
}

fn parse_error(line: usize, message: &str) -> ReadError {
    ReadError::Parse {
        line,
        message: message.to_string(),
    }
}
