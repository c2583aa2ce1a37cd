use crate::error::Result;
use crate::pedigree::RelatednessGraph;
use petgraph::dot::{Config, Dot};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Image formats the `dot` tool is asked to produce
pub const IMAGE_FORMATS: [&str; 4] = ["jpg", "png", "svg", "pdf"];

/// Writes pedigree snapshots as Graphviz DOT, optionally converted to an image.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    dot_path: PathBuf,
    image_format: Option<String>,
}

impl GraphRenderer {
    pub fn new<P: AsRef<Path>>(dot_path: P, image_format: Option<String>) -> Self {
        Self {
            dot_path: dot_path.as_ref().to_path_buf(),
            image_format,
        }
    }

    /// Path of the rendered image, if an image format is configured
    pub fn image_path(&self) -> Option<PathBuf> {
        self.image_format
            .as_ref()
            .map(|format| self.dot_path.with_extension(format))
    }

    /// DOT source for the current graph, one node per person.
    ///
    /// A founder named by no relationship has no vertex until propagation
    /// starts; the snapshot still shows it as an isolated node.
    pub fn to_dot(graph: &RelatednessGraph) -> String {
        let mut labelled = graph
            .inner()
            .map(|_, person| person.name().to_string(), |_, _| "");
        if let Some(founder) = graph.founder().filter(|name| !graph.contains(name)) {
            labelled.add_node(founder.to_string());
        }
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }

    /// Write the snapshot, then run `dot` when an image was requested.
    ///
    /// A failing `dot` invocation is only logged; the DOT file is still left
    /// in place.
    pub fn render(&self, graph: &RelatednessGraph) -> Result<()> {
        fs::write(&self.dot_path, Self::to_dot(graph))?;
        info!(
            "Wrote pedigree graph ({} vertices) to {:?}",
            graph.node_count(),
            self.dot_path
        );

        let (Some(format), Some(image_path)) = (&self.image_format, self.image_path()) else {
            return Ok(());
        };

        match Command::new("dot")
            .arg(format!("-T{}", format))
            .arg(&self.dot_path)
            .arg("-o")
            .arg(&image_path)
            .status()
        {
            Ok(status) if status.success() => {
                info!("Rendered pedigree image to {:?}", image_path);
            }
            Ok(status) => {
                warn!("Graphviz exited with {} while rendering {:?}", status, image_path);
            }
            Err(e) => {
                warn!("Could not run Graphviz `dot`: {}", e);
            }
        }

        Ok(())
    }
}
