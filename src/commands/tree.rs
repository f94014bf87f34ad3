//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the fragment
//! graph of a descriptor in a hierarchical format.
//!
//! ## Functionality
//!
//! - **Fragment Graph Visualization**: Shows every fragment and the fragments
//!   it declares, in merge order
//! - **Depth Control**: Supports `--depth` flag to limit tree depth
//! - **Origin Display**: Marks fragments taken from a local override
//!
//! Every fragment is resolved and built, so resolution failures and cycles
//! are reported exactly as `build` would report them.

use anyhow::{anyhow, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::path::PathBuf;

use super::EngineArgs;
use maven_compose::builder::{BuildRequest, DescriptorBuilder};
use maven_compose::output::OutputConfig;
use maven_compose::phases::{ArtifactOrigin, FragmentNode};

/// Display the fragment graph of a descriptor
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Descriptor file to inspect.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only the descriptor, 1 to show its own fragments, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, output: &OutputConfig) -> Result<()> {
    let engine = args.engine.engine()?;
    let request = BuildRequest::for_file(&args.descriptor);

    let fragments = engine.fragment_tree(&request)?;
    let composed = engine.build(&request)?;

    let max_depth = args.depth.unwrap_or(usize::MAX);
    let children = if max_depth == 0 {
        vec![]
    } else {
        fragments
            .iter()
            .map(|node| build_tree_node(node, output, max_depth, 1))
            .collect()
    };
    let tree_root = TreeNode {
        label: output.header(&composed.gav()),
        children,
    };
    print_tree(&tree_root).map_err(|e| anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Build a tree node from a fragment node
fn build_tree_node(node: &FragmentNode, output: &OutputConfig, max_depth: usize, current_depth: usize) -> TreeNode {
    let mut label = format!("{} ({})", node.coordinate, node.property);
    if node.origin == ArtifactOrigin::LocalOverride {
        label.push_str(&format!(" {}", output.detail(&format!("@ {}", node.file.display()))));
    }

    let children = if current_depth >= max_depth {
        vec![]
    } else {
        node.children
            .iter()
            .map(|child| build_tree_node(child, output, max_depth, current_depth + 1))
            .collect()
    };
    TreeNode { label, children }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maven_compose::coordinate::Coordinate;

    fn node(artifact_id: &str, children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode {
            property: format!("maven-compose.{}", artifact_id),
            coordinate: Coordinate::new("com.x", artifact_id, "1"),
            file: PathBuf::from(format!("/repo/{}.pom", artifact_id)),
            origin: ArtifactOrigin::Repository,
            children,
        }
    }

    #[test]
    fn test_build_tree_node_respects_depth() {
        let output = OutputConfig::from_env_and_flag("never");
        let graph = node("frag", vec![node("base", vec![node("root", vec![])])]);

        let full = build_tree_node(&graph, &output, usize::MAX, 1);
        assert_eq!(full.children[0].children.len(), 1);

        let shallow = build_tree_node(&graph, &output, 1, 1);
        assert_eq!(shallow.label, "com.x:frag:1 (maven-compose.frag)");
        assert!(shallow.children.is_empty());
    }

    #[test]
    fn test_execute_missing_descriptor() {
        let args = TreeArgs {
            descriptor: PathBuf::from("/nonexistent/pom.yaml"),
            depth: None,
            engine: EngineArgs::default(),
        };
        let result = execute(args, &OutputConfig::from_env_and_flag("never"));
        assert!(result.is_err());
    }
}
